//! Create a new post

use anyhow::Result;

use crate::content::{Post, PostInput};
use crate::Folio;

/// Options for `folio-rs new`
#[derive(Debug, Default)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub slug: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub summary: Option<&'a str>,
}

/// Create a post dated today. Refuses to overwrite an existing slug.
pub fn create_post(folio: &Folio, options: &NewPost<'_>) -> Result<Post> {
    let slug = match options.slug {
        Some(slug) => slug.to_string(),
        None => slug::slugify(options.title),
    };

    if folio.posts.get_post(&slug).is_ok() {
        anyhow::bail!("Post already exists: {}", slug);
    }

    let input = PostInput {
        title: options.title.to_string(),
        slug,
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        summary: options.summary.unwrap_or_default().to_string(),
        tags: options.tags.unwrap_or_default().to_string(),
        content: format!("Write about {} here.\n", options.title),
    };

    let post = folio.posts.create_post(input)?;
    println!(
        "Created: {:?}",
        folio
            .posts
            .dir()
            .join(format!("{}.{}", post.slug, folio.config.post_extension))
    );
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_post_slugifies_title() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        let post = create_post(
            &folio,
            &NewPost {
                title: "My New Post!",
                tags: Some("rust, web"),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(post.slug, "my-new-post");
        let stored = folio.posts.get_post("my-new-post").unwrap();
        assert_eq!(stored.metadata.title, "My New Post!");
        assert_eq!(stored.metadata.tags, vec!["rust", "web"]);
    }

    #[test]
    fn test_new_post_refuses_existing_slug() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        let options = NewPost {
            title: "Hello",
            slug: Some("hello"),
            ..Default::default()
        };

        create_post(&folio, &options).unwrap();
        assert!(create_post(&folio, &options).is_err());
    }
}

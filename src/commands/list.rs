//! List site content

use anyhow::Result;

use crate::helpers::tag_counts;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = folio.posts.list_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.metadata.date, post.metadata.title, post.slug
                );
            }
        }
        "project" | "projects" => {
            let projects = folio.projects.list_projects()?;
            println!("Projects ({}):", projects.len());
            for project in projects {
                println!(
                    "  {} - {} [{}]",
                    project.created_at, project.title, project.id
                );
            }
        }
        "tag" | "tags" => {
            let posts = folio.posts.list_posts()?;
            let tags = tag_counts(&posts);
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag.name, tag.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, project, tag",
                content_type
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_type() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert!(run(&folio, "post").is_ok());
        assert!(run(&folio, "category").is_err());
    }
}

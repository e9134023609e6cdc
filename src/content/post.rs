//! Post model and input validation

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::frontmatter::{parse_date_string, FrontMatter};

/// Longest slug accepted as a filename stem
pub const MAX_SLUG_LEN: usize = 128;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap();
}

/// Post metadata (the front-matter block)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMetadata {
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl PostMetadata {
    /// Build metadata from parsed front-matter. `None` if there is no title.
    pub fn from_front_matter(fm: FrontMatter) -> Option<Self> {
        let title = fm.title.filter(|t| !t.trim().is_empty())?;
        Some(Self {
            title,
            date: fm.date.unwrap_or_default(),
            summary: fm.summary,
            image: fm.image,
            tags: fm.tags,
            extra: fm.extra,
        })
    }

    /// Convert back into front-matter for serialization
    pub fn to_front_matter(&self) -> FrontMatter {
        FrontMatter {
            title: Some(self.title.clone()),
            date: Some(self.date.clone()),
            summary: self.summary.clone(),
            image: self.image.clone(),
            tags: self.tags.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Date used for ordering, if it parses
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_date_string(&self.date)
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Filename stem, unique across the posts directory
    pub slug: String,
    pub metadata: PostMetadata,
    /// Raw markdown body
    pub content: String,
}

impl Post {
    /// Parse a post document. `None` if the file has no usable title.
    pub fn from_document(slug: &str, text: &str) -> Result<Option<Self>, super::FrontMatterError> {
        let (fm, body) = FrontMatter::parse(text)?;
        Ok(PostMetadata::from_front_matter(fm).map(|metadata| Self {
            slug: slug.to_string(),
            metadata,
            content: body.to_string(),
        }))
    }

    /// Serialize the post into its on-disk form
    pub fn to_document(&self) -> Result<String, super::FrontMatterError> {
        self.metadata.to_front_matter().to_document(&self.content)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t == tag)
    }

    /// Year of the post date, if it parses
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.metadata.parsed_date().map(|d| d.year())
    }

    /// Estimated reading time: one minute per 500 characters, rounded up
    pub fn reading_minutes(&self) -> usize {
        self.content.chars().count().div_ceil(CHARS_PER_MINUTE)
    }
}

const CHARS_PER_MINUTE: usize = 500;

/// Fields submitted when creating or updating a post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub summary: String,
    /// Comma-separated tag list
    pub tags: String,
    pub content: String,
}

impl PostInput {
    /// Check required fields and the slug, returning a message on failure
    pub fn validate(&self) -> Result<(), String> {
        let missing = [
            ("title", &self.title),
            ("slug", &self.slug),
            ("date", &self.date),
            ("content", &self.content),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(format!("Missing required fields: {}", missing.join(", ")));
        }
        validate_slug(self.slug.trim())?;
        if parse_date_string(&self.date).is_none() {
            return Err(format!("Invalid date: {}", self.date.trim()));
        }
        Ok(())
    }

    /// Build the post this input describes. Call `validate` first.
    pub fn into_post(self) -> Post {
        let summary = Some(self.summary.trim().to_string()).filter(|s| !s.is_empty());
        Post {
            slug: self.slug.trim().to_string(),
            metadata: PostMetadata {
                title: self.title.trim().to_string(),
                date: self.date.trim().to_string(),
                summary,
                image: None,
                tags: parse_tag_list(&self.tags),
                extra: IndexMap::new(),
            },
            content: self.content,
        }
    }

    /// Build the post, keeping header fields the form does not edit
    /// (`image` and any unknown keys) from `previous`
    pub fn into_post_keeping(self, previous: &Post) -> Post {
        let mut post = self.into_post();
        post.metadata.image = previous.metadata.image.clone();
        post.metadata.extra = previous.metadata.extra.clone();
        post
    }
}

/// Split a comma-separated tag list, dropping blanks
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// A slug is a filesystem-safe filename stem
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.len() > MAX_SLUG_LEN {
        return Err(format!("Slug is longer than {} characters", MAX_SLUG_LEN));
    }
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(format!(
            "Invalid slug '{}': use lowercase letters, digits, '-' and '_'",
            slug
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> PostInput {
        PostInput {
            title: "Hello".to_string(),
            slug: "hello-world".to_string(),
            date: "2024-05-01".to_string(),
            summary: "  ".to_string(),
            tags: "rust, web,, ".to_string(),
            content: "Body".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let mut i = input();
        i.title.clear();
        i.content = "   ".to_string();
        let err = i.validate().unwrap_err();
        assert_eq!(err, "Missing required fields: title, content");
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let mut i = input();
        i.date = "yesterday".to_string();
        assert!(i.validate().unwrap_err().contains("Invalid date"));
    }

    #[test]
    fn test_into_post_normalizes() {
        let post = input().into_post();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.metadata.summary, None);
        assert_eq!(post.metadata.tags, vec!["rust", "web"]);
    }

    #[test]
    fn test_into_post_keeping_carries_image_and_extra() {
        let previous = Post::from_document(
            "hello-world",
            "---\ntitle: Old\nimage: /cover.png\nlayout: wide\n---\nold body",
        )
        .unwrap()
        .unwrap();

        let post = input().into_post_keeping(&previous);
        assert_eq!(post.metadata.title, "Hello");
        assert_eq!(post.metadata.image.as_deref(), Some("/cover.png"));
        assert_eq!(
            post.metadata.extra.get("layout"),
            Some(&serde_yaml::Value::String("wide".to_string()))
        );
        assert_eq!(post.content, "Body");
    }

    #[test]
    fn test_reading_minutes_rounds_up() {
        let mut post = input().into_post();
        assert_eq!(post.reading_minutes(), 1);
        post.content = "a".repeat(500);
        assert_eq!(post.reading_minutes(), 1);
        post.content = "é".repeat(501);
        assert_eq!(post.reading_minutes(), 2);
        post.content.clear();
        assert_eq!(post.reading_minutes(), 0);
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("my_post-2").is_ok());
        assert!(validate_slug("../etc/passwd").is_err());
        assert!(validate_slug("Upper").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug(".hidden").is_err());
        assert!(validate_slug("").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn test_from_document_requires_title() {
        let post = Post::from_document("x", "---\ndate: 2024-01-01\n---\nbody").unwrap();
        assert!(post.is_none());

        let post = Post::from_document("x", "---\ntitle: Yes\n---\nbody")
            .unwrap()
            .unwrap();
        assert_eq!(post.metadata.title, "Yes");
        assert_eq!(post.metadata.date, "");
        assert_eq!(post.year(), None);
    }
}

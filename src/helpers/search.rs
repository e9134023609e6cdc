//! Title/summary search over the post list

use serde::Serialize;

use crate::content::Post;

/// Search hit as returned by the JSON search endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub date: String,
}

impl From<&Post> for SearchHit {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.metadata.title.clone(),
            summary: post.metadata.summary.clone(),
            date: post.metadata.date.clone(),
        }
    }
}

/// Case-insensitive substring match on title or summary, in list order,
/// at most `limit` results. A blank query matches nothing.
pub fn search_posts<'a>(posts: &'a [Post], query: &str, limit: usize) -> Vec<&'a Post> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    posts
        .iter()
        .filter(|post| {
            post.metadata.title.to_lowercase().contains(&needle)
                || post
                    .metadata
                    .summary
                    .as_deref()
                    .map(|s| s.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostInput;

    fn post(slug: &str, title: &str, summary: &str) -> Post {
        PostInput {
            title: title.to_string(),
            slug: slug.to_string(),
            date: "2024-01-01".to_string(),
            summary: summary.to_string(),
            tags: String::new(),
            content: "body".to_string(),
        }
        .into_post()
    }

    #[test]
    fn test_matches_title_or_summary_case_insensitively() {
        let posts = vec![
            post("a", "Learning Rust", ""),
            post("b", "Cooking", "a RUST-free pan"),
            post("c", "Gardening", "tomatoes"),
        ];
        let hits: Vec<_> = search_posts(&posts, "rust", 5)
            .into_iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(hits, vec!["a", "b"]);
    }

    #[test]
    fn test_limit_and_blank_query() {
        let posts: Vec<_> = (0..8)
            .map(|i| post(&format!("p{}", i), "Same title", ""))
            .collect();
        assert_eq!(search_posts(&posts, "same", 5).len(), 5);
        assert!(search_posts(&posts, "   ", 5).is_empty());
    }

    #[test]
    fn test_search_hit_from_post() {
        let p = post("a", "Title", "Sum");
        let hit = SearchHit::from(&p);
        assert_eq!(hit.slug, "a");
        assert_eq!(hit.summary.as_deref(), Some("Sum"));
    }
}

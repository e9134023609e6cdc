//! Tag and archive listings over an already-sorted post list

use indexmap::IndexMap;
use serde::Serialize;

use crate::content::Post;

/// Label used for posts whose date does not parse
pub const UNDATED: &str = "Undated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearGroup<'a> {
    /// Four-digit year, or [`UNDATED`]
    pub year: String,
    pub posts: Vec<&'a Post>,
}

/// Count posts per tag, most used first; equal counts keep first appearance
pub fn tag_counts(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();

    for post in posts {
        for tag in &post.metadata.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
}

/// Posts carrying exactly `tag`, in list order
pub fn posts_with_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.has_tag(tag)).collect()
}

/// Group posts by year, newest year first, undated posts last
pub fn group_by_year(posts: &[Post]) -> Vec<YearGroup<'_>> {
    let mut years: IndexMap<Option<i32>, Vec<&Post>> = IndexMap::new();
    for post in posts {
        years.entry(post.year()).or_default().push(post);
    }

    let mut groups: Vec<_> = years.into_iter().collect();
    // None sorts below every year
    groups.sort_by(|a, b| b.0.cmp(&a.0));

    groups
        .into_iter()
        .map(|(year, posts)| YearGroup {
            year: year
                .map(|y| y.to_string())
                .unwrap_or_else(|| UNDATED.to_string()),
            posts,
        })
        .collect()
}

//! Search posts from the command line

use anyhow::Result;

use crate::helpers::search_posts;
use crate::Folio;

pub fn run(folio: &Folio, query: &str) -> Result<()> {
    let posts = folio.posts.list_posts()?;
    let hits = search_posts(&posts, query, folio.config.search_limit);

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    for post in hits {
        println!("  {} - {} [{}]", post.metadata.date, post.metadata.title, post.slug);
        if let Some(summary) = &post.metadata.summary {
            println!("      {}", summary);
        }
    }
    Ok(())
}

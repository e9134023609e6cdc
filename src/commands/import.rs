//! Import a markdown file as a post

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::Post;
use crate::Folio;

/// Copy `file` into the posts directory, keyed by its file stem
pub fn run(folio: &Folio, file: &Path) -> Result<Post> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {:?}", file))?;

    let post = folio.posts.import_post(&bytes, filename)?;
    println!("Imported: {} [{}]", post.metadata.title, post.slug);
    Ok(post)
}

//! Post files: one `<slug>.<ext>` document per post

use std::cmp::Reverse;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{write_atomic, StoreError};
use crate::content::{validate_slug, Post, PostInput};

/// Extensions accepted by [`PostStore::import_post`]
const IMPORT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Reads and writes post files in a single directory
#[derive(Debug, Clone)]
pub struct PostStore {
    dir: PathBuf,
    extension: String,
}

impl PostStore {
    pub fn new<P: Into<PathBuf>>(dir: P, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, self.extension))
    }

    fn is_post_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }

    /// All posts, newest first. Posts with equal or unparseable dates keep
    /// filename order, unparseable ones last.
    pub fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_post_file(path) {
                continue;
            }

            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Err(e) = validate_slug(slug) {
                tracing::warn!("Skipping {:?}: {}", path, e);
                continue;
            }

            match read_post(slug, path) {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => tracing::warn!("Skipping {:?}: no title in front-matter", path),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        posts.sort_by_cached_key(|p| Reverse(p.metadata.parsed_date()));

        Ok(posts)
    }

    /// Load one post. Absent, malformed and invalid slugs are all `NotFound`.
    pub fn get_post(&self, slug: &str) -> Result<Post, StoreError> {
        let not_found = || StoreError::NotFound(format!("Post '{}' not found", slug));

        if validate_slug(slug).is_err() {
            return Err(not_found());
        }

        let path = self.path_for(slug);
        match read_post(slug, &path) {
            Ok(Some(post)) => Ok(post),
            Ok(None) => {
                tracing::warn!("Post {:?} has no title in front-matter", path);
                Err(not_found())
            }
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Err(not_found()),
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!("Post {:?} is not valid UTF-8", path);
                Err(not_found())
            }
            Err(StoreError::FrontMatter(e)) => {
                tracing::warn!("Post {:?} is malformed: {}", path, e);
                Err(not_found())
            }
            Err(e) => Err(e),
        }
    }

    /// Write a new post. An existing post with the same slug is overwritten.
    pub fn create_post(&self, input: PostInput) -> Result<Post, StoreError> {
        input.validate().map_err(StoreError::Validation)?;
        let post = input.into_post();
        self.write_post(&post)?;
        tracing::info!("Created post {}", post.slug);
        Ok(post)
    }

    /// Rewrite a post, renaming it when the slug changed. The new file is
    /// written before the old one is removed.
    pub fn update_post(&self, original_slug: &str, input: PostInput) -> Result<Post, StoreError> {
        let original_slug = original_slug.trim();
        if original_slug.is_empty() {
            return Err(StoreError::Validation(
                "Missing required fields: originalSlug".to_string(),
            ));
        }
        validate_slug(original_slug).map_err(StoreError::Validation)?;
        input.validate().map_err(StoreError::Validation)?;

        let post = match self.get_post(original_slug) {
            Ok(previous) => input.into_post_keeping(&previous),
            Err(StoreError::NotFound(_)) => input.into_post(),
            Err(e) => return Err(e),
        };
        self.write_post(&post)?;

        if post.slug != original_slug {
            remove_if_present(&self.path_for(original_slug))?;
            tracing::info!("Renamed post {} -> {}", original_slug, post.slug);
        } else {
            tracing::info!("Updated post {}", post.slug);
        }
        Ok(post)
    }

    /// Remove a post; deleting an absent post succeeds
    pub fn delete_post(&self, slug: &str) -> Result<(), StoreError> {
        validate_slug(slug).map_err(StoreError::Validation)?;
        if remove_if_present(&self.path_for(slug))? {
            tracing::info!("Deleted post {}", slug);
        }
        Ok(())
    }

    /// Store an uploaded markdown document verbatim under its filename stem
    pub fn import_post(&self, bytes: &[u8], filename: &str) -> Result<Post, StoreError> {
        let name = Path::new(filename.trim());
        let extension = name.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !IMPORT_EXTENSIONS.contains(&extension) {
            return Err(StoreError::Validation(
                "Invalid file type. Please upload .mdx or .md file".to_string(),
            ));
        }

        let slug = name
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        validate_slug(&slug).map_err(StoreError::Validation)?;

        let text = std::str::from_utf8(bytes)
            .map_err(|_| StoreError::Validation("File is not valid UTF-8".to_string()))?;
        let post = Post::from_document(&slug, text)
            .map_err(|e| StoreError::Validation(format!("Invalid front-matter: {}", e)))?
            .ok_or_else(|| {
                StoreError::Validation("File must have a title in front-matter".to_string())
            })?;

        write_atomic(&self.path_for(&slug), text.as_bytes())?;
        tracing::info!("Imported post {} from {}", slug, filename);
        Ok(post)
    }

    fn write_post(&self, post: &Post) -> Result<(), StoreError> {
        let document = post.to_document()?;
        write_atomic(&self.path_for(&post.slug), document.as_bytes())
    }
}

fn read_post(slug: &str, path: &Path) -> Result<Option<Post>, StoreError> {
    let text = fs::read_to_string(path)?;
    Ok(Post::from_document(slug, &text)?)
}

/// Returns whether a file was removed
fn remove_if_present(path: &Path) -> Result<bool, StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

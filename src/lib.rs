//! folio-rs: a flat-file blog and portfolio server
//!
//! Posts are markdown files with a YAML front-matter header, projects live in
//! a single JSON file, and an axum server renders both with embedded Tera
//! templates. A password-guarded admin panel edits the files in place.

pub mod auth;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use store::{PostStore, ProjectStore};

/// The main application: configuration plus the stores it points at
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Static asset directory served under /static
    pub static_dir: PathBuf,
    /// Post files
    pub posts: PostStore,
    /// Project list
    pub projects: ProjectStore,
}

impl Folio {
    /// Create a new instance from a site directory. A missing `_config.yml`
    /// means defaults.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let posts = PostStore::new(base_dir.join(&config.posts_dir), &config.post_extension);
        let projects = ProjectStore::new(base_dir.join(&config.projects_file));
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            static_dir,
            posts,
            projects,
        }
    }
}

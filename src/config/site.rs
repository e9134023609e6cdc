//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable that overrides `admin.password`
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Content
    pub posts_dir: String,
    pub post_extension: String,
    pub projects_file: String,
    pub static_dir: String,

    // Listing
    pub home_posts: usize,
    pub search_limit: usize,
    pub date_format: String,

    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: "Thoughts on design, architecture, and technology.".to_string(),
            author: "John Doe".to_string(),
            url: "http://localhost:4000".to_string(),

            posts_dir: "content/posts".to_string(),
            post_extension: "mdx".to_string(),
            projects_file: "content/projects.json".to_string(),
            static_dir: "public".to_string(),

            home_posts: 5,
            search_limit: 5,
            date_format: "MMMM DD, YYYY".to_string(),

            server: ServerConfig::default(),
            admin: AdminConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The admin secret, preferring the environment over the config file.
    /// Blank values count as unset.
    pub fn admin_password(&self) -> Option<String> {
        resolve_admin_password(
            std::env::var(ADMIN_PASSWORD_ENV).ok(),
            self.admin.password.as_deref(),
        )
    }
}

/// The environment value wins over the configured one; blank values count as unset
fn resolve_admin_password(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.filter(|p| !p.trim().is_empty()).or_else(|| {
        configured
            .filter(|p| !p.trim().is_empty())
            .map(|p| p.to_string())
    })
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

/// Admin panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub password: Option<String>,
    pub cookie_name: String,
    pub session_ttl_hours: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: None,
            cookie_name: "admin_session".to_string(),
            session_ttl_hours: 24,
        }
    }
}

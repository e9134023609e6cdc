//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Folio;

const CONFIG_TEMPLATE: &str = r#"# Folio configuration

# Site
title: Folio
description: Thoughts on design, architecture, and technology.
author: John Doe
url: http://localhost:4000

# Content
posts_dir: content/posts
post_extension: mdx
projects_file: content/projects.json
static_dir: public

# Listing
home_posts: 5
search_limit: 5
date_format: MMMM DD, YYYY

# Server
server:
  ip: localhost
  port: 4000

# Admin
# The ADMIN_PASSWORD environment variable takes precedence over this value.
admin:
  password:
  cookie_name: admin_session
  session_ttl_hours: 24
"#;

const STYLESHEET: &str = r#"body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 0 auto; padding: 1rem; }
.site-header { display: flex; gap: 1rem; align-items: center; justify-content: space-between; }
.tags { list-style: none; display: flex; gap: .5rem; padding: 0; }
.project-card { padding: 1rem; border-radius: .5rem; margin-bottom: 1rem; }
.notice { color: #166534; }
.error { color: #b91c1c; }
form.inline { display: inline; }
"#;

/// Initialize a new site in the given directory. Existing files are kept.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    let folio = Folio::new(target_dir)?;
    fs::create_dir_all(folio.posts.dir())?;
    fs::create_dir_all(&folio.static_dir)?;

    let stylesheet = folio.static_dir.join("style.css");
    if !stylesheet.exists() {
        fs::write(&stylesheet, STYLESHEET)?;
    }

    // Creates the projects file as an empty list
    folio.projects.list_projects()?;

    let sample = folio
        .posts
        .dir()
        .join(format!("hello-world.{}", folio.config.post_extension));
    if !sample.exists() {
        let today = chrono::Local::now().format("%Y-%m-%d");
        let sample_post = format!(
            r#"---
title: Hello World
date: {}
summary: Your very first post.
tags:
  - welcome
---

Welcome to your new site! Sign in at `/admin-login` to write posts and
manage projects, or drop markdown files into `{}`.

```bash
$ folio-rs new "My New Post"
$ folio-rs server
```
"#,
            today,
            folio.config.posts_dir
        );
        fs::write(&sample, sample_post)?;
    }

    Ok(())
}

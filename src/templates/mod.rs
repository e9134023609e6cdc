//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Post, Project, GRADIENTS};
use crate::helpers::{display_date, post_path, tag_path};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        // .html templates are autoescaped; rendered markdown is marked `safe`
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("_post_card.html", include_str!("site/_post_card.html")),
            ("home.html", include_str!("site/home.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("tags.html", include_str!("site/tags.html")),
            ("tag.html", include_str!("site/tag.html")),
            ("projects.html", include_str!("site/projects.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("admin/login.html", include_str!("site/admin/login.html")),
            (
                "admin/dashboard.html",
                include_str!("site/admin/dashboard.html"),
            ),
            (
                "admin/post_form.html",
                include_str!("site/admin/post_form.html"),
            ),
            (
                "admin/project_form.html",
                include_str!("site/admin/project_form.html"),
            ),
        ])?;

        let date_format = config.date_format.clone();
        tera.register_filter(
            "display_date",
            move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let s = tera::try_get_value!("display_date", "value", String, value);
                Ok(tera::Value::String(display_date(&s, &date_format)))
            },
        );
        tera.register_filter("post_url", post_url_filter);
        tera.register_filter("tag_url", tag_url_filter);

        Ok(Self {
            tera,
            site: SiteData::from(config),
        })
    }

    /// Render a template with given context; site data is always available
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        let mut context = context.clone();
        context.insert("site", &self.site);
        Ok(self.tera.render(template_name, &context)?)
    }
}

/// Tera filter: slug to post page path
fn post_url_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let slug = tera::try_get_value!("post_url", "value", String, value);
    Ok(tera::Value::String(post_path(&slug)))
}

/// Tera filter: tag name to tag page path
fn tag_url_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let tag = tera::try_get_value!("tag_url", "value", String, value);
    Ok(tera::Value::String(tag_path(&tag)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
        }
    }
}

/// Values shown in the post editor
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub summary: String,
    pub tags: String,
    pub content: String,
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: post.metadata.title.clone(),
            slug: post.slug.clone(),
            date: post.metadata.date.clone(),
            summary: post.metadata.summary.clone().unwrap_or_default(),
            tags: post.metadata.tags.join(", "),
            content: post.content.clone(),
        }
    }
}

/// Values shown in the project editor
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub github: String,
    pub link: String,
    pub gradient: String,
}

impl From<&Project> for ProjectForm {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            tags: project.tags.join(", "),
            github: project.github.clone().unwrap_or_default(),
            link: project.link.clone().unwrap_or_default(),
            gradient: project.gradient.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GradientOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Gradient choices for the project editor
pub fn gradient_options() -> Vec<GradientOption> {
    GRADIENTS
        .iter()
        .map(|(value, label)| GradientOption { value, label })
        .collect()
}

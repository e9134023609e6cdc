//! Content module - posts, projects, front-matter and markdown rendering

mod frontmatter;
mod markdown;
mod post;
mod project;

pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use markdown::{heading_anchor, html_escape, MarkdownRenderer, RenderedMarkdown, TocEntry};
pub use post::{parse_tag_list, validate_slug, Post, PostInput, PostMetadata, MAX_SLUG_LEN};
pub use project::{default_gradient, is_known_gradient, Project, ProjectInput, GRADIENTS};

//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

const DEFAULT_THEME: &str = "base16-ocean.dark";

lazy_static! {
    static ref ANCHOR_RE: Regex = Regex::new(r"[^a-z0-9_-]+").unwrap();
}

/// A `##` or `###` heading listed in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Rendered HTML plus the headings it links to
#[derive(Debug, Clone, Default)]
pub struct RenderedMarkdown {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

impl MarkdownRenderer {
    /// Create a renderer using the default highlight theme
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Create a renderer with a named syntect theme; unknown names fall
    /// back to any bundled theme
    pub fn with_theme(theme: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme)
            .or_else(|| theme_set.themes.into_values().next());
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        self.render_with_toc(markdown).html
    }

    /// Render markdown to HTML, giving `##`/`###` headings anchor ids and
    /// collecting them into a table of contents
    pub fn render_with_toc(&self, markdown: &str) -> RenderedMarkdown {
        // No YAML metadata blocks: front-matter is stripped before rendering
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // Some(lang) while inside a code block
        let mut code_block: Option<Option<String>> = None;
        let mut code = String::new();
        // (index of the start event, level, text) while inside a listed heading
        let mut heading: Option<(usize, u8, String)> = None;
        let mut toc = Vec::new();
        let mut used_ids: HashMap<String, usize> = HashMap::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let highlighted = self.highlight_code(&code, lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if code_block.is_some() => code.push_str(&text),
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    if matches!(level, HeadingLevel::H2 | HeadingLevel::H3) {
                        heading = Some((events.len(), level as u8, String::new()));
                    }
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }));
                }
                Event::Text(text) if heading.is_some() => {
                    if let Some((_, _, buf)) = heading.as_mut() {
                        buf.push_str(&text);
                    }
                    events.push(Event::Text(text));
                }
                Event::Code(text) if heading.is_some() => {
                    if let Some((_, _, buf)) = heading.as_mut() {
                        buf.push_str(&text);
                    }
                    events.push(Event::Code(text));
                }
                Event::End(TagEnd::Heading(level)) => {
                    if let Some((start, depth, text)) = heading.take() {
                        let text = text.trim().to_string();
                        let id = match &events[start] {
                            Event::Start(Tag::Heading { id: Some(id), .. }) => id.to_string(),
                            _ => unique_anchor(&mut used_ids, &heading_anchor(&text)),
                        };
                        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[start] {
                            *slot = Some(CowStr::from(id.clone()));
                        }
                        toc.push(TocEntry {
                            level: depth,
                            text,
                            id,
                        });
                    }
                    events.push(Event::End(TagEnd::Heading(level)));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        RenderedMarkdown {
            html: html_output,
            toc,
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self.theme.as_ref().and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(html) => format!(r#"<figure class="highlight {}">{}</figure>"#, lang, html),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Anchor id for a heading: lowercased, with each run of characters other
/// than ASCII letters, digits, `_` and `-` replaced by a single `-`
pub fn heading_anchor(text: &str) -> String {
    ANCHOR_RE.replace_all(&text.to_lowercase(), "-").into_owned()
}

/// Repeated anchors get `-1`, `-2`, ... appended
fn unique_anchor(used: &mut HashMap<String, usize>, base: &str) -> String {
    let seen = used.entry(base.to_string()).or_insert(0);
    *seen += 1;
    if *seen == 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, *seen - 1)
    }
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains("highlight rust"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_headings_get_anchors_and_toc() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render_with_toc(
            "# Title\n\n## Getting Started\n\ntext\n\n### Step `one`\n\n## Getting Started\n\n#### Deep\n",
        );

        assert!(rendered
            .html
            .contains(r#"<h2 id="getting-started">Getting Started</h2>"#));
        assert!(rendered.html.contains("<h1>Title</h1>"));
        assert_eq!(
            rendered.toc,
            vec![
                TocEntry {
                    level: 2,
                    text: "Getting Started".to_string(),
                    id: "getting-started".to_string(),
                },
                TocEntry {
                    level: 3,
                    text: "Step one".to_string(),
                    id: "step-one".to_string(),
                },
                TocEntry {
                    level: 2,
                    text: "Getting Started".to_string(),
                    id: "getting-started-1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_explicit_heading_id_is_kept() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render_with_toc("## Custom {#my-id}\n");
        assert_eq!(rendered.toc[0].id, "my-id");
        assert!(rendered.html.contains(r#"id="my-id""#));
    }

    #[test]
    fn test_heading_anchor() {
        assert_eq!(heading_anchor("Hello World"), "hello-world");
        assert_eq!(heading_anchor("What's new in C++?"), "what-s-new-in-c-");
        assert_eq!(heading_anchor("snake_case-id"), "snake_case-id");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let renderer = MarkdownRenderer::with_theme("no-such-theme");
        let html = renderer.render("```\nplain\n```");
        assert!(html.contains("plain"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }
}

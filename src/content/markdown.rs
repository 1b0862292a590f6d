//! Markdown rendering with syntax highlighting and heading anchors

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// A heading collected while rendering, usable for a table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Result of rendering a Markdown body
#[derive(Debug, Clone)]
pub struct RenderedBody {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Markdown renderer with syntax highlighting
///
/// `render` is a pure function of its input: the same Markdown always
/// produces the same HTML and the same heading outline.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with default settings
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML
    ///
    /// Headings get slugified `id` attributes (duplicates suffixed `-1`,
    /// `-2`, ...) and a wrapping self-anchor; fenced code blocks are
    /// highlighted; images become figures with the alt text as caption;
    /// external links open in a new tab.
    pub fn render(&self, markdown: &str) -> Result<RenderedBody> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut headings: Vec<Heading> = Vec::new();
        let mut id_counts: HashMap<String, usize> = HashMap::new();

        // In-flight state for constructs we rewrite
        let mut code_block: Option<Option<String>> = None;
        let mut code_content = String::new();
        let mut heading: Option<(u8, Vec<Event>, String)> = None;
        let mut image: Option<(String, String)> = None;
        let mut link_stack: Vec<bool> = Vec::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    });
                    code_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let highlighted = self.highlight_code(&code_content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if code_block.is_some() => {
                    code_content.push_str(&text);
                }

                Event::Start(Tag::Image { dest_url, .. }) => {
                    image = Some((dest_url.to_string(), String::new()));
                }
                Event::Text(text) if image.is_some() => {
                    if let Some((_, alt)) = image.as_mut() {
                        alt.push_str(&text);
                    }
                }
                Event::End(TagEnd::Image) => {
                    if let Some((src, alt)) = image.take() {
                        events.push(Event::Html(CowStr::from(render_figure(&src, &alt))));
                    }
                }

                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level as u8, Vec::new(), String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, inner, text)) = heading.take() {
                        let id = unique_heading_id(&text, &mut id_counts);
                        headings.push(Heading {
                            level,
                            id: id.clone(),
                            text: text.clone(),
                        });
                        events.push(Event::Html(CowStr::from(format!(
                            r##"<h{level} id="{id}"><a class="heading-anchor" href="#{id}">"##
                        ))));
                        events.extend(inner);
                        events.push(Event::Html(CowStr::from(format!("</a></h{level}>"))));
                    }
                }
                ev if heading.is_some() => {
                    if let Some((_, inner, text)) = heading.as_mut() {
                        match &ev {
                            Event::Text(t) | Event::Code(t) => text.push_str(t),
                            _ => {}
                        }
                        inner.push(ev);
                    }
                }

                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    if is_external(&dest_url) {
                        link_stack.push(true);
                        events.push(Event::Html(CowStr::from(format!(
                            r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                            html_escape(&dest_url)
                        ))));
                    } else {
                        link_stack.push(false);
                        events.push(Event::Start(Tag::Link {
                            link_type,
                            dest_url,
                            title,
                            id,
                        }));
                    }
                }
                Event::End(TagEnd::Link) => {
                    if link_stack.pop() == Some(true) {
                        events.push(Event::Html(CowStr::from("</a>")));
                    } else {
                        events.push(Event::End(TagEnd::Link));
                    }
                }

                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(RenderedBody {
            html: html_output,
            headings,
        })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self.theme_set.themes.get(&self.theme_name) {
            Some(theme) => theme,
            None => match self.theme_set.themes.values().next() {
                Some(theme) => theme,
                None => {
                    return format!(
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        lang,
                        html_escape(code)
                    )
                }
            },
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                if self.line_numbers {
                    self.add_line_numbers(&highlighted, lang)
                } else {
                    format!(
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        lang, highlighted
                    )
                }
            }
            Err(_) => {
                // Fallback to plain code block
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                )
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();
        let line_count = lines.len();

        let mut gutter = String::new();
        let mut code_lines = String::new();

        for (i, line) in lines.iter().enumerate() {
            gutter.push_str(&format!(r#"<span class="line-number">{}</span>"#, i + 1));
            code_lines.push_str(line);
            if i < line_count - 1 {
                gutter.push('\n');
                code_lines.push('\n');
            }
        }

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang, gutter, code_lines
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Slugify heading text into a unique in-page anchor id
fn unique_heading_id(text: &str, counts: &mut HashMap<String, usize>) -> String {
    let base = slug::slugify(text);
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };

    let count = counts.entry(base.clone()).or_insert(0);
    let id = if *count == 0 {
        base.clone()
    } else {
        format!("{}-{}", base, count)
    };
    *count += 1;
    id
}

fn render_figure(src: &str, alt: &str) -> String {
    let src = html_escape(src);
    let alt = html_escape(alt);
    if alt.is_empty() {
        format!(r#"<figure><img src="{src}" alt="" loading="lazy"></figure>"#)
    } else {
        format!(
            r#"<figure><img src="{src}" alt="{alt}" loading="lazy"><figcaption>{alt}</figcaption></figure>"#
        )
    }
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

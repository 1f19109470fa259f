//! Markdown → sanitized HTML fragments.
//!
//! Replies are untrusted. Raw HTML in the Markdown source is emitted as
//! escaped text, link and image targets with a scheme outside the allow
//! list are blanked, and code is always escaped, never interpreted.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use super::blocks::DEFAULT_CODE_LANGUAGE;

/// A fenced or indented code region found while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownHtml {
    pub html: String,
    pub code: Vec<CodeSnippet>,
}

/// How code regions inside Markdown are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChrome {
    /// `<pre><code class="language-x">` only.
    Bare,
    /// Wrapped in a `code-block` div with a language label and copy button.
    Labeled,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

pub fn markdown_to_html(markdown: &str, chrome: CodeChrome) -> MarkdownHtml {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut code: Vec<CodeSnippet> = Vec::new();
    // Open code block: (language, accumulated text)
    let mut open_code: Option<(String, String)> = None;

    for event in Parser::new_ext(markdown, options()) {
        if let Some((_, buf)) = open_code.as_mut() {
            match event {
                Event::Text(t) => buf.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, content)) = open_code.take() {
                        events.push(Event::Html(CowStr::from(code_block_html(
                            &language, &content, chrome,
                        ))));
                        code.push(CodeSnippet {
                            language: language_or_default(&language).to_string(),
                            code: content,
                        });
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => clean_language(&info),
                    CodeBlockKind::Indented => String::new(),
                };
                open_code = Some((language, String::new()));
            }
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => events.push(Event::Start(Tag::Link {
                link_type,
                dest_url: safe_url(dest_url, false),
                title,
                id,
            })),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => events.push(Event::Start(Tag::Image {
                link_type,
                dest_url: safe_url(dest_url, true),
                title,
                id,
            })),
            other => events.push(other),
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    MarkdownHtml { html: out, code }
}

fn code_block_html(language: &str, content: &str, chrome: CodeChrome) -> String {
    let escaped = escape_html(content);
    match chrome {
        CodeChrome::Labeled => {
            let label = language_or_default(language);
            format!(
                "<div class=\"code-block\"><span class=\"language-label\">{label}</span>\
                 <button class=\"copy-btn\">Copy</button>\
                 <pre><code class=\"language-{label}\">{escaped}</code></pre></div>"
            )
        }
        CodeChrome::Bare if language.is_empty() => format!("<pre><code>{escaped}</code></pre>"),
        CodeChrome::Bare => {
            format!("<pre><code class=\"language-{language}\">{escaped}</code></pre>")
        }
    }
}

/// A structured-reply code block, labeled with its language and a copy button.
pub fn structured_code_html(language: &str, content: &str) -> String {
    code_block_html(&clean_language(language), content, CodeChrome::Labeled)
}

fn language_or_default(language: &str) -> &str {
    if language.is_empty() {
        DEFAULT_CODE_LANGUAGE
    } else {
        language
    }
}

/// First word of a fence info string, restricted to characters that are
/// safe inside a class attribute.
fn clean_language(info: &str) -> String {
    info.split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '#' | '.'))
        .collect()
}

/// Blank out URLs whose scheme could run script. Relative URLs pass.
pub fn safe_url(url: CowStr<'_>, allow_data_image: bool) -> CowStr<'_> {
    if is_safe_url(&url, allow_data_image) {
        url
    } else {
        CowStr::Borrowed("")
    }
}

pub fn is_safe_url(url: &str, allow_data_image: bool) -> bool {
    let lowered: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_control() && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let scheme_end = lowered.find(':');
    let path_start = lowered.find(['/', '?', '#']);
    let scheme = match (scheme_end, path_start) {
        (Some(colon), Some(slash)) if slash < colon => return true,
        (Some(colon), _) => &lowered[..colon],
        (None, _) => return true,
    };

    match scheme {
        "http" | "https" | "mailto" => true,
        "data" => allow_data_image && lowered.starts_with("data:image/"),
        _ => false,
    }
}

//! # Content Renderer
//!
//! Turns a message body into a sanitized HTML fragment plus the parsed
//! blocks the terminal view draws from.
//!
//! ```text
//! MessageBody ──┬─ images staged?  → <img class="chat-image"> … + caption Markdown
//!               ├─ {"blocks":[…]}  → one fragment per RenderBlock
//!               └─ anything else   → Markdown, fenced code labeled + copy button
//! ```
//!
//! Rendering is pure. Scrolling, the new-message indicator and wiring the
//! copy/zoom affordances are the adapter's job; the renderer only lists the
//! [`Enhancement`]s it expects to be attached.

pub mod blocks;
pub mod html;

pub use blocks::{RenderBlock, parse_blocks, parse_structured};
pub use html::{CodeChrome, CodeSnippet, escape_html, markdown_to_html};

use crate::core::conversation::Role;

/// What the renderer consumes: message text and any attached images as data URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBody {
    pub text: String,
    pub image_urls: Vec<String>,
}

impl MessageBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_urls: Vec::new(),
        }
    }

    pub fn with_images(text: impl Into<String>, image_urls: Vec<String>) -> Self {
        Self {
            text: text.into(),
            image_urls,
        }
    }
}

/// Interactive affordance to attach once the fragment is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enhancement {
    CopyCode { language: String, code: String },
    ZoomImage { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub role: Role,
    pub html: String,
    pub blocks: Vec<RenderBlock>,
    pub enhancements: Vec<Enhancement>,
}

impl RenderedMessage {
    /// Code the user can copy, in display order.
    pub fn copyable_code(&self) -> Vec<&str> {
        self.enhancements
            .iter()
            .filter_map(|e| match e {
                Enhancement::CopyCode { code, .. } => Some(code.as_str()),
                Enhancement::ZoomImage { .. } => None,
            })
            .collect()
    }

    /// Source text of the message (Markdown and code joined).
    pub fn source_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                RenderBlock::Text { markdown } => Some(markdown.as_str()),
                RenderBlock::Code { content, .. } => Some(content.as_str()),
                RenderBlock::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub fn render(body: &MessageBody, role: Role) -> RenderedMessage {
    if !body.image_urls.is_empty() {
        return render_with_images(body, role);
    }
    match parse_structured(&body.text) {
        Some(blocks) => render_structured(blocks, role),
        None => render_markdown(&body.text, role),
    }
}

fn render_with_images(body: &MessageBody, role: Role) -> RenderedMessage {
    let mut html = String::new();
    let mut blocks = Vec::new();
    let mut enhancements = Vec::new();

    for url in &body.image_urls {
        let src = if html::is_safe_url(url, true) {
            url.as_str()
        } else {
            ""
        };
        html.push_str(&format!(
            "<img src=\"{}\" class=\"chat-image\">",
            escape_html(src)
        ));
        blocks.push(RenderBlock::Image {
            url: url.clone(),
            alt: "attachment".to_string(),
        });
        enhancements.push(Enhancement::ZoomImage { url: url.clone() });
    }

    if !body.text.is_empty() {
        let caption = markdown_to_html(&body.text, CodeChrome::Bare);
        html.push_str(&format!(
            "<div class=\"markdown-content\">{}</div>",
            caption.html
        ));
        blocks.push(RenderBlock::Text {
            markdown: body.text.clone(),
        });
        enhancements.extend(copy_enhancements(caption.code));
    }

    RenderedMessage {
        role,
        html,
        blocks,
        enhancements,
    }
}

fn render_structured(blocks: Vec<RenderBlock>, role: Role) -> RenderedMessage {
    let mut html = String::new();
    let mut enhancements = Vec::new();
    let last = blocks.len().saturating_sub(1);

    for (i, block) in blocks.iter().enumerate() {
        match block {
            RenderBlock::Text { markdown } => {
                let fragment = markdown_to_html(markdown, CodeChrome::Bare);
                html.push_str(&format!(
                    "<div class=\"markdown-content\">{}</div>",
                    fragment.html
                ));
                enhancements.extend(copy_enhancements(fragment.code));
            }
            RenderBlock::Code { language, content } => {
                html.push_str(&html::structured_code_html(language, content));
                enhancements.push(Enhancement::CopyCode {
                    language: language.clone(),
                    code: content.clone(),
                });
            }
            RenderBlock::Image { url, alt } => {
                let src = if html::is_safe_url(url, true) {
                    url.as_str()
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    escape_html(src),
                    escape_html(alt)
                ));
                enhancements.push(Enhancement::ZoomImage { url: url.clone() });
            }
        }
        if role == Role::Assistant && i != last {
            html.push_str("<br>");
        }
    }

    RenderedMessage {
        role,
        html,
        blocks,
        enhancements,
    }
}

fn render_markdown(text: &str, role: Role) -> RenderedMessage {
    let fragment = markdown_to_html(text, CodeChrome::Labeled);
    RenderedMessage {
        role,
        html: format!("<div class=\"markdown-content\">{}</div>", fragment.html),
        blocks: vec![RenderBlock::Text {
            markdown: text.to_string(),
        }],
        enhancements: copy_enhancements(fragment.code).collect(),
    }
}

fn copy_enhancements(snippets: Vec<CodeSnippet>) -> impl Iterator<Item = Enhancement> {
    snippets
        .into_iter()
        .map(|s| Enhancement::CopyCode {
            language: s.language,
            code: s.code,
        })
}

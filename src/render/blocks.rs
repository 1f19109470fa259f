//! Structured replies.
//!
//! A reply whose body is JSON of the form
//!
//! ```json
//! {"blocks": [{"type": "text", "content": "..."},
//!             {"type": "code", "language": "rust", "content": "..."},
//!             {"type": "image", "url": "...", "alt": "..."}]}
//! ```
//!
//! is rendered block by block. Anything else (not JSON, no `blocks` array,
//! wrongly typed fields) is treated as one Markdown string.

use serde::Deserialize;

pub const DEFAULT_CODE_LANGUAGE: &str = "plaintext";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderBlock {
    Text { markdown: String },
    Code { language: String, content: String },
    Image { url: String, alt: String },
}

#[derive(Deserialize)]
struct StructuredReply {
    blocks: Vec<RawBlock>,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    alt: Option<String>,
}

impl From<RawBlock> for RenderBlock {
    fn from(raw: RawBlock) -> Self {
        let content = raw.content.unwrap_or_default();
        match raw.kind.as_deref() {
            Some("code") => RenderBlock::Code {
                language: raw
                    .language
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string()),
                content,
            },
            Some("image") => RenderBlock::Image {
                url: raw.url.unwrap_or_default(),
                alt: raw.alt.unwrap_or_default(),
            },
            // "text", unknown tags and a missing tag all render as Markdown.
            _ => RenderBlock::Text { markdown: content },
        }
    }
}

/// Blocks of a structured reply, or `None` when the body is not one.
pub fn parse_structured(body: &str) -> Option<Vec<RenderBlock>> {
    let trimmed = body.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let reply: StructuredReply = serde_json::from_str(trimmed).ok()?;
    Some(reply.blocks.into_iter().map(RenderBlock::from).collect())
}

/// Structured blocks when present, otherwise the whole body as Markdown.
pub fn parse_blocks(body: &str) -> Vec<RenderBlock> {
    parse_structured(body).unwrap_or_else(|| {
        vec![RenderBlock::Text {
            markdown: body.to_string(),
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_block_kind() {
        let blocks = parse_structured(
            r#"{"blocks":[
                {"type":"text","content":"hi"},
                {"type":"code","language":"js","content":"a<b"},
                {"type":"image","url":"https://x/y.png","alt":"a \"cat\""}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            blocks,
            vec![
                RenderBlock::Text {
                    markdown: "hi".into()
                },
                RenderBlock::Code {
                    language: "js".into(),
                    content: "a<b".into()
                },
                RenderBlock::Image {
                    url: "https://x/y.png".into(),
                    alt: "a \"cat\"".into()
                },
            ]
        );
    }

    #[test]
    fn code_language_defaults_to_plaintext() {
        let blocks = parse_structured(r#"{"blocks":[{"type":"code","content":"x"}]}"#).unwrap();
        assert_eq!(
            blocks[0],
            RenderBlock::Code {
                language: "plaintext".into(),
                content: "x".into()
            }
        );
    }

    #[test]
    fn unknown_tag_becomes_text() {
        let blocks =
            parse_structured(r#"{"blocks":[{"type":"table","content":"| a |"}]}"#).unwrap();
        assert_eq!(
            blocks,
            vec![RenderBlock::Text {
                markdown: "| a |".into()
            }]
        );
    }

    #[test]
    fn non_structured_bodies_fall_back_to_markdown() {
        for body in [
            "**bold**",
            "{not json",
            r#"{"blocks": "nope"}"#,
            r#"{"other": []}"#,
            r#"{"blocks":[{"type":"text","content":42}]}"#,
            "[1, 2, 3]",
        ] {
            assert_eq!(parse_structured(body), None, "body: {body}");
            assert_eq!(
                parse_blocks(body),
                vec![RenderBlock::Text {
                    markdown: body.to_string()
                }]
            );
        }
    }
}

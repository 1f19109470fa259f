//! Wire types for the `generateContent` API.
//!
//! The request body is what the chat client posts to `/api/generate`; the
//! proxy forwards it untouched, so these shapes are shared by both ends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::conversation::{Part, Turn};

/// Shown when the upstream reply has no usable text part.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your request.";

/// Persona sent as the system instruction on every request.
pub const PERSONA: &str = include_str!("persona.md");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Turn>,
    pub system_instruction: SystemInstruction,
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    /// Full history plus the fixed persona and sampling parameters.
    pub fn new(contents: Vec<Turn>) -> Self {
        Self {
            contents,
            system_instruction: SystemInstruction::persona(),
            generation_config: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInstruction {
    pub role: String,
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    pub fn persona() -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part::text(PERSONA)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.2,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".to_string(),
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// Only the fields we read; everything else in the upstream reply is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ReplyPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate's first part, if there is one.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    /// Decode a reply body that is valid JSON but possibly the wrong shape.
    ///
    /// Type mismatches anywhere in the reply keep only the first candidate's
    /// first text part, if that path still holds a string.
    pub fn from_value(value: &Value) -> Self {
        if let Ok(response) = Self::deserialize(value) {
            return response;
        }
        let text = value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str);
        match text {
            Some(text) => Self {
                candidates: vec![Candidate {
                    content: Some(CandidateContent {
                        parts: vec![ReplyPart {
                            text: Some(text.to_string()),
                        }],
                    }),
                }],
            },
            None => Self::default(),
        }
    }

    /// Reply text, or [`FALLBACK_REPLY`] when the shape is unexpected.
    pub fn reply_text(&self) -> String {
        self.first_text().unwrap_or(FALLBACK_REPLY).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_in_camel_case() {
        let request = GenerateRequest::new(vec![Turn::user(vec![Part::text("hi")])]);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["systemInstruction"]["role"], "system");
        assert!(
            value["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("J.A.R.V.I.S.")
        );
        let config = &value["generationConfig"];
        assert_eq!(config["topK"], 40);
        assert_eq!(config["maxOutputTokens"], 8192);
        assert_eq!(config["responseMimeType"], "text/plain");
        assert!((config["temperature"].as_f64().unwrap() - 1.2).abs() < 1e-6);
        assert!((config["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn reply_text_reads_first_candidate_part() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "At your service."}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second candidate"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 12}
        }))
        .unwrap();
        assert_eq!(response.reply_text(), "At your service.");
    }

    #[test]
    fn reply_text_falls_back_on_missing_fields() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
            json!({"candidates": null}),
            json!({"candidates": "x"}),
            json!({"candidates": [{"content": {"parts": {}}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": 42}]}}]}),
            json!([1, 2, 3]),
        ] {
            let response = GenerateResponse::from_value(&body);
            assert_eq!(response.reply_text(), FALLBACK_REPLY, "{body}");
        }
    }

    #[test]
    fn mismatched_siblings_keep_the_first_text() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Still here, sir."}]}},
                {"content": "not an object"}
            ]
        });
        let response = GenerateResponse::from_value(&body);
        assert_eq!(response.reply_text(), "Still here, sir.");
    }
}

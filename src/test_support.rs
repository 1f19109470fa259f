//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::state::App;
use crate::inference::types::{Candidate, CandidateContent, ReplyPart};
use crate::inference::{CompletionProvider, GenerateRequest, GenerateResponse, ProviderError};

/// Provider that answers every request with a fixed outcome and records
/// what it was asked.
pub struct ScriptedProvider {
    outcome: Result<String, String>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.outcome {
            Ok(text) => Ok(GenerateResponse {
                candidates: vec![Candidate {
                    content: Some(CandidateContent {
                        parts: vec![ReplyPart {
                            text: Some(text.clone()),
                        }],
                    }),
                }],
            }),
            Err(message) => Err(ProviderError::Network(message.clone())),
        }
    }
}

/// Creates a test App with a provider that always says "Test reply.".
pub fn test_app() -> App {
    App::new(Arc::new(ScriptedProvider::replying("Test reply.")))
}

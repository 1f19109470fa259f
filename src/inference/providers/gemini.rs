//! Direct `generateContent` calls, skipping the local proxy.

use async_trait::async_trait;
use log::info;

use super::read_generate_response;
use crate::inference::types::{GenerateRequest, GenerateResponse};
use crate::inference::{CompletionProvider, ProviderError};

pub struct GeminiProvider {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Config(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        info!(
            "Gemini request: {} turns -> {}",
            request.contents.len(),
            self.api_url
        );

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        read_generate_response(response, self.name()).await
    }
}

//! Talks to a running `jarvis serve` (or any compatible `/api/generate`).

use async_trait::async_trait;
use log::info;

use super::read_generate_response;
use crate::inference::types::{GenerateRequest, GenerateResponse};
use crate::inference::{CompletionProvider, ProviderError};

pub struct ProxyProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ProxyProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for ProxyProvider {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        info!(
            "Proxy request: {} turns -> {}",
            request.contents.len(),
            self.endpoint()
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        read_generate_response(response, self.name()).await
    }
}

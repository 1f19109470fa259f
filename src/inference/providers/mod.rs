mod gemini;
mod proxy;

pub use gemini::GeminiProvider;
pub use proxy::ProxyProvider;

use log::{debug, warn};

use crate::inference::ProviderError;
use crate::inference::types::GenerateResponse;

/// Shared tail of both providers: status check, then JSON decode.
/// Only a body that is not JSON at all is a `Parse` error.
async fn read_generate_response(
    response: reqwest::Response,
    provider: &str,
) -> Result<GenerateResponse, ProviderError> {
    let status = response.status();
    debug!("{provider} response status: {status}");

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("{provider} API error: {} - {}", status.as_u16(), message);
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(GenerateResponse::from_value(&value))
}

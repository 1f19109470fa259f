//! # API Proxy
//!
//! `POST /api/generate` forwards the JSON body verbatim to the upstream
//! `generateContent` endpoint with the API key appended as `?key=`, and
//! passes the upstream JSON back untouched. Any failure becomes
//! `500 {"error": "<message>"}`. The key never leaves the server.
//!
//! ```text
//! client ── POST /api/generate ──► proxy ── POST <api_url>?key=… ──► upstream
//!        ◄── upstream JSON ───────        ◄── JSON ───────────────
//!        ◄── 500 {"error": …} ────  (network error / non-2xx / bad JSON)
//! ```

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::core::config::ResolvedConfig;

/// Base64 images make request bodies large.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug)]
pub enum ProxyError {
    MissingApiKey,
    /// The client's body was not JSON.
    InvalidBody(String),
    Network(String),
    Upstream { status: u16, body: String },
    Parse(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::MissingApiKey => write!(f, "GEMINI_API_KEY is not configured"),
            ProxyError::InvalidBody(msg) => write!(f, "invalid request body: {msg}"),
            ProxyError::Network(msg) => write!(f, "{msg}"),
            ProxyError::Upstream { status, body } => write!(f, "HTTP {status}: {body}"),
            ProxyError::Parse(msg) => write!(f, "invalid upstream JSON: {msg}"),
        }
    }
}

impl std::error::Error for ProxyError {}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!("Error processing request: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    api_key: Arc<str>,
    api_url: Arc<str>,
}

impl ProxyState {
    pub fn new(api_key: &str, api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: Arc::from(api_key),
            api_url: Arc::from(api_url),
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn generate(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;
    forward(&state, &body).await.map(Json)
}

async fn forward(state: &ProxyState, body: &Value) -> Result<Value, ProxyError> {
    if state.api_key.is_empty() {
        return Err(ProxyError::MissingApiKey);
    }

    let turns = body
        .get("contents")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    info!("Forwarding generate request ({turns} turns)");

    let response = state
        .client
        .post(&*state.api_url)
        .query(&[("key", &*state.api_key)])
        .json(body)
        .send()
        .await
        .map_err(|e| ProxyError::Network(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ProxyError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(ProxyError::Upstream {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| ProxyError::Parse(e.to_string()))
}

/// Bind on all interfaces and serve until the process exits.
pub async fn serve(config: &ResolvedConfig) -> std::io::Result<()> {
    let state = ProxyState::new(&config.gemini_api_key, &config.gemini_api_url);
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Proxy listening on {}", listener.local_addr()?);
    println!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_read_like_http_failures() {
        let err = ProxyError::Upstream {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 403: forbidden");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_network_call() {
        let state = ProxyState::new("", "http://127.0.0.1:9/unused");
        let err = forward(&state, &json!({"contents": []})).await.unwrap_err();
        assert!(matches!(err, ProxyError::MissingApiKey));
    }

    #[test]
    fn errors_become_500() {
        let response = ProxyError::Network("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

use jarvis::server::{ProxyState, router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Start the proxy on an ephemeral port, forwarding to `upstream_url`.
async fn start_proxy(api_key: &str, upstream_url: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(ProxyState::new(api_key, upstream_url));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/generate")
}

fn sample_body() -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": "Status report" }] }],
        "systemInstruction": { "role": "system", "parts": [{ "text": "persona" }] },
        "generationConfig": { "temperature": 1.2 }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_body_and_reply_pass_through_untouched() {
    let upstream = MockServer::start().await;
    let upstream_reply = json!({
        "candidates": [{ "content": { "parts": [{ "text": "All systems nominal." }] } }],
        "modelVersion": "gemini-2.0-flash"
    });

    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(query_param("key", "secret"))
        .and(body_json(sample_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_reply.clone()))
        .expect(1)
        .mount(&upstream)
        .await;

    let url = start_proxy("secret", &format!("{}/generate", upstream.uri())).await;
    let response = reqwest::Client::new()
        .post(url)
        .json(&sample_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, upstream_reply);
}

#[tokio::test]
async fn test_upstream_failure_becomes_500_error_json() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&upstream)
        .await;

    let url = start_proxy("secret", &upstream.uri()).await;
    let response = reqwest::Client::new()
        .post(url)
        .json(&sample_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "HTTP 403: forbidden" }));
}

#[tokio::test]
async fn test_missing_key_is_reported_without_calling_upstream() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let url = start_proxy("", &upstream.uri()).await;
    let response = reqwest::Client::new()
        .post(url)
        .json(&sample_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_non_json_body_gets_error_json() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let url = start_proxy("secret", &upstream.uri()).await;
    let response = reqwest::Client::new()
        .post(url)
        .header("content-type", "text/plain")
        .body("hello there")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid request body:"),
        "{body}"
    );
}

#[tokio::test]
async fn test_only_post_is_routed() {
    let upstream = MockServer::start().await;
    let url = start_proxy("secret", &upstream.uri()).await;

    let response = reqwest::get(url).await.unwrap();

    assert_eq!(response.status(), 405);
}

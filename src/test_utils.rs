//! Test utilities shared across handler tests.

use crate::{Application, Config};
use axum_test::TestServer;
use serde_json::{Value, json};

/// Build a test server whose Gemini base URL points at a local mock.
pub async fn create_test_app(gemini_base: &str) -> TestServer {
    let mut config = Config::default();
    config.gemini.base_url = gemini_base.parse().expect("mock server URI must parse");
    config.gemini.api_key = Some("test-key".to_string());

    Application::new(config).expect("Failed to create application").into_test_server()
}

/// Wrap reply text in the generateContent response envelope.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}]}
        }]
    })
}

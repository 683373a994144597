//! Client for the Gemini `generateContent` REST endpoint.
//!
//! The service makes exactly one outbound call per analyze request: the uploaded document is
//! sent inline (base64) together with the extraction prompt, requesting `application/json`
//! output. No response schema is enforced on the provider side - the reply shape is handled
//! downstream by [`crate::schema`].
//!
//! There is no retry. The only hardening around the round trip is the timeout configured on
//! the underlying `reqwest` client.

use crate::config::GeminiConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Longest upstream error body carried into our own error message.
const ERROR_BODY_SNIPPET: usize = 512;

#[derive(ThisError, Debug)]
pub enum GeminiError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Gemini reply contained no candidates")]
    EmptyReply,

    #[error("invalid Gemini endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    #[serde(rename_all = "camelCase")]
    InlineData { mime_type: &'a str, data: String },
    Text(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Stateless Gemini API client, safe for concurrent reuse across requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Send the document and prompt to the model and return the raw reply text.
    ///
    /// The reply is expected (but not guaranteed) to be a JSON document; decoding is the
    /// caller's concern.
    pub async fn generate(&self, data: &[u8], mime_type: &str, prompt: &str) -> Result<String, GeminiError> {
        let url = self
            .config
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.config.model))?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    RequestPart::InlineData {
                        mime_type,
                        data: BASE64.encode(data),
                    },
                    RequestPart::Text(prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        tracing::info!(model = %self.config.model, mime_type, size = data.len(), "Sending generateContent request");

        let mut builder = self.http.post(url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("x-goog-api-key", api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(ERROR_BODY_SNIPPET);
            return Err(GeminiError::Status { status, body });
        }

        let reply: GenerateContentResponse = response.json().await?;
        extract_text(reply)
    }
}

/// Concatenate the text parts of the first candidate.
///
/// Only a reply with no candidate content at all is an upstream error. A candidate whose
/// parts concatenate to the empty string is returned as-is: whether the text decodes is the
/// caller's concern, and an empty reply fails there with the raw text attached.
fn extract_text(reply: GenerateContentResponse) -> Result<String, GeminiError> {
    let Some(content) = reply.candidates.into_iter().next().and_then(|candidate| candidate.content) else {
        return Err(GeminiError::EmptyReply);
    };
    Ok(content.parts.into_iter().filter_map(|part| part.text).collect())
}

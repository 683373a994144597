//! Error types and HTTP error responses.
//!
//! Every failure in the request pipeline funnels into [`Error`], which maps onto the HTTP
//! surface in `IntoResponse`:
//!
//! - `BadRequest` → 400 with the message in the body; raised before any outbound call is made
//! - `UpstreamDecode` → 500 with the raw model reply attached under `raw_response` for diagnosis
//! - `Gemini` / `Other` → opaque 500; full detail is logged server-side, never returned
//!
//! A dynamic-schema validation failure is deliberately *not* represented here: it is recovered
//! locally by falling back to the raw decoded object (see [`crate::schema`]).

use crate::gemini::GeminiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data (missing file part, empty file name, malformed multipart)
    #[error("{message}")]
    BadRequest { message: String },

    /// The model reply could not be decoded as JSON. Terminal, not retried; the raw text is
    /// attached to the response for diagnosis.
    #[error("model reply is not valid JSON: {source}")]
    UpstreamDecode {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Provider call failure (transport, non-2xx status, empty reply)
    #[error(transparent)]
    Gemini(#[from] GeminiError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::UpstreamDecode { .. } | Error::Gemini(_) | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::UpstreamDecode { .. } => "The model returned invalid JSON.".to_string(),
            Error::Gemini(_) | Error::Other(_) => "An internal error occurred while processing the file.".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::UpstreamDecode { raw, .. } => {
                tracing::error!(raw_len = raw.len(), "Undecodable model reply: {:#}", self);
            }
            Error::Gemini(_) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
        }

        let status = self.status_code();

        let body = match &self {
            // Attach the raw reply so callers can diagnose what the model actually said
            Error::UpstreamDecode { raw, .. } => json!({
                "error": self.user_message(),
                "raw_response": raw,
            }),
            _ => json!({ "error": self.user_message() }),
        };

        (status, Json(body)).into_response()
    }
}

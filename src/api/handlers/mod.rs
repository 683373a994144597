//! HTTP request handlers.
//!
//! - [`analyze`]: document upload, Gemini invocation and response shaping
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to the appropriate
//! HTTP status code and JSON error response.

pub mod analyze;

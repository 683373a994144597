//! Data models for the analyze endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful analysis of one uploaded document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Original file name as declared in the multipart upload
    pub file_name: String,
    /// Declared media type of the upload
    pub mime_type: String,
    /// The shaped model reply: validated against the inferred schema when possible, the raw
    /// decoded object otherwise
    #[schema(value_type = Object)]
    pub analysis: serde_json::Value,
}

/// JSON error body returned on failing statuses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Raw model reply, attached only when the failure is an undecodable reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

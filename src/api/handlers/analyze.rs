//! HTTP handler for document analysis.

use crate::AppState;
use crate::api::models::analyze::{AnalyzeResponse, ErrorBody};
use crate::errors::{Error, Result};
use crate::prompt::DEFAULT_PROMPT;
use crate::schema;
use axum::{
    Json,
    extract::{Multipart, State},
};
use bytes::Bytes;

/// One decoded multipart upload, held in memory for the duration of the request.
struct Upload {
    file_name: String,
    mime_type: String,
    data: Bytes,
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "analyze",
    summary = "Analyze a document",
    description = "Upload a document for extraction. The file is forwarded to Gemini together \
                   with the extraction prompt; the model's JSON reply is validated against a \
                   schema inferred from the reply itself and returned under `analysis`.",
    request_body(
        content_type = "multipart/form-data",
        description = "Form part `file` (required): the document to analyze. Form field `prompt` (optional): \
                       overrides the default instruction template."
    ),
    responses(
        (status = 200, description = "Analysis result", body = AnalyzeResponse),
        (status = 400, description = "Missing file part or empty file name", body = ErrorBody),
        (status = 500, description = "Undecodable model reply or internal error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn analyze(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<AnalyzeResponse>> {
    let mut upload: Option<Upload> = None;
    let mut prompt_override: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        match field.name().unwrap_or("") {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let mime_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let data = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read file part: {e}"),
                })?;
                upload = Some(Upload {
                    file_name,
                    mime_type,
                    data,
                });
            }
            "prompt" => {
                let text = field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read prompt field: {e}"),
                })?;
                prompt_override = Some(text);
            }
            // Unknown parts are ignored
            _ => {}
        }
    }

    let Some(upload) = upload else {
        return Err(Error::BadRequest {
            message: "No file uploaded. The request must contain a `file` part.".to_string(),
        });
    };
    if upload.file_name.is_empty() {
        return Err(Error::BadRequest {
            message: "The uploaded file has no name.".to_string(),
        });
    }

    tracing::info!(
        file_name = %upload.file_name,
        mime_type = %upload.mime_type,
        size = upload.data.len(),
        "Processing uploaded document"
    );

    let prompt = prompt_override.as_deref().unwrap_or(DEFAULT_PROMPT);
    let reply = state.gemini.generate(&upload.data, &upload.mime_type, prompt).await?;
    let analysis = schema::shape_reply(&reply)?;

    Ok(Json(AnalyzeResponse {
        file_name: upload.file_name,
        mime_type: upload.mime_type,
        analysis,
    }))
}

//! OpenAPI documentation configuration.
//!
//! Aggregates the analyze endpoint and its models into one document, served with Scalar at
//! `/docs`.

use crate::api::handlers::analyze;
use crate::api::models::analyze::{AnalyzeResponse, ErrorBody};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "doclens",
        description = "Document analysis gateway: uploads are forwarded to Gemini and the extraction result is returned as JSON."
    ),
    paths(analyze::analyze),
    components(schemas(AnalyzeResponse, ErrorBody)),
    tags(
        (name = "analyze", description = "Document analysis")
    )
)]
pub struct ApiDoc;

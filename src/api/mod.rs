//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures for API communication
//!
//! The functional surface is a single endpoint, `POST /analyze`, documented with OpenAPI
//! annotations via `utoipa` and browsable at `/docs` when the server is running.

pub mod handlers;
pub mod models;

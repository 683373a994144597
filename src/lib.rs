//! # doclens: Document Analysis Gateway
//!
//! `doclens` is a small, stateless HTTP service that turns document uploads into structured
//! extraction results. A client POSTs a document (insurance card, driver's license, national
//! ID, or anything else) to `/analyze`; the service forwards the bytes together with an
//! extraction prompt to the hosted Gemini multimodal model, decodes the model's JSON reply,
//! normalizes it through a per-reply inferred schema, and returns the result.
//!
//! ## Request Flow
//!
//! Each request follows one linear pipeline with no shared mutable state:
//!
//! 1. The multipart upload is validated (a `file` part with a non-empty name is required).
//! 2. The file bytes, declared media type and prompt are sent to Gemini in a single
//!    `generateContent` call requesting JSON output ([`gemini`]).
//! 3. The reply is decoded; an undecodable reply is terminal and surfaces as a 500 carrying
//!    the raw text.
//! 4. A schema is inferred from the reply's own top-level keys and the reply is re-validated
//!    against it ([`schema`]). Validation failure degrades to returning the raw decoded
//!    object; the endpoint never hard-fails merely because the shape was unexpected.
//!
//! Concurrent requests are independent; the only shared objects are the immutable
//! configuration and the stateless Gemini client inside [`AppState`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use doclens::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = doclens::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     doclens::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod errors;
pub mod gemini;
mod openapi;
pub mod prompt;
pub mod schema;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_utils;

use crate::gemini::GeminiClient;
use crate::openapi::ApiDoc;
use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::post};
pub use config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// Constructed once at startup; everything inside is immutable and safe for concurrent reuse
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gemini: Arc<GeminiClient>,
}

/// The assembled application: router plus the configuration it was built from.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting doclens with configuration: {:#?}", config);

        let gemini = GeminiClient::new(config.gemini.clone())?;
        let state = AppState {
            config: Arc::new(config.clone()),
            gemini: Arc::new(gemini),
        };
        let router = build_router(state, &config);

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("doclens listening on http://{}, available at http://localhost:{}", bind_addr, self.config.port);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/analyze", post(api::handlers::analyze::analyze))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(config.limits.max_upload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

//! HTTP handlers for the scrape service.
//!
//! ```text
//! HTTP Request ──> Axum Router ──> scrape_handler ──> ScrapeService
//!                      │                                  │
//!                      ├──> health_handler                ├──> HttpFetcher
//!                      └──> status_handler ──> AppState   └──> ArticleExtractor
//! ```

pub mod scrape;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::cors::cors_layer;

pub use scrape::{error_status, scrape_handler, ErrorBody, ScrapeQuery, NO_ARTICLES_MESSAGE};
pub use status::{health_handler, status_handler, AppState, HealthResponse, StatusResponse};

/// Build the application router
///
/// # Routes
/// - `GET /scrape?url=...` - extract articles from a page
/// - `GET /health` - liveness probe
/// - `GET /status` - counters and latency
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/scrape", get(scrape_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms)))
        .layer(cors_layer(config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

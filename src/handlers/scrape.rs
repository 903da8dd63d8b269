//! `GET /scrape?url=...`
//!
//! Runs the scrape pipeline for one URL and maps the outcome onto the JSON
//! contract the front end expects: an array of records on success, or an
//! `{"error": ...}` object otherwise.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::status::AppState;
use crate::error::{Error, FetchError, ValidationError};

/// Message returned when every extraction tier came up empty
pub const NO_ARTICLES_MESSAGE: &str =
    "No articles found. This website structure may not be supported.";

/// Query parameters for `/scrape`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeQuery {
    /// Page to scrape
    pub url: Option<String>,
}

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

impl ErrorBody {
    /// Error body with `message`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Status code and user-facing message for a scrape failure
pub fn error_status(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::Validation(ValidationError::MissingUrl) => {
            (StatusCode::BAD_REQUEST, "URL parameter is required")
        }
        Error::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid URL format"),
        Error::Fetch(FetchError::HostNotFound(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Website not found or unreachable",
        ),
        Error::Fetch(FetchError::ConnectionRefused(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Connection refused by the website",
        ),
        Error::Fetch(FetchError::Timeout(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Request timed out")
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to scrape this website. It may not be supported.",
        ),
    }
}

/// `GET /scrape`
pub async fn scrape_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScrapeQuery>,
) -> Response {
    let request_id = Uuid::new_v4();
    let url = query.url.unwrap_or_default();
    let span = info_span!("scrape", %request_id, url = %url);

    async move {
        let started = Instant::now();
        match state.service().scrape(&url).await {
            Ok(report) => {
                state.record_success(report.articles.len(), started.elapsed());
                if report.articles.is_empty() {
                    info!("No articles found");
                    (StatusCode::OK, Json(ErrorBody::new(NO_ARTICLES_MESSAGE))).into_response()
                } else {
                    (StatusCode::OK, Json(report.articles)).into_response()
                }
            }
            Err(err) => {
                state.record_failure(started.elapsed());
                let (status, message) = error_status(&err);
                warn!(error = %err, status = status.as_u16(), "Scrape failed");
                (status, Json(ErrorBody::new(message))).into_response()
            }
        }
    }
    .instrument(span)
    .await
}

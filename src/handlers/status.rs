//! Health and status handlers.
//!
//! - `/health` - liveness probe with a timestamp
//! - `/status` - uptime, scrape counters and latency percentiles
//!
//! # Example Response
//!
//! ```json
//! {
//!   "name": "newsgrab",
//!   "version": "0.1.0",
//!   "uptime_seconds": 3600,
//!   "scrapes_total": 120,
//!   "scrapes_failed": 4,
//!   "scrapes_empty": 9,
//!   "articles_extracted": 3180,
//!   "latency": { "p50_ms": 410.0, "p95_ms": 1900.0, "p99_ms": 4100.0, ... },
//!   "status": "running",
//!   "timestamp": "2026-01-01T12:00:00.000Z"
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::extraction::article::iso_timestamp;
use crate::service::ScrapeService;

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name from Cargo.toml
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "OK" if responding
    pub status: String,
    /// ISO-8601 time the response was generated
    pub timestamp: String,
}

impl HealthResponse {
    /// Health response stamped with the current time
    pub fn now() -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: iso_timestamp(chrono::Utc::now()),
        }
    }
}

/// Detailed server status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Scrape requests handled
    pub scrapes_total: u64,
    /// Scrape requests that ended in an error
    pub scrapes_failed: u64,
    /// Scrape requests that found no articles
    pub scrapes_empty: u64,
    /// Articles returned across all requests
    pub articles_extracted: u64,
    /// Scrape latency statistics
    pub latency: LatencyMetrics,
    /// Always "running" if responding
    pub status: String,
    /// ISO-8601 time the response was generated
    pub timestamp: String,
}

/// Request latency percentile metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// 50th percentile latency in milliseconds
    pub p50_ms: f64,
    /// 95th percentile latency in milliseconds
    pub p95_ms: f64,
    /// 99th percentile latency in milliseconds
    pub p99_ms: f64,
    /// Number of requests recorded
    pub total_requests: u64,
    /// Mean latency in milliseconds
    pub mean_ms: f64,
    /// Maximum latency in milliseconds
    pub max_ms: f64,
}

// ============================================================================
// Latency Histogram
// ============================================================================

/// Thread-safe latency histogram.
///
/// Tracks 1 microsecond to 120 seconds with 3 significant figures, enough
/// headroom for slow pages plus the request timeout.
#[derive(Debug)]
pub struct LatencyHistogram {
    inner: RwLock<Histogram<u64>>,
}

impl LatencyHistogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        let histogram =
            Histogram::new_with_bounds(1, 120_000_000, 3).expect("valid histogram bounds");
        Self {
            inner: RwLock::new(histogram),
        }
    }

    /// Record a duration; values outside the bounds are ignored
    pub fn record(&self, duration: Duration) {
        let micros = duration.as_micros().min(u64::MAX as u128) as u64;
        let _ = self.inner.write().record(micros.max(1));
    }

    /// Number of recorded values
    pub fn count(&self) -> u64 {
        self.inner.read().len()
    }

    /// Percentile summary in milliseconds
    pub fn metrics(&self) -> LatencyMetrics {
        let hist = self.inner.read();
        if hist.is_empty() {
            return LatencyMetrics::default();
        }
        let ms = |us: u64| us as f64 / 1000.0;
        LatencyMetrics {
            p50_ms: ms(hist.value_at_quantile(0.50)),
            p95_ms: ms(hist.value_at_quantile(0.95)),
            p99_ms: ms(hist.value_at_quantile(0.99)),
            total_requests: hist.len(),
            mean_ms: hist.mean() / 1000.0,
            max_ms: ms(hist.max()),
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Shared state for all handlers
#[derive(Debug)]
pub struct AppState {
    service: ScrapeService,
    start_time: Instant,
    scrapes_total: AtomicU64,
    scrapes_failed: AtomicU64,
    scrapes_empty: AtomicU64,
    articles_extracted: AtomicU64,
    latency: LatencyHistogram,
}

impl AppState {
    /// Create state around a scrape service
    pub fn new(service: ScrapeService) -> Self {
        Self {
            service,
            start_time: Instant::now(),
            scrapes_total: AtomicU64::new(0),
            scrapes_failed: AtomicU64::new(0),
            scrapes_empty: AtomicU64::new(0),
            articles_extracted: AtomicU64::new(0),
            latency: LatencyHistogram::new(),
        }
    }

    /// The scrape service
    pub fn service(&self) -> &ScrapeService {
        &self.service
    }

    /// Seconds since the state was created
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record a scrape that returned `articles` records
    pub fn record_success(&self, articles: usize, elapsed: Duration) {
        self.scrapes_total.fetch_add(1, Ordering::Relaxed);
        if articles == 0 {
            self.scrapes_empty.fetch_add(1, Ordering::Relaxed);
        }
        self.articles_extracted
            .fetch_add(articles as u64, Ordering::Relaxed);
        self.latency.record(elapsed);
    }

    /// Record a scrape that failed
    pub fn record_failure(&self, elapsed: Duration) {
        self.scrapes_total.fetch_add(1, Ordering::Relaxed);
        self.scrapes_failed.fetch_add(1, Ordering::Relaxed);
        self.latency.record(elapsed);
    }

    /// Snapshot for the status endpoint
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            uptime_seconds: self.uptime_seconds(),
            scrapes_total: self.scrapes_total.load(Ordering::Relaxed),
            scrapes_failed: self.scrapes_failed.load(Ordering::Relaxed),
            scrapes_empty: self.scrapes_empty.load(Ordering::Relaxed),
            articles_extracted: self.articles_extracted.load(Ordering::Relaxed),
            latency: self.latency.metrics(),
            status: "running".to_string(),
            timestamp: iso_timestamp(chrono::Utc::now()),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /health`
#[instrument(skip_all)]
pub async fn health_handler() -> impl IntoResponse {
    debug!("Health check requested");
    (StatusCode::OK, Json(HealthResponse::now()))
}

/// `GET /status`
#[instrument(skip_all)]
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Status check requested");
    (StatusCode::OK, Json(state.status()))
}

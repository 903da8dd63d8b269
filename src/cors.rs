//! CORS configuration
//!
//! The scrape API is meant to be called from a browser front end served on a
//! different origin, so the default policy is permissive. A localhost-only
//! policy is available for machines where the service should not be reachable
//! from arbitrary pages.
//!
//! # Example
//!
//! ```rust,ignore
//! use newsgrab::config::CorsMode;
//! use newsgrab::cors::cors_layer;
//! use axum::Router;
//!
//! let app = Router::new()
//!     .route("/scrape", get(scrape_handler))
//!     .layer(cors_layer(CorsMode::Localhost));
//! ```

use std::time::Duration;

use http::{header::HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsMode;

/// Methods the API answers
pub const ALLOWED_METHODS: [Method; 2] = [Method::GET, Method::OPTIONS];

/// Default max age for preflight cache (1 hour)
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// Build the CORS layer for `mode`
pub fn cors_layer(mode: CorsMode) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([http::header::CONTENT_TYPE])
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS));

    match mode {
        CorsMode::Permissive => layer.allow_origin(Any),
        CorsMode::Localhost => {
            layer.allow_origin(AllowOrigin::predicate(|origin, _| is_localhost_origin(origin)))
        }
    }
}

/// Checks if the given origin is a localhost origin.
///
/// Accepts `http(s)://localhost`, `http(s)://127.0.0.1` and `http(s)://[::1]`,
/// with or without a numeric port. Anything else, including hosts that merely
/// start with `localhost`, is rejected.
///
/// ```rust
/// use http::header::HeaderValue;
/// use newsgrab::cors::is_localhost_origin;
///
/// assert!(is_localhost_origin(&HeaderValue::from_static("http://localhost:3000")));
/// assert!(!is_localhost_origin(&HeaderValue::from_static("http://example.com")));
/// ```
pub fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let origin = origin.to_ascii_lowercase();

    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };

    ["localhost", "127.0.0.1", "[::1]"].iter().any(|host| {
        rest.strip_prefix(host).is_some_and(|tail| {
            tail.is_empty()
                || tail
                    .strip_prefix(':')
                    .is_some_and(|port| !port.is_empty() && port.parse::<u16>().is_ok())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(s: &'static str) -> HeaderValue {
        HeaderValue::from_static(s)
    }

    #[test]
    fn test_localhost_origins() {
        assert!(is_localhost_origin(&origin("http://localhost")));
        assert!(is_localhost_origin(&origin("http://localhost:3000")));
        assert!(is_localhost_origin(&origin("https://127.0.0.1:8443")));
        assert!(is_localhost_origin(&origin("http://[::1]:5173")));
    }

    #[test]
    fn test_rejects_lookalikes() {
        assert!(!is_localhost_origin(&origin("http://localhost.evil.com")));
        assert!(!is_localhost_origin(&origin("http://127.0.0.1.nip.io")));
        assert!(!is_localhost_origin(&origin("http://localhost:")));
        assert!(!is_localhost_origin(&origin("http://localhost:99999")));
        assert!(!is_localhost_origin(&origin("http://example.com")));
        assert!(!is_localhost_origin(&origin("file://localhost")));
    }

    #[test]
    fn test_layers_build() {
        let _ = cors_layer(CorsMode::Permissive);
        let _ = cors_layer(CorsMode::Localhost);
    }
}

//! Page retrieval
//!
//! URL validation and the HTTP fetcher that feeds raw markup to the
//! extraction engine.

pub mod client;
pub mod validate;

pub use client::{FetchOptions, HttpFetcher, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_USER_AGENT};
pub use validate::UrlValidator;

//! Error types for newsgrab
//!
//! This module provides the error hierarchy using `thiserror`. The extraction
//! engine itself never fails; errors come from URL validation, fetching and
//! selector configuration.

use thiserror::Error;

/// The main error type for newsgrab operations
#[derive(Error, Debug)]
pub enum Error {
    /// Fetching the page failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The requested URL was rejected before fetching
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Extraction setup errors (selector configuration)
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Transport-level failures while retrieving a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request exceeded the fetch timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// DNS lookup for the host failed
    #[error("Host not found: {0}")]
    HostNotFound(String),

    /// The remote host refused the connection
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// The remote host answered with a non-success status
    #[error("HTTP error {status}: {message}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Reading the response body failed
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Rejections of the requested URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No URL was supplied
    #[error("URL parameter is required")]
    MissingUrl,

    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL scheme is not http or https
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The URL is longer than the accepted maximum
    #[error("URL exceeds maximum length of {0} characters")]
    TooLong(usize),
}

/// Selector configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A pattern is not a valid CSS selector
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A selector list has no patterns
    #[error("Selector list '{0}' is empty")]
    EmptySelectorList(&'static str),
}

/// Result type alias for newsgrab operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }
}

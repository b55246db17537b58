//! Error types for the zgallery plugin.
//!
//! [`GalleryError`] is the crate-wide error and [`Result`] its alias. The search
//! core only ever raises [`NetworkError`]; the detail variants exist for logging,
//! callers treat every network failure the same way.

use thiserror::Error;

/// Failure of a single remote page fetch.
///
/// Raised by the gateway, passed through the orchestrator untouched, and
/// returned by the session after it has updated its own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The service answered with a non-success HTTP status.
    #[error("remote service returned status {0}")]
    Status(u16),

    /// No response arrived within the request timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// The main error type for zgallery operations.
///
/// # Examples
///
/// ```
/// use zgallery::domain::{GalleryError, NetworkError};
///
/// let err: GalleryError = NetworkError::Status(503).into();
/// assert_eq!(err.to_string(), "Network error: remote service returned status 503");
/// ```
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A remote page fetch failed.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Reading or writing the snapshot store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme file could not be read or parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for zgallery operations.
pub type Result<T> = std::result::Result<T, GalleryError>;

//! Typed errors for the extraction pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure kind. Only [`ExtractionError`] crosses the public API of
//! adapters and the orchestrator; the other enums are converted at the
//! boundary where they occur.

use thiserror::Error;

/// Errors surfaced by adapters and the bulk orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Caller supplied an empty batch or an empty locator
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The per-category admission ceiling was reached for the current window
    #[error("rate limit exceeded for {category}, retry after {retry_after_seconds}s")]
    RateLimitExceeded {
        category: String,
        retry_after_seconds: u64,
    },

    /// The underlying extraction work failed
    #[error("extraction failed for {locator}: {diagnostic}")]
    ExtractionFailed { locator: String, diagnostic: String },

    /// No job with this id was ever submitted to the orchestrator
    #[error("job not found: {job_id}")]
    JobNotFound { job_id: String },
}

impl ExtractionError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// True for the limiter rejection, which callers may retry later.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }
}

/// Errors from the opaque source fetch (network, OCR, rendering).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Locator could not be interpreted for this source kind
    #[error("unsupported locator: {0}")]
    Unsupported(String),

    /// Source responded but could not be read
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Source timed out
    #[error("timed out after {millis}ms")]
    Timeout { millis: u64 },
}

/// Errors from the secondary structured-field derivation on documents.
///
/// These never reach callers; the document adapter falls back to pattern
/// matching whenever derivation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// Text carries no recognisable structure
    #[error("document has no structured fields")]
    Unstructured,

    /// Derivation service failed
    #[error("derivation service error: {0}")]
    Service(String),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but not parseable
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    /// A setting is out of its allowed range
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for source fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for structured derivation.
pub type DerivationResult<T> = std::result::Result<T, DerivationError>;

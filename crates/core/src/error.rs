//! Error types for loading dashboard data.

use thiserror::Error;

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadFailure>;

/// The single failure produced by a workbook load.
///
/// Read errors, parse errors, timeouts and cancellations all collapse into
/// this one value. Callers only ever show the message and stop rendering the
/// data-dependent views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error loading data: {message}")]
pub struct LoadFailure {
    origin: String,
    message: String,
}

impl LoadFailure {
    /// Create a load failure for the given source key.
    ///
    /// An empty message is replaced so the failure always carries text.
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            origin: origin.into(),
            message,
        }
    }

    /// The source key the load was attempted against.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Human-readable description of what went wrong.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

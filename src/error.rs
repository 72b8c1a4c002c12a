//! Unified error type for all dashboard commands.
//!
//! `AppError` is the single error type returned by every fallible operation in
//! the crate. It serializes as `{ "kind": "...", "message": "..." }` so a
//! frontend can programmatically distinguish error categories.

use serde::ser::SerializeStruct;

/// Application-level error returned by all command and client operations.
///
/// Each variant maps to a distinct failure domain. A JSON consumer receives an
/// object with `kind` (variant name) and `message` (human-readable description).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request never completed: connection refused, DNS failure, timeout.
    #[error("{0}")]
    Transport(String),

    /// The enforcement service answered with a non-success HTTP status.
    #[error("{0}")]
    Service(String),

    /// The service answered, but the response body could not be decoded.
    #[error("{0}")]
    Decode(String),

    /// Invalid or missing operator input, rejected before any network call.
    #[error("{0}")]
    InvalidInput(String),
}

impl AppError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Transport(_) => "Transport",
            AppError::Service(_) => "Service",
            AppError::Decode(_) => "Decode",
            AppError::InvalidInput(_) => "InvalidInput",
        }
    }

    /// True for failures the operator can meaningfully retry as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Service(_))
    }
}

/// Custom Serialize: produces `{ "kind": "Variant", "message": "..." }` for the frontend.
impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

// ---- From implementations for ergonomic error conversion ----

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

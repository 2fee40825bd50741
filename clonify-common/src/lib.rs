//! Common types and utilities shared across Clonify crates.
//!
//! This crate holds the error taxonomy surfaced to users and the observability
//! helpers every binary uses. It stays dependency-light so the HTTP, web and UI
//! crates can all depend on it.
//!
//! # Overview
//!
//! - [`ValidationError`]: rejected user input (empty or malformed URL)
//! - [`ClonifyError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! Mapping an error to the message shown to the user:
//!
//! ```rust
//! use clonify_common::{ClonifyError, ValidationError};
//!
//! let err = ClonifyError::from(ValidationError::Empty);
//! assert!(err.is_validation());
//! assert_eq!(err.user_message(), "Please enter a website URL");
//! ```

pub mod observability;

/// Message shown for every network-side failure. The proxy hides whether the
/// proxy itself or the target site refused, so there is only one.
pub const CLONE_FAILED_MESSAGE: &str = "Failed to clone website. This may be due to CORS restrictions or the website not being accessible.";

/// Input rejected before any request is made.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing (or only whitespace) was entered.
    #[error("Please enter a website URL")]
    Empty,

    /// The input does not parse as an absolute URL.
    #[error("Please enter a valid URL (e.g., https://example.com)")]
    Malformed(String),
}

/// Error types used across the Clonify workspace.
#[derive(thiserror::Error, Debug)]
pub enum ClonifyError {
    /// The user-supplied URL was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The proxy could not deliver the page body.
    #[error("Network error: {0}")]
    Network(String),

    /// Writing a download or preview file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background worker could not take or answer a request.
    #[error("Worker unavailable: {0}")]
    Unavailable(String),
}

impl ClonifyError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Collapse the error into the text shown in the UI.
    ///
    /// Network failures all share [`CLONE_FAILED_MESSAGE`]; the detail only goes
    /// to the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(v) => v.to_string(),
            Self::Network(_) => CLONE_FAILED_MESSAGE.to_string(),
            Self::Io(e) => format!("Could not write file: {e}"),
            Self::Config(msg) => format!("Configuration error: {msg}"),
            Self::Unavailable(_) => "Busy, please try again in a moment".to_string(),
        }
    }
}

/// Convenient alias for results that use [`ClonifyError`].
pub type Result<T> = std::result::Result<T, ClonifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_and_empty_have_distinct_messages() {
        let empty = ClonifyError::from(ValidationError::Empty).user_message();
        let bad = ClonifyError::from(ValidationError::Malformed("nope".into())).user_message();
        assert_ne!(empty, bad);
        assert!(bad.contains("https://example.com"));
    }

    #[test]
    fn unavailable_is_not_reported_as_a_failed_clone() {
        let msg = ClonifyError::Unavailable("mailbox full".into()).user_message();
        assert_ne!(msg, CLONE_FAILED_MESSAGE);
    }

    #[test]
    fn network_detail_is_hidden_from_user() {
        let err = ClonifyError::Network("proxy returned 502".into());
        assert!(err.is_network());
        assert_eq!(err.user_message(), CLONE_FAILED_MESSAGE);
        assert!(err.to_string().contains("502"));
    }
}

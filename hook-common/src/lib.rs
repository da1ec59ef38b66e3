//! Common types shared across the mutual-hook crates.
//!
//! This crate carries the workflow-level error type and the observability
//! helpers every binary and integration test uses. It stays small so the
//! domain and client crates can depend on it without pulling in the HTTP
//! stack.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`HookError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use hook_common::HookError;
//!
//! let err = HookError::Submission { attempts: 4 };
//! assert_eq!(err.to_string(), "Submission failed after 4 attempts");
//! assert!(!err.is_fatal_before_submit());
//! ```
pub mod observability;

/// Error types raised by the mutual-hook workflow.
///
/// The variants follow the two tiers of the run: everything up to the
/// submission is fatal on first failure, the submission itself only fails
/// once its attempt budget is spent.
#[derive(thiserror::Error, Debug)]
pub enum HookError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The webhook service refused the registration request.
    #[error("Webhook initiation failed: {0}")]
    Initiation(String),

    /// A required field of the initiation response was missing or unusable.
    #[error("Malformed webhook response: {0}")]
    Malformed(String),

    /// Every submission attempt was used without a 2xx response.
    #[error("Submission failed after {attempts} attempts")]
    Submission { attempts: u32 },

    /// Transport-level failure surfaced by the HTTP layer.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl HookError {
    /// True for the errors that end the run before anything is submitted.
    pub fn is_fatal_before_submit(&self) -> bool {
        !matches!(self, HookError::Submission { .. })
    }
}

/// Convenient alias for results that use [`HookError`].
pub type Result<T> = std::result::Result<T, HookError>;

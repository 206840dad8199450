//! Error types and result aliases shared across the lotic components.
//!
//! Every failure a handler can observe is a variant here. The taxonomy
//! distinguishes deterministic failures (never retried) from transient I/O
//! failures (retried under [`RetryPolicy`](crate::retry::RetryPolicy)), and
//! carries the exit-code mapping the CLI front end relies on.

use std::time::Duration;

/// The result type used throughout lotic.
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for malformed input (sysexits `EX_USAGE`).
pub const EXIT_USAGE: i32 = 64;
/// Exit code for a missing resource (sysexits `EX_NOINPUT`).
pub const EXIT_NOT_FOUND: i32 = 66;
/// Exit code for any other core failure (sysexits `EX_SOFTWARE`).
pub const EXIT_SOFTWARE: i32 = 70;

/// Errors that can occur in lotic operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lot id, uri, or template string was malformed.
    #[error("format error: {0}")]
    Format(String),

    /// A manifest object already exists at the target key (write-once violation).
    #[error("manifest already exists: {uri}")]
    ManifestExists {
        /// The identifier of the conflicting manifest object.
        uri: String,
    },

    /// A referenced object or resource is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// No project owns a referenced dataset.
    #[error("dataset owner not found: {dataset}")]
    OwnerNotFound {
        /// The id of the dataset with no resolved owner.
        dataset: String,
    },

    /// More than one project claims ownership of the same dataset.
    #[error("dataset: {dataset}, is owned by multiple projects: {}", owners.join(", "))]
    AmbiguousOwnership {
        /// The id of the multiply-owned dataset.
        dataset: String,
        /// The ids of every project claiming the dataset.
        owners: Vec<String>,
    },

    /// A storage operation failed for a transient reason (network, 5xx).
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backing service throttled the request.
    #[error("throttled: {0}")]
    Throttled(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// Invalid input was provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The retry budget was exhausted without a successful attempt.
    #[error("retries exhausted after {attempts} attempts over {elapsed:?}")]
    RetryExhausted {
        /// Number of attempts made, including the first.
        attempts: u32,
        /// Wall-clock time spent across all attempts and backoff sleeps.
        elapsed: Duration,
        /// The error returned by the final attempt.
        #[source]
        source: Box<Error>,
    },

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates a new storage error with the given message.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new storage error with a source cause.
    #[must_use]
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns whether retrying the failed operation could succeed.
    ///
    /// Only transient I/O failures qualify. Deterministic failures like a
    /// write-once conflict would only re-observe the same outcome.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Throttled(_))
    }

    /// Maps this error to the process exit code the CLI front end reports.
    ///
    /// Parse and validation failures map to a usage code, missing resources
    /// to a distinct not-found code, and everything else to a generic
    /// software-error code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Format(_) | Self::InvalidInput(_) => EXIT_USAGE,
            Self::NotFound(_) => EXIT_NOT_FOUND,
            _ => EXIT_SOFTWARE,
        }
    }
}

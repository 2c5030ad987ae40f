//! Error types for the data access layer.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// Result alias for data layer operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised by the data access layer.
#[derive(Debug)]
pub enum DataError {
    /// Input failed validation before reaching a backend.
    Validation {
        /// Field that failed.
        field: &'static str,
        /// Why it failed.
        reason: &'static str,
    },
    /// Too many requests in the current window.
    RateLimited {
        /// Time until another request will be admitted.
        retry_after: Duration,
    },
    /// The caller may not perform the operation.
    Forbidden {
        /// Operation identifier.
        operation: &'static str,
    },
    /// The record does not exist.
    NotFound {
        /// Resource kind.
        resource: &'static str,
        /// Identifier that was looked up.
        id: String,
    },
    /// The caller has already voted for this item.
    AlreadyVoted {
        /// Feedback item identifier.
        id: String,
    },
    /// The HTTP request could not be completed or decoded.
    Request {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// Secret material could not be hashed or verified.
    Hashing {
        /// Hasher detail.
        detail: String,
    },
}

impl DataError {
    /// Whether the error stems from caller input rather than infrastructure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::RateLimited { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::AlreadyVoted { .. }
        )
    }
}

impl Display for DataError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, reason } => write!(formatter, "invalid {field}: {reason}"),
            Self::RateLimited { .. } => formatter.write_str("too many requests, try again shortly"),
            Self::Forbidden { .. } => formatter.write_str("operation not permitted"),
            Self::NotFound { resource, .. } => write!(formatter, "{resource} not found"),
            Self::AlreadyVoted { .. } => formatter.write_str("already voted for this item"),
            Self::Request { .. } => formatter.write_str("backend request failed"),
            Self::Status { status, .. } => write!(formatter, "backend returned status {status}"),
            Self::Hashing { .. } => formatter.write_str("failed to process secret material"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_stable_and_user_facing_errors_are_classified() {
        let validation = DataError::Validation {
            field: "email",
            reason: "must contain '@'",
        };
        assert_eq!(validation.to_string(), "invalid email: must contain '@'");
        assert!(validation.is_user_error());

        let status = DataError::Status {
            operation: "feedback.list",
            status: 503,
            body: String::new(),
        };
        assert_eq!(status.to_string(), "backend returned status 503");
        assert!(!status.is_user_error());
        assert!(status.source().is_none());

        let voted = DataError::AlreadyVoted { id: "abc".into() };
        assert_eq!(voted.to_string(), "already voted for this item");
    }
}

//! Error taxonomy shared by every helpdesk crate.
//!
//! Two families exist: [`StoreError`] for remote calls that failed and
//! [`ValidationError`] for input rejected before any call is made.

use crate::types::TicketStatus;
use thiserror::Error;

/// A call to the remote store failed
///
/// Each failure is scoped to the single attempted operation. Nothing is
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request never produced a response (DNS, TLS, connection reset)
    #[error("Request to remote store failed: {0}")]
    Transport(String),

    /// The caller's credential was missing, expired or rejected
    #[error("Unauthorized - session rejected by remote store")]
    Unauthorized,

    /// The addressed row does not exist or is not visible to the caller
    #[error("{entity} {id} not found")]
    NotFound {
        /// Collection name
        entity: &'static str,
        /// Requested identifier
        id: String,
    },

    /// The remote store answered with a non-success status
    #[error("Remote store error (status {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Body returned by the store
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),
}

impl StoreError {
    /// Build a `NotFound` error for a collection and id
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Input rejected on the client side before reaching the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is blank
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Email address without a local part or domain
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// A string did not name a known enumeration value
    #[error("Unknown {field}: {value}")]
    UnknownValue {
        /// Field being parsed
        field: &'static str,
        /// Offending input
        value: String,
    },

    /// A partial update carried no fields
    #[error("Nothing to update")]
    NothingToUpdate,

    /// Attachment exceeds the size limit
    #[error("Attachment is too large ({size} bytes, limit {limit} bytes)")]
    AttachmentTooLarge {
        /// Attachment size in bytes
        size: u64,
        /// Allowed maximum in bytes
        limit: u64,
    },

    /// Attachment is not an image
    #[error("Unsupported attachment type: {0}")]
    UnsupportedAttachment(String),

    /// The configured transition policy forbids this status change
    #[error("Cannot move ticket from {from} to {to}")]
    TransitionNotAllowed {
        /// Current status
        from: TicketStatus,
        /// Requested status
        to: TicketStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::not_found("tickets", "42");
        assert_eq!(err.to_string(), "tickets 42 not found");

        let err = StoreError::Rejected {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Remote store error (status 500): boom");
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::MissingField("title").to_string(),
            "title is required"
        );
        let err = ValidationError::TransitionNotAllowed {
            from: TicketStatus::Closed,
            to: TicketStatus::New,
        };
        assert_eq!(err.to_string(), "Cannot move ticket from closed to new");
    }
}

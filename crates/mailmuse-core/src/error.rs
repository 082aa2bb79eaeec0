//! Error types for the core library.

use thiserror::Error;

use crate::mailbox::MailItemId;
use crate::remote::RemoteError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A mutation or lookup referenced an item that is no longer present.
    ///
    /// Most store mutators treat a stale id as a benign no-op instead of
    /// returning this; it is reserved for callers that require the item to
    /// exist (e.g. selecting it for display).
    #[error("mail item not found: {0}")]
    NotFound(MailItemId),

    /// A user action was blocked before any state change.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A persistence or AI call failed. Local optimistic state is not rolled
    /// back; the caller surfaces the error and may retry.
    #[error("remote call failed: {0}")]
    Remote(#[from] RemoteError),

    /// A second AI assist request was issued while one is still in flight.
    #[error("an assist request is already in flight")]
    ConcurrentRequest,

    /// Remote deletion was requested for a draft that was never saved.
    #[error("draft has not been persisted")]
    NotPersisted,

    /// A record from the load collaborator is missing required fields.
    #[error("malformed mail record: {0}")]
    Integrity(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

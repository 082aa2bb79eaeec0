//! Collaborator interfaces for the network layer.
//!
//! The core never reads ambient credential state: every remote call takes a
//! [`SessionAuth`] explicitly, which keeps the components testable without a
//! simulated storage layer.

use thiserror::Error;

use super::record::{DraftPayload, DraftRecord, MailRecord};
use crate::mailbox::{MailItemId, MailboxView};

/// Bearer credential plus user identifier, read once per session start.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    /// Bearer token for the backend services.
    pub token: String,
    /// Identifier of the signed-in user.
    pub user_id: String,
}

impl SessionAuth {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }
}

/// Errors surfaced by a remote collaborator.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The request never completed (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The bearer credential was rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The server answered with an error status.
    #[error("server rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, if any.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Remote result alias.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Supplies mail items per mailbox view (bulk load).
#[allow(async_fn_in_trait)] // Callers are single-threaded; no Send bound needed
pub trait MailGateway {
    /// Fetches the ordered records for one mailbox view.
    async fn fetch_mailbox(
        &self,
        auth: &SessionAuth,
        view: MailboxView,
    ) -> RemoteResult<Vec<MailRecord>>;
}

/// Persists drafts and their lifecycle transitions.
#[allow(async_fn_in_trait)] // Callers are single-threaded; no Send bound needed
pub trait DraftGateway {
    /// Creates a new draft, returning the server document with its id.
    async fn create_draft(
        &self,
        auth: &SessionAuth,
        draft: &DraftPayload,
    ) -> RemoteResult<DraftRecord>;

    /// Updates an existing draft.
    async fn update_draft(
        &self,
        auth: &SessionAuth,
        id: &MailItemId,
        draft: &DraftPayload,
    ) -> RemoteResult<DraftRecord>;

    /// Removes a persisted draft.
    async fn delete_draft(&self, auth: &SessionAuth, id: &MailItemId) -> RemoteResult<()>;

    /// Marks a draft sent. Implementations handle any approval step the
    /// backend requires first.
    async fn send_draft(&self, auth: &SessionAuth, id: &MailItemId) -> RemoteResult<DraftRecord>;

    /// Hands a draft to the backend for deferred sending. Scheduling policy
    /// lives entirely on the backend.
    async fn schedule_draft(
        &self,
        auth: &SessionAuth,
        id: &MailItemId,
    ) -> RemoteResult<DraftRecord>;
}

/// Generates reply text from a context body or user prompt.
#[allow(async_fn_in_trait)] // Callers are single-threaded; no Send bound needed
pub trait AssistGateway {
    /// Returns generated text for the given context. The core does not
    /// interpret the text, only appends it.
    async fn generate_reply(&self, auth: &SessionAuth, context: &str) -> RemoteResult<String>;
}

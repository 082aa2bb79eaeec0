//! # mailmuse-core
//!
//! Mailbox item lifecycle coordination for the `mailmuse` email client.
//!
//! This crate provides:
//! - The canonical mail item collection and its derived views
//!   ([`MailboxStore`])
//! - The per-view action policy table ([`ActionPolicy`])
//! - The draft-under-edit state machine with AI-assisted text generation
//!   ([`ComposeSession`])
//! - Screen state and cross-view consistency ([`ViewCoordinator`])
//! - Collaborator interfaces for the network layer ([`remote`])
//!
//! Rendering, routing, and credential storage live outside this crate; the
//! network layer is reached only through the gateway traits in [`remote`],
//! with the session credential passed in explicitly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod compose;
mod error;
pub mod mailbox;
pub mod remote;
pub mod view;

pub use compose::{
    AssistOutcome, AssistRequest, AssistTicket, CommitAction, CommitReceipt, ComposeField,
    ComposeSession, DraftFields, DraftStatus,
};
pub use error::{Error, Result};
pub use mailbox::{
    ActionPolicy, Address, ItemKind, MailItem, MailItemId, MailboxStore, MailboxView, ThreadId,
};
pub use remote::{
    AssistGateway, DraftGateway, DraftPayload, DraftRecord, MailGateway, MailRecord, RemoteError,
    RemoteResult, SessionAuth,
};
pub use view::{Screen, ViewCoordinator};

//! # mailmuse-client
//!
//! HTTP implementation of the `mailmuse-core` gateway traits against the
//! backend REST services: the email service (mailbox pages), the drafts
//! service (create/update/delete and the approve/send lifecycle), and the AI
//! reply-generation service.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;

pub use client::BackendClient;

//! Wire records and collaborator interfaces for the network layer.

mod gateway;
mod record;

pub use gateway::{
    AssistGateway, DraftGateway, MailGateway, RemoteError, RemoteResult, SessionAuth,
};
pub use record::{DraftPayload, DraftRecord, MailRecord};

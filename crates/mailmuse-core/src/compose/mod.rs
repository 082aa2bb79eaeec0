//! Draft composition: editable fields and the session state machine.

mod model;
mod session;

pub use model::{CommitAction, ComposeField, DraftFields, DraftStatus};
pub use session::{
    AssistOutcome, AssistRequest, AssistTicket, CommitReceipt, ComposeSession,
};

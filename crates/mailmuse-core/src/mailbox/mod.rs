//! Mail item model, per-view action policy, and the canonical item store.

mod model;
mod policy;
mod store;

pub use model::{Address, ItemKind, MailItem, MailItemId, MailboxView, ThreadId};
pub use policy::ActionPolicy;
pub use store::MailboxStore;

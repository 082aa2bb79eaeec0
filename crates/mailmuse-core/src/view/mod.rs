//! Screen state: listing, detail, and the compose overlay.

mod coordinator;

pub use coordinator::{Screen, ViewCoordinator};

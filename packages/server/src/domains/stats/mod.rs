//! Stats domain - append-only log of completed user actions.
//!
//! The log doubles as the username → user id lookup used when notifying
//! rumor subjects.

pub mod actions;
pub mod models;

pub use models::{ActionEvent, ActionKind, NewActionEvent};

pub mod action_event;

pub use action_event::{ActionEvent, ActionKind, NewActionEvent};

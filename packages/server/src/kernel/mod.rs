//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PgEventStore, PgRumorStore, ServerDeps, TelegramAdapter};
pub use test_dependencies::{
    EditedMessage, MockEventStore, MockMessenger, MockRumorStore, SentMessage, TestDependencies,
};
pub use traits::*;

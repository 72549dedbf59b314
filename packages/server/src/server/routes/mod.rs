pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::{router as webhook_router, WebhookState};

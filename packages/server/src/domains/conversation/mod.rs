//! Conversation domain - the wizard state machines and everything that
//! turns one inbound event into replies.
//!
//! Processing model (the machine decides, effects execute):
//!   webhook update → [`events::from_update`] → [`machines::decide`]
//!   → [`effects::execute`]
//!
//! All three steps for one user run under that user's session lock, which
//! serializes concurrent deliveries of the same user's events.

pub mod commands;
pub mod effects;
pub mod events;
pub mod machines;
pub mod models;
pub mod pagination;
pub mod texts;

use anyhow::Result;
use tracing::debug;

use crate::kernel::ServerDeps;

use events::Inbound;

/// Process one inbound event end to end.
pub async fn handle_inbound(deps: &ServerDeps, inbound: Inbound) -> Result<()> {
    let cell = deps.sessions.session(inbound.actor.user_id);
    let mut session = cell.lock().await;

    let Some(command) = machines::decide(&mut session, &inbound) else {
        debug!(
            user_id = inbound.actor.user_id,
            "Inbound event is a no-op for the current state"
        );
        return Ok(());
    };

    effects::execute(deps, &inbound, &mut session, command).await
}

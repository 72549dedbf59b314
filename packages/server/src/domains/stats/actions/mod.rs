//! Event recorder action.

use anyhow::Result;
use tracing::debug;

use crate::domains::conversation::events::Actor;
use crate::domains::stats::models::{ActionEvent, ActionKind, NewActionEvent};
use crate::kernel::ServerDeps;

/// Append one action event for a completed find or submit flow. No
/// deduplication: repeated actions by the same user each get a row.
pub async fn record_action(
    actor: &Actor,
    kind: ActionKind,
    deps: &ServerDeps,
) -> Result<ActionEvent> {
    let event = deps
        .events
        .insert(NewActionEvent {
            user_id: actor.user_id,
            username: actor.username.clone(),
            kind,
            bot_identity: deps.bot_identity.clone(),
        })
        .await?;

    debug!(
        user_id = actor.user_id,
        kind = kind.as_str(),
        "Action event recorded"
    );
    Ok(event)
}

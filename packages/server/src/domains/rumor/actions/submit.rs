//! Submission pipeline: persist a completed draft, record the action,
//! then notify the subject if they have interacted with the bot before.

use anyhow::Result;
use tracing::{info, warn};

use crate::domains::conversation::events::Actor;
use crate::domains::conversation::texts;
use crate::domains::rumor::models::{NewRumor, RumorRecord};
use crate::domains::stats::{actions as stats, ActionKind};
use crate::kernel::ServerDeps;

/// Persist a completed submission.
///
/// Exactly one rumor and one action event are written per call. The
/// subject notification runs strictly after both writes as a best-effort
/// step: a resolution miss or delivery failure is logged and swallowed,
/// never propagated, so persistence success does not depend on it.
pub async fn submit_rumor(new: NewRumor, actor: &Actor, deps: &ServerDeps) -> Result<RumorRecord> {
    let record = deps.rumors.insert(new.normalized()).await?;

    info!(
        rumor_id = record.id,
        submitter = actor.user_id,
        "Rumor persisted"
    );

    stats::record_action(actor, ActionKind::Submit, deps).await?;

    notify_subject(&record, deps).await;

    Ok(record)
}

/// Best-effort post-commit notification of the rumor's subject.
///
/// The subject is resolved through the action event log: if someone with
/// the given username has completed a flow before, their user id is on
/// record. A missing match is the normal case, not an error.
async fn notify_subject(record: &RumorRecord, deps: &ServerDeps) {
    let Some(username) = record.subject_username.as_deref() else {
        return;
    };

    let target = match deps.events.find_latest_by_username(username).await {
        Ok(target) => target,
        Err(error) => {
            warn!(%username, %error, "Subject lookup failed, skipping notification");
            return;
        }
    };

    let Some(target) = target else {
        info!(%username, "Subject has never interacted with the bot, no notification");
        return;
    };

    if let Err(error) = deps
        .messenger
        .send_message(target.user_id, texts::SUBJECT_NOTIFICATION, None)
        .await
    {
        warn!(
            target = target.user_id,
            %error,
            "Subject notification delivery failed"
        );
    }
}

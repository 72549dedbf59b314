use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Kind of completed user action recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Find,
    Submit,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Find => "find",
            ActionKind::Submit => "submit",
        }
    }
}

/// Action event - SQL persistence layer
///
/// Append-only log of completed find/submit actions. Multiple rows per
/// user/kind are expected and retained; the only read path is the
/// latest-event-by-username lookup used for notification targeting.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub kind: String,
    pub bot_identity: String,
    pub created_at: DateTime<Utc>,
}

/// A completed action, ready to append.
#[derive(Debug, Clone)]
pub struct NewActionEvent {
    pub user_id: i64,
    pub username: Option<String>,
    pub kind: ActionKind,
    pub bot_identity: String,
}

impl ActionEvent {
    /// Append one event
    pub async fn insert(new: &NewActionEvent, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO action_events (user_id, username, kind, bot_identity)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(new.user_id)
        .bind(&new.username)
        .bind(new.kind.as_str())
        .bind(&new.bot_identity)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recent event for a username. Most-recent-wins is the
    /// deterministic resolution policy for notification targets.
    pub async fn find_latest_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM action_events
             WHERE username = $1
             ORDER BY id DESC
             LIMIT 1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}

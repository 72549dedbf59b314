//! Server dependencies for effects (using traits for testability)
//!
//! This module provides the central dependency container handed to every
//! webhook invocation. All external collaborators sit behind trait
//! abstractions so tests can substitute them.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use telegram::models::{InlineKeyboardMarkup, ReplyMarkup};
use telegram::TelegramService;

use crate::domains::conversation::models::SessionStore;
use crate::domains::rumor::models::{NewRumor, RumorRecord};
use crate::domains::stats::models::{ActionEvent, NewActionEvent};
use crate::kernel::{BaseEventStore, BaseMessenger, BaseRumorStore};

// =============================================================================
// TelegramService Adapter (implements BaseMessenger trait)
// =============================================================================

/// Wrapper around TelegramService that implements the BaseMessenger trait
pub struct TelegramAdapter(pub Arc<TelegramService>);

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseMessenger for TelegramAdapter {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<i64> {
        let message = self
            .0
            .send_message(chat_id, text, reply_markup.as_ref())
            .await?;
        Ok(message.message_id)
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.0
            .edit_message_text(chat_id, message_id, text, reply_markup.as_ref())
            .await
            .map_err(Into::into)
    }
}

// =============================================================================
// Postgres store adapters
// =============================================================================

/// Postgres-backed rumor store, delegating to the model layer.
pub struct PgRumorStore {
    pool: PgPool,
}

impl PgRumorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRumorStore for PgRumorStore {
    async fn insert(&self, new: NewRumor) -> Result<RumorRecord> {
        RumorRecord::insert(&new, &self.pool).await
    }

    async fn distinct_cities(&self, name: &str, surname: &str) -> Result<Vec<String>> {
        RumorRecord::distinct_cities(name, surname, &self.pool).await
    }

    async fn distinct_ages(&self, name: &str, surname: &str, city: &str) -> Result<Vec<i64>> {
        RumorRecord::distinct_ages(name, surname, city, &self.pool).await
    }

    async fn texts(&self, name: &str, surname: &str, city: &str, age: i64) -> Result<Vec<String>> {
        RumorRecord::texts(name, surname, city, age, &self.pool).await
    }
}

/// Postgres-backed action event store, delegating to the model layer.
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseEventStore for PgEventStore {
    async fn insert(&self, new: NewActionEvent) -> Result<ActionEvent> {
        ActionEvent::insert(&new, &self.pool).await
    }

    async fn find_latest_by_username(&self, username: &str) -> Result<Option<ActionEvent>> {
        ActionEvent::find_latest_by_username(username, &self.pool).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to effects (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub rumors: Arc<dyn BaseRumorStore>,
    pub events: Arc<dyn BaseEventStore>,
    pub messenger: Arc<dyn BaseMessenger>,
    /// Per-user conversation state; the per-user lock inside is the
    /// serialization point for concurrent webhook deliveries.
    pub sessions: Arc<SessionStore>,
    /// Bot handle stamped onto recorded action events.
    pub bot_identity: String,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        rumors: Arc<dyn BaseRumorStore>,
        events: Arc<dyn BaseEventStore>,
        messenger: Arc<dyn BaseMessenger>,
        sessions: Arc<SessionStore>,
        bot_identity: String,
    ) -> Self {
        Self {
            rumors,
            events,
            messenger,
            sessions,
            bot_identity,
        }
    }
}

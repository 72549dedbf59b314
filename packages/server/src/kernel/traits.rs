// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (funnel narrowing, the submission pipeline) lives in
// domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMessenger)

use anyhow::Result;
use async_trait::async_trait;

use telegram::models::{InlineKeyboardMarkup, ReplyMarkup};

use crate::domains::rumor::models::{NewRumor, RumorRecord};
use crate::domains::stats::models::{ActionEvent, NewActionEvent};

// =============================================================================
// Messenger Trait (Infrastructure - outbound chat messages)
// =============================================================================

#[async_trait]
pub trait BaseMessenger: Send + Sync {
    /// Send a message to a chat, optionally with a keyboard.
    /// Returns the id of the sent message.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<i64>;

    /// Replace the text and inline keyboard of a previously sent message.
    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;
}

// =============================================================================
// Rumor Store Trait (Infrastructure - rumor persistence and funnel reads)
// =============================================================================

#[async_trait]
pub trait BaseRumorStore: Send + Sync {
    /// Persist a new rumor. No uniqueness constraint: duplicates are valid.
    async fn insert(&self, new: NewRumor) -> Result<RumorRecord>;

    /// Deduplicated cities with at least one match, sorted ascending.
    async fn distinct_cities(&self, name: &str, surname: &str) -> Result<Vec<String>>;

    /// Deduplicated ages with at least one match, sorted ascending.
    async fn distinct_ages(&self, name: &str, surname: &str, city: &str) -> Result<Vec<i64>>;

    /// Matching rumor texts in submission order, duplicates preserved.
    async fn texts(&self, name: &str, surname: &str, city: &str, age: i64) -> Result<Vec<String>>;
}

// =============================================================================
// Event Store Trait (Infrastructure - action event log)
// =============================================================================

#[async_trait]
pub trait BaseEventStore: Send + Sync {
    /// Append one action event.
    async fn insert(&self, new: NewActionEvent) -> Result<ActionEvent>;

    /// Most recent event recorded for a username, if any.
    async fn find_latest_by_username(&self, username: &str) -> Result<Option<ActionEvent>>;
}

// TestDependencies - mock implementations for testing
//
// Provides in-memory collaborators that can be injected into ServerDeps
// for tests. The mock stores reproduce the contractual semantics of their
// Postgres counterparts (ascending deduplicated sets, submission-order
// texts, most-recent-wins event lookup).

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use telegram::models::{InlineKeyboardMarkup, ReplyMarkup};

use super::{BaseEventStore, BaseMessenger, BaseRumorStore, ServerDeps};
use crate::domains::conversation::models::SessionStore;
use crate::domains::rumor::models::{NewRumor, RumorRecord};
use crate::domains::stats::models::{ActionEvent, NewActionEvent};

// =============================================================================
// Mock Messenger
// =============================================================================

/// One captured send_message call
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub reply_markup: Option<ReplyMarkup>,
}

/// One captured edit_message_text call
#[derive(Debug, Clone)]
pub struct EditedMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    edited: Arc<Mutex<Vec<EditedMessage>>>,
    next_message_id: AtomicI64,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            edited: Arc::new(Mutex::new(Vec::new())),
            next_message_id: AtomicI64::new(1000),
        }
    }

    /// All captured sends, in order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// All captured edits, in order
    pub fn edited(&self) -> Vec<EditedMessage> {
        self.edited.lock().unwrap().clone()
    }

    /// Sends addressed to a specific chat
    pub fn sent_to(&self, chat_id: i64) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .collect()
    }

    /// Text of the most recent send, if any
    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.text.clone())
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMessenger for MockMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<i64> {
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            message_id,
            text: text.to_string(),
            reply_markup,
        });
        Ok(message_id)
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.edited.lock().unwrap().push(EditedMessage {
            chat_id,
            message_id,
            text: text.to_string(),
            reply_markup,
        });
        Ok(())
    }
}

// =============================================================================
// Mock Rumor Store
// =============================================================================

pub struct MockRumorStore {
    rows: Arc<Mutex<Vec<RumorRecord>>>,
    next_id: AtomicI64,
}

impl MockRumorStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seed one rumor; fields are normalized the way the pipeline would.
    pub fn with_rumor(self, new: NewRumor) -> Self {
        let normalized = new.normalized();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(RumorRecord {
            id,
            name: normalized.name,
            surname: normalized.surname,
            city: normalized.city,
            age: normalized.age,
            subject_username: normalized.subject_username,
            text: normalized.text,
            created_at: Utc::now(),
        });
        self
    }

    /// All persisted rumors, in insertion order
    pub fn rows(&self) -> Vec<RumorRecord> {
        self.rows.lock().unwrap().clone()
    }
}

impl Default for MockRumorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRumorStore for MockRumorStore {
    async fn insert(&self, new: NewRumor) -> Result<RumorRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = RumorRecord {
            id,
            name: new.name,
            surname: new.surname,
            city: new.city,
            age: new.age,
            subject_username: new.subject_username,
            text: new.text,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn distinct_cities(&self, name: &str, surname: &str) -> Result<Vec<String>> {
        let mut cities: Vec<String> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name && r.surname == surname)
            .map(|r| r.city.clone())
            .collect();
        cities.sort();
        cities.dedup();
        Ok(cities)
    }

    async fn distinct_ages(&self, name: &str, surname: &str, city: &str) -> Result<Vec<i64>> {
        let mut ages: Vec<i64> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name && r.surname == surname && r.city == city)
            .map(|r| r.age)
            .collect();
        ages.sort_unstable();
        ages.dedup();
        Ok(ages)
    }

    async fn texts(&self, name: &str, surname: &str, city: &str, age: i64) -> Result<Vec<String>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name && r.surname == surname && r.city == city && r.age == age)
            .map(|r| r.text.clone())
            .collect())
    }
}

// =============================================================================
// Mock Event Store
// =============================================================================

pub struct MockEventStore {
    rows: Arc<Mutex<Vec<ActionEvent>>>,
    next_id: AtomicI64,
}

impl MockEventStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seed one event (e.g. a prior interaction used as notification target).
    pub fn with_event(self, new: NewActionEvent) -> Self {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(ActionEvent {
            id,
            user_id: new.user_id,
            username: new.username,
            kind: new.kind.as_str().to_string(),
            bot_identity: new.bot_identity,
            created_at: Utc::now(),
        });
        self
    }

    /// All recorded events, in insertion order
    pub fn rows(&self) -> Vec<ActionEvent> {
        self.rows.lock().unwrap().clone()
    }
}

impl Default for MockEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEventStore for MockEventStore {
    async fn insert(&self, new: NewActionEvent) -> Result<ActionEvent> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = ActionEvent {
            id,
            user_id: new.user_id,
            username: new.username,
            kind: new.kind.as_str().to_string(),
            bot_identity: new.bot_identity,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(event.clone());
        Ok(event)
    }

    async fn find_latest_by_username(&self, username: &str) -> Result<Option<ActionEvent>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|e| e.username.as_deref() == Some(username))
            .cloned())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mock collaborators plus a ready-made ServerDeps wired to them.
/// Tests keep the Arc'd mocks to assert on captured calls afterwards.
pub struct TestDependencies {
    pub messenger: Arc<MockMessenger>,
    pub rumors: Arc<MockRumorStore>,
    pub events: Arc<MockEventStore>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            messenger: Arc::new(MockMessenger::new()),
            rumors: Arc::new(MockRumorStore::new()),
            events: Arc::new(MockEventStore::new()),
        }
    }

    pub fn with_rumors(rumors: MockRumorStore) -> Self {
        Self {
            rumors: Arc::new(rumors),
            ..Self::new()
        }
    }

    pub fn with_events(events: MockEventStore) -> Self {
        Self {
            events: Arc::new(events),
            ..Self::new()
        }
    }

    /// Build a ServerDeps wired to the mocks.
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.rumors.clone(),
            self.events.clone(),
            self.messenger.clone(),
            Arc::new(SessionStore::new()),
            "rumormill_bot".to_string(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

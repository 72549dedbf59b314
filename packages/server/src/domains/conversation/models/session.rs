//! Per-user conversation state.
//!
//! A session is ephemeral: it lives in process memory for the duration of
//! a conversation and is never persisted. All mutation happens while the
//! owning user's cell lock is held, one inbound event at a time.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Step within the find wizard. City and age selection are driven by
/// inline-keyboard payloads, not text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindStep {
    AwaitName,
    AwaitSurname,
    AwaitCity,
    AwaitAge,
}

/// Step within the submit wizard; every step consumes one text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStep {
    AwaitName,
    AwaitSurname,
    AwaitUsername,
    AwaitAge,
    AwaitCity,
    AwaitText,
}

/// The at-most-one active wizard per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Idle,
    Find(FindStep),
    Submit(SubmitStep),
}

/// Partial search criteria accumulated by the find wizard.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
}

/// Partial rumor record accumulated by the submit wizard.
#[derive(Debug, Clone, Default)]
pub struct RumorDraft {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub subject_username: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    pub user_id: i64,
    pub flow: Flow,
    pub criteria: Criteria,
    pub draft: RumorDraft,
    /// Rendered result pages from the last completed find flow.
    pub pages: Vec<String>,
    pub page_index: usize,
    /// Id of the message the pages are rendered into; navigation edits it
    /// in place instead of sending new messages.
    pub pages_message_id: Option<i64>,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            flow: Flow::Idle,
            criteria: Criteria::default(),
            draft: RumorDraft::default(),
            pages: Vec::new(),
            page_index: 0,
            pages_message_id: None,
        }
    }

    /// Exit contract: clears the active flow and everything collected so
    /// far, unconditionally. Page state survives so the user can keep
    /// browsing the last result set; it is cleared on next flow entry.
    pub fn reset_flow(&mut self) {
        self.flow = Flow::Idle;
        self.criteria = Criteria::default();
        self.draft = RumorDraft::default();
    }

    pub fn enter_find(&mut self) {
        self.reset_flow();
        self.clear_pages();
        self.flow = Flow::Find(FindStep::AwaitName);
    }

    pub fn enter_submit(&mut self) {
        self.reset_flow();
        self.clear_pages();
        self.flow = Flow::Submit(SubmitStep::AwaitName);
    }

    fn clear_pages(&mut self) {
        self.pages.clear();
        self.page_index = 0;
        self.pages_message_id = None;
    }
}

/// All live sessions, keyed by user id.
///
/// Each session sits behind its own async mutex; holding that lock for the
/// full span of one inbound event is what serializes concurrent deliveries
/// for the same user (duplicate webhooks, double taps) without coupling
/// unrelated users.
pub struct SessionStore {
    sessions: DashMap<i64, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Fetch or create the session cell for a user.
    pub fn session(&self, user_id: i64) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(user_id))))
            .clone()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_flow_keeps_pages() {
        let mut session = Session::new(1);
        session.enter_find();
        session.pages = vec!["page".to_string()];
        session.pages_message_id = Some(55);

        session.reset_flow();

        assert_eq!(session.flow, Flow::Idle);
        assert!(session.criteria.name.is_none());
        assert_eq!(session.pages, vec!["page".to_string()]);
        assert_eq!(session.pages_message_id, Some(55));
    }

    #[test]
    fn entering_a_flow_clears_pages() {
        let mut session = Session::new(1);
        session.pages = vec!["old".to_string()];
        session.pages_message_id = Some(3);
        session.page_index = 1;

        session.enter_submit();

        assert_eq!(session.flow, Flow::Submit(SubmitStep::AwaitName));
        assert!(session.pages.is_empty());
        assert_eq!(session.page_index, 0);
        assert!(session.pages_message_id.is_none());
    }

    #[test]
    fn store_returns_same_cell_per_user() {
        let store = SessionStore::new();
        let a = store.session(7);
        let b = store.session(7);
        assert!(Arc::ptr_eq(&a, &b));

        let other = store.session(8);
        assert!(!Arc::ptr_eq(&a, &other));
    }
}

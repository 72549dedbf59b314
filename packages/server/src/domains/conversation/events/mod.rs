//! Inbound events consumed by the conversation machine.
//!
//! One webhook update maps to at most one [`Inbound`]. Updates that carry
//! neither usable text nor a parsable callback payload map to `None` and
//! are dropped before they reach the machine.

use telegram::models::Update;

use crate::domains::conversation::commands::CallbackCommand;

/// Who triggered the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub username: Option<String>,
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A free-text message.
    Text(String),
    /// A validated inline-button press.
    Callback(CallbackCommand),
}

/// One routable inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub actor: Actor,
    /// Chat replies go to; for this bot's private chats it equals the
    /// actor's user id, but the transport keeps them distinct.
    pub chat_id: i64,
    pub event: InboundEvent,
}

/// Map a transport update to an engine event, dropping everything that is
/// not actionable: non-text messages, senderless messages, callback
/// presses with missing or malformed payloads.
pub fn from_update(update: Update) -> Option<Inbound> {
    if let Some(message) = update.message {
        let from = message.from?;
        let text = message.text?;
        return Some(Inbound {
            actor: Actor {
                user_id: from.id,
                username: from.username,
            },
            chat_id: message.chat.id,
            event: InboundEvent::Text(text),
        });
    }

    if let Some(query) = update.callback_query {
        let command = CallbackCommand::parse(query.data.as_deref()?)?;
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(query.from.id);
        return Some(Inbound {
            actor: Actor {
                user_id: query.from.id,
                username: query.from.username,
            },
            chat_id,
            event: InboundEvent::Callback(command),
        });
    }

    None
}

//! Wire types for the Telegram Bot API.
//!
//! Inbound types (`Update`, `Message`, `CallbackQuery`) deserialize the
//! webhook payload; outbound types build `reply_markup` values for
//! `sendMessage` / `editMessageText`. Only the fields this bot consumes are
//! modeled; everything else is ignored during deserialization.

use serde::{Deserialize, Serialize};

// =============================================================================
// Inbound: webhook update payload
// =============================================================================

/// One incoming update delivered to the webhook.
///
/// Exactly one of the optional payload fields is set per update; an update
/// carrying neither a message nor a callback query is not actionable here.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message (only text messages are consumed).
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

/// The sender of a message or callback query.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A button press on an inline keyboard.
///
/// `data` carries the opaque payload string the button was created with.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

// =============================================================================
// Outbound: reply markup
// =============================================================================

/// Any keyboard attachable to an outgoing message.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline(InlineKeyboardMarkup),
    Keyboard(ReplyKeyboardMarkup),
    Remove(ReplyKeyboardRemove),
}

/// Inline keyboard whose buttons carry `callback_data` payloads.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Static reply keyboard shown under the input field (convenience buttons
/// like "/exit" that send their label as a regular text message).
#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub one_time_keyboard: bool,
    pub resize_keyboard: bool,
}

impl ReplyKeyboardMarkup {
    /// Single-row one-time keyboard from button labels.
    pub fn one_time(labels: &[&str]) -> Self {
        Self {
            keyboard: vec![labels
                .iter()
                .map(|label| KeyboardButton {
                    text: (*label).to_string(),
                })
                .collect()],
            one_time_keyboard: true,
            resize_keyboard: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardRemove {
    pub remove_keyboard: bool,
}

impl ReplyKeyboardRemove {
    pub fn new() -> Self {
        Self {
            remove_keyboard: true,
        }
    }
}

impl Default for ReplyKeyboardRemove {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Outbound: request/response envelopes
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a ReplyMarkup>,
}

#[derive(Debug, Serialize)]
pub struct EditMessageTextRequest<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

/// Standard Bot API response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

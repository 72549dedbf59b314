// Thin client for the Telegram Bot API: https://core.telegram.org/bots/api

use std::time::Duration;

use reqwest::Client;

pub mod models;

use crate::models::{
    ApiResponse, EditMessageTextRequest, InlineKeyboardMarkup, Message, ReplyMarkup,
    SendMessageRequest,
};

const API_BASE: &str = "https://api.telegram.org";

/// Every Bot API call is bounded by this timeout so a slow Telegram edge
/// can never stall webhook processing indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("request to Telegram failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram returned an error: {0}")]
    Api(String),
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Result<Self, TelegramError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { options, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{base}/bot{token}/{method}",
            base = API_BASE,
            token = self.options.bot_token,
        )
    }

    /// Send a text message, optionally with a keyboard. Returns the sent
    /// message so callers can keep its id for later in-place edits.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;

        let body = response.json::<ApiResponse<Message>>().await?;
        match body {
            ApiResponse {
                ok: true,
                result: Some(message),
                ..
            } => Ok(message),
            ApiResponse { description, .. } => Err(TelegramError::Api(
                description.unwrap_or_else(|| "sendMessage failed".to_string()),
            )),
        }
    }

    /// Replace the text and inline keyboard of a previously sent message.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let request = EditMessageTextRequest {
            chat_id,
            message_id,
            text,
            reply_markup,
        };

        let response = self
            .client
            .post(self.method_url("editMessageText"))
            .json(&request)
            .send()
            .await?;

        let body = response.json::<ApiResponse<serde_json::Value>>().await?;
        if body.ok {
            Ok(())
        } else {
            Err(TelegramError::Api(
                body.description
                    .unwrap_or_else(|| "editMessageText failed".to_string()),
            ))
        }
    }
}

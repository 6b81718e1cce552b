//! Telegram webhook types
//!
//! Inbound shapes are untrusted external input: every field that Telegram can
//! omit is an `Option`. Outbound shapes follow the webhook-answer convention,
//! where the response body carries a Bot API method call
//! (`{"method": "sendMessage", ...}`) instead of the service calling out.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Telegram Update object (simplified)
#[derive(Debug, Deserialize, Serialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
    pub callback_query: Option<TelegramCallbackQuery>,
}

/// Telegram Message object (simplified)
#[derive(Debug, Deserialize, Serialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub from: Option<TelegramUser>,
    pub text: Option<String>,
}

/// Callback query from an inline keyboard button press
#[derive(Debug, Deserialize, Serialize)]
pub struct TelegramCallbackQuery {
    pub id: String,
    pub from: Option<TelegramUser>,
    /// Originating message; the reply chat id is derived from it
    pub message: Option<TelegramMessage>,
    /// Opaque token chosen when the button was built, echoed back verbatim
    pub data: Option<String>,
}

/// Telegram Chat object
#[derive(Debug, Deserialize, Serialize)]
pub struct TelegramChat {
    pub id: ChatId,
}

/// Telegram User object
#[derive(Debug, Deserialize, Serialize)]
pub struct TelegramUser {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Chat identifier, numeric or string
///
/// Telegram sends integers for regular chats and strings for channel
/// usernames; the identifier is opaque to us either way and round-trips
/// verbatim into the reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

/// Inline keyboard markup for message buttons
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// A button in an inline keyboard row
///
/// Exactly one of `url`, `web_app`, or `callback_data` is set per button.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    /// Button opening a URL in an external browser
    #[must_use]
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            web_app: None,
            callback_data: None,
        }
    }

    /// Button opening a URL inside Telegram's own UI shell
    #[must_use]
    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            web_app: Some(WebAppInfo { url: url.into() }),
            callback_data: None,
        }
    }

    /// Button echoing an opaque callback token when pressed
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            web_app: None,
            callback_data: Some(data.into()),
        }
    }
}

/// Embedded-view link target for a `web_app` button
#[derive(Debug, Clone, Serialize)]
pub struct WebAppInfo {
    pub url: String,
}

/// A `sendMessage` action answered inline in the webhook response body
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageReply {
    pub method: &'static str,
    pub chat_id: ChatId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_web_page_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendMessageReply {
    /// Create a plain-text reply
    #[must_use]
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            method: "sendMessage",
            chat_id,
            text: text.into(),
            parse_mode: None,
            disable_web_page_preview: None,
            reply_markup: None,
        }
    }

    /// Enable Markdown rendering
    #[must_use]
    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some("Markdown".to_string());
        self
    }

    /// Suppress the link preview for URLs in the text
    #[must_use]
    pub const fn without_link_preview(mut self) -> Self {
        self.disable_web_page_preview = Some(true);
        self
    }

    /// Attach an inline keyboard
    #[must_use]
    pub fn with_keyboard(mut self, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        self.reply_markup = Some(InlineKeyboardMarkup {
            inline_keyboard: rows,
        });
        self
    }
}

/// Terminal outcome of one webhook request
///
/// Every dispatch path ends in exactly one of these; only the auth rejection
/// produces a non-200 status.
#[derive(Debug)]
pub enum WebhookReply {
    /// 200 with a plain acknowledgment body
    Ack,
    /// 403, secret mismatch
    Unauthorized,
    /// 200 with a JSON `sendMessage` body
    Send(SendMessageReply),
}

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        match self {
            Self::Ack => (StatusCode::OK, "OK").into_response(),
            Self::Unauthorized => (StatusCode::FORBIDDEN, "Unauthorized").into_response(),
            Self::Send(reply) => (StatusCode::OK, Json(reply)).into_response(),
        }
    }
}

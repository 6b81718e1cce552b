//! Telegram webhook handler
//!
//! The whole dispatch runs synchronously inside the request: secret check,
//! update routing, command resolution, and the awaited visitor write. The
//! reply travels back in the response body as a webhook answer, so no
//! outbound Bot API call is ever made.

pub mod types;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use self::types::{TelegramCallbackQuery, TelegramMessage, TelegramUser, WebhookReply};
use crate::api::ApiState;
use crate::commands;
use crate::db::VisitorProfile;

const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Handle an incoming Telegram update
///
/// Every path through here terminates in exactly one response: 403 on a
/// secret mismatch, 200 with a JSON `sendMessage` body on a recognized
/// command, 200 "OK" otherwise. A malformed or empty body is a valid no-op,
/// never a 4xx.
pub async fn handle_update(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookReply {
    // Secret check is disabled when no secret is configured (fail-open,
    // flagged at startup).
    if let Some(expected) = state.webhook_secret.as_deref() {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());

        if provided != Some(expected) {
            tracing::warn!(header = ?provided, "unauthorized webhook attempt");
            return WebhookReply::Unauthorized;
        }
    }

    let Ok(update) = serde_json::from_slice::<types::TelegramUpdate>(&body) else {
        return WebhookReply::Ack;
    };

    tracing::debug!(update_id = update.update_id, "received Telegram update");

    // Message branch first; if it yields a reply the callback branch is
    // skipped (first-match-wins, not a merge).
    if let Some(message) = &update.message {
        if let Some(reply) = handle_message(&state, message).await {
            return reply;
        }
    }

    if let Some(callback) = &update.callback_query {
        if let Some(reply) = handle_callback(callback) {
            return reply;
        }
    }

    WebhookReply::Ack
}

/// Resolve a message to a reply, tracking the visitor on `/start`
async fn handle_message(state: &ApiState, message: &TelegramMessage) -> Option<WebhookReply> {
    let text = message.text.as_deref()?;
    let reply = commands::resolve_message(text, message.chat.id.clone())?;

    if text == commands::START_COMMAND {
        // Awaited so the response never races the write, but the outcome is
        // deliberately discarded: a failed write must not block the reply.
        record_visitor(state, message.from.as_ref()).await;
    }

    tracing::info!(chat = %message.chat.id, command = text, "replying to command");
    Some(WebhookReply::Send(reply))
}

/// Resolve a callback query to a reply
///
/// The reply chat id comes from the originating message; without one there is
/// nowhere to send a reply and the query falls through to the acknowledgment.
fn handle_callback(callback: &TelegramCallbackQuery) -> Option<WebhookReply> {
    let data = callback.data.as_deref()?;
    let message = callback.message.as_ref()?;
    let reply = commands::resolve_callback(data, message.chat.id.clone())?;

    tracing::info!(chat = %message.chat.id, token = data, "replying to callback");
    Some(WebhookReply::Send(reply))
}

/// Best-effort visitor upsert; store errors are logged and swallowed
async fn record_visitor(state: &ApiState, user: Option<&TelegramUser>) {
    let Some(user) = user else {
        return;
    };

    let profile = VisitorProfile {
        id: user.id,
        first_name: user.first_name.clone().unwrap_or_default(),
        last_name: user.last_name.clone().unwrap_or_default(),
        username: user.username.clone().unwrap_or_default(),
    };

    match state.visitors.record_visit(&profile).await {
        Ok(()) => {
            tracing::info!(user_id = user.id, username = %profile.username, "visitor tracked");
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = user.id, "failed to track visitor");
        }
    }
}

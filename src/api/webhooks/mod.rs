//! Webhook endpoints

use std::sync::Arc;

use axum::{Router, routing::post};

use super::ApiState;

pub mod telegram;

/// Build webhooks router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/telegram", post(telegram::handle_update))
        .with_state(state)
}

//! HTTP API server for resumebot

pub mod health;
pub mod webhooks;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::db::{DbPool, VisitorRepo, VisitorStore};
use crate::{Config, Result};

/// Shared state for API handlers
///
/// Read-only after startup; requests share nothing else.
pub struct ApiState {
    pub db: DbPool,
    /// Expected webhook secret; `None` disables the check
    pub webhook_secret: Option<String>,
    /// Visitor store seam, swappable with a fake in tests
    pub visitors: Arc<dyn VisitorStore>,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create the server with a `SQLite`-backed visitor store
    #[must_use]
    pub fn new(config: &Config, db: DbPool) -> Self {
        let visitors = Arc::new(VisitorRepo::new(db.clone()));

        let state = Arc::new(ApiState {
            db,
            webhook_secret: config.webhook_secret.clone(),
            visitors,
        });

        Self {
            state,
            port: config.port,
        }
    }

    /// Build the router with all routes
    fn router(&self) -> Router {
        Router::new()
            .nest("/api/webhooks", webhooks::router(self.state.clone()))
            .merge(health::router())
            .merge(health::ready_router(self.state.clone()))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

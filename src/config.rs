//! Configuration management for resumebot

use std::path::PathBuf;

/// Runtime configuration, read once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Path to the `SQLite` database file
    pub db_path: PathBuf,

    /// Webhook secret token (from `TELEGRAM_WEBHOOK_SECRET` env).
    ///
    /// Telegram echoes this back in the
    /// `x-telegram-bot-api-secret-token` header of every webhook POST.
    /// When unset, the secret check is disabled entirely.
    pub webhook_secret: Option<String>,
}

impl Config {
    /// Build the configuration from CLI-resolved values
    ///
    /// Empty secrets are treated as unset. A missing secret disables the
    /// check (fail-open); that is flagged loudly at startup so operators
    /// see the gap rather than discover it later.
    #[must_use]
    pub fn new(port: u16, db_path: PathBuf, webhook_secret: Option<String>) -> Self {
        let webhook_secret = webhook_secret.filter(|s| !s.is_empty());

        if webhook_secret.is_none() {
            tracing::warn!(
                "no webhook secret configured - accepting unauthenticated webhook requests"
            );
        }

        Self {
            port,
            db_path,
            webhook_secret,
        }
    }
}

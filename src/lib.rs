//! Resumebot - stateless Telegram webhook responder
//!
//! Receives Telegram webhook updates over HTTP, matches a small fixed command
//! set, records visitors in SQLite, and answers inline through the webhook
//! response body (`{"method": "sendMessage", ...}`) so the service never makes
//! an outbound call to the Bot API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Telegram servers                │
//! └───────────────────┬─────────────────────────┘
//!                     │ POST /api/webhooks/telegram
//! ┌───────────────────▼─────────────────────────┐
//! │              Update dispatcher               │
//! │  secret check │ routing │ command resolver   │
//! └───────┬─────────────────────────┬───────────┘
//!         │                         │
//! ┌───────▼────────┐     ┌──────────▼──────────┐
//! │  VisitorStore   │     │   webhook reply      │
//! │  (SQLite)       │     │   in response body   │
//! └────────────────┘     └─────────────────────┘
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::{DbConn, DbPool, Visitor, VisitorProfile, VisitorRepo, VisitorStore};
pub use error::{Error, Result};

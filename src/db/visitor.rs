//! Visitor repository and store seam

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::DbPool;
use crate::{Error, Result};

/// Sender identity captured from a `/start` message
///
/// Missing name fields default to the empty string before the write, so the
/// stored row never contains NULLs.
#[derive(Debug, Clone)]
pub struct VisitorProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// A persisted visitor row
#[derive(Debug, Clone)]
pub struct Visitor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub last_seen: DateTime<Utc>,
    pub visit_count: i64,
}

/// Store seam for visitor tracking
///
/// The dispatcher only sees this trait; tests substitute an in-memory or
/// failing fake without touching the handler code.
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Upsert a visitor keyed by stringified sender id
    ///
    /// Merge semantics: name fields and `last_seen` are overwritten,
    /// `visit_count` is incremented by exactly 1, atomically relative to
    /// concurrent writes for the same id.
    ///
    /// # Errors
    ///
    /// Returns error if the store write fails
    async fn record_visit(&self, profile: &VisitorProfile) -> Result<()>;
}

/// `SQLite`-backed visitor repository
#[derive(Clone)]
pub struct VisitorRepo {
    pool: DbPool,
}

impl VisitorRepo {
    /// Create a new visitor repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find a visitor by ID (returns None if not found)
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn find(&self, id: &str) -> Result<Option<Visitor>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let visitor = conn
            .query_row(
                "SELECT id, first_name, last_name, username, last_seen, visit_count
                 FROM visitors WHERE id = ?1",
                [id],
                |row| {
                    Ok(Visitor {
                        id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        username: row.get(3)?,
                        last_seen: parse_datetime(&row.get::<_, String>(4)?),
                        visit_count: row.get(5)?,
                    })
                },
            )
            .ok();

        Ok(visitor)
    }
}

#[async_trait]
impl VisitorStore for VisitorRepo {
    async fn record_visit(&self, profile: &VisitorProfile) -> Result<()> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = profile.id.to_string();
        let now = Utc::now().to_rfc3339();

        // Single-statement upsert: creation and update share one code path,
        // and the increment is atomic under concurrent writes for one id.
        conn.execute(
            "INSERT INTO visitors (id, first_name, last_name, username, last_seen, visit_count)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)
             ON CONFLICT(id) DO UPDATE SET
                 first_name = excluded.first_name,
                 last_name = excluded.last_name,
                 username = excluded.username,
                 last_seen = excluded.last_seen,
                 visit_count = visit_count + 1",
            rusqlite::params![
                id,
                profile.first_name,
                profile.last_name,
                profile.username,
                now
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

//! # moqi-db
//!
//! Interaction store backends for MoQi.
//!
//! - `MoqiService`: libSQL-backed store holding startups, swipers, and one
//!   interaction row per (swiper, startup) pair, enforced by a `UNIQUE` index.
//! - `memory::InMemoryStore`: the same contract held in a `RwLock`, for tests
//!   and dry runs.
//!
//! Both implement `moqi_core::store::MatchStore`.

pub mod error;
pub mod helpers;
pub mod memory;
mod migrations;
pub mod repos;
pub mod service;
mod store;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct MoqiDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl MoqiDb {
    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let moqi_db = Self { db, conn };
        moqi_db.run_migrations().await?;
        Ok(moqi_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"int-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moqi_core::ids::{PREFIX_INTERACTION, has_prefix};

    async fn test_db() -> MoqiDb {
        MoqiDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["startups", "swipers", "interactions"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_has_prefix_and_length() {
        let db = test_db().await;
        let id = db.generate_id(PREFIX_INTERACTION).await.unwrap();
        assert!(has_prefix(&id, PREFIX_INTERACTION));
        assert_eq!(id.len(), 12);
    }

    #[tokio::test]
    async fn open_on_disk_persists_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moqi.db");
        let path = path.to_string_lossy();

        {
            let db = MoqiDb::open_local(&path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO swipers (id, name, created_at) VALUES ('swp-1', 'Robin', '2026-02-09 14:30:00')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = MoqiDb::open_local(&path).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT count(*) FROM swipers", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}

//! Service layer over the raw database handle.
//!
//! `MoqiService` wraps `MoqiDb`. Repo methods are implemented as
//! `impl MoqiService` blocks in `repos/`, and the `MatchStore` trait impl in
//! `store.rs` delegates to them.

use crate::MoqiDb;
use crate::error::DatabaseError;

/// libSQL-backed interaction store.
pub struct MoqiService {
    db: MoqiDb,
}

impl MoqiService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = MoqiDb::open_local(db_path).await?;
        tracing::debug!(path = db_path, "opened interaction store");
        Ok(Self { db })
    }

    /// Create from an existing `MoqiDb`.
    #[must_use]
    pub const fn from_db(db: MoqiDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &MoqiDb {
        &self.db
    }
}

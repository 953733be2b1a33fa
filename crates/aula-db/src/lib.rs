//! # aula-db
//!
//! libSQL data gateway for the Aula entity collections.
//!
//! Handles all persisted state: students, professors, subjects, and the
//! enrollment edges they hang off. Supports a plain local database (or
//! `:memory:` for tests) and a synced embedded replica of a remote database.
//!
//! The gateway is pure persistence: enrollment rules are evaluated by callers
//! (see `aula_core::rules`) before anything reaches this crate.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;
pub mod watch;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Aula state operations.
///
/// Wraps a libSQL database and connection. Provides ID generation; the typed
/// collection operations live on [`service::AulaService`].
pub struct AulaDb {
    db: libsql::Database,
    conn: libsql::Connection,
    synced: bool,
}

impl AulaDb {
    /// Open a local-only database at the given path (no remote sync).
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
        Self::init(db, conn, false).await
    }

    /// Open a synced embedded replica of a remote database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be opened or migrations
    /// fail.
    pub async fn open_synced(
        local_replica_path: &str,
        remote_url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote_replica(
            local_replica_path.to_string(),
            remote_url.to_string(),
            auth_token.to_string(),
        )
        .build()
        .await?;
        let conn = db.connect()?;
        Self::init(db, conn, true).await
    }

    async fn init(
        db: libsql::Database,
        conn: libsql::Connection,
        synced: bool,
    ) -> Result<Self, DatabaseError> {
        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let aula_db = Self { db, conn, synced };
        aula_db.run_migrations().await?;
        Ok(aula_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Whether this handle is backed by a synced remote replica.
    #[must_use]
    pub const fn is_synced_replica(&self) -> bool {
        self.synced
    }

    /// Push local writes to / pull remote writes from the remote database.
    ///
    /// No-op for local-only databases.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        if self.synced {
            self.db.sync().await?;
        }
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"stu-a3f8b2c1"`.
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

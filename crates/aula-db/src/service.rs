//! Service layer orchestrating database mutations and snapshot publication.
//!
//! `AulaService` wraps `AulaDb` (raw database access) and `WatchHub` (realtime
//! snapshot feeds). All repo methods are implemented as `impl AulaService`.

use crate::AulaDb;
use crate::error::DatabaseError;
use crate::watch::WatchHub;

/// Orchestrates collection mutations and realtime feeds.
///
/// Every mutation method follows this protocol:
/// 1. Execute SQL (a transaction when more than one statement is involved)
/// 2. Re-read the affected collection(s) with derived fields hydrated
/// 3. Publish the fresh snapshot(s) on the watch hub
///
/// Publication happens only after commit, so subscribers never observe a
/// state the database does not hold.
pub struct AulaService {
    db: AulaDb,
    watch: WatchHub,
}

impl AulaService {
    /// Create a new service wrapping a local database.
    ///
    /// Pass `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrations
    /// fail.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = AulaDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service backed by a synced embedded replica.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be opened.
    pub async fn new_synced(
        local_replica_path: &str,
        remote_url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = AulaDb::open_synced(local_replica_path, remote_url, auth_token).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `AulaDb`.
    #[must_use]
    pub fn from_db(db: AulaDb) -> Self {
        Self {
            db,
            watch: WatchHub::new(),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &AulaDb {
        &self.db
    }

    /// Access the watch hub for subscribing to realtime snapshots.
    #[must_use]
    pub const fn watch(&self) -> &WatchHub {
        &self.watch
    }

    /// Sync the underlying database with remote state.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        self.db.sync().await
    }

    /// Returns whether this service is backed by a synced replica.
    #[must_use]
    pub const fn is_synced_replica(&self) -> bool {
        self.db.is_synced_replica()
    }

    /// Re-read the students collection and publish it, plus the per-student
    /// document feed entries for the given ids.
    pub(crate) async fn republish_students(&self, touched: &[&str]) -> Result<(), DatabaseError> {
        let students = self.list_students().await?;
        for id in touched {
            let doc = students.iter().find(|s| s.id == **id).cloned();
            self.watch.publish_student_doc(id, doc);
        }
        self.watch.publish_students(students);
        Ok(())
    }

    /// Re-read the subjects collection and publish it.
    pub(crate) async fn republish_subjects(&self) -> Result<(), DatabaseError> {
        let subjects = self.list_subjects().await?;
        self.watch.publish_subjects(subjects);
        Ok(())
    }

    /// Re-read the professors collection and publish it.
    pub(crate) async fn republish_professors(&self) -> Result<(), DatabaseError> {
        let professors = self.list_professors().await?;
        self.watch.publish_professors(professors);
        Ok(())
    }
}

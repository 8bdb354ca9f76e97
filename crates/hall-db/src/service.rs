//! Service layer orchestrating database mutations.
//!
//! `HallService` wraps `HallDb` (raw database access) together with the
//! settings the domain rules need. All repo methods are implemented as
//! `impl HallService` blocks in [`crate::repos`], and the batch functions
//! in [`crate::jobs`].

use tokio::sync::{Mutex, MutexGuard};

use crate::HallDb;
use crate::error::DatabaseError;

/// Daily water goal used when none is configured.
pub const DEFAULT_WATER_GOAL_ML: i64 = 2000;

/// Orchestrates reads and writes against the Studyhall database.
///
/// Multi-statement mutations (goal progress, session completion) run inside
/// a libSQL transaction. Side effects that must not undo the primary write
/// (notifications, achievements) are applied after commit.
pub struct HallService {
    db: HallDb,
    water_goal_ml: i64,
    /// Serializes every write on the shared connection.
    write_lock: Mutex<()>,
}

impl HallService {
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
        let db = HallDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service backed by a synced Turso embedded replica.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be opened.
    pub async fn new_synced(
        local_replica_path: &str,
        remote_url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = HallDb::open_synced(local_replica_path, remote_url, auth_token).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `HallDb`.
    #[must_use]
    pub fn from_db(db: HallDb) -> Self {
        Self {
            db,
            water_goal_ml: DEFAULT_WATER_GOAL_ML,
            write_lock: Mutex::new(()),
        }
    }

    /// Override the daily water goal (from `water.daily_goal_ml`).
    #[must_use]
    pub const fn with_water_goal(mut self, goal_ml: i64) -> Self {
        self.water_goal_ml = goal_ml;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &HallDb {
        &self.db
    }

    #[must_use]
    pub const fn water_goal_ml(&self) -> i64 {
        self.water_goal_ml
    }

    /// Hold this while a transaction is open on the shared connection.
    pub(crate) async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Run one write statement outside any transaction.
    ///
    /// Takes the write lock, so the statement cannot land inside another
    /// task's open transaction and be undone by its rollback. Must not be
    /// called while holding [`Self::write_guard`].
    pub(crate) async fn execute(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<u64, DatabaseError> {
        let _guard = self.write_guard().await;
        Ok(self.db.conn().execute(sql, params).await?)
    }

    /// Sync the underlying database with remote cloud state.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        self.db.sync().await
    }

    /// Returns whether this service is backed by a synced Turso replica.
    #[must_use]
    pub const fn is_synced_replica(&self) -> bool {
        self.db.is_synced_replica()
    }
}

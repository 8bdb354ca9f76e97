//! # hall-db
//!
//! libSQL database operations for Studyhall state management.
//!
//! Handles all relational state: profiles, groups and their members,
//! subjects, goals, study sessions, the points ledger, water intake,
//! achievements, notifications, invitations, messages, files and activities.
//! Uses a local libSQL file by default, or a Turso embedded replica when a
//! remote URL is configured.

pub mod error;
pub mod helpers;
pub mod jobs;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

use crate::retry::{RetryConfig, with_retry};

/// Central database handle for all Studyhall state operations.
///
/// Wraps a libSQL database and connection. Provides ID and invite code
/// generation; the repository methods live on [`service::HallService`].
pub struct HallDb {
    db: libsql::Database,
    conn: libsql::Connection,
    synced: bool,
}

impl HallDb {
    /// Open a local-only database at the given path (no cloud sync).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Self::init(db, false).await
    }

    /// Open an embedded replica of a remote Turso database.
    ///
    /// Pulls remote state once before running migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be built, the initial
    /// sync fails, or migrations fail.
    pub async fn open_synced(
        local_replica_path: &str,
        remote_url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote_replica(
            local_replica_path,
            remote_url.to_string(),
            auth_token.to_string(),
        )
        .build()
        .await?;
        with_retry(&RetryConfig::default(), || db.sync()).await?;
        Self::init(db, true).await
    }

    async fn init(db: libsql::Database, synced: bool) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let hall_db = Self { db, conn, synced };
        hall_db.run_migrations().await?;
        Ok(hall_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Whether this handle is an embedded replica of a remote database.
    #[must_use]
    pub const fn is_synced_replica(&self) -> bool {
        self.synced
    }

    /// Push local writes and pull remote state. A no-op for local databases.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync still fails after retries.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        if !self.synced {
            return Ok(());
        }
        with_retry(&RetryConfig::default(), || self.db.sync()).await?;
        tracing::debug!("replica synced");
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"gol-a3f8b2c1"`.
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

    /// Generate an upper-case invite code of `INVITE_CODE_LEN` hex characters.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_invite_code(&self) -> Result<String, DatabaseError> {
        let bytes = hall_core::ids::INVITE_CODE_LEN / 2;
        let mut rows = self
            .conn
            .query(&format!("SELECT upper(hex(randomblob({bytes})))"), ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> HallDb {
        HallDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "profiles",
            "study_groups",
            "group_members",
            "subjects",
            "goals",
            "study_sessions",
            "points",
            "water_intake",
            "achievements",
            "notifications",
            "invitations",
            "messages",
            "group_files",
            "activities",
            "leaderboard_snapshots",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("gol").await.unwrap();
        assert!(id.starts_with("gol-"), "ID should start with 'gol-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in hall_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn invite_code_is_upper_hex() {
        let db = test_db().await;
        let code = db.generate_invite_code().await.unwrap();
        assert_eq!(code.len(), hall_core::ids::INVITE_CODE_LEN);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn local_sync_is_noop() {
        let db = test_db().await;
        assert!(!db.is_synced_replica());
        db.sync().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO group_members (group_id, user_id) VALUES ('grp-none', 'usr-none')",
                (),
            )
            .await;
        assert!(result.is_err(), "FK violation should be rejected");
    }

    #[tokio::test]
    async fn one_active_session_per_user() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO profiles (id, display_name) VALUES ('usr-1', 'Ada')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO study_sessions (id, user_id, started_at) VALUES ('ses-1', 'usr-1', '2026-01-01T00:00:00.000000Z')",
                (),
            )
            .await
            .unwrap();
        let second = db
            .conn()
            .execute(
                "INSERT INTO study_sessions (id, user_id, started_at) VALUES ('ses-2', 'usr-1', '2026-01-01T01:00:00.000000Z')",
                (),
            )
            .await;
        assert!(second.is_err(), "second active session should be rejected");
    }
}

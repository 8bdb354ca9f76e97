//! Points ledger.
//!
//! Rows are append-only; every total is a `SUM` over the ledger. Rows are
//! written by goal progress and session completion, never directly.

use chrono::{DateTime, Utc};

use hall_core::entities::PointsEntry;
use hall_core::enums::PointsReason;
use hall_core::ids::PREFIX_POINTS;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime, parse_enum};
use crate::service::HallService;

const SELECT_COLS: &str = "id, user_id, group_id, amount, reason, source_id, created_at";

fn row_to_points(row: &libsql::Row) -> Result<PointsEntry, DatabaseError> {
    Ok(PointsEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        group_id: get_opt_string(row, 2)?,
        amount: row.get(3)?,
        reason: parse_enum(&row.get::<String>(4)?)?,
        source_id: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// A ledger row about to be written.
#[derive(Debug, Clone, Copy)]
pub struct NewPoints<'a> {
    pub user_id: &'a str,
    pub group_id: Option<&'a str>,
    pub amount: i64,
    pub reason: PointsReason,
    pub source_id: Option<&'a str>,
}

/// Insert a ledger row on `conn`, which may be an open transaction.
///
/// Returns `None` without writing when `amount` is not positive.
pub(crate) async fn insert_points(
    conn: &libsql::Connection,
    id: String,
    new: NewPoints<'_>,
    now: DateTime<Utc>,
) -> Result<Option<PointsEntry>, DatabaseError> {
    if new.amount <= 0 {
        return Ok(None);
    }
    conn.execute(
        &format!("INSERT INTO points ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        libsql::params![
            id.as_str(),
            new.user_id,
            new.group_id,
            new.amount,
            new.reason.as_str(),
            new.source_id,
            fmt_ts(now)
        ],
    )
    .await?;
    Ok(Some(PointsEntry {
        id,
        user_id: new.user_id.to_string(),
        group_id: new.group_id.map(String::from),
        amount: new.amount,
        reason: new.reason,
        source_id: new.source_id.map(String::from),
        created_at: now,
    }))
}

impl HallService {
    pub(crate) async fn next_points_id(&self) -> Result<String, DatabaseError> {
        self.db().generate_id(PREFIX_POINTS).await
    }

    /// Lifetime points for a user across every group.
    pub async fn total_points(&self, user_id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(SUM(amount), 0) FROM points WHERE user_id = ?1",
                [user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Most recent ledger rows for a user, optionally within one group.
    pub async fn list_points(
        &self,
        user_id: &str,
        group_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PointsEntry>, DatabaseError> {
        let rows = match group_id {
            Some(group_id) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM points WHERE user_id = ?1 AND group_id = ?2 \
                             ORDER BY created_at DESC, id LIMIT {limit}"
                        ),
                        [user_id, group_id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM points WHERE user_id = ?1 \
                             ORDER BY created_at DESC, id LIMIT {limit}"
                        ),
                        [user_id],
                    )
                    .await?
            }
        };
        collect_rows(rows, row_to_points).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{profile, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn zero_amount_is_not_written() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let id = svc.next_points_id().await.unwrap();
        let written = insert_points(
            svc.db().conn(),
            id,
            NewPoints {
                user_id: &ada.id,
                group_id: None,
                amount: 0,
                reason: PointsReason::StudySession,
                source_id: None,
            },
            Utc::now(),
        )
        .await
        .unwrap();
        assert!(written.is_none());
        assert_eq!(svc.total_points(&ada.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn totals_sum_the_ledger() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        for amount in [5, 10, 25] {
            let id = svc.next_points_id().await.unwrap();
            insert_points(
                svc.db().conn(),
                id,
                NewPoints {
                    user_id: &ada.id,
                    group_id: None,
                    amount,
                    reason: PointsReason::GoalProgress,
                    source_id: Some("gol-1"),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        }
        assert_eq!(svc.total_points(&ada.id).await.unwrap(), 40);
        assert_eq!(svc.list_points(&ada.id, None, 2).await.unwrap().len(), 2);
    }
}

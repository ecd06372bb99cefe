use chrono::NaiveDate;
use sqlx::PgPool;

use crate::db::models::ebitda_snapshots::{EbitdaSnapshotModel, NewEbitdaSnapshotModel};

const SNAPSHOT_COLUMNS: &str = "id, week_start, revenue, operating_expenses, depreciation, amortization, \
     ebitda, current_funding, is_default_alive, created_at, updated_at";

/// Insert or overwrite the snapshot for its week in one statement.
///
/// Concurrent callers for the same week never see a unique violation: the
/// conflict on `week_start` turns the losing inserts into updates of the same row.
pub async fn upsert_ebitda_snapshot(
    pool: &PgPool,
    snapshot: &NewEbitdaSnapshotModel,
) -> Result<EbitdaSnapshotModel, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO ebitda_snapshots (
            week_start, revenue, operating_expenses, depreciation, amortization,
            ebitda, current_funding, is_default_alive, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, clock_timestamp(), clock_timestamp())
        ON CONFLICT (week_start) DO UPDATE SET
            revenue = EXCLUDED.revenue,
            operating_expenses = EXCLUDED.operating_expenses,
            depreciation = EXCLUDED.depreciation,
            amortization = EXCLUDED.amortization,
            ebitda = EXCLUDED.ebitda,
            current_funding = EXCLUDED.current_funding,
            is_default_alive = EXCLUDED.is_default_alive,
            updated_at = clock_timestamp()
        RETURNING {SNAPSHOT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, EbitdaSnapshotModel>(&sql)
        .bind(snapshot.week_start)
        .bind(snapshot.revenue)
        .bind(snapshot.operating_expenses)
        .bind(snapshot.depreciation)
        .bind(snapshot.amortization)
        .bind(snapshot.ebitda)
        .bind(snapshot.current_funding)
        .bind(snapshot.is_default_alive)
        .fetch_one(pool)
        .await
}

pub async fn get_snapshot_for_week(
    pool: &PgPool,
    week_start: NaiveDate,
) -> Result<Option<EbitdaSnapshotModel>, sqlx::Error> {
    let sql = format!("SELECT {SNAPSHOT_COLUMNS} FROM ebitda_snapshots WHERE week_start = $1");
    sqlx::query_as::<_, EbitdaSnapshotModel>(&sql)
        .bind(week_start)
        .fetch_optional(pool)
        .await
}

/// Most recent snapshots, newest week first
pub async fn get_latest_snapshots(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error> {
    let sql = format!(
        "SELECT {SNAPSHOT_COLUMNS} FROM ebitda_snapshots ORDER BY week_start DESC LIMIT $1"
    );
    sqlx::query_as::<_, EbitdaSnapshotModel>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Snapshots strictly before `week_start`, newest week first
pub async fn get_snapshots_before(
    pool: &PgPool,
    week_start: NaiveDate,
    limit: i64,
) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error> {
    let sql = format!(
        "SELECT {SNAPSHOT_COLUMNS} FROM ebitda_snapshots WHERE week_start < $1 ORDER BY week_start DESC LIMIT $2"
    );
    sqlx::query_as::<_, EbitdaSnapshotModel>(&sql)
        .bind(week_start)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn count_snapshots_for_week(
    pool: &PgPool,
    week_start: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ebitda_snapshots WHERE week_start = $1")
        .bind(week_start)
        .fetch_one(pool)
        .await
}

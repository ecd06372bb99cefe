use chrono::NaiveDate;
use sqlx::PgPool;

use crate::db::models::financial_entries::{FinancialEntryModel, NewFinancialEntryModel};

/// Insert the entry for its week, or replace the existing one (last write wins)
pub async fn upsert_financial_entry(
    pool: &PgPool,
    entry: &NewFinancialEntryModel,
) -> Result<FinancialEntryModel, sqlx::Error> {
    sqlx::query_as::<_, FinancialEntryModel>(
        r#"
        INSERT INTO financial_entries (
            week_start, operating_expenses, depreciation, amortization, notes
        )
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (week_start) DO UPDATE SET
            operating_expenses = EXCLUDED.operating_expenses,
            depreciation = EXCLUDED.depreciation,
            amortization = EXCLUDED.amortization,
            notes = EXCLUDED.notes,
            updated_at = clock_timestamp()
        RETURNING id, week_start, operating_expenses, depreciation, amortization, notes, created_at, updated_at
        "#,
    )
    .bind(entry.week_start)
    .bind(entry.operating_expenses)
    .bind(entry.depreciation)
    .bind(entry.amortization)
    .bind(&entry.notes)
    .fetch_one(pool)
    .await
}

/// Fetch the entry recorded for an exact week start
pub async fn get_financial_entry_for_week(
    pool: &PgPool,
    week_start: NaiveDate,
) -> Result<Option<FinancialEntryModel>, sqlx::Error> {
    sqlx::query_as::<_, FinancialEntryModel>(
        r#"
        SELECT id, week_start, operating_expenses, depreciation, amortization, notes, created_at, updated_at
        FROM financial_entries
        WHERE week_start = $1
        "#,
    )
    .bind(week_start)
    .fetch_optional(pool)
    .await
}

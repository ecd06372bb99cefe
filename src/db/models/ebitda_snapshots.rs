use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Computed financial result for one canonical week, unique by `week_start`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EbitdaSnapshotModel {
    pub id: i32,
    pub week_start: NaiveDate,
    pub revenue: Decimal,
    pub operating_expenses: Decimal,
    pub depreciation: Decimal,
    pub amortization: Decimal,
    pub ebitda: Decimal,
    pub current_funding: Option<Decimal>,
    pub is_default_alive: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Freshly computed values; every field replaces the stored row on upsert
#[derive(Debug, Clone, PartialEq)]
pub struct NewEbitdaSnapshotModel {
    pub week_start: NaiveDate,
    pub revenue: Decimal,
    pub operating_expenses: Decimal,
    pub depreciation: Decimal,
    pub amortization: Decimal,
    pub ebitda: Decimal,
    pub current_funding: Option<Decimal>,
    pub is_default_alive: bool,
}

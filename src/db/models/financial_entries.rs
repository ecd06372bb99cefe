use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Manually entered expense figures for one week
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntryModel {
    pub id: i32,
    pub week_start: NaiveDate,
    pub operating_expenses: Decimal,
    pub depreciation: Decimal,
    pub amortization: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `week_start` must already be normalized and amounts non-negative;
/// `ebitda::contracts` produces these from raw requests.
#[derive(Debug, Clone)]
pub struct NewFinancialEntryModel {
    pub week_start: NaiveDate,
    pub operating_expenses: Decimal,
    pub depreciation: Decimal,
    pub amortization: Decimal,
    pub notes: Option<String>,
}

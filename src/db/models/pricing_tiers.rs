use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTierModel {
    pub id: i32,
    pub name: String,
    pub weekly_price: Decimal,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPricingTierModel {
    pub name: String,
    pub weekly_price: Decimal,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Revenue record owned by the payment tracking feature; read-only here
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentModel {
    pub id: i32,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentModel {
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub description: Option<String>,
}

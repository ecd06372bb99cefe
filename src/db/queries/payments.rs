use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::models::payments::NewPaymentModel;

/// Insert a single payment record (seeding and tests; the core only reads payments)
pub async fn insert_payment(
    pool: &PgPool,
    payment: &NewPaymentModel,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO payments (amount, payment_date, description)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(payment.amount)
    .bind(payment.payment_date)
    .bind(&payment.description)
    .fetch_one(pool)
    .await
}

/// Sum of payment amounts with `start <= payment_date <= end`; zero when there are none
pub async fn sum_payments_in_range(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Decimal, sqlx::Error> {
    sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM payments
        WHERE payment_date >= $1
          AND payment_date <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}


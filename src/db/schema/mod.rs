use sqlx::{
    Executor,
    postgres::PgPool,
};

// Arbitrary key for the advisory lock serializing concurrent schema setup
const SCHEMA_LOCK_KEY: i64 = 0x0EB1_7DA5;

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    // Concurrent CREATE TABLE IF NOT EXISTS can still collide in the catalog
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    (&mut *tx).execute(include_str!("payments.sql")).await?;
    (&mut *tx).execute(include_str!("financial_entries.sql")).await?;
    (&mut *tx).execute(include_str!("ebitda_snapshots.sql")).await?;
    (&mut *tx).execute(include_str!("pricing_tiers.sql")).await?;

    // Revenue aggregation scans payments by date range
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_payments_payment_date
        ON payments(payment_date);
        "#
    )
    .execute(&mut *tx)
    .await?;

    // At most one current pricing tier
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_pricing_tiers_single_current
        ON pricing_tiers(is_current) WHERE is_current;
        "#
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

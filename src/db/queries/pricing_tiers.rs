use sqlx::PgPool;

use crate::db::models::pricing_tiers::{NewPricingTierModel, PricingTierModel};

pub async fn get_current_tier(pool: &PgPool) -> Result<Option<PricingTierModel>, sqlx::Error> {
    sqlx::query_as::<_, PricingTierModel>(
        r#"
        SELECT id, name, weekly_price, is_current, created_at
        FROM pricing_tiers
        WHERE is_current
        "#,
    )
    .fetch_optional(pool)
    .await
}

/// Demote the current tier and insert the new one as current, in one transaction.
///
/// The table lock serializes concurrent replacements across processes so the
/// partial unique index on `is_current` is never violated.
pub async fn replace_current_tier(
    pool: &PgPool,
    tier: &NewPricingTierModel,
) -> Result<PricingTierModel, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("LOCK TABLE pricing_tiers IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE pricing_tiers SET is_current = FALSE WHERE is_current")
        .execute(&mut *tx)
        .await?;

    let inserted = sqlx::query_as::<_, PricingTierModel>(
        r#"
        INSERT INTO pricing_tiers (name, weekly_price, is_current)
        VALUES ($1, $2, TRUE)
        RETURNING id, name, weekly_price, is_current, created_at
        "#,
    )
    .bind(&tier.name)
    .bind(tier.weekly_price)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(inserted)
}

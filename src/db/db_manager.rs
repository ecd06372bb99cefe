use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::connection;
use super::schema;
use super::store::{LedgerStore, TierStore};
use super::queries::{
    payments as payments_queries,
    financial_entries as financial_entries_queries,
    ebitda_snapshots as ebitda_snapshots_queries,
    pricing_tiers as pricing_tiers_queries,
};
use super::models::{
    payments::NewPaymentModel,
    financial_entries::{FinancialEntryModel, NewFinancialEntryModel},
    ebitda_snapshots::{EbitdaSnapshotModel, NewEbitdaSnapshotModel},
    pricing_tiers::{NewPricingTierModel, PricingTierModel},
};
use crate::config::Config;

/// Postgres-backed ledger store
#[derive(Clone)]
pub struct DbManager {
    pub pool: PgPool,
}

impl DbManager {
    /// Creates a new database connection and initializes the schema
    pub async fn init(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = connection::create_pool(config).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, ensuring the schema exists
    pub async fn from_pool(pool: PgPool) -> Result<Self, sqlx::Error> {
        schema::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn insert_payment(&self, payment: &NewPaymentModel) -> Result<i32, sqlx::Error> {
        payments_queries::insert_payment(&self.pool, payment).await
    }

    pub async fn count_snapshots_for_week(&self, week_start: NaiveDate) -> Result<i64, sqlx::Error> {
        ebitda_snapshots_queries::count_snapshots_for_week(&self.pool, week_start).await
    }
}

fn as_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

impl LedgerStore for DbManager {
    async fn sum_payments_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, sqlx::Error> {
        payments_queries::sum_payments_in_range(&self.pool, start, end).await
    }

    async fn financial_entry_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<FinancialEntryModel>, sqlx::Error> {
        financial_entries_queries::get_financial_entry_for_week(&self.pool, week_start).await
    }

    async fn save_financial_entry(
        &self,
        entry: &NewFinancialEntryModel,
    ) -> Result<FinancialEntryModel, sqlx::Error> {
        financial_entries_queries::upsert_financial_entry(&self.pool, entry).await
    }

    async fn upsert_ebitda_snapshot(
        &self,
        snapshot: &NewEbitdaSnapshotModel,
    ) -> Result<EbitdaSnapshotModel, sqlx::Error> {
        ebitda_snapshots_queries::upsert_ebitda_snapshot(&self.pool, snapshot).await
    }

    async fn snapshot_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<EbitdaSnapshotModel>, sqlx::Error> {
        ebitda_snapshots_queries::get_snapshot_for_week(&self.pool, week_start).await
    }

    async fn latest_snapshots(&self, limit: usize) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error> {
        ebitda_snapshots_queries::get_latest_snapshots(&self.pool, as_limit(limit)).await
    }

    async fn snapshots_before(
        &self,
        week_start: NaiveDate,
        limit: usize,
    ) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error> {
        ebitda_snapshots_queries::get_snapshots_before(&self.pool, week_start, as_limit(limit)).await
    }
}

impl TierStore for DbManager {
    async fn current_tier(&self) -> Result<Option<PricingTierModel>, sqlx::Error> {
        pricing_tiers_queries::get_current_tier(&self.pool).await
    }

    async fn replace_current_tier(
        &self,
        tier: &NewPricingTierModel,
    ) -> Result<PricingTierModel, sqlx::Error> {
        pricing_tiers_queries::replace_current_tier(&self.pool, tier).await
    }
}

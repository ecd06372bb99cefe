// Row-store seam between the EBITDA core and its persistence.
#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::models::{
    ebitda_snapshots::{EbitdaSnapshotModel, NewEbitdaSnapshotModel},
    financial_entries::{FinancialEntryModel, NewFinancialEntryModel},
    pricing_tiers::{NewPricingTierModel, PricingTierModel},
};

pub trait LedgerStore {
    /// Sum of payment amounts dated within `[start, end]`, zero when there are none
    async fn sum_payments_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, sqlx::Error>;

    async fn financial_entry_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<FinancialEntryModel>, sqlx::Error>;

    /// Insert or replace the entry for its week
    async fn save_financial_entry(
        &self,
        entry: &NewFinancialEntryModel,
    ) -> Result<FinancialEntryModel, sqlx::Error>;

    /// Atomic insert-or-update keyed by `week_start`; must be safe under concurrent callers
    async fn upsert_ebitda_snapshot(
        &self,
        snapshot: &NewEbitdaSnapshotModel,
    ) -> Result<EbitdaSnapshotModel, sqlx::Error>;

    async fn snapshot_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<EbitdaSnapshotModel>, sqlx::Error>;

    /// Newest week first
    async fn latest_snapshots(&self, limit: usize) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error>;

    /// Snapshots strictly before `week_start`, newest week first
    async fn snapshots_before(
        &self,
        week_start: NaiveDate,
        limit: usize,
    ) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error>;
}

/// Storage for the single current pricing tier
pub trait TierStore {
    async fn current_tier(&self) -> Result<Option<PricingTierModel>, sqlx::Error>;

    /// Insert `tier` as current and demote the previous one, atomically
    async fn replace_current_tier(
        &self,
        tier: &NewPricingTierModel,
    ) -> Result<PricingTierModel, sqlx::Error>;
}

// In-process ledger store with the same atomicity as the Postgres one:
// every write happens under a single lock, so an upsert is one indivisible step.
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::store::{LedgerStore, TierStore};
use super::models::{
    payments::{NewPaymentModel, PaymentModel},
    financial_entries::{FinancialEntryModel, NewFinancialEntryModel},
    ebitda_snapshots::{EbitdaSnapshotModel, NewEbitdaSnapshotModel},
    pricing_tiers::{NewPricingTierModel, PricingTierModel},
};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i32,
    payments: Vec<PaymentModel>,
    entries: BTreeMap<NaiveDate, FinancialEntryModel>,
    snapshots: BTreeMap<NaiveDate, EbitdaSnapshotModel>,
    tiers: Vec<PricingTierModel>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Strictly after `previous`, even when the wall clock has not moved
fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_payment(&self, payment: &NewPaymentModel) -> PaymentModel {
        let mut state = self.state.lock().await;
        let row = PaymentModel {
            id: state.allocate_id(),
            amount: payment.amount,
            payment_date: payment.payment_date,
            description: payment.description.clone(),
            created_at: Utc::now(),
        };
        state.payments.push(row.clone());
        row
    }

    pub async fn snapshot_count(&self) -> usize {
        self.state.lock().await.snapshots.len()
    }

    pub async fn all_tiers(&self) -> Vec<PricingTierModel> {
        self.state.lock().await.tiers.clone()
    }
}

impl LedgerStore for MemoryStore {
    async fn sum_payments_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state
            .payments
            .iter()
            .filter(|p| p.payment_date >= start && p.payment_date <= end)
            .map(|p| p.amount)
            .sum())
    }

    async fn financial_entry_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<FinancialEntryModel>, sqlx::Error> {
        Ok(self.state.lock().await.entries.get(&week_start).cloned())
    }

    async fn save_financial_entry(
        &self,
        entry: &NewFinancialEntryModel,
    ) -> Result<FinancialEntryModel, sqlx::Error> {
        let mut state = self.state.lock().await;
        let existing = state.entries.get(&entry.week_start).map(|e| (e.id, e.created_at, e.updated_at));
        let (id, created_at, updated_at) = match existing {
            Some((id, created_at, updated_at)) => (id, created_at, next_timestamp(Some(updated_at))),
            None => {
                let now = next_timestamp(None);
                (state.allocate_id(), now, now)
            }
        };
        let row = FinancialEntryModel {
            id,
            week_start: entry.week_start,
            operating_expenses: entry.operating_expenses,
            depreciation: entry.depreciation,
            amortization: entry.amortization,
            notes: entry.notes.clone(),
            created_at,
            updated_at,
        };
        state.entries.insert(entry.week_start, row.clone());
        Ok(row)
    }

    async fn upsert_ebitda_snapshot(
        &self,
        snapshot: &NewEbitdaSnapshotModel,
    ) -> Result<EbitdaSnapshotModel, sqlx::Error> {
        let mut state = self.state.lock().await;
        let existing = state
            .snapshots
            .get(&snapshot.week_start)
            .map(|s| (s.id, s.created_at, s.updated_at));
        let (id, created_at, updated_at) = match existing {
            Some((id, created_at, updated_at)) => (id, created_at, next_timestamp(Some(updated_at))),
            None => {
                let now = next_timestamp(None);
                (state.allocate_id(), now, now)
            }
        };
        let row = EbitdaSnapshotModel {
            id,
            week_start: snapshot.week_start,
            revenue: snapshot.revenue,
            operating_expenses: snapshot.operating_expenses,
            depreciation: snapshot.depreciation,
            amortization: snapshot.amortization,
            ebitda: snapshot.ebitda,
            current_funding: snapshot.current_funding,
            is_default_alive: snapshot.is_default_alive,
            created_at,
            updated_at,
        };
        state.snapshots.insert(snapshot.week_start, row.clone());
        Ok(row)
    }

    async fn snapshot_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<EbitdaSnapshotModel>, sqlx::Error> {
        Ok(self.state.lock().await.snapshots.get(&week_start).cloned())
    }

    async fn latest_snapshots(&self, limit: usize) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state.snapshots.values().rev().take(limit).cloned().collect())
    }

    async fn snapshots_before(
        &self,
        week_start: NaiveDate,
        limit: usize,
    ) -> Result<Vec<EbitdaSnapshotModel>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state
            .snapshots
            .range(..week_start)
            .rev()
            .take(limit)
            .map(|(_, s)| s.clone())
            .collect())
    }
}

impl TierStore for MemoryStore {
    async fn current_tier(&self) -> Result<Option<PricingTierModel>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state.tiers.iter().find(|t| t.is_current).cloned())
    }

    async fn replace_current_tier(
        &self,
        tier: &NewPricingTierModel,
    ) -> Result<PricingTierModel, sqlx::Error> {
        let mut state = self.state.lock().await;
        for existing in state.tiers.iter_mut() {
            existing.is_current = false;
        }
        let row = PricingTierModel {
            id: state.allocate_id(),
            name: tier.name.clone(),
            weekly_price: tier.weekly_price,
            is_current: true,
            created_at: Utc::now(),
        };
        state.tiers.push(row.clone());
        Ok(row)
    }
}

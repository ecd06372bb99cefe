use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::aggregator::{aggregate_week, check_money_range};
use super::status::{TrendPoint, project};
use crate::config::AliveThresholds;
use crate::db::models::ebitda_snapshots::{EbitdaSnapshotModel, NewEbitdaSnapshotModel};
use crate::db::store::LedgerStore;
use crate::error::{LedgerError, Result};
use crate::week::WeekBounds;

/// Compute the EBITDA snapshot for the week containing `week_start_input` and
/// store it, replacing any earlier snapshot of that week.
///
/// Safe to call concurrently for the same week: the store's atomic upsert keeps
/// exactly one row and every caller gets that row's identity back.
#[instrument(skip(store, thresholds))]
pub async fn calculate_and_store_ebitda_snapshot<S: LedgerStore>(
    store: &S,
    thresholds: &AliveThresholds,
    week_start_input: NaiveDate,
    current_funding: Option<Decimal>,
) -> Result<EbitdaSnapshotModel> {
    if current_funding.is_some_and(|f| f < Decimal::ZERO) {
        return Err(LedgerError::validation("currentFunding must not be negative"));
    }
    let current_funding = current_funding
        .map(|f| check_money_range("currentFunding", f))
        .transpose()?;

    let week = WeekBounds::containing(week_start_input);
    let financials = aggregate_week(store, week).await?;

    let earlier: Vec<TrendPoint> = store
        .snapshots_before(week.week_start, thresholds.trend_window() - 1)
        .await?
        .iter()
        .map(TrendPoint::from)
        .collect();
    let latest = TrendPoint {
        week_start: week.week_start,
        ebitda: financials.ebitda,
        current_funding,
    };
    let projection = project(&latest, &earlier, thresholds);

    let new_snapshot = NewEbitdaSnapshotModel {
        week_start: week.week_start,
        revenue: financials.revenue,
        operating_expenses: financials.operating_expenses,
        depreciation: financials.depreciation,
        amortization: financials.amortization,
        ebitda: financials.ebitda,
        current_funding,
        is_default_alive: projection.is_default_alive,
    };
    let stored = store.upsert_ebitda_snapshot(&new_snapshot).await?;

    info!(
        snapshot_id = stored.id,
        week_start = %stored.week_start,
        revenue = %stored.revenue,
        ebitda = %stored.ebitda,
        is_default_alive = stored.is_default_alive,
        "Stored EBITDA snapshot"
    );
    Ok(stored)
}

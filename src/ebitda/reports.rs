use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use super::status::{Projection, project_history};
use crate::config::AliveThresholds;
use crate::db::models::ebitda_snapshots::EbitdaSnapshotModel;
use crate::db::store::LedgerStore;
use crate::error::{LedgerError, Result};
use crate::week::{WeekBounds, week_start};

pub const DEFAULT_TREND_WEEKS: usize = 12;
pub const MAX_TREND_WEEKS: usize = 104;

/// Latest snapshot and what it implies; both empty when nothing has been computed yet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStatus {
    pub latest: Option<EbitdaSnapshotModel>,
    pub projection: Option<Projection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    pub previous: Decimal,
    pub current: Decimal,
    pub change: Decimal,
    /// `None` when the previous value is zero
    pub percent_change: Option<Decimal>,
}

impl MetricDelta {
    pub fn between(previous: Decimal, current: Decimal) -> Self {
        Self {
            previous,
            current,
            change: current - previous,
            percent_change: percent_change(previous, current),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDeltas {
    pub revenue: MetricDelta,
    pub operating_expenses: MetricDelta,
    pub depreciation: MetricDelta,
    pub amortization: MetricDelta,
    pub ebitda: MetricDelta,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekComparison {
    pub current_week: NaiveDate,
    pub previous_week: NaiveDate,
    pub current: EbitdaSnapshotModel,
    pub previous: Option<EbitdaSnapshotModel>,
    pub deltas: Option<ComparisonDeltas>,
}

/// `(current - previous) / |previous|` in percent, rounded to two places
pub fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(((current - previous) / previous.abs() * Decimal::ONE_HUNDRED).round_dp(2))
}

#[instrument(skip(store, thresholds))]
pub async fn current_status<S: LedgerStore>(store: &S, thresholds: &AliveThresholds) -> Result<CurrentStatus> {
    let history = store.latest_snapshots(thresholds.trend_window()).await?;
    Ok(CurrentStatus {
        projection: project_history(&history, thresholds),
        latest: history.into_iter().next(),
    })
}

/// Compare the snapshot of `current_week` with `previous_week` (default: the week before).
/// Both dates are normalized to week starts.
#[instrument(skip(store))]
pub async fn compare_weeks<S: LedgerStore>(
    store: &S,
    current_week: NaiveDate,
    previous_week: Option<NaiveDate>,
) -> Result<WeekComparison> {
    let current = WeekBounds::containing(current_week);
    let current_week = current.week_start;
    let previous_week = match previous_week {
        Some(date) => week_start(date),
        None => current.previous().week_start,
    };

    let current = store
        .snapshot_for_week(current_week)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("no EBITDA snapshot for week starting {current_week}")))?;
    let previous = store.snapshot_for_week(previous_week).await?;

    let deltas = previous.as_ref().map(|prev| ComparisonDeltas {
        revenue: MetricDelta::between(prev.revenue, current.revenue),
        operating_expenses: MetricDelta::between(prev.operating_expenses, current.operating_expenses),
        depreciation: MetricDelta::between(prev.depreciation, current.depreciation),
        amortization: MetricDelta::between(prev.amortization, current.amortization),
        ebitda: MetricDelta::between(prev.ebitda, current.ebitda),
    });

    Ok(WeekComparison {
        current_week,
        previous_week,
        current,
        previous,
        deltas,
    })
}

/// Latest snapshot compared with the week before it; `None` when there are no snapshots
pub async fn compare_latest_week<S: LedgerStore>(store: &S) -> Result<Option<WeekComparison>> {
    match store.latest_snapshots(1).await?.first() {
        Some(latest) => compare_weeks(store, latest.week_start, None).await.map(Some),
        None => Ok(None),
    }
}

/// Last `limit` snapshots, newest week first. `limit` is clamped to `1..=MAX_TREND_WEEKS`.
#[instrument(skip(store))]
pub async fn weekly_trends<S: LedgerStore>(store: &S, limit: usize) -> Result<Vec<EbitdaSnapshotModel>> {
    let limit = limit.clamp(1, MAX_TREND_WEEKS);
    Ok(store.latest_snapshots(limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn percent_change_against_negative_base_uses_magnitude() {
        // -1000 -> -500 is an improvement
        assert_eq!(percent_change(dec!(-1000), dec!(-500)), Some(dec!(50)));
        assert_eq!(percent_change(dec!(200), dec!(150)), Some(dec!(-25)));
    }

    #[test]
    fn percent_change_from_zero_is_undefined() {
        assert_eq!(percent_change(Decimal::ZERO, dec!(10)), None);
    }

    #[test]
    fn percent_change_rounds_to_two_places() {
        assert_eq!(percent_change(dec!(3), dec!(4)), Some(dec!(33.33)));
    }
}

//! Default-alive classification and profitability projection.
//!
//! Pure functions over snapshot history. The weekly trend is the average EBITDA
//! change per calendar week between the oldest and the latest point of the
//! window, and the latest EBITDA is extrapolated linearly from there:
//!
//! * latest EBITDA `>= 0`: alive, nothing to project
//! * no usable trend (single point): alive iff funding covers
//!   `fallback_min_runway_weeks` of the current burn
//! * trend flat or worsening, or profitability further out than
//!   `max_projection_weeks`: dead, nothing to project
//! * otherwise alive iff the burn accumulated until the projected profitable week,
//!   times `funding_safety_margin`, fits in current funding

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::aggregator::to_money;
use crate::config::AliveThresholds;
use crate::db::models::ebitda_snapshots::EbitdaSnapshotModel;

/// The parts of a snapshot the projection looks at
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub week_start: NaiveDate,
    pub ebitda: Decimal,
    pub current_funding: Option<Decimal>,
}

impl From<&EbitdaSnapshotModel> for TrendPoint {
    fn from(snapshot: &EbitdaSnapshotModel) -> Self {
        Self {
            week_start: snapshot.week_start,
            ebitda: snapshot.ebitda,
            current_funding: snapshot.current_funding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub is_default_alive: bool,
    /// Average EBITDA change per week over the window
    pub weekly_ebitda_trend: Option<Decimal>,
    pub weeks_until_profitability: Option<u32>,
    pub projected_profitability_date: Option<NaiveDate>,
    pub projected_capital_needed: Option<Decimal>,
    /// Funding divided by the current weekly burn
    pub runway_weeks: Option<Decimal>,
}

/// Project from `latest` using up to `trend_window() - 1` points of `earlier`
/// (newest first, all strictly before `latest`).
pub fn project(latest: &TrendPoint, earlier: &[TrendPoint], thresholds: &AliveThresholds) -> Projection {
    let funding = latest.current_funding.unwrap_or(Decimal::ZERO);
    let burn = -latest.ebitda;

    if latest.ebitda >= Decimal::ZERO {
        return Projection {
            is_default_alive: true,
            weekly_ebitda_trend: weekly_trend(latest, earlier, thresholds),
            weeks_until_profitability: None,
            projected_profitability_date: None,
            projected_capital_needed: None,
            runway_weeks: None,
        };
    }

    // `None` when funding is unknown or the runway does not fit a Decimal
    let runway_weeks = latest.current_funding.and_then(|f| f.checked_div(burn)).map(|w| w.round_dp(2));

    let Some(trend) = weekly_trend(latest, earlier, thresholds) else {
        debug!(week_start = %latest.week_start, "Insufficient snapshot history to extrapolate a trend");
        let min_runway = Decimal::from(thresholds.fallback_min_runway_weeks);
        let is_default_alive = match (latest.current_funding, burn.checked_mul(min_runway)) {
            (Some(funding), Some(needed)) => funding >= needed,
            _ => false,
        };
        return Projection {
            is_default_alive,
            weekly_ebitda_trend: None,
            weeks_until_profitability: None,
            projected_profitability_date: None,
            projected_capital_needed: None,
            runway_weeks,
        };
    };

    let non_convergent = Projection {
        is_default_alive: false,
        weekly_ebitda_trend: Some(trend),
        weeks_until_profitability: None,
        projected_profitability_date: None,
        projected_capital_needed: None,
        runway_weeks,
    };

    if trend <= Decimal::ZERO {
        return non_convergent;
    }

    let weeks = match burn.checked_div(trend).and_then(|w| w.ceil().to_u32()) {
        Some(weeks) if weeks <= thresholds.max_projection_weeks => weeks,
        _ => return non_convergent,
    };

    let Some(capital_needed) = capital_needed(latest.ebitda, trend, weeks) else {
        debug!(week_start = %latest.week_start, "Projected capital needed overflows, treating as non-convergent");
        return non_convergent;
    };

    Projection {
        is_default_alive: capital_needed
            .checked_mul(thresholds.funding_safety_margin)
            .is_some_and(|needed| needed <= funding),
        weekly_ebitda_trend: Some(trend),
        weeks_until_profitability: Some(weeks),
        projected_profitability_date: Some(latest.week_start + Duration::weeks(i64::from(weeks))),
        projected_capital_needed: Some(capital_needed),
        runway_weeks,
    }
}

/// Burn accumulated over weeks `1..=weeks` of the linear projection
fn capital_needed(ebitda: Decimal, trend: Decimal, weeks: u32) -> Option<Decimal> {
    let mut total = Decimal::ZERO;
    for k in 1..=weeks {
        let projected = ebitda.checked_add(trend.checked_mul(Decimal::from(k))?)?;
        if projected < Decimal::ZERO {
            total = total.checked_sub(projected)?;
        }
    }
    Some(to_money(total))
}

/// Project from a history ordered newest first; `None` when it is empty
pub fn project_history(history: &[EbitdaSnapshotModel], thresholds: &AliveThresholds) -> Option<Projection> {
    let (latest, earlier) = history.split_first()?;
    let earlier: Vec<TrendPoint> = earlier.iter().map(TrendPoint::from).collect();
    Some(project(&TrendPoint::from(latest), &earlier, thresholds))
}

fn weekly_trend(latest: &TrendPoint, earlier: &[TrendPoint], thresholds: &AliveThresholds) -> Option<Decimal> {
    let span = thresholds.trend_window() - 1;
    let oldest = earlier.iter().take(span).last()?;
    let weeks_apart = (latest.week_start - oldest.week_start).num_days() / 7;
    if weeks_apart <= 0 {
        return None;
    }
    latest.ebitda.checked_sub(oldest.ebitda)?.checked_div(Decimal::from(weeks_apart))
}

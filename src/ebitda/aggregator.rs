use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::db::store::LedgerStore;
use crate::error::{LedgerError, Result};
use crate::week::WeekBounds;

/// Money columns are NUMERIC(14, 2)
pub const MONEY_SCALE: u32 = 2;

/// Round to cents the way Postgres NUMERIC does (half away from zero)
pub fn to_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// 999999999999.99, the largest magnitude a NUMERIC(14, 2) column holds
pub const MAX_MONEY: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, MONEY_SCALE);

/// Reject amounts a money column cannot store, after rounding to cents
pub fn check_money_range(field: &str, value: Decimal) -> Result<Decimal> {
    let rounded = to_money(value);
    if rounded.abs() > MAX_MONEY {
        return Err(LedgerError::validation(format!(
            "{field} must be below 1000000000000 in magnitude"
        )));
    }
    Ok(rounded)
}

/// Depreciation and amortization are added back: they are non-cash expenses
pub fn compute_ebitda(
    revenue: Decimal,
    operating_expenses: Decimal,
    depreciation: Decimal,
    amortization: Decimal,
) -> Decimal {
    revenue - operating_expenses + depreciation + amortization
}

/// Revenue and expense inputs for one canonical week
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyFinancials {
    pub week: WeekBounds,
    pub revenue: Decimal,
    pub operating_expenses: Decimal,
    pub depreciation: Decimal,
    pub amortization: Decimal,
    pub ebitda: Decimal,
}

/// Sum payments inside the week and pick up that week's financial entry.
///
/// A week without payments or without an entry computes as zero.
#[instrument(skip(store), fields(week_start = %week.week_start))]
pub async fn aggregate_week<S: LedgerStore>(store: &S, week: WeekBounds) -> Result<WeeklyFinancials> {
    let revenue = store.sum_payments_between(week.start_utc(), week.last_instant_utc()).await?;

    let (operating_expenses, depreciation, amortization) =
        match store.financial_entry_for_week(week.week_start).await? {
            Some(entry) => (entry.operating_expenses, entry.depreciation, entry.amortization),
            None => {
                debug!("No financial entry for week, expenses default to zero");
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
            }
        };

    let revenue = to_money(revenue);
    let operating_expenses = to_money(operating_expenses);
    let depreciation = to_money(depreciation);
    let amortization = to_money(amortization);

    Ok(WeeklyFinancials {
        week,
        revenue,
        operating_expenses,
        depreciation,
        amortization,
        ebitda: compute_ebitda(revenue, operating_expenses, depreciation, amortization),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn ebitda_adds_back_depreciation_and_amortization() {
        let ebitda = compute_ebitda(dec!(12500.00), dec!(15000.00), dec!(400.00), dec!(100.00));
        assert_eq!(ebitda, dec!(-2000.00));
    }

    #[test]
    fn repeated_decimal_sums_do_not_drift() {
        let total: Decimal = std::iter::repeat(dec!(0.10)).take(1000).sum();
        assert_eq!(total, dec!(100.00));
    }

    #[test]
    fn money_rounds_half_away_from_zero() {
        assert_eq!(to_money(dec!(1.005)), dec!(1.01));
        assert_eq!(to_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(to_money(dec!(2.5)), dec!(2.50));
    }

    #[test]
    fn money_range_stops_at_twelve_integer_digits() {
        assert_eq!(MAX_MONEY, dec!(999999999999.99));
        assert_eq!(check_money_range("amount", dec!(999999999999.99)).unwrap(), MAX_MONEY);
        assert!(matches!(
            check_money_range("amount", dec!(1000000000000)),
            Err(LedgerError::Validation(_))
        ));
        // Rounds up past the limit
        assert!(check_money_range("amount", dec!(999999999999.995)).is_err());
        assert!(check_money_range("amount", dec!(-1000000000000)).is_err());
    }
}

//! Typed request/response shapes for the EBITDA operations, validated at the boundary.
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::aggregator::check_money_range;
use super::snapshot::calculate_and_store_ebitda_snapshot;
use crate::config::AliveThresholds;
use crate::db::models::ebitda_snapshots::EbitdaSnapshotModel;
use crate::db::models::financial_entries::NewFinancialEntryModel;
use crate::db::store::LedgerStore;
use crate::error::{LedgerError, Result};
use crate::week::{WeekBounds, week_start};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateEbitdaRequest {
    pub week_start_date: String,
    #[serde(default)]
    pub current_funding: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCalculateEbitda {
    pub week_start: NaiveDate,
    pub current_funding: Option<Decimal>,
}

impl CalculateEbitdaRequest {
    pub fn validate(&self) -> Result<ValidatedCalculateEbitda> {
        let week_start = parse_week_start_date(&self.week_start_date)?;
        let current_funding = match self.current_funding.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_amount("currentFunding", raw)?),
        };
        Ok(ValidatedCalculateEbitda {
            week_start,
            current_funding,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateEbitdaResponse {
    pub week: WeekBounds,
    pub snapshot: EbitdaSnapshotModel,
}

/// Validate the request and run the snapshot computation
pub async fn handle_calculate_ebitda<S: LedgerStore>(
    store: &S,
    thresholds: &AliveThresholds,
    request: &CalculateEbitdaRequest,
) -> Result<CalculateEbitdaResponse> {
    let validated = request.validate()?;
    let snapshot =
        calculate_and_store_ebitda_snapshot(store, thresholds, validated.week_start, validated.current_funding)
            .await?;
    Ok(CalculateEbitdaResponse {
        week: WeekBounds::containing(snapshot.week_start),
        snapshot,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFinancialEntryRequest {
    pub week_start_date: String,
    pub operating_expenses: String,
    #[serde(default)]
    pub depreciation: Option<String>,
    #[serde(default)]
    pub amortization: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SaveFinancialEntryRequest {
    /// Amounts must be non-negative; the week start is normalized to its canonical Saturday
    pub fn validate(&self) -> Result<NewFinancialEntryModel> {
        let date = parse_week_start_date(&self.week_start_date)?;
        Ok(NewFinancialEntryModel {
            week_start: week_start(date),
            operating_expenses: parse_amount("operatingExpenses", &self.operating_expenses)?,
            depreciation: parse_optional_amount("depreciation", self.depreciation.as_deref())?,
            amortization: parse_optional_amount("amortization", self.amortization.as_deref())?,
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its calendar date in its own offset)
pub fn parse_week_start_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LedgerError::validation("weekStartDate is required"));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| LedgerError::validation(format!("weekStartDate '{raw}' is not an ISO-8601 date")))
}

/// Non-negative decimal amount that fits a money column
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| LedgerError::validation(format!("{field} '{raw}' is not a decimal amount")))?;
    if amount < Decimal::ZERO {
        return Err(LedgerError::validation(format!("{field} must not be negative")));
    }
    check_money_range(field, amount)
}

fn parse_optional_amount(field: &str, raw: Option<&str>) -> Result<Decimal> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Decimal::ZERO),
        Some(raw) => parse_amount(field, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calculate_request_deserializes_from_camel_case_json() {
        let request: CalculateEbitdaRequest =
            serde_json::from_str(r#"{"weekStartDate":"2024-11-30","currentFunding":"10000"}"#).unwrap();
        let validated = request.validate().unwrap();
        assert_eq!(validated.week_start, date(2024, 11, 30));
        assert_eq!(validated.current_funding, Some(dec!(10000)));
    }

    #[test]
    fn funding_is_optional() {
        let request: CalculateEbitdaRequest = serde_json::from_str(r#"{"weekStartDate":"2024-12-05"}"#).unwrap();
        assert_eq!(request.validate().unwrap().current_funding, None);
    }

    #[test]
    fn rfc3339_timestamp_uses_its_calendar_date() {
        assert_eq!(parse_week_start_date("2024-12-05T18:30:00-05:00").unwrap(), date(2024, 12, 5));
    }

    #[test]
    fn malformed_dates_are_validation_errors() {
        for raw in ["", "   ", "30/11/2024", "2024-13-01", "yesterday"] {
            let err = parse_week_start_date(raw).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "{raw:?}");
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn negative_funding_is_rejected() {
        let request = CalculateEbitdaRequest {
            week_start_date: "2024-11-30".to_string(),
            current_funding: Some("-1".to_string()),
        };
        assert!(matches!(request.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn non_numeric_funding_is_rejected() {
        let request = CalculateEbitdaRequest {
            week_start_date: "2024-11-30".to_string(),
            current_funding: Some("lots".to_string()),
        };
        assert!(matches!(request.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn amounts_beyond_twelve_integer_digits_are_validation_errors() {
        for raw in ["1000000000000", "1000000000000000000000000000"] {
            let err = parse_amount("currentFunding", raw).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "{raw}");
            assert!(err.is_client_error());
        }
        assert_eq!(parse_amount("currentFunding", "999999999999.99").unwrap(), dec!(999999999999.99));

        let request = SaveFinancialEntryRequest {
            week_start_date: "2024-11-30".to_string(),
            operating_expenses: "1000000000000".to_string(),
            depreciation: None,
            amortization: None,
            notes: None,
        };
        assert!(matches!(request.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn entry_request_normalizes_week_and_defaults_add_backs() {
        let request: SaveFinancialEntryRequest = serde_json::from_str(
            r#"{"weekStartDate":"2024-12-04","operatingExpenses":"15000.50","notes":"  payroll  "}"#,
        )
        .unwrap();
        let entry = request.validate().unwrap();
        assert_eq!(entry.week_start, date(2024, 11, 30));
        assert_eq!(entry.operating_expenses, dec!(15000.50));
        assert_eq!(entry.depreciation, Decimal::ZERO);
        assert_eq!(entry.amortization, Decimal::ZERO);
        assert_eq!(entry.notes.as_deref(), Some("payroll"));
    }

    #[test]
    fn entry_request_rejects_negative_depreciation() {
        let request = SaveFinancialEntryRequest {
            week_start_date: "2024-11-30".to_string(),
            operating_expenses: "100".to_string(),
            depreciation: Some("-5".to_string()),
            amortization: None,
            notes: None,
        };
        assert!(matches!(request.validate(), Err(LedgerError::Validation(_))));
    }
}

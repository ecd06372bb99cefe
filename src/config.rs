use dotenvy::dotenv;
use eyre::{Result, WrapErr, eyre};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Parameters of the default-alive classification.
///
/// See `ebitda::status` for how each one is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AliveThresholds {
    /// Number of snapshots (latest included) used to fit the weekly EBITDA trend
    pub trend_window_weeks: usize,
    /// Projections further out than this are treated as non-convergent
    pub max_projection_weeks: u32,
    /// Capital needed is multiplied by this before comparing against funding
    pub funding_safety_margin: Decimal,
    /// Without a trend, a burning company is alive only with at least this much runway
    pub fallback_min_runway_weeks: u32,
}

impl AliveThresholds {
    /// Snapshots in the trend window. A trend needs two points, so smaller
    /// settings count as two.
    pub fn trend_window(&self) -> usize {
        self.trend_window_weeks.max(2)
    }
}

impl Default for AliveThresholds {
    fn default() -> Self {
        Self {
            trend_window_weeks: 4,
            max_projection_weeks: 260,
            funding_safety_margin: Decimal::ONE,
            fallback_min_runway_weeks: 52,
        }
    }
}

pub struct Config {
    pub database_url: String,
    pub mode: String,
    pub max_connections: u32,
    pub thresholds: AliveThresholds,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let mode = env::var("MODE").unwrap_or_else(|_| "test".to_string());
        if mode != "test" && mode != "prod" {
            return Err(eyre!("Invalid MODE value '{}' (must be 'test' or 'prod')", mode));
        }

        let database_url = env::var("DATABASE_URL").wrap_err("Missing DATABASE_URL")?;
        let max_connections = parse_env("DB_MAX_CONNECTIONS", 5u32)?;

        let defaults = AliveThresholds::default();
        let thresholds = AliveThresholds {
            trend_window_weeks: parse_env("TREND_WINDOW_WEEKS", defaults.trend_window_weeks)?,
            max_projection_weeks: parse_env("MAX_PROJECTION_WEEKS", defaults.max_projection_weeks)?,
            funding_safety_margin: parse_env("FUNDING_SAFETY_MARGIN", defaults.funding_safety_margin)?,
            fallback_min_runway_weeks: parse_env("FALLBACK_MIN_RUNWAY_WEEKS", defaults.fallback_min_runway_weeks)?,
        };
        validate_thresholds(&thresholds)?;

        Ok(Config {
            database_url,
            mode,
            max_connections,
            thresholds,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| eyre!("Invalid {} value '{}': {}", key, raw, e))
}

fn validate_thresholds(thresholds: &AliveThresholds) -> Result<()> {
    if thresholds.trend_window_weeks < 2 {
        return Err(eyre!("TREND_WINDOW_WEEKS must be at least 2"));
    }
    if thresholds.max_projection_weeks == 0 {
        return Err(eyre!("MAX_PROJECTION_WEEKS must be positive"));
    }
    if thresholds.funding_safety_margin <= Decimal::ZERO {
        return Err(eyre!("FUNDING_SAFETY_MARGIN must be positive"));
    }
    Ok(())
}

// Usage: ebitda_report [trend_weeks]
use eyre::{Result, WrapErr};
use serde_json::json;
use tracing::info;

use default_alive_ledger::logging;
use default_alive_ledger::config;
use default_alive_ledger::db::db_manager::DbManager;
use default_alive_ledger::ebitda::reports::{
    DEFAULT_TREND_WEEKS,
    compare_latest_week,
    current_status,
    weekly_trends,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::Config::load()?;

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let trend_weeks = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<usize>().wrap_err("trend_weeks must be a positive integer")?,
        None => DEFAULT_TREND_WEEKS,
    };

    let db = DbManager::init(&cfg).await?;

    let status = current_status(&db, &cfg.thresholds).await?;
    if status.latest.is_none() {
        info!("No EBITDA data available");
    }
    let comparison = compare_latest_week(&db).await?;
    let trends = weekly_trends(&db, trend_weeks).await?;

    let report = json!({
        "currentStatus": status,
        "weekComparison": comparison,
        "weeklyTrends": trends,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// Usage: calculate_ebitda <week-start YYYY-MM-DD> [current_funding]
use eyre::{Result, eyre};
use tracing::{error, info};

use default_alive_ledger::logging;
use default_alive_ledger::config;
use default_alive_ledger::db::db_manager::DbManager;
use default_alive_ledger::ebitda::contracts::{CalculateEbitdaRequest, handle_calculate_ebitda};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::Config::load()?;

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let mut args = std::env::args().skip(1);
    let week_start_date = args
        .next()
        .ok_or_else(|| eyre!("usage: calculate_ebitda <week-start YYYY-MM-DD> [current_funding]"))?;
    let request = CalculateEbitdaRequest {
        week_start_date,
        current_funding: args.next(),
    };

    let db = DbManager::init(&cfg).await?;
    info!(mode = %cfg.mode, "Database manager initialized");

    match handle_calculate_ebitda(&db, &cfg.thresholds, &request).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, client_error = e.is_client_error(), "EBITDA calculation failed");
            Err(e.into())
        }
    }
}

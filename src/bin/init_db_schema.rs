use eyre::Result;
use tracing::info;

use default_alive_ledger::logging;
use default_alive_ledger::config;
use default_alive_ledger::db::{
    connection,
    schema,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (also reads .env)
    let cfg = config::Config::load()?;

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }
    info!(mode = %cfg.mode, "Configuration loaded and logging initialized");

    // Initialize database connection pool
    let pool = connection::create_pool(&cfg).await?;
    info!("Database connection pool created");

    // Initialize database schema
    schema::init_schema(&pool).await?;
    info!("Database schema initialized");

    Ok(())
}

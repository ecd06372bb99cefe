use sqlx::ConnectOptions;
use sqlx::postgres::{
    PgConnectOptions,
    PgPool,
    PgPoolOptions,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

use crate::config::Config;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    connect(&config.database_url, config.max_connections).await
}

/// Pool for an explicit URL, used where no `Config` is loaded (integration tests)
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let connect_options = PgConnectOptions::from_str(database_url)?
        .log_slow_statements(LevelFilter::Warn, Duration::from_secs(5));

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}

pub mod config;
pub mod logging;
pub mod error;
pub mod week;
pub mod db;
pub mod ebitda;
pub mod pricing;

pub use error::{LedgerError, Result};

pub mod aggregator;
pub mod status;
pub mod snapshot;
pub mod entries;
pub mod reports;
pub mod contracts;

pub use aggregator::{WeeklyFinancials, aggregate_week, compute_ebitda};
pub use snapshot::calculate_and_store_ebitda_snapshot;
pub use status::{Projection, TrendPoint, project};

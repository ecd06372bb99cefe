pub mod payments;
pub mod financial_entries;
pub mod ebitda_snapshots;
pub mod pricing_tiers;

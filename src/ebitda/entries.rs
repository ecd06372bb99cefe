use tracing::{info, instrument};

use super::contracts::SaveFinancialEntryRequest;
use crate::db::models::financial_entries::FinancialEntryModel;
use crate::db::store::LedgerStore;
use crate::error::Result;

/// Validate and store a week's expense figures; a later entry for the same week replaces the earlier one
#[instrument(skip(store, request), fields(week_start_date = %request.week_start_date))]
pub async fn save_financial_entry<S: LedgerStore>(
    store: &S,
    request: &SaveFinancialEntryRequest,
) -> Result<FinancialEntryModel> {
    let entry = request.validate()?;
    let saved = store.save_financial_entry(&entry).await?;
    info!(entry_id = saved.id, week_start = %saved.week_start, "Saved financial entry");
    Ok(saved)
}

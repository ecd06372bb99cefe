// Current pricing tier, read from storage on every call (no in-process cache).
use rust_decimal::Decimal;
use tracing::info;

use crate::db::models::pricing_tiers::{NewPricingTierModel, PricingTierModel};
use crate::db::store::TierStore;
use crate::error::{LedgerError, Result};

pub struct PricingService<S> {
    store: S,
}

impl<S: TierStore> PricingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_current_tier(&self) -> Result<PricingTierModel> {
        self.store
            .current_tier()
            .await?
            .ok_or_else(|| LedgerError::NotFound("no current pricing tier".to_string()))
    }

    /// Make a new tier current; the previous current tier is deactivated in the same write
    pub async fn replace_current_tier(&self, name: &str, weekly_price: Decimal) -> Result<PricingTierModel> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("tier name is required"));
        }
        if weekly_price < Decimal::ZERO {
            return Err(LedgerError::validation("weekly price must not be negative"));
        }
        let tier = self
            .store
            .replace_current_tier(&NewPricingTierModel {
                name: name.to_string(),
                weekly_price,
            })
            .await?;
        info!(tier_id = tier.id, name = %tier.name, weekly_price = %tier.weekly_price, "Replaced current pricing tier");
        Ok(tier)
    }
}

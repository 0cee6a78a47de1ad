//! Provider, Item and Offer Endpoints

use serde::Serialize;

use super::{query_string, DataService, Entity, Method};
use crate::error::ApiResult;
use crate::models::{Item, Offer, Provider, ProviderTiers};
use crate::offers::OfferInput;

impl Entity for Provider {
    const PATH: &'static str = "providers";
}

impl Entity for Item {
    const PATH: &'static str = "items";
}

impl Entity for Offer {
    const PATH: &'static str = "offers";
}

// ========================
// Request Bodies
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderInput {
    pub company_name: String,
    pub details: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemInput {
    pub item_name: String,
    pub description: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    pub provider_ids: Vec<u32>,
}

#[derive(Serialize)]
struct TierThresholdsBody<'a> {
    thresholds: &'a std::collections::BTreeMap<String, u64>,
}

// ========================
// Commands
// ========================

impl DataService {
    /// Active providers linked to an item
    pub async fn providers_for_item(&self, item_id: u32) -> ApiResult<Vec<Provider>> {
        self.fetch(Method::Get, &format!("items/{}/providers", item_id), None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn delete_offers_for_item(&self, item_id: u32) -> ApiResult<()> {
        self.execute(Method::Delete, &format!("items/{}/offers", item_id), None).await
    }

    /// Offers filtered by item and/or provider. A timestamp defeats caches.
    pub async fn offers_filtered(&self, item_id: Option<u32>, provider_id: Option<u32>) -> ApiResult<Vec<Offer>> {
        let query = query_string(&[
            ("item_id", item_id.map(|v| v.to_string())),
            ("provider_id", provider_id.map(|v| v.to_string())),
            ("_t", Some((js_sys::Date::now() as u64).to_string())),
        ]);
        self.fetch(Method::Get, &format!("offers{}", query), None)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Replace all offers of an item with `inputs`
    pub async fn replace_item_offers(&self, item_id: u32, inputs: &[OfferInput]) -> ApiResult<()> {
        self.delete_offers_for_item(item_id).await?;
        for input in inputs {
            self.create::<Offer, _>(input).await?;
        }
        tracing::info!("Saved {} offers for item {}", inputs.len(), item_id);
        Ok(())
    }

    pub async fn tier_thresholds(&self, provider_id: u32) -> ApiResult<ProviderTiers> {
        self.fetch(Method::Get, &format!("providers/{}/tier-thresholds", provider_id), None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn save_tier_thresholds(&self, provider_id: u32, thresholds: &std::collections::BTreeMap<String, u64>) -> ApiResult<()> {
        let body = serde_json::to_string(&TierThresholdsBody { thresholds })?;
        self.execute(Method::Put, &format!("providers/{}/tier-thresholds", provider_id), Some(body)).await
    }
}

//! Offer Draft
//!
//! Per-provider tier prices being edited in the item form.
//! Every tier of every added provider needs a positive price before saving.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ApiError;
use crate::format::thousands;
use crate::models::{Offer, Provider, ProviderTiers};
use crate::pricing::{thresholds_from_map, BASE_TIER};

/// A tier the provider prices separately
#[derive(Debug, Clone, PartialEq)]
pub struct TierSlot {
    pub tier: u32,
    pub label: String,
}

/// Tier slots for a provider, sorted; missing thresholds give tier 1 only
pub fn tier_slots(tiers: &ProviderTiers) -> Vec<TierSlot> {
    let thresholds = thresholds_from_map(&tiers.thresholds);
    if thresholds.is_empty() {
        return vec![TierSlot { tier: BASE_TIER, label: format!("Tier {}: < 0 units", BASE_TIER) }];
    }
    thresholds
        .into_iter()
        .map(|t| TierSlot {
            tier: t.tier,
            label: format!("Tier {}: < {} units", t.tier, thousands(t.threshold)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPrices {
    pub provider_id: u32,
    pub provider_name: String,
    pub tiers: Vec<TierSlot>,
    /// tier -> price per unit
    pub prices: BTreeMap<u32, f64>,
}

impl ProviderPrices {
    fn missing_tiers(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiers
            .iter()
            .map(|t| t.tier)
            .filter(|tier| !matches!(self.prices.get(tier), Some(p) if *p > 0.0))
    }
}

/// Body of `POST /offers`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferInput {
    pub item_id: u32,
    pub provider_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    pub tier_number: u32,
    pub price_per_unit: f64,
    pub status: String,
}

/// Whether an item's saved offers have been read into its draft.
/// Saving replaces every offer of the item, so only a `Ready` draft may be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftLoad {
    Loading,
    Ready,
    Failed(String),
}

impl DraftLoad {
    pub fn can_submit(&self) -> bool {
        matches!(self, DraftLoad::Ready)
    }

    pub fn check(&self) -> Result<(), ApiError> {
        match self {
            DraftLoad::Ready => Ok(()),
            DraftLoad::Loading => Err(ApiError::validation("Existing offers are still loading")),
            DraftLoad::Failed(reason) => Err(ApiError::validation(format!(
                "Existing offers could not be loaded ({}); reopen the item to try again",
                reason
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferDraft {
    /// In the order providers were added
    providers: Vec<ProviderPrices>,
}

impl OfferDraft {
    pub fn providers(&self) -> &[ProviderPrices] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn contains(&self, provider_id: u32) -> bool {
        self.providers.iter().any(|p| p.provider_id == provider_id)
    }

    pub fn provider_ids(&self) -> Vec<u32> {
        self.providers.iter().map(|p| p.provider_id).collect()
    }

    /// Active providers not yet in the draft
    pub fn available<'a>(&self, all: &'a [Provider]) -> Vec<&'a Provider> {
        all.iter().filter(|p| p.is_active() && !self.contains(p.id)).collect()
    }

    /// No-op if the provider is already present
    pub fn add_provider(&mut self, provider: &Provider, tiers: Vec<TierSlot>) {
        if self.contains(provider.id) {
            return;
        }
        self.providers.push(ProviderPrices {
            provider_id: provider.id,
            provider_name: provider.company_name.clone(),
            tiers,
            prices: BTreeMap::new(),
        });
    }

    pub fn remove_provider(&mut self, provider_id: u32) {
        self.providers.retain(|p| p.provider_id != provider_id);
    }

    /// Empty or unparsable input clears the price
    pub fn set_price(&mut self, provider_id: u32, tier: u32, raw: &str) {
        let Some(entry) = self.providers.iter_mut().find(|p| p.provider_id == provider_id) else {
            return;
        };
        match raw.trim().parse::<f64>() {
            Ok(price) if price.is_finite() => {
                entry.prices.insert(tier, price);
            }
            _ => {
                entry.prices.remove(&tier);
            }
        }
    }

    /// Copy the first tier's price to the provider's other tiers.
    /// Returns false when the first tier has no positive price.
    pub fn apply_first_tier_to_all(&mut self, provider_id: u32) -> bool {
        let Some(entry) = self.providers.iter_mut().find(|p| p.provider_id == provider_id) else {
            return false;
        };
        let Some(first) = entry.tiers.first().map(|t| t.tier) else {
            return false;
        };
        let price = match entry.prices.get(&first) {
            Some(p) if *p > 0.0 => *p,
            _ => return false,
        };
        for slot in &entry.tiers {
            entry.prices.insert(slot.tier, price);
        }
        true
    }

    /// (provider, tier) pairs still lacking a positive price
    pub fn missing_prices(&self) -> Vec<(u32, u32)> {
        self.providers
            .iter()
            .flat_map(|p| p.missing_tiers().map(move |tier| (p.provider_id, tier)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_prices().is_empty()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        match self.missing_prices().first() {
            None => Ok(()),
            Some((provider_id, tier)) => {
                let name = self
                    .providers
                    .iter()
                    .find(|p| p.provider_id == *provider_id)
                    .map(|p| p.provider_name.as_str())
                    .unwrap_or("provider");
                Err(ApiError::validation(format!(
                    "Please enter a positive price for every tier ({} tier {} is missing)",
                    name, tier
                )))
            }
        }
    }

    /// Rebuild a draft from saved offers of an item
    pub fn from_existing(providers: &[(Provider, Vec<TierSlot>)], offers: &[Offer]) -> Self {
        let mut draft = Self::default();
        for (provider, tiers) in providers {
            draft.add_provider(provider, tiers.clone());
            if let Some(entry) = draft.providers.last_mut() {
                for offer in offers.iter().filter(|o| o.provider_id == provider.id) {
                    entry.prices.insert(offer.tier_number, offer.price_per_unit);
                }
            }
        }
        draft
    }

    /// One offer per priced tier
    pub fn to_inputs(&self, item_id: u32, process_id: Option<u32>) -> Vec<OfferInput> {
        self.providers
            .iter()
            .flat_map(|p| {
                p.prices.iter().map(move |(tier, price)| OfferInput {
                    item_id,
                    provider_id: p.provider_id,
                    process_id,
                    tier_number: *tier,
                    price_per_unit: *price,
                    status: "active".to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: u32, name: &str) -> Provider {
        Provider { id, company_name: name.to_string(), details: None, status: "active".to_string() }
    }

    fn two_tiers() -> Vec<TierSlot> {
        let mut tiers = ProviderTiers::default();
        tiers.thresholds.insert("1".into(), 0);
        tiers.thresholds.insert("2".into(), 1000);
        tier_slots(&tiers)
    }

    #[test]
    fn test_unloaded_draft_blocks_submit() {
        // An empty draft validates, so the load state is what keeps it from wiping offers
        assert!(OfferDraft::default().validate().is_ok());

        assert!(!DraftLoad::Loading.can_submit());
        assert!(DraftLoad::Loading.check().unwrap_err().is_validation());

        let failed = DraftLoad::Failed("Request failed with status 500".to_string());
        assert!(!failed.can_submit());
        assert!(failed.check().unwrap_err().to_string().contains("status 500"));

        assert!(DraftLoad::Ready.can_submit());
        assert!(DraftLoad::Ready.check().is_ok());
    }

    #[test]
    fn test_tier_slots_labels() {
        let slots = two_tiers();
        assert_eq!(slots[1].label, "Tier 2: < 1,000 units");
        assert_eq!(tier_slots(&ProviderTiers::default()).len(), 1);
    }

    #[test]
    fn test_validation_requires_positive_prices() {
        let mut draft = OfferDraft::default();
        draft.add_provider(&provider(1, "Acme"), two_tiers());
        draft.set_price(1, 1, "0.5");
        assert_eq!(draft.missing_prices(), vec![(1, 2)]);
        assert!(draft.validate().unwrap_err().is_validation());

        draft.set_price(1, 2, "0");
        assert!(!draft.is_complete());

        draft.set_price(1, 2, "0.45");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_clearing_input_removes_price() {
        let mut draft = OfferDraft::default();
        draft.add_provider(&provider(1, "Acme"), two_tiers());
        draft.set_price(1, 1, "2");
        draft.set_price(1, 1, "");
        assert!(draft.providers()[0].prices.is_empty());
    }

    #[test]
    fn test_apply_first_tier_to_all() {
        let mut draft = OfferDraft::default();
        draft.add_provider(&provider(1, "Acme"), two_tiers());
        assert!(!draft.apply_first_tier_to_all(1));

        draft.set_price(1, 1, "0.3");
        assert!(draft.apply_first_tier_to_all(1));
        assert!(draft.is_complete());
        assert_eq!(draft.providers()[0].prices.get(&2), Some(&0.3));
    }

    #[test]
    fn test_available_excludes_added_and_inactive() {
        let mut inactive = provider(3, "Old");
        inactive.status = "inactive".to_string();
        let all = vec![provider(1, "Acme"), provider(2, "Beta"), inactive];
        let mut draft = OfferDraft::default();
        draft.add_provider(&all[0], two_tiers());
        let ids: Vec<u32> = draft.available(&all).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_existing_offers_round_into_inputs() {
        let offers = vec![
            Offer { id: 10, item_id: 5, provider_id: 1, process_id: Some(2), tier_number: 1, price_per_unit: 0.5, status: "active".into() },
            Offer { id: 11, item_id: 5, provider_id: 1, process_id: Some(2), tier_number: 2, price_per_unit: 0.4, status: "active".into() },
        ];
        let draft = OfferDraft::from_existing(&[(provider(1, "Acme"), two_tiers())], &offers);
        assert!(draft.is_complete());
        let inputs = draft.to_inputs(5, Some(2));
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].tier_number, 2);
        assert_eq!(inputs[1].price_per_unit, 0.4);
    }
}

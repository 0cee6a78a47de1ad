//! Page Data Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.
//! Each page loads the collections it needs; the backend stays the source of truth.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Item, Offer, Process, ProcessEdge, Product, Provider};

/// Records loaded from the backend, with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub providers: Vec<Provider>,
    pub items: Vec<Item>,
    pub offers: Vec<Offer>,
    pub processes: Vec<Process>,
    pub edges: Vec<ProcessEdge>,
    pub products: Vec<Product>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Look up a provider's display name
pub fn provider_name(providers: &[Provider], id: u32) -> String {
    providers
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.company_name.clone())
        .unwrap_or_else(|| format!("Provider #{}", id))
}

pub fn item_name(items: &[Item], id: u32) -> String {
    items
        .iter()
        .find(|i| i.id == id)
        .map(|i| i.item_name.clone())
        .unwrap_or_else(|| format!("Item #{}", id))
}

/// Process heading for a group of items; `None` is items outside any process
pub fn process_name(processes: &[Process], id: Option<u32>) -> String {
    match id {
        None => "Unassigned items".to_string(),
        Some(id) => processes
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Process #{}", id)),
    }
}

/// Offers of one item grouped by provider, each sorted by tier
pub fn offers_by_provider(offers: &[Offer], item_id: u32) -> Vec<(u32, Vec<Offer>)> {
    let mut groups: Vec<(u32, Vec<Offer>)> = Vec::new();
    for offer in offers.iter().filter(|o| o.item_id == item_id) {
        match groups.iter_mut().find(|(pid, _)| *pid == offer.provider_id) {
            Some((_, list)) => list.push(offer.clone()),
            None => groups.push((offer.provider_id, vec![offer.clone()])),
        }
    }
    for (_, list) in groups.iter_mut() {
        list.sort_by_key(|o| o.tier_number);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: u32, item_id: u32, provider_id: u32, tier: u32) -> Offer {
        Offer { id, item_id, provider_id, process_id: None, tier_number: tier, price_per_unit: 1.0, status: "active".into() }
    }

    #[test]
    fn test_offers_by_provider() {
        let offers = vec![offer(1, 5, 2, 2), offer(2, 5, 1, 1), offer(3, 5, 2, 1), offer(4, 6, 1, 1)];
        let groups = offers_by_provider(&offers, 5);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 2);
        assert_eq!(groups[0].1.iter().map(|o| o.tier_number).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(groups[1].1.len(), 1);
    }

    #[test]
    fn test_name_fallbacks() {
        assert_eq!(provider_name(&[], 4), "Provider #4");
        assert_eq!(item_name(&[], 9), "Item #9");
    }
}

//! Provider Allocations
//!
//! How a product's items split their volume across providers. Selected items
//! are grouped by process and each group carries one split that applies to
//! all of its items. A percentage split must total 100%; a units split is
//! taken as entered.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{AllocationMode, Item, ItemAllocation, Offer, Provider, ProviderShare};

pub const FULL_SHARE: f64 = 100.0;

const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationGroup {
    pub process_id: Option<u32>,
    pub item_ids: Vec<u32>,
    pub mode: AllocationMode,
    /// (provider id, company name), in the order they were found
    pub providers: Vec<(u32, String)>,
    values: BTreeMap<u32, f64>,
}

impl AllocationGroup {
    fn new(process_id: Option<u32>, item_ids: Vec<u32>, providers: Vec<(u32, String)>) -> Self {
        let values = providers.iter().map(|(id, _)| (*id, 0.0)).collect();
        Self { process_id, item_ids, mode: AllocationMode::Percentage, providers, values }
    }

    pub fn value(&self, provider_id: u32) -> f64 {
        self.values.get(&provider_id).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Unparsable or negative input counts as 0
    pub fn set_value(&mut self, provider_id: u32, raw: &str) {
        if let Some(slot) = self.values.get_mut(&provider_id) {
            *slot = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0);
        }
    }

    /// Switching modes clears every value
    pub fn set_mode(&mut self, mode: AllocationMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.values.values_mut().for_each(|v| *v = 0.0);
    }

    /// 100% to one provider, 0 to the rest. Percentage mode only.
    pub fn give_all_to(&mut self, provider_id: u32) -> bool {
        if self.mode != AllocationMode::Percentage || !self.values.contains_key(&provider_id) {
            return false;
        }
        for (id, value) in self.values.iter_mut() {
            *value = if *id == provider_id { FULL_SHARE } else { 0.0 };
        }
        true
    }

    /// Groups without providers have nothing to split
    pub fn is_balanced(&self) -> bool {
        match self.mode {
            AllocationMode::Units => true,
            AllocationMode::Percentage => self.providers.is_empty() || (self.total() - FULL_SHARE).abs() < TOLERANCE,
        }
    }

    pub fn to_allocation(&self) -> ItemAllocation {
        ItemAllocation {
            mode: self.mode,
            providers: self
                .providers
                .iter()
                .map(|(id, name)| ProviderShare {
                    provider_id: *id,
                    provider_name: Some(name.clone()),
                    value: self.value(*id),
                })
                .collect(),
        }
    }

    fn restore(&mut self, saved: &ItemAllocation) {
        self.mode = saved.mode;
        for share in &saved.providers {
            if let Some(slot) = self.values.get_mut(&share.provider_id) {
                *slot = share.value.max(0.0);
            }
        }
    }

    fn carry_over(&mut self, previous: &AllocationGroup) {
        self.mode = previous.mode;
        for (id, value) in self.values.iter_mut() {
            *value = previous.value(*id);
        }
    }
}

/// Providers with an active offer on any of `item_ids`, first seen first
fn offering_providers(item_ids: &[u32], offers: &[Offer], providers: &[Provider]) -> Vec<(u32, String)> {
    let mut found: Vec<(u32, String)> = Vec::new();
    for item_id in item_ids {
        for offer in offers.iter().filter(|o| o.item_id == *item_id && o.status == "active") {
            if found.iter().any(|(id, _)| *id == offer.provider_id) {
                continue;
            }
            let name = crate::store::provider_name(providers, offer.provider_id);
            found.push((offer.provider_id, name));
        }
    }
    found
}

/// Regroup the selected items by process.
///
/// A group that already existed keeps its mode and values; a new one starts
/// from the product's saved allocation of its first item that has one, else
/// from a zeroed percentage split.
pub fn rebuild_groups(
    previous: &[AllocationGroup],
    selected: &[u32],
    items: &[Item],
    offers: &[Offer],
    providers: &[Provider],
    saved: &BTreeMap<String, ItemAllocation>,
) -> Vec<AllocationGroup> {
    let mut by_process: BTreeMap<Option<u32>, Vec<u32>> = BTreeMap::new();
    for item_id in selected {
        if let Some(item) = items.iter().find(|i| i.id == *item_id) {
            by_process.entry(item.process_id).or_default().push(item.id);
        }
    }

    by_process
        .into_iter()
        .map(|(process_id, item_ids)| {
            let mut group = AllocationGroup::new(process_id, item_ids.clone(), offering_providers(&item_ids, offers, providers));
            if let Some(prev) = previous.iter().find(|g| g.process_id == process_id) {
                group.carry_over(prev);
            } else if let Some(stored) = item_ids.iter().find_map(|id| saved.get(&id.to_string())) {
                group.restore(stored);
            }
            group
        })
        .collect()
}

pub fn validate_allocations(groups: &[AllocationGroup]) -> Result<(), ApiError> {
    if groups.iter().all(AllocationGroup::is_balanced) {
        Ok(())
    } else {
        Err(ApiError::validation("Invalid allocations: every percentage split must total 100%"))
    }
}

/// Body of the product's `allocations` field: one entry per item of every
/// group that has providers
pub fn allocation_payload(groups: &[AllocationGroup]) -> BTreeMap<u32, ItemAllocation> {
    groups
        .iter()
        .filter(|g| !g.providers.is_empty())
        .flat_map(|g| {
            let allocation = g.to_allocation();
            g.item_ids.iter().map(move |id| (*id, allocation.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, process_id: Option<u32>) -> Item {
        Item {
            id,
            item_name: format!("Item {}", id),
            description: None,
            status: "active".to_string(),
            process_id,
        }
    }

    fn provider(id: u32, name: &str) -> Provider {
        Provider { id, company_name: name.to_string(), details: None, status: "active".to_string() }
    }

    fn offer(item_id: u32, provider_id: u32) -> Offer {
        Offer {
            id: item_id * 100 + provider_id,
            item_id,
            provider_id,
            process_id: None,
            tier_number: 1,
            price_per_unit: 1.0,
            status: "active".to_string(),
        }
    }

    fn fixture() -> (Vec<Item>, Vec<Offer>, Vec<Provider>) {
        let items = vec![item(1, Some(10)), item(2, Some(10)), item(3, Some(20))];
        let offers = vec![offer(1, 7), offer(2, 8), offer(2, 7), offer(3, 9)];
        let providers = vec![provider(7, "Acme"), provider(8, "Beta"), provider(9, "Gamma")];
        (items, offers, providers)
    }

    #[test]
    fn test_groups_follow_processes_and_offers() {
        let (items, offers, providers) = fixture();
        let groups = rebuild_groups(&[], &[3, 1, 2], &items, &offers, &providers, &BTreeMap::new());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].process_id, Some(10));
        assert_eq!(groups[0].item_ids, vec![1, 2]);
        assert_eq!(groups[0].providers, vec![(7, "Acme".to_string()), (8, "Beta".to_string())]);
        assert_eq!(groups[1].providers, vec![(9, "Gamma".to_string())]);
        assert_eq!(groups[0].total(), 0.0);
    }

    #[test]
    fn test_percentage_must_total_hundred() {
        let (items, offers, providers) = fixture();
        let mut groups = rebuild_groups(&[], &[1, 2], &items, &offers, &providers, &BTreeMap::new());
        assert!(validate_allocations(&groups).unwrap_err().is_validation());

        groups[0].set_value(7, "60");
        groups[0].set_value(8, "30");
        assert!(!groups[0].is_balanced());
        groups[0].set_value(8, "40");
        assert!(validate_allocations(&groups).is_ok());

        groups[0].set_value(8, "33.3");
        groups[0].set_value(7, "66.7");
        assert!(groups[0].is_balanced());
    }

    #[test]
    fn test_give_all_to_one_provider() {
        let (items, offers, providers) = fixture();
        let mut groups = rebuild_groups(&[], &[1, 2], &items, &offers, &providers, &BTreeMap::new());
        groups[0].set_value(7, "20");
        assert!(groups[0].give_all_to(8));
        assert_eq!((groups[0].value(7), groups[0].value(8)), (0.0, 100.0));
        assert!(groups[0].is_balanced());
        assert!(!groups[0].give_all_to(99));

        groups[0].set_mode(AllocationMode::Units);
        assert!(!groups[0].give_all_to(7));
    }

    #[test]
    fn test_mode_switch_clears_values_and_units_are_free() {
        let (items, offers, providers) = fixture();
        let mut groups = rebuild_groups(&[], &[1, 2], &items, &offers, &providers, &BTreeMap::new());
        groups[0].give_all_to(7);
        groups[0].set_mode(AllocationMode::Units);
        assert_eq!(groups[0].total(), 0.0);
        groups[0].set_value(7, "1500");
        groups[0].set_value(8, "-4");
        assert_eq!(groups[0].value(8), 0.0);
        assert!(validate_allocations(&groups).is_ok());
    }

    #[test]
    fn test_group_without_providers_does_not_block() {
        let items = vec![item(5, None)];
        let groups = rebuild_groups(&[], &[5], &items, &[], &[], &BTreeMap::new());
        assert!(groups[0].providers.is_empty());
        assert!(validate_allocations(&groups).is_ok());
        assert!(allocation_payload(&groups).is_empty());
    }

    #[test]
    fn test_edits_survive_reselection() {
        let (items, offers, providers) = fixture();
        let mut groups = rebuild_groups(&[], &[1], &items, &offers, &providers, &BTreeMap::new());
        groups[0].give_all_to(7);
        let groups = rebuild_groups(&groups, &[1, 2, 3], &items, &offers, &providers, &BTreeMap::new());
        assert_eq!(groups[0].value(7), 100.0);
        assert_eq!(groups[0].value(8), 0.0);
        assert_eq!(groups[1].total(), 0.0);
    }

    #[test]
    fn test_saved_allocation_is_restored_and_resubmitted() {
        let (items, offers, providers) = fixture();
        let mut saved = BTreeMap::new();
        saved.insert(
            "2".to_string(),
            ItemAllocation {
                mode: AllocationMode::Percentage,
                providers: vec![
                    ProviderShare { provider_id: 7, provider_name: None, value: 25.0 },
                    ProviderShare { provider_id: 8, provider_name: None, value: 75.0 },
                    ProviderShare { provider_id: 42, provider_name: None, value: 10.0 },
                ],
            },
        );
        let groups = rebuild_groups(&[], &[1, 2], &items, &offers, &providers, &saved);
        assert_eq!((groups[0].value(7), groups[0].value(8)), (25.0, 75.0));
        assert!(groups[0].is_balanced());

        let payload = allocation_payload(&groups);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[&1], payload[&2]);
        assert_eq!(payload[&1].providers[1].provider_name.as_deref(), Some("Beta"));
    }
}

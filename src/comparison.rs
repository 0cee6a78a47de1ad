//! Allocation Comparison
//!
//! Current allocations (as saved on products) against an edited plan, both
//! costed by the backend at the same product quantities.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::format::{currency, thousands};
use crate::models::{AllocationMode, CostComparison, CostDelta, ProductAllocationDetail, ProviderShare};

/// One item's split inside a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPlan {
    pub item_name: String,
    pub mode: AllocationMode,
    pub allocations: Vec<ProviderShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPlan {
    pub product_name: String,
    /// item id -> split
    pub items: BTreeMap<String, ItemPlan>,
}

/// product id -> plan; the nested shape `/optimization/compare` accepts
pub type AllocationPlan = BTreeMap<String, ProductPlan>;

/// Start a plan as a copy of the current allocations
pub fn plan_from_details(details: &BTreeMap<String, ProductAllocationDetail>) -> AllocationPlan {
    details
        .iter()
        .map(|(product_id, product)| {
            let items = product
                .items
                .iter()
                .map(|(item_id, item)| {
                    let plan = ItemPlan {
                        item_name: item.item_name.clone(),
                        mode: item.allocation.mode,
                        allocations: item
                            .allocation
                            .providers
                            .iter()
                            .map(|share| ProviderShare { provider_id: share.provider_id, provider_name: share.provider_name.clone(), value: share.value })
                            .collect(),
                    };
                    (item_id.clone(), plan)
                })
                .collect();
            (product_id.clone(), ProductPlan { product_name: product.product_name.clone(), items })
        })
        .collect()
}

/// Plan to re-run with when the first comparison went out without one.
/// `None` when the result already stands.
pub fn seed_plan(sent: &AllocationPlan, result: &CostComparison) -> Option<AllocationPlan> {
    if !sent.is_empty() || !result.optimized.provider_breakdown.is_empty() {
        return None;
    }
    let seeded = plan_from_details(&result.current.allocation_details);
    (!seeded.is_empty()).then_some(seeded)
}

/// Unparsable or negative input counts as 0. Returns false for an unknown slot.
pub fn set_plan_value(plan: &mut AllocationPlan, product_id: &str, item_id: &str, provider_id: u32, raw: &str) -> bool {
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0);
    let share = plan
        .get_mut(product_id)
        .and_then(|p| p.items.get_mut(item_id))
        .and_then(|i| i.allocations.iter_mut().find(|s| s.provider_id == provider_id));
    match share {
        Some(share) => {
            share.value = value;
            true
        }
        None => false,
    }
}

/// "25%" or "1,500 files"
pub fn share_label(mode: AllocationMode, value: f64) -> String {
    match mode {
        AllocationMode::Percentage => format!("{}%", value),
        AllocationMode::Units => format!("{} files", thousands(value.max(0.0).round() as u64)),
    }
}

/// Direction of the optimized plan's cost against the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaTone {
    Saving,
    Increase,
}

impl DeltaTone {
    pub fn of(delta: &CostDelta) -> Self {
        if delta.amount < 0.0 {
            DeltaTone::Saving
        } else {
            DeltaTone::Increase
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            DeltaTone::Saving => "delta-saving",
            DeltaTone::Increase => "delta-increase",
        }
    }
}

/// "↓ $1,200.00 (-12.5%)"
pub fn delta_label(delta: &CostDelta) -> String {
    let arrow = match DeltaTone::of(delta) {
        DeltaTone::Saving => "↓",
        DeltaTone::Increase => "↑",
    };
    let sign = if delta.percent > 0.0 { "+" } else { "" };
    format!("{} {} ({}{:.1}%)", arrow, currency(delta.amount.abs()), sign, delta.percent)
}

/// Badge class per tier; tiers past 5 share one style
pub fn tier_badge_class(tier: u32) -> &'static str {
    match tier {
        1 => "tier-badge tier-1",
        2 => "tier-badge tier-2",
        3 => "tier-badge tier-3",
        4 => "tier-badge tier-4",
        5 => "tier-badge tier-5",
        _ => "tier-badge tier-other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostResult, ItemAllocation, ItemAllocationDetail, ProviderCost};

    fn details() -> BTreeMap<String, ProductAllocationDetail> {
        let mut items = BTreeMap::new();
        items.insert(
            "4".to_string(),
            ItemAllocationDetail {
                item_name: "Scan".to_string(),
                allocation: ItemAllocation {
                    mode: AllocationMode::Percentage,
                    providers: vec![
                        ProviderShare { provider_id: 2, provider_name: Some("Acme".into()), value: 60.0 },
                        ProviderShare { provider_id: 3, provider_name: Some("Beta".into()), value: 40.0 },
                    ],
                },
            },
        );
        let mut out = BTreeMap::new();
        out.insert("1".to_string(), ProductAllocationDetail { product_name: "Loan".to_string(), items });
        out
    }

    #[test]
    fn test_plan_mirrors_current_allocations() {
        let plan = plan_from_details(&details());
        let item = &plan["1"].items["4"];
        assert_eq!(item.item_name, "Scan");
        assert_eq!(item.allocations.len(), 2);
        assert_eq!(item.allocations[0].value, 60.0);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["1"]["items"]["4"]["mode"], "percentage");
        assert_eq!(json["1"]["items"]["4"]["allocations"][1]["provider_id"], 3);
    }

    #[test]
    fn test_seed_only_after_an_unplanned_empty_result() {
        let mut result = CostComparison::default();
        result.current.allocation_details = details();
        let seeded = seed_plan(&AllocationPlan::new(), &result).unwrap();
        assert_eq!(seeded.len(), 1);

        // Already sent a plan
        assert!(seed_plan(&seeded, &result).is_none());

        // Optimized side already costed
        let mut costed = result.clone();
        costed.optimized = CostResult::default();
        costed.optimized.provider_breakdown.insert("Acme".into(), ProviderCost::default());
        assert!(seed_plan(&AllocationPlan::new(), &costed).is_none());

        // Nothing to seed from
        assert!(seed_plan(&AllocationPlan::new(), &CostComparison::default()).is_none());
    }

    #[test]
    fn test_set_plan_value() {
        let mut plan = plan_from_details(&details());
        assert!(set_plan_value(&mut plan, "1", "4", 3, "55"));
        assert_eq!(plan["1"].items["4"].allocations[1].value, 55.0);
        assert!(set_plan_value(&mut plan, "1", "4", 2, "oops"));
        assert_eq!(plan["1"].items["4"].allocations[0].value, 0.0);
        assert!(!set_plan_value(&mut plan, "1", "9", 2, "10"));
    }

    #[test]
    fn test_delta_label_and_tone() {
        let saving = CostDelta { amount: -1200.0, percent: -12.5 };
        assert_eq!(DeltaTone::of(&saving), DeltaTone::Saving);
        assert_eq!(delta_label(&saving), "↓ $1,200.00 (-12.5%)");

        let increase = CostDelta { amount: 50.0, percent: 2.0 };
        assert_eq!(delta_label(&increase), "↑ $50.00 (+2.0%)");
        assert_eq!(DeltaTone::of(&CostDelta::default()), DeltaTone::Increase);
    }

    #[test]
    fn test_share_label_and_badges() {
        assert_eq!(share_label(AllocationMode::Percentage, 33.3), "33.3%");
        assert_eq!(share_label(AllocationMode::Units, 1500.0), "1,500 files");
        assert_eq!(tier_badge_class(2), "tier-badge tier-2");
        assert_eq!(tier_badge_class(9), "tier-badge tier-other");
    }
}

//! Frontend Models
//!
//! Records exchanged with the REST backend. Ids arrive as `<entity>_id` on the
//! wire and are read into a plain `id` field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_status() -> String {
    "active".to_string()
}

// ========================
// Entities
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(alias = "provider_id")]
    pub id: u32,
    pub company_name: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Provider {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(alias = "item_id")]
    pub id: u32,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub process_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(alias = "offer_id")]
    pub id: u32,
    pub item_id: u32,
    pub provider_id: u32,
    #[serde(default)]
    pub process_id: Option<u32>,
    pub tier_number: u32,
    pub price_per_unit: f64,
    #[serde(default = "default_status")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    #[serde(alias = "process_id")]
    pub id: u32,
    #[serde(alias = "process_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessEdge {
    pub from_process_id: u32,
    pub to_process_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "product_id")]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub item_ids: Vec<u32>,
    /// Default quantity pre-filled on the optimization page
    #[serde(default)]
    pub proxy_quantity: Option<u64>,
    #[serde(default)]
    pub price_multipliers: BTreeMap<String, PriceMultiplier>,
    /// item id -> how the item's volume is split across providers
    #[serde(default)]
    pub allocations: BTreeMap<String, ItemAllocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMultiplier {
    pub multiplier: f64,
    #[serde(default)]
    pub notes: String,
}

impl Default for PriceMultiplier {
    fn default() -> Self {
        Self { multiplier: 1.0, notes: String::new() }
    }
}

// ========================
// Allocations
// ========================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    #[default]
    Percentage,
    Units,
}

impl AllocationMode {
    pub fn suffix(self) -> &'static str {
        match self {
            AllocationMode::Percentage => "%",
            AllocationMode::Units => "units",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderShare {
    pub provider_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub value: f64,
}

/// Split of one item's volume; `value`s are percentages or absolute units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemAllocation {
    #[serde(default)]
    pub mode: AllocationMode,
    /// Saved products use `providers`, cost results use `allocations`
    #[serde(default, alias = "allocations")]
    pub providers: Vec<ProviderShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(alias = "forecast_id")]
    pub id: u32,
    pub product_id: u32,
    pub year: i32,
    pub month: u32,
    #[serde(alias = "forecast_units")]
    pub units: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actual {
    #[serde(alias = "actual_id")]
    pub id: u32,
    pub product_id: u32,
    pub year: i32,
    pub month: u32,
    #[serde(alias = "actual_units")]
    pub units: u64,
}

// ========================
// Tier Data
// ========================

/// Response of `/providers/{id}/tier-thresholds`, keyed by tier number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderTiers {
    #[serde(default)]
    pub thresholds: BTreeMap<String, u64>,
    #[serde(default)]
    pub base_prices: BTreeMap<String, f64>,
}

/// One provider card of `/optimization/tier-status`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierStatus {
    pub calculated_tier: u32,
    #[serde(default)]
    pub override_tier: Option<u32>,
    pub effective_tier: u32,
    #[serde(default)]
    pub total_credit_files: u64,
    #[serde(default)]
    pub override_notes: Option<String>,
}

// ========================
// Optimization
// ========================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptimizedOffer {
    pub offer_id: u32,
    pub provider_id: u32,
    pub provider_name: String,
    pub tier_number: u32,
    pub price_per_unit: f64,
    pub total_cost: f64,
    #[serde(default)]
    pub is_optimal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptimizationSummary {
    #[serde(default)]
    pub best_provider: Option<String>,
    #[serde(default)]
    pub best_total_cost: Option<f64>,
    #[serde(default)]
    pub worst_total_cost: Option<f64>,
    #[serde(default)]
    pub average_cost: Option<f64>,
    #[serde(default)]
    pub total_providers: u32,
    #[serde(default)]
    pub max_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptimizationResult {
    pub item_id: u32,
    #[serde(default)]
    pub item_name: String,
    pub quantity: u64,
    #[serde(default)]
    pub offers: Vec<OptimizedOffer>,
    #[serde(default)]
    pub summary: OptimizationSummary,
    #[serde(default)]
    pub message: Option<String>,
}

impl OptimizationResult {
    pub fn best_offer(&self) -> Option<&OptimizedOffer> {
        self.offers.iter().find(|o| o.is_optimal).or_else(|| self.offers.first())
    }

    /// Savings of `offer` relative to the most expensive one
    pub fn savings_for(&self, offer: &OptimizedOffer) -> f64 {
        self.summary.worst_total_cost.map(|worst| worst - offer.total_cost).unwrap_or(0.0)
    }
}

// ========================
// Cost Breakdown
// ========================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TierInfo {
    #[serde(default = "base_tier")]
    pub effective_tier: u32,
    #[serde(default)]
    pub source: String,
}

fn base_tier() -> u32 {
    1
}

/// One item a provider was allocated
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostRow {
    pub item_name: String,
    pub allocated_units: f64,
    pub price_per_unit: f64,
    pub total_cost: f64,
    #[serde(default = "base_tier")]
    pub calculated_tier: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderCost {
    pub total_cost: f64,
    pub total_units: f64,
    #[serde(default)]
    pub tier_info: TierInfo,
    #[serde(default)]
    pub rows: Vec<CostRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductCost {
    pub product_name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemAllocationDetail {
    pub item_name: String,
    #[serde(flatten)]
    pub allocation: ItemAllocation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductAllocationDetail {
    pub product_name: String,
    /// item id -> allocation
    #[serde(default)]
    pub items: BTreeMap<String, ItemAllocationDetail>,
}

/// Cost of a set of allocations at the given product quantities
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CostResult {
    #[serde(default)]
    pub total_cost: f64,
    /// provider name -> cost
    #[serde(default)]
    pub provider_breakdown: BTreeMap<String, ProviderCost>,
    /// product id -> cost
    #[serde(default)]
    pub product_breakdown: BTreeMap<String, ProductCost>,
    /// product id -> per-item allocations (normalized to percentages)
    #[serde(default)]
    pub allocation_details: BTreeMap<String, ProductAllocationDetail>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CostDelta {
    pub amount: f64,
    pub percent: f64,
}

/// Response of `/optimization/compare`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CostComparison {
    pub current: CostResult,
    pub optimized: CostResult,
    #[serde(default)]
    pub delta: CostDelta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_are_aliased() {
        let p: Provider = serde_json::from_str(r#"{"provider_id":7,"company_name":"Acme","details":null}"#).unwrap();
        assert_eq!(p.id, 7);
        assert_eq!(p.status, "active");
        assert!(p.details.is_none());

        let proc: Process = serde_json::from_str(r#"{"process_id":3,"process_name":"Intake"}"#).unwrap();
        assert_eq!((proc.id, proc.name.as_str()), (3, "Intake"));

        let f: Forecast = serde_json::from_str(r#"{"forecast_id":1,"product_id":2,"year":2025,"month":4,"forecast_units":900}"#).unwrap();
        assert_eq!(f.units, 900);
    }

    #[test]
    fn test_comparison_decodes_breakdowns() {
        let json = r#"{
            "current": {
                "total_cost": 1200.0,
                "provider_breakdown": {
                    "Acme": {"total_cost": 1200.0, "total_units": 3000,
                             "tier_info": {"effective_tier": 2, "source": "calculated", "lookup_volume": 3000},
                             "rows": [{"item_name": "Scan", "allocated_units": 3000, "price_per_unit": 0.4,
                                       "multiplier_display": "-", "total_cost": 1200.0, "calculated_tier": 2}]}
                },
                "product_breakdown": {"1": {"product_name": "Loan", "cost": 1200.0}},
                "allocation_details": {"1": {"product_name": "Loan", "items": {"4": {"item_name": "Scan",
                    "allocations": [{"provider_id": 2, "provider_name": "Acme", "value": 100.0, "mode": "percentage"}]}}}}
            },
            "optimized": {"total_cost": 0, "provider_breakdown": {}, "product_breakdown": {}, "allocation_details": {}},
            "delta": {"amount": -1200.0, "percent": -100.0}
        }"#;
        let cmp: CostComparison = serde_json::from_str(json).unwrap();
        let acme = &cmp.current.provider_breakdown["Acme"];
        assert_eq!(acme.tier_info.effective_tier, 2);
        assert_eq!(acme.rows[0].allocated_units, 3000.0);
        let item = &cmp.current.allocation_details["1"].items["4"];
        assert_eq!(item.allocation.mode, AllocationMode::Percentage);
        assert_eq!(item.allocation.providers[0].value, 100.0);
        assert_eq!(cmp.delta.amount, -1200.0);
    }

    #[test]
    fn test_saved_allocation_roundtrips_wire_names() {
        let json = r#"{"mode":"units","providers":[{"provider_id":3,"provider_name":"Beta","value":500}]}"#;
        let alloc: ItemAllocation = serde_json::from_str(json).unwrap();
        assert_eq!(alloc.mode, AllocationMode::Units);
        let out = serde_json::to_value(&alloc).unwrap();
        assert_eq!(out["mode"], "units");
        assert_eq!(out["providers"][0]["value"], 500.0);
    }

    #[test]
    fn test_best_offer_prefers_flag() {
        let json = r#"{
            "item_id": 1, "item_name": "Scan", "quantity": 100,
            "offers": [
                {"offer_id": 1, "provider_id": 1, "provider_name": "A", "tier_number": 1, "price_per_unit": 2.0, "total_cost": 200.0, "is_optimal": false},
                {"offer_id": 2, "provider_id": 2, "provider_name": "B", "tier_number": 1, "price_per_unit": 1.5, "total_cost": 150.0, "is_optimal": true}
            ],
            "summary": {"worst_total_cost": 200.0, "total_providers": 2, "max_savings": 50.0}
        }"#;
        let result: OptimizationResult = serde_json::from_str(json).unwrap();
        let best = result.best_offer().unwrap();
        assert_eq!(best.offer_id, 2);
        assert_eq!(result.savings_for(best), 50.0);
    }
}

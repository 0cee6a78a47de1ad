//! Optimization Endpoints

use std::collections::BTreeMap;

use serde::Serialize;

use super::{query_string, DataService, Method};
use crate::comparison::AllocationPlan;
use crate::error::{ApiError, ApiResult};
use crate::models::{CostComparison, CostResult, OptimizationResult, TierStatus};

#[derive(Serialize)]
struct QuantitiesBody<'a> {
    product_quantities: &'a BTreeMap<u32, u64>,
}

#[derive(Serialize)]
struct CompareBody<'a> {
    product_quantities: &'a BTreeMap<u32, u64>,
    optimized_allocations: &'a AllocationPlan,
}

impl DataService {
    pub async fn calculate_optimization(&self, item_id: u32, quantity: u64) -> ApiResult<OptimizationResult> {
        let query = query_string(&[
            ("item_id", Some(item_id.to_string())),
            ("quantity", Some(quantity.to_string())),
        ]);
        self.fetch(Method::Get, &format!("optimization/calculate{}", query), None)
            .await?
            .ok_or_else(|| ApiError::Decode("empty optimization response".to_string()))
    }

    /// Provider name -> tier status for the given product quantities
    pub async fn tier_status(&self, product_quantities: &BTreeMap<u32, u64>) -> ApiResult<BTreeMap<String, TierStatus>> {
        let body = serde_json::to_string(&QuantitiesBody { product_quantities })?;
        self.fetch(Method::Post, "optimization/tier-status", Some(body))
            .await
            .map(Option::unwrap_or_default)
    }

    /// Cost of the allocations saved on the products
    pub async fn current_cost(&self, product_quantities: &BTreeMap<u32, u64>) -> ApiResult<CostResult> {
        let body = serde_json::to_string(&QuantitiesBody { product_quantities })?;
        self.fetch(Method::Post, "optimization/cost", Some(body))
            .await
            .map(Option::unwrap_or_default)
    }

    /// Current allocations against `plan`, costed at the same quantities
    pub async fn compare_allocations(&self, product_quantities: &BTreeMap<u32, u64>, plan: &AllocationPlan) -> ApiResult<CostComparison> {
        let body = serde_json::to_string(&CompareBody { product_quantities, optimized_allocations: plan })?;
        self.fetch(Method::Post, "optimization/compare", Some(body))
            .await?
            .ok_or_else(|| ApiError::Decode("empty comparison response".to_string()))
    }
}

//! Product, Forecast and Actual Endpoints

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DataService, Entity, Method};
use crate::error::ApiResult;
use crate::models::{Actual, Forecast, ItemAllocation, PriceMultiplier, Product};

impl Entity for Product {
    const PATH: &'static str = "products";
}

impl Entity for Forecast {
    const PATH: &'static str = "forecasts";
}

impl Entity for Actual {
    const PATH: &'static str = "actuals";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub status: String,
    pub item_ids: Vec<u32>,
    /// item id -> multiplier; only non-default entries
    pub price_multipliers: BTreeMap<u32, PriceMultiplier>,
    /// item id -> provider split
    pub allocations: BTreeMap<u32, ItemAllocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastInput {
    pub product_id: u32,
    pub year: i32,
    pub month: u32,
    pub forecast_units: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActualInput {
    pub product_id: u32,
    pub year: i32,
    pub month: u32,
    pub actual_units: u64,
}

impl DataService {
    pub async fn forecasts_for_product(&self, product_id: u32) -> ApiResult<Vec<Forecast>> {
        self.fetch(Method::Get, &format!("forecasts/product/{}", product_id), None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn actuals_for_product(&self, product_id: u32) -> ApiResult<Vec<Actual>> {
        self.fetch(Method::Get, &format!("actuals/product/{}", product_id), None)
            .await
            .map(Option::unwrap_or_default)
    }
}

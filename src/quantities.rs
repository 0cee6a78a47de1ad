//! Product Quantities
//!
//! Per-product volumes entered on the optimization page.

use std::collections::BTreeMap;

use crate::error::{ApiError, ApiResult};
use crate::models::Product;

/// Start every product at its proxy quantity (0 when unset)
pub fn initial_quantities(products: &[Product]) -> BTreeMap<u32, u64> {
    products.iter().map(|p| (p.id, p.proxy_quantity.unwrap_or(0))).collect()
}

/// Largest volume a single product input accepts
pub const MAX_UNITS: u64 = 1_000_000_000_000;

/// Lenient parse for the per-product inputs; anything invalid counts as 0,
/// anything larger than [`MAX_UNITS`] is capped
pub fn parse_units(raw: &str) -> u64 {
    let raw = raw.trim();
    raw.parse::<u64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0).map(|v| v as u64))
        .unwrap_or(0)
        .min(MAX_UNITS)
}

/// Volume shown on a product's card; 0 for products not in the map
pub fn quantity_for(quantities: &BTreeMap<u32, u64>, product_id: u32) -> u64 {
    quantities.get(&product_id).copied().unwrap_or(0)
}

pub fn total_quantity(quantities: &BTreeMap<u32, u64>) -> u64 {
    quantities.values().fold(0u64, |acc, q| acc.saturating_add(*q))
}

/// Only products with a volume are sent to the tier-status endpoint
pub fn positive_quantities(quantities: &BTreeMap<u32, u64>) -> BTreeMap<u32, u64> {
    quantities.iter().filter(|(_, q)| **q > 0).map(|(id, q)| (*id, *q)).collect()
}

/// Quantity for an optimization run; must be greater than 0
pub fn parse_quantity(raw: &str) -> ApiResult<u64> {
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    match value {
        Some(v) if v > 0.0 => Ok(v.ceil() as u64),
        _ => Err(ApiError::validation("Quantity is required and must be greater than 0")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, proxy: Option<u64>) -> Product {
        Product {
            id,
            name: format!("P{}", id),
            description: None,
            status: "active".to_string(),
            item_ids: vec![],
            proxy_quantity: proxy,
            price_multipliers: BTreeMap::new(),
            allocations: BTreeMap::new(),
        }
    }

    #[test]
    fn test_initial_quantities_use_proxy() {
        let q = initial_quantities(&[product(1, Some(1200)), product(2, None)]);
        assert_eq!(q[&1], 1200);
        assert_eq!(q[&2], 0);
        assert_eq!(total_quantity(&q), 1200);
        assert_eq!(positive_quantities(&q).len(), 1);
    }

    #[test]
    fn test_card_value_follows_reset_to_proxy() {
        let products = [product(1, Some(1200)), product(2, None)];
        let mut q = initial_quantities(&products);
        q.insert(1, 77);
        q.insert(2, 5);
        assert_eq!(quantity_for(&q, 1), 77);

        q = initial_quantities(&products);
        assert_eq!(quantity_for(&q, 1), 1200);
        assert_eq!(quantity_for(&q, 2), 0);
        assert_eq!(quantity_for(&q, 9), 0);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("250"), 250);
        assert_eq!(parse_units("12.7"), 12);
        assert_eq!(parse_units(""), 0);
        assert_eq!(parse_units("-3"), 0);
        assert_eq!(parse_units("99999999999999999999"), MAX_UNITS);
        assert_eq!(parse_units("1e30"), MAX_UNITS);
    }

    #[test]
    fn test_total_of_huge_volumes_does_not_overflow() {
        let mut q = BTreeMap::new();
        q.insert(1, parse_units("99999999999999999999"));
        q.insert(2, parse_units("99999999999999999999"));
        assert_eq!(total_quantity(&q), 2 * MAX_UNITS);

        q.insert(3, u64::MAX);
        assert_eq!(total_quantity(&q), u64::MAX);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("5000").unwrap(), 5000);
        assert!(parse_quantity("0").unwrap_err().is_validation());
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("").is_err());
    }
}

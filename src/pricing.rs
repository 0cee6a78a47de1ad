//! Pricing Utilities
//!
//! Tier lookup over provider thresholds and price multiplier labels.

use std::collections::BTreeMap;

use crate::models::{PriceMultiplier, ProviderTiers};

/// Tier every quantity qualifies for
pub const BASE_TIER: u32 = 1;

pub const MIN_MULTIPLIER: f64 = 0.01;
pub const MAX_MULTIPLIER: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThreshold {
    pub tier: u32,
    pub threshold: u64,
}

/// Convert the wire map (`{"1": 0, "2": 1000}`) into thresholds sorted by tier.
/// Keys that aren't tier numbers are skipped.
pub fn thresholds_from_map(map: &BTreeMap<String, u64>) -> Vec<TierThreshold> {
    let mut tiers: Vec<TierThreshold> = map
        .iter()
        .filter_map(|(k, v)| k.trim().parse::<u32>().ok().map(|tier| TierThreshold { tier, threshold: *v }))
        .collect();
    tiers.sort_by_key(|t| t.tier);
    tiers
}

/// Highest threshold not exceeding `quantity` wins; falls back to tier 1.
pub fn select_tier(thresholds: &[TierThreshold], quantity: u64) -> u32 {
    let mut by_threshold: Vec<&TierThreshold> = thresholds.iter().collect();
    by_threshold.sort_by(|a, b| b.threshold.cmp(&a.threshold));
    by_threshold
        .into_iter()
        .find(|t| quantity >= t.threshold)
        .map(|t| t.tier)
        .unwrap_or(BASE_TIER)
}

/// Current tier of one provider for an aggregated quantity
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTierSummary {
    pub provider_name: String,
    pub tier: u32,
    pub total_quantity: u64,
    /// Base price of the selected tier, if the provider set one
    pub base_price: Option<f64>,
}

pub fn summarize_tiers(provider_name: &str, tiers: &ProviderTiers, total_quantity: u64) -> ProviderTierSummary {
    let tier = select_tier(&thresholds_from_map(&tiers.thresholds), total_quantity);
    let base_price = tiers
        .base_prices
        .get(&tier.to_string())
        .copied()
        .filter(|p| *p > 0.0);
    ProviderTierSummary {
        provider_name: provider_name.to_string(),
        tier,
        total_quantity,
        base_price,
    }
}

// ========================
// Multipliers
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTone {
    Discount,
    Standard,
    Premium,
}

impl PriceTone {
    pub fn of(multiplier: f64) -> Self {
        if multiplier < 1.0 {
            PriceTone::Discount
        } else if multiplier > 1.0 {
            PriceTone::Premium
        } else {
            PriceTone::Standard
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            PriceTone::Discount => "tone-discount",
            PriceTone::Standard => "tone-standard",
            PriceTone::Premium => "tone-premium",
        }
    }
}

/// 0.9 -> "10.0% discount", 1.0 -> "Standard pricing", 1.2 -> "+20.0% premium"
pub fn multiplier_label(multiplier: f64) -> String {
    let pct = (multiplier - 1.0) * 100.0;
    match PriceTone::of(multiplier) {
        PriceTone::Discount => format!("{:.1}% discount", pct.abs()),
        PriceTone::Premium => format!("+{:.1}% premium", pct),
        PriceTone::Standard => "Standard pricing".to_string(),
    }
}

/// Parse user input; unparsable or zero becomes 1.0, then clamped to [0.01, 10]
pub fn parse_multiplier(raw: &str) -> f64 {
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v != 0.0).unwrap_or(1.0);
    value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
}

/// Only non-default multipliers, or ones carrying notes, are sent
pub fn multiplier_payload(entries: &BTreeMap<u32, PriceMultiplier>) -> BTreeMap<u32, PriceMultiplier> {
    entries
        .iter()
        .filter(|(_, m)| m.multiplier != 1.0 || !m.notes.is_empty())
        .map(|(id, m)| (*id, m.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TierThreshold> {
        vec![
            TierThreshold { tier: 1, threshold: 0 },
            TierThreshold { tier: 2, threshold: 1000 },
            TierThreshold { tier: 3, threshold: 5000 },
        ]
    }

    #[test]
    fn test_select_tier() {
        assert_eq!(select_tier(&sample(), 4999), 2);
        assert_eq!(select_tier(&sample(), 0), 1);
        assert_eq!(select_tier(&sample(), 5000), 3);
        assert_eq!(select_tier(&sample(), 1_000_000), 3);
    }

    #[test]
    fn test_select_tier_falls_back_to_base() {
        assert_eq!(select_tier(&[], 123), BASE_TIER);
        let no_floor = vec![TierThreshold { tier: 2, threshold: 500 }];
        assert_eq!(select_tier(&no_floor, 10), BASE_TIER);
    }

    #[test]
    fn test_thresholds_from_map_sorts_and_skips_junk() {
        let mut map = BTreeMap::new();
        map.insert("10".to_string(), 90_000);
        map.insert("2".to_string(), 1000);
        map.insert("x".to_string(), 5);
        let tiers = thresholds_from_map(&map);
        assert_eq!(tiers.iter().map(|t| t.tier).collect::<Vec<_>>(), vec![2, 10]);
    }

    #[test]
    fn test_summarize_tiers_picks_base_price() {
        let mut tiers = ProviderTiers::default();
        tiers.thresholds.insert("1".into(), 0);
        tiers.thresholds.insert("2".into(), 1000);
        tiers.base_prices.insert("2".into(), 0.75);
        let summary = summarize_tiers("Acme", &tiers, 1500);
        assert_eq!(summary.tier, 2);
        assert_eq!(summary.base_price, Some(0.75));

        let summary = summarize_tiers("Acme", &tiers, 10);
        assert_eq!(summary.tier, 1);
        assert_eq!(summary.base_price, None);
    }

    #[test]
    fn test_multiplier_label() {
        assert_eq!(multiplier_label(0.9), "10.0% discount");
        assert_eq!(multiplier_label(1.0), "Standard pricing");
        assert_eq!(multiplier_label(1.2), "+20.0% premium");
    }

    #[test]
    fn test_parse_multiplier_clamps() {
        assert_eq!(parse_multiplier("0.85"), 0.85);
        assert_eq!(parse_multiplier("abc"), 1.0);
        assert_eq!(parse_multiplier("0"), 1.0);
        assert_eq!(parse_multiplier("0.001"), MIN_MULTIPLIER);
        assert_eq!(parse_multiplier("25"), MAX_MULTIPLIER);
    }

    #[test]
    fn test_multiplier_payload_skips_defaults() {
        let mut entries = BTreeMap::new();
        entries.insert(1, PriceMultiplier::default());
        entries.insert(2, PriceMultiplier { multiplier: 0.9, notes: String::new() });
        entries.insert(3, PriceMultiplier { multiplier: 1.0, notes: "volume deal".into() });
        let payload = multiplier_payload(&entries);
        assert_eq!(payload.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    }
}

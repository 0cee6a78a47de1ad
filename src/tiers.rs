//! Tier Threshold Rows
//!
//! Editable list of tier thresholds for the provider form.
//! Tier 1 always exists and can't be removed.

use std::collections::BTreeMap;

use crate::pricing::{thresholds_from_map, BASE_TIER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRow {
    pub tier: u32,
    pub threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierRows {
    rows: Vec<TierRow>,
    /// Highest tier number ever used; new rows continue from here
    tier_count: u32,
}

impl Default for TierRows {
    fn default() -> Self {
        Self {
            rows: vec![TierRow { tier: BASE_TIER, threshold: 0 }],
            tier_count: BASE_TIER,
        }
    }
}

impl TierRows {
    /// Load from the wire map; an empty map yields the single base tier
    pub fn from_thresholds(map: &BTreeMap<String, u64>) -> Self {
        let rows: Vec<TierRow> = thresholds_from_map(map)
            .into_iter()
            .map(|t| TierRow { tier: t.tier, threshold: t.threshold })
            .collect();
        if rows.is_empty() {
            return Self::default();
        }
        let tier_count = rows.iter().map(|r| r.tier).max().unwrap_or(BASE_TIER);
        Self { rows, tier_count }
    }

    pub fn rows(&self) -> &[TierRow] {
        &self.rows
    }

    /// Append the next tier with a zero threshold; returns its number
    pub fn add_row(&mut self) -> u32 {
        self.tier_count += 1;
        self.rows.push(TierRow { tier: self.tier_count, threshold: 0 });
        self.tier_count
    }

    pub fn remove_row(&mut self, tier: u32) {
        if tier != BASE_TIER {
            self.rows.retain(|r| r.tier != tier);
        }
    }

    /// Unparsable input counts as 0
    pub fn set_threshold(&mut self, tier: u32, raw: &str) {
        let value = raw.trim().parse::<u64>().unwrap_or(0);
        if let Some(row) = self.rows.iter_mut().find(|r| r.tier == tier) {
            row.threshold = value;
        }
    }

    /// Back to the wire format
    pub fn thresholds(&self) -> BTreeMap<String, u64> {
        self.rows.iter().map(|r| (r.tier.to_string(), r.threshold)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_gives_base_tier() {
        let rows = TierRows::from_thresholds(&BTreeMap::new());
        assert_eq!(rows.rows(), &[TierRow { tier: 1, threshold: 0 }]);
    }

    #[test]
    fn test_add_continues_after_highest_tier() {
        let mut map = BTreeMap::new();
        map.insert("1".to_string(), 0);
        map.insert("3".to_string(), 5000);
        let mut rows = TierRows::from_thresholds(&map);
        assert_eq!(rows.add_row(), 4);

        // Removing the last row doesn't recycle its number
        rows.remove_row(4);
        assert_eq!(rows.add_row(), 5);
    }

    #[test]
    fn test_base_tier_is_permanent() {
        let mut rows = TierRows::default();
        rows.add_row();
        rows.remove_row(1);
        assert_eq!(rows.rows().len(), 2);
        assert_eq!(rows.rows()[0].tier, 1);
    }

    #[test]
    fn test_edit_and_export() {
        let mut rows = TierRows::default();
        let t2 = rows.add_row();
        rows.set_threshold(t2, " 1000 ");
        rows.set_threshold(1, "-5");
        let out = rows.thresholds();
        assert_eq!(out.get("1"), Some(&0));
        assert_eq!(out.get("2"), Some(&1000));
    }
}

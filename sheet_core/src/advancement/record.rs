//! Lifetime and per-tier advancement counts

use crate::types::Tier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many times each advancement id has been taken.
///
/// Per-tier counts are keyed by the tier the level-up landed in, so a
/// character entering tier 3 sees an empty tier-3 table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementRecord {
    #[serde(default)]
    lifetime: BTreeMap<String, u32>,
    #[serde(default)]
    per_tier: BTreeMap<Tier, BTreeMap<String, u32>>,
}

impl AdvancementRecord {
    pub fn new() -> Self {
        AdvancementRecord::default()
    }

    /// Total times `id` was taken over the character's life
    pub fn lifetime(&self, id: &str) -> u32 {
        self.lifetime.get(id).copied().unwrap_or(0)
    }

    /// Times `id` was taken within `tier`
    pub fn in_tier(&self, tier: Tier, id: &str) -> u32 {
        self.per_tier
            .get(&tier)
            .and_then(|counts| counts.get(id))
            .copied()
            .unwrap_or(0)
    }

    /// Count one selection of `id` in `tier`
    pub fn record(&mut self, tier: Tier, id: &str) {
        *self.lifetime.entry(id.to_string()).or_insert(0) += 1;
        *self
            .per_tier
            .entry(tier)
            .or_default()
            .entry(id.to_string())
            .or_insert(0) += 1;
    }

    /// Counts taken within `tier`; empty if nothing was taken there
    pub fn tier_counts(&self, tier: Tier) -> impl Iterator<Item = (&str, u32)> {
        self.per_tier
            .get(&tier)
            .into_iter()
            .flat_map(|counts| counts.iter().map(|(id, n)| (id.as_str(), *n)))
    }

    /// Lifetime counts for every id taken at least once
    pub fn lifetime_counts(&self) -> impl Iterator<Item = (&str, u32)> {
        self.lifetime.iter().map(|(id, n)| (id.as_str(), *n))
    }

    /// Tiers in which anything was recorded
    pub fn tiers(&self) -> impl Iterator<Item = Tier> + '_ {
        self.per_tier.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_lifetime_and_tier() {
        let mut record = AdvancementRecord::new();
        record.record(Tier::Two, "add_hp");
        record.record(Tier::Three, "add_hp");
        record.record(Tier::Three, "add_hp");

        assert_eq!(record.lifetime("add_hp"), 3);
        assert_eq!(record.in_tier(Tier::Two, "add_hp"), 1);
        assert_eq!(record.in_tier(Tier::Three, "add_hp"), 2);
        assert_eq!(record.in_tier(Tier::Four, "add_hp"), 0);
        assert_eq!(record.lifetime("multiclass"), 0);
    }

    #[test]
    fn test_new_tier_starts_empty() {
        let mut record = AdvancementRecord::new();
        record.record(Tier::Two, "increase_traits");
        assert_eq!(record.tier_counts(Tier::Three).count(), 0);
        assert_eq!(record.tier_counts(Tier::Two).collect::<Vec<_>>(), vec![("increase_traits", 1)]);
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_tier_keys() {
        let mut record = AdvancementRecord::new();
        record.record(Tier::Four, "multiclass");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"tier4\""));
        let back: AdvancementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

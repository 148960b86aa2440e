//! Advancement definitions per tier

use crate::types::Tier;
use serde::{Deserialize, Serialize};

fn default_cost() -> u32 {
    1
}

/// One purchasable advancement as defined for a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementDef {
    pub id: String,
    pub name: String,
    #[serde(default = "default_cost")]
    pub cost: u32,
    /// Lifetime cap on this option as of the defining tier
    pub selections_per_tier: u32,
}

/// Advancement definitions keyed by tier; tier 1 has none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancementTable {
    #[serde(default)]
    pub tier2: Vec<AdvancementDef>,
    #[serde(default)]
    pub tier3: Vec<AdvancementDef>,
    #[serde(default)]
    pub tier4: Vec<AdvancementDef>,
}

impl AdvancementTable {
    /// Definitions listed under exactly this tier
    pub fn tier(&self, tier: Tier) -> &[AdvancementDef] {
        match tier {
            Tier::One => &[],
            Tier::Two => &self.tier2,
            Tier::Three => &self.tier3,
            Tier::Four => &self.tier4,
        }
    }

    /// Every advancement unlocked at `tier`, each governed by the highest
    /// tier ≤ `tier` that defines it. Order follows first appearance.
    pub fn unlocked(&self, tier: Tier) -> Vec<&AdvancementDef> {
        let mut result: Vec<&AdvancementDef> = Vec::new();
        for t in Tier::ALL.into_iter().filter(|t| *t <= tier) {
            for def in self.tier(t) {
                match result.iter_mut().find(|d| d.id == def.id) {
                    Some(slot) => *slot = def,
                    None => result.push(def),
                }
            }
        }
        result
    }

    /// The governing definition of `id` at `tier`
    pub fn governing(&self, id: &str, tier: Tier) -> Option<&AdvancementDef> {
        Tier::ALL
            .into_iter()
            .rev()
            .filter(|t| *t <= tier)
            .find_map(|t| self.tier(t).iter().find(|d| d.id == id))
    }

    /// Whether any tier defines `id`
    pub fn is_known(&self, id: &str) -> bool {
        Tier::ALL
            .into_iter()
            .any(|t| self.tier(t).iter().any(|d| d.id == id))
    }
}

//! Advancement eligibility and budget validation

use super::AdvancementRecord;
use crate::character::Character;
use crate::config::{AdvancementDef, ReferenceData};
use crate::error::ProgressionError;
use crate::types::Tier;
use std::collections::HashSet;

/// Points every level-up must spend
pub const ADVANCEMENT_POINTS: u32 = 2;

pub const INCREASE_TRAITS: &str = "increase_traits";
pub const INCREASE_EXPERIENCE: &str = "increase_experience";
pub const INCREASE_PROFICIENCY: &str = "increase_proficiency";
pub const INCREASE_EVASION: &str = "increase_evasion";
pub const ADD_HP: &str = "add_hp";
pub const ADD_STRESS: &str = "add_stress";
pub const MULTICLASS: &str = "multiclass";
pub const UPGRADE_SUBCLASS: &str = "upgrade_subclass";

/// Lowest level at which multiclassing unlocks
pub const MULTICLASS_MIN_LEVEL: u8 = 5;

/// How the cost of a selection must relate to the point budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Exact(u32),
    /// Used by the generator when it runs out of legal choices
    AtMost(u32),
}

/// An advancement that needs a follow-up choice before it can apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexAdvancement {
    IncreaseTraits,
    IncreaseExperience,
    /// Extra domain card at or below `ceiling`
    DomainCard { id: String, ceiling: u8 },
    Multiclass,
    UpgradeSubclass,
}

impl ComplexAdvancement {
    /// Classify an advancement id taken when reaching `new_level`
    pub fn from_id(id: &str, new_level: u8) -> Option<ComplexAdvancement> {
        let cap = match id {
            INCREASE_TRAITS => return Some(ComplexAdvancement::IncreaseTraits),
            INCREASE_EXPERIENCE => return Some(ComplexAdvancement::IncreaseExperience),
            MULTICLASS => return Some(ComplexAdvancement::Multiclass),
            UPGRADE_SUBCLASS => return Some(ComplexAdvancement::UpgradeSubclass),
            "take_domain_card_t2" => 4,
            "take_domain_card_t3" => 7,
            "take_domain_card_t4" => 10,
            _ => return None,
        };
        Some(ComplexAdvancement::DomainCard {
            id: id.to_string(),
            ceiling: new_level.min(cap),
        })
    }

    pub fn id(&self) -> &str {
        match self {
            ComplexAdvancement::IncreaseTraits => INCREASE_TRAITS,
            ComplexAdvancement::IncreaseExperience => INCREASE_EXPERIENCE,
            ComplexAdvancement::DomainCard { id, .. } => id,
            ComplexAdvancement::Multiclass => MULTICLASS,
            ComplexAdvancement::UpgradeSubclass => UPGRADE_SUBCLASS,
        }
    }
}

/// A validated selection, split for application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Ids that only bump counters
    pub simple: Vec<String>,
    /// Ids that need resolution, in selection order
    pub complex: Vec<ComplexAdvancement>,
    pub cost: u32,
}

fn is_tier_exclusive(id: &str) -> bool {
    id == MULTICLASS || id == UPGRADE_SUBCLASS
}

/// Eligibility rules for one level-up of one character
pub struct AdvancementSelector<'a> {
    data: &'a ReferenceData,
    record: &'a AdvancementRecord,
    multiclassed: bool,
    new_level: u8,
    tier: Tier,
}

impl<'a> AdvancementSelector<'a> {
    /// Selector for `character` levelling up to `new_level`
    pub fn new(data: &'a ReferenceData, character: &'a Character, new_level: u8) -> Self {
        AdvancementSelector {
            data,
            record: &character.advancements,
            multiclassed: character.multiclass.is_some(),
            new_level,
            tier: Tier::from_level(new_level),
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Why `def` cannot be taken right now, if it cannot
    fn blocker(&self, def: &AdvancementDef) -> Option<ProgressionError> {
        let not_eligible = || Some(ProgressionError::NotEligible(def.id.clone()));
        if is_tier_exclusive(&def.id) {
            let exclusive_taken = self.record.in_tier(self.tier, MULTICLASS) > 0
                || self.record.in_tier(self.tier, UPGRADE_SUBCLASS) > 0;
            if exclusive_taken {
                return not_eligible();
            }
            let lifetime = self.record.lifetime(&def.id);
            let capped = if def.id == MULTICLASS {
                lifetime > 0 || self.multiclassed || self.new_level < MULTICLASS_MIN_LEVEL
            } else {
                lifetime >= if self.multiclassed { 1 } else { 2 }
            };
            return if capped { not_eligible() } else { None };
        }
        if self.record.lifetime(&def.id) >= def.selections_per_tier {
            return not_eligible();
        }
        None
    }

    /// Advancements that may be selected at this level-up
    pub fn eligible(&self) -> Vec<&'a AdvancementDef> {
        self.data
            .advancements
            .unlocked(self.tier)
            .into_iter()
            .filter(|def| self.blocker(def).is_none())
            .collect()
    }

    /// The governing definition for `id`, or why it is unavailable
    pub fn check(&self, id: &str) -> Result<&'a AdvancementDef, ProgressionError> {
        let Some(def) = self.data.advancements.governing(id, self.tier) else {
            if self.data.advancements.is_known(id) {
                return Err(ProgressionError::NotEligible(id.to_string()));
            }
            return Err(ProgressionError::UnknownAdvancement(id.to_string()));
        };
        match self.blocker(def) {
            Some(err) => Err(err),
            None => Ok(def),
        }
    }

    /// Validate a candidate selection against eligibility and the budget
    pub fn validate<S: AsRef<str>>(
        &self,
        ids: &[S],
        budget: Budget,
    ) -> Result<Selection, ProgressionError> {
        let mut seen = HashSet::new();
        let mut selection = Selection::default();

        for id in ids.iter().map(AsRef::as_ref) {
            if !seen.insert(id) {
                return Err(ProgressionError::DuplicateAdvancement(id.to_string()));
            }
            let def = self.check(id)?;
            selection.cost += def.cost;
            match ComplexAdvancement::from_id(id, self.new_level) {
                Some(complex) => selection.complex.push(complex),
                None => selection.simple.push(id.to_string()),
            }
        }

        if seen.contains(MULTICLASS) && seen.contains(UPGRADE_SUBCLASS) {
            return Err(ProgressionError::TierExclusive);
        }

        let within_budget = match budget {
            Budget::Exact(points) => selection.cost == points,
            Budget::AtMost(points) => selection.cost <= points,
        };
        if !within_budget {
            return Err(ProgressionError::BudgetMismatch {
                spent: selection.cost,
            });
        }

        tracing::debug!(
            level = self.new_level,
            simple = ?selection.simple,
            complex = selection.complex.len(),
            "advancement selection validated"
        );
        Ok(selection)
    }
}

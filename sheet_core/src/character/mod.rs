//! Character - the aggregate being built and levelled

mod creation;
mod equipment;
mod history;

pub use creation::{CharacterDraft, DEFAULT_NAME};
pub use equipment::Equipment;
pub use history::History;

use crate::advancement::selector::{INCREASE_TRAITS, MULTICLASS, UPGRADE_SUBCLASS};
use crate::advancement::AdvancementRecord;
use crate::error::ProgressionError;
use crate::loadout::Loadout;
use crate::types::{Experience, Feature, Tier, Trait, TraitSet, MAX_LEVEL};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Second class taken through the multiclass advancement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiclass {
    pub class: String,
    pub domain: String,
    pub subclass: String,
    pub foundation: Feature,
    pub class_feature: Feature,
    #[serde(default)]
    pub specialization: Option<Feature>,
}

/// Full character state. Cloning yields an independent deep copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub level: u8,
    pub class: String,
    pub subclass: String,
    /// The two active domains; usually the class's own
    pub domains: Vec<String>,
    pub ancestry: String,
    pub community: String,
    pub traits: TraitSet,
    pub experiences: Vec<Experience>,
    /// Owned domain card names
    pub domain_cards: Vec<String>,
    pub loadout: Loadout,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub advancements: AdvancementRecord,
    #[serde(default)]
    pub trait_boosts: BTreeMap<Tier, BTreeSet<Trait>>,
    #[serde(default)]
    pub threshold_bonus: i32,
    #[serde(default)]
    pub multiclass: Option<Multiclass>,
    #[serde(default)]
    pub specialization: Option<Feature>,
    #[serde(default)]
    pub mastery: Option<Feature>,
}

impl Character {
    pub fn tier(&self) -> Tier {
        Tier::from_level(self.level)
    }

    pub fn owns_card(&self, card: &str) -> bool {
        self.domain_cards.iter().any(|c| c == card)
    }

    /// Owned cards not in the loadout
    pub fn vault(&self) -> Vec<&str> {
        self.domain_cards
            .iter()
            .map(String::as_str)
            .filter(|c| !self.loadout.contains(c))
            .collect()
    }

    /// Domains the character may draw cards from, with the multiclass domain last
    pub fn accessible_domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self.domains.iter().map(String::as_str).collect();
        if let Some(multiclass) = &self.multiclass {
            domains.push(&multiclass.domain);
        }
        domains
    }

    /// Whether `trait_` was already boosted within `tier`
    pub fn is_boosted(&self, tier: Tier, trait_: Trait) -> bool {
        self.trait_boosts
            .get(&tier)
            .is_some_and(|set| set.contains(&trait_))
    }

    /// Move an owned vault card into an empty loadout slot
    pub fn add_to_slot(&mut self, card: &str, index: usize) -> Result<(), ProgressionError> {
        if index >= crate::loadout::LOADOUT_SIZE {
            return Err(ProgressionError::SlotOutOfRange(index));
        }
        if !self.owns_card(card) {
            return Err(ProgressionError::CardNotOwned(card.to_string()));
        }
        self.loadout.place(card, index)?;
        tracing::debug!(card, index, "card slotted");
        Ok(())
    }

    /// Send a slot's card back to the vault
    pub fn remove_from_slot(&mut self, index: usize) -> Result<Option<String>, ProgressionError> {
        self.loadout.clear(index)
    }

    /// Exchange an occupied slot's card with a vault card
    pub fn swap_slot(&mut self, index: usize, card: &str) -> Result<String, ProgressionError> {
        if index >= crate::loadout::LOADOUT_SIZE {
            return Err(ProgressionError::SlotOutOfRange(index));
        }
        if !self.owns_card(card) {
            return Err(ProgressionError::CardNotOwned(card.to_string()));
        }
        self.loadout.replace(index, card)
    }

    /// Take ownership of a new card and slot it if there is room
    pub(crate) fn acquire_card(&mut self, card: &str) -> Result<(), ProgressionError> {
        if self.owns_card(card) {
            return Err(ProgressionError::Inconsistent(format!(
                "card '{card}' is already owned"
            )));
        }
        self.domain_cards.push(card.to_string());
        if self.loadout.place_first_empty(card)?.is_none() {
            tracing::debug!(card, "loadout full, card goes to the vault");
        }
        Ok(())
    }

    /// Verify the structural invariants of a committed character
    pub fn check_invariants(&self) -> Result<(), ProgressionError> {
        let fail = |msg: String| Err(ProgressionError::Inconsistent(msg));

        if !(1..=MAX_LEVEL).contains(&self.level) {
            return fail(format!("level {} outside 1..={MAX_LEVEL}", self.level));
        }
        if self.threshold_bonus != i32::from(self.level) - 1 {
            return fail(format!(
                "threshold bonus {} does not match level {}",
                self.threshold_bonus, self.level
            ));
        }

        let tier_entries = (2..=self.level).filter(|l| Tier::is_tier_entry(*l)).count();
        if self.experiences.len() != 2 + tier_entries {
            return fail(format!("{} experiences at level {}", self.experiences.len(), self.level));
        }

        let mut owned = HashSet::new();
        for card in &self.domain_cards {
            if !owned.insert(card.as_str()) {
                return fail(format!("card '{card}' owned twice"));
            }
        }
        let mut slotted = HashSet::new();
        for card in self.loadout.cards() {
            if !owned.contains(card) {
                return Err(ProgressionError::CardNotOwned(card.to_string()));
            }
            if !slotted.insert(card) {
                return fail(format!("card '{card}' slotted twice"));
            }
        }

        if self.equipment.primary().is_some_and(|w| w.is_two_handed())
            && self.equipment.secondary().is_some()
        {
            return fail("secondary weapon held with a two-handed primary".into());
        }

        let multiclass_taken = self.advancements.lifetime(MULTICLASS);
        if multiclass_taken > 1 || (multiclass_taken == 1) != self.multiclass.is_some() {
            return fail("multiclass state does not match the advancement record".into());
        }

        for tier in self.advancements.tiers() {
            if self.advancements.in_tier(tier, MULTICLASS) > 0
                && self.advancements.in_tier(tier, UPGRADE_SUBCLASS) > 0
            {
                return fail(format!("multiclass and subclass upgrade both taken in {tier}"));
            }
        }

        for tier in Tier::ALL {
            let boosted = self.trait_boosts.get(&tier).map_or(0, BTreeSet::len);
            let expected = 2 * self.advancements.in_tier(tier, INCREASE_TRAITS) as usize;
            if boosted != expected {
                return fail(format!("{boosted} traits boosted in {tier}, expected {expected}"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ReferenceData;

    /// Level-1 Guardian used across unit tests
    pub(crate) fn sample_character(data: &ReferenceData) -> Character {
        CharacterDraft::new()
            .name("Brannoc")
            .class("Guardian")
            .subclass("Stalwart")
            .ancestry("Dwarf")
            .community("Ridgeborne")
            .traits(TraitSet::from_array([2, 1, 1, 0, 0, -1]))
            .experience(Experience::new("Blacksmith", "Worked the forge for years"))
            .experience(Experience::new("Stubborn", "Never backs down"))
            .card("Forceful Push")
            .card("Get Back Up")
            .build(data)
            .unwrap()
    }

    #[test]
    fn test_accessible_domains_lists_multiclass_last() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        assert_eq!(character.accessible_domains(), vec!["Valor", "Blade"]);

        character.multiclass = Some(Multiclass {
            class: "Rogue".into(),
            domain: "Midnight".into(),
            subclass: "Syndicate".into(),
            foundation: Feature::default(),
            class_feature: Feature::default(),
            specialization: None,
        });
        assert_eq!(character.accessible_domains(), vec!["Valor", "Blade", "Midnight"]);
    }

    #[test]
    fn test_sample_is_consistent() {
        let data = ReferenceData::builtin().unwrap();
        let character = sample_character(&data);
        assert_eq!(character.level, 1);
        assert_eq!(character.tier(), Tier::One);
        assert!(character.check_invariants().is_ok());
        assert_eq!(character.loadout.get(0), Some("Forceful Push"));
        assert_eq!(character.loadout.get(1), Some("Get Back Up"));
        assert!(character.vault().is_empty());
    }

    #[test]
    fn test_loadout_operations_check_ownership() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);

        assert_eq!(
            character.add_to_slot("Rune Ward", 2),
            Err(ProgressionError::CardNotOwned("Rune Ward".into()))
        );
        assert_eq!(
            character.add_to_slot("Forceful Push", 2),
            Err(ProgressionError::CardAlreadyPlaced("Forceful Push".into()))
        );
        assert_eq!(
            character.add_to_slot("Forceful Push", 9),
            Err(ProgressionError::SlotOutOfRange(9))
        );

        assert_eq!(character.remove_from_slot(0), Ok(Some("Forceful Push".into())));
        assert_eq!(character.vault(), vec!["Forceful Push"]);
        character.add_to_slot("Forceful Push", 4).unwrap();
        assert_eq!(character.loadout.get(4), Some("Forceful Push"));
        assert!(character.check_invariants().is_ok());
    }

    #[test]
    fn test_swap_sends_card_to_vault() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        character.domain_cards.push("I Am Your Shield".into());

        let previous = character.swap_slot(1, "I Am Your Shield").unwrap();
        assert_eq!(previous, "Get Back Up");
        assert_eq!(character.vault(), vec!["Get Back Up"]);
        assert_eq!(
            character.swap_slot(3, "Get Back Up"),
            Err(ProgressionError::SlotEmpty(3))
        );
        assert!(character.check_invariants().is_ok());
    }

    #[test]
    fn test_invariants_catch_unowned_slot() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        character.domain_cards.retain(|c| c != "Get Back Up");
        let err = character.check_invariants().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Inconsistent);
    }

    #[test]
    fn test_invariants_catch_level_without_bonus() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        character.level = 2;
        assert!(character.check_invariants().is_err());
    }

    #[test]
    fn test_snapshot_is_deep_copy() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        let json = serde_json::to_string(&character).unwrap();
        let snapshot = character.clone();

        character.experiences[0].modifier += 1;
        character.remove_from_slot(0).unwrap();

        assert_eq!(snapshot.experiences[0].modifier, 2);
        assert_eq!(snapshot.loadout.get(0), Some("Forceful Push"));
        let restored: Character = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}

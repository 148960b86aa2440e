//! CharacterDraft - collects creation choices and builds a level-1 character

use super::{Character, Equipment};
use crate::advancement::AdvancementRecord;
use crate::config::ReferenceData;
use crate::error::ProgressionError;
use crate::loadout::Loadout;
use crate::types::{Experience, TraitSet, EXPERIENCE_START_MODIFIER};
use std::collections::BTreeMap;

/// Name given to characters created without one
pub const DEFAULT_NAME: &str = "Unnamed Hero";

/// Experiences required at creation
const STARTING_EXPERIENCES: usize = 2;

/// Level-1 cards required at creation
const STARTING_CARDS: usize = 2;

/// Builder for a new level-1 character
#[derive(Debug, Clone, Default)]
pub struct CharacterDraft {
    name: String,
    class: Option<String>,
    domains: Option<[String; 2]>,
    subclass: Option<String>,
    ancestry: Option<String>,
    community: Option<String>,
    traits: Option<TraitSet>,
    experiences: Vec<Experience>,
    cards: Vec<String>,
}

impl CharacterDraft {
    pub fn new() -> Self {
        CharacterDraft::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Replace the class's domain pair with any two distinct domains
    pub fn domains(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.domains = Some([first.into(), second.into()]);
        self
    }

    pub fn subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = Some(subclass.into());
        self
    }

    pub fn ancestry(mut self, ancestry: impl Into<String>) -> Self {
        self.ancestry = Some(ancestry.into());
        self
    }

    pub fn community(mut self, community: impl Into<String>) -> Self {
        self.community = Some(community.into());
        self
    }

    pub fn traits(mut self, traits: TraitSet) -> Self {
        self.traits = Some(traits);
        self
    }

    /// Use the chosen class's suggested trait array
    pub fn suggested_traits(mut self, data: &ReferenceData) -> Result<Self, ProgressionError> {
        let class = self
            .class
            .as_deref()
            .ok_or_else(|| ProgressionError::invalid("choose a class before suggesting traits"))?;
        let def = data
            .class(class)
            .ok_or_else(|| ProgressionError::missing("class", class))?;
        self.traits = Some(def.suggested_traits);
        Ok(self)
    }

    pub fn experience(mut self, experience: Experience) -> Self {
        self.experiences.push(experience);
        self
    }

    pub fn card(mut self, card: impl Into<String>) -> Self {
        self.cards.push(card.into());
        self
    }

    /// Validate every choice and produce the character
    pub fn build(self, data: &ReferenceData) -> Result<Character, ProgressionError> {
        let class_name = self
            .class
            .as_deref()
            .ok_or_else(|| ProgressionError::invalid("a class is required"))?;
        let class = data
            .class(class_name)
            .ok_or_else(|| ProgressionError::missing("class", class_name))?;

        let domains = match &self.domains {
            Some([first, second]) => {
                let known = data.domains();
                for domain in [first, second] {
                    if !known.contains(domain.as_str()) {
                        return Err(ProgressionError::missing("domain", domain.as_str()));
                    }
                }
                if first == second {
                    return Err(ProgressionError::invalid("choose two different domains"));
                }
                vec![first.clone(), second.clone()]
            }
            None => class.domains.clone(),
        };

        let subclass_name = self
            .subclass
            .as_deref()
            .ok_or_else(|| ProgressionError::invalid("a subclass is required"))?;
        if class.subclass(subclass_name).is_none() {
            return Err(ProgressionError::missing("subclass", subclass_name));
        }

        let ancestry = self
            .ancestry
            .as_deref()
            .ok_or_else(|| ProgressionError::invalid("an ancestry is required"))?;
        if data.ancestry(ancestry).is_none() {
            return Err(ProgressionError::missing("ancestry", ancestry));
        }
        let community = self
            .community
            .as_deref()
            .ok_or_else(|| ProgressionError::invalid("a community is required"))?;
        if data.community(community).is_none() {
            return Err(ProgressionError::missing("community", community));
        }

        let traits = self
            .traits
            .ok_or_else(|| ProgressionError::invalid("assign all six traits"))?;
        if !traits.is_starting_array() {
            return Err(ProgressionError::invalid(
                "traits must be assigned +2, +1, +1, 0, 0 and -1",
            ));
        }

        if self.experiences.len() != STARTING_EXPERIENCES {
            return Err(ProgressionError::invalid("choose exactly two experiences"));
        }
        if self.experiences.iter().any(|e| e.name.trim().is_empty()) {
            return Err(ProgressionError::invalid("experiences need a name"));
        }
        let experiences: Vec<Experience> = self
            .experiences
            .into_iter()
            .map(|e| Experience {
                modifier: EXPERIENCE_START_MODIFIER,
                ..e
            })
            .collect();

        if self.cards.len() != STARTING_CARDS || self.cards[0] == self.cards[1] {
            return Err(ProgressionError::invalid("choose two different level 1 domain cards"));
        }
        for name in &self.cards {
            let card = data
                .card(name)
                .ok_or_else(|| ProgressionError::missing("domain card", name.as_str()))?;
            if card.level != 1 || !domains.contains(&card.domain) {
                return Err(ProgressionError::invalid(format!(
                    "'{name}' is not a level 1 card from your domains"
                )));
            }
        }

        let mut loadout = Loadout::new();
        for (index, card) in self.cards.iter().enumerate() {
            loadout.place(card, index)?;
        }

        let name = match self.name.trim() {
            "" => DEFAULT_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };

        let character = Character {
            name,
            level: 1,
            class: class.name.clone(),
            subclass: subclass_name.to_string(),
            domains,
            ancestry: ancestry.to_string(),
            community: community.to_string(),
            traits,
            experiences,
            domain_cards: self.cards,
            loadout,
            equipment: Equipment::default(),
            advancements: AdvancementRecord::new(),
            trait_boosts: BTreeMap::new(),
            threshold_bonus: 0,
            multiclass: None,
            specialization: None,
            mastery: None,
        };
        tracing::info!(name = %character.name, class = %character.class, "character created");
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn draft() -> CharacterDraft {
        CharacterDraft::new()
            .class("Wizard")
            .subclass("School of Knowledge")
            .ancestry("Elf")
            .community("Loreborne")
            .traits(TraitSet::from_array([-1, 0, 0, 1, 1, 2]))
            .experience(Experience::new("Navigator", ""))
            .experience(Experience::new("Tinkering", ""))
            .card("Book of Ava")
            .card("Bolt Beacon")
    }

    #[test]
    fn test_blank_name_defaults() {
        let data = ReferenceData::builtin().unwrap();
        let character = draft().name("   ").build(&data).unwrap();
        assert_eq!(character.name, DEFAULT_NAME);
        assert_eq!(character.domains, vec!["Codex", "Splendor"]);
        assert_eq!(character.domain_cards, vec!["Book of Ava", "Bolt Beacon"]);
        assert_eq!(character.loadout.get(0), Some("Book of Ava"));
        assert_eq!(character.loadout.get(1), Some("Bolt Beacon"));
        assert!(character.check_invariants().is_ok());
    }

    #[test]
    fn test_suggested_traits() {
        let data = ReferenceData::builtin().unwrap();
        let character = draft()
            .traits(TraitSet::default())
            .suggested_traits(&data)
            .unwrap()
            .build(&data)
            .unwrap();
        assert_eq!(character.traits, data.class("Wizard").unwrap().suggested_traits);
    }

    #[test]
    fn test_rejects_invalid_trait_array() {
        let data = ReferenceData::builtin().unwrap();
        let err = draft()
            .traits(TraitSet::from_array([2, 2, 1, 0, 0, -1]))
            .build(&data)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_rejects_cards_outside_domains() {
        let data = ReferenceData::builtin().unwrap();
        let err = CharacterDraft::new()
            .class("Wizard")
            .subclass("School of War")
            .ancestry("Elf")
            .community("Loreborne")
            .traits(TraitSet::from_array([-1, 0, 0, 1, 1, 2]))
            .experience(Experience::new("Navigator", ""))
            .experience(Experience::new("Tinkering", ""))
            .card("Book of Ava")
            .card("Rune Ward")
            .build(&data)
            .unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidChoice(_)));
    }

    #[test]
    fn test_domain_override() {
        let data = ReferenceData::builtin().unwrap();
        let character = draft()
            .domains("Codex", "Arcana")
            .card("Book of Ava")
            .build(&data);
        // three cards now: rejected
        assert!(character.is_err());

        let character = CharacterDraft::new()
            .class("Wizard")
            .domains("Codex", "Arcana")
            .subclass("School of War")
            .ancestry("Elf")
            .community("Loreborne")
            .traits(TraitSet::from_array([-1, 0, 0, 1, 1, 2]))
            .experience(Experience::new("Navigator", ""))
            .experience(Experience::new("Tinkering", ""))
            .card("Book of Ava")
            .card("Rune Ward")
            .build(&data)
            .unwrap();
        assert_eq!(character.domains, vec!["Codex", "Arcana"]);

        let err = draft().domains("Codex", "Codex").build(&data).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidChoice(_)));
    }

    #[test]
    fn test_unknown_subclass_is_lookup_error() {
        let data = ReferenceData::builtin().unwrap();
        let err = draft().subclass("Stalwart").build(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_experience_modifier_is_reset() {
        let data = ReferenceData::builtin().unwrap();
        let mut inflated = Experience::new("Lucky", "");
        inflated.modifier = 5;
        let character = CharacterDraft::new()
            .class("Wizard")
            .subclass("School of War")
            .ancestry("Elf")
            .community("Loreborne")
            .traits(TraitSet::from_array([-1, 0, 0, 1, 1, 2]))
            .experience(inflated)
            .experience(Experience::new("Tinkering", ""))
            .card("Book of Ava")
            .card("Bolt Beacon")
            .build(&data)
            .unwrap();
        assert!(character.experiences.iter().all(|e| e.modifier == 2));
    }
}

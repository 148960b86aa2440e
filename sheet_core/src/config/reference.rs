//! The full set of read-only reference tables

use super::{
    load_toml, parse_toml, AdvancementTable, AncestryDef, ArmorDef, ClassDef, CommunityDef,
    ConfigError, DomainCard, ExperienceCatalog, WeaponDef, Weapons,
};
use crate::types::Tier;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

#[derive(Deserialize)]
struct ClassesFile {
    classes: Vec<ClassDef>,
}

#[derive(Deserialize)]
struct AncestriesFile {
    ancestries: Vec<AncestryDef>,
}

#[derive(Deserialize)]
struct CommunitiesFile {
    communities: Vec<CommunityDef>,
}

#[derive(Deserialize)]
struct DomainCardsFile {
    cards: Vec<DomainCard>,
}

#[derive(Deserialize)]
struct ArmorFile {
    armor: Vec<ArmorDef>,
}

/// Immutable catalogs consumed by every engine operation
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub classes: Vec<ClassDef>,
    pub ancestries: Vec<AncestryDef>,
    pub communities: Vec<CommunityDef>,
    pub domain_cards: Vec<DomainCard>,
    pub weapons: Weapons,
    pub armor: Vec<ArmorDef>,
    pub advancements: AdvancementTable,
    pub experiences: ExperienceCatalog,
}

impl ReferenceData {
    /// The tables shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        let data = ReferenceData {
            classes: parse_toml::<ClassesFile>(include_str!("../../config/classes.toml"))?.classes,
            ancestries: parse_toml::<AncestriesFile>(include_str!("../../config/ancestries.toml"))?
                .ancestries,
            communities: parse_toml::<CommunitiesFile>(include_str!(
                "../../config/communities.toml"
            ))?
            .communities,
            domain_cards: parse_toml::<DomainCardsFile>(include_str!(
                "../../config/domain_cards.toml"
            ))?
            .cards,
            weapons: parse_toml(include_str!("../../config/weapons.toml"))?,
            armor: parse_toml::<ArmorFile>(include_str!("../../config/armor.toml"))?.armor,
            advancements: parse_toml(include_str!("../../config/advancements.toml"))?,
            experiences: parse_toml(include_str!("../../config/experiences.toml"))?,
        };
        data.validate()?;
        tracing::debug!(
            classes = data.classes.len(),
            cards = data.domain_cards.len(),
            "loaded builtin reference data"
        );
        Ok(data)
    }

    /// Load the same set of files from a directory
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        let data = ReferenceData {
            classes: load_toml::<ClassesFile>(&dir.join("classes.toml"))?.classes,
            ancestries: load_toml::<AncestriesFile>(&dir.join("ancestries.toml"))?.ancestries,
            communities: load_toml::<CommunitiesFile>(&dir.join("communities.toml"))?.communities,
            domain_cards: load_toml::<DomainCardsFile>(&dir.join("domain_cards.toml"))?.cards,
            weapons: load_toml(&dir.join("weapons.toml"))?,
            armor: load_toml::<ArmorFile>(&dir.join("armor.toml"))?.armor,
            advancements: load_toml(&dir.join("advancements.toml"))?,
            experiences: load_toml(&dir.join("experiences.toml"))?,
        };
        data.validate()?;
        tracing::info!(path = %dir.display(), "loaded reference data");
        Ok(data)
    }

    /// Check the cross-table rules the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        for class in &self.classes {
            if class.domains.len() != 2 || class.domains[0] == class.domains[1] {
                return invalid(format!("class '{}' must list two distinct domains", class.name));
            }
            if !class.suggested_traits.is_starting_array() {
                return invalid(format!(
                    "class '{}' suggested traits are not a valid starting array",
                    class.name
                ));
            }
            if class.subclasses.is_empty() {
                return invalid(format!("class '{}' has no subclasses", class.name));
            }
        }

        // The same name may appear in two domains; the offer lists collapse it
        let mut cards = HashSet::new();
        for card in &self.domain_cards {
            if !cards.insert((card.domain.as_str(), card.name.as_str())) {
                return invalid(format!(
                    "domain card '{}' listed twice in {}",
                    card.name, card.domain
                ));
            }
            if !(1..=10).contains(&card.level) {
                return invalid(format!("domain card '{}' has level {}", card.name, card.level));
            }
        }

        for armor in &self.armor {
            if armor.threshold_pair().is_none() {
                return invalid(format!(
                    "armor '{}' has malformed thresholds '{}'",
                    armor.name, armor.thresholds
                ));
            }
            if armor.tier().is_none() {
                return invalid(format!("armor '{}' has tier {}", armor.name, armor.tier));
            }
        }

        for weapon in self.weapons.primary.iter().chain(&self.weapons.secondary) {
            if Tier::from_number(weapon.tier).is_none() {
                return invalid(format!("weapon '{}' has tier {}", weapon.name, weapon.tier));
            }
        }

        for tier in [Tier::Two, Tier::Three, Tier::Four] {
            let mut ids = HashSet::new();
            for def in self.advancements.tier(tier) {
                if !ids.insert(def.id.as_str()) {
                    return invalid(format!("advancement '{}' listed twice in {}", def.id, tier));
                }
                if def.cost == 0 {
                    return invalid(format!("advancement '{}' has zero cost", def.id));
                }
            }
        }

        Ok(())
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn ancestry(&self, name: &str) -> Option<&AncestryDef> {
        self.ancestries.iter().find(|a| a.name == name)
    }

    pub fn community(&self, name: &str) -> Option<&CommunityDef> {
        self.communities.iter().find(|c| c.name == name)
    }

    pub fn card(&self, name: &str) -> Option<&DomainCard> {
        self.domain_cards.iter().find(|c| c.name == name)
    }

    pub fn primary_weapon(&self, name: &str) -> Option<&WeaponDef> {
        self.weapons.primary.iter().find(|w| w.name == name)
    }

    pub fn secondary_weapon(&self, name: &str) -> Option<&WeaponDef> {
        self.weapons.secondary.iter().find(|w| w.name == name)
    }

    pub fn armor(&self, name: &str) -> Option<&ArmorDef> {
        self.armor.iter().find(|a| a.name == name)
    }

    /// Every domain named by a class or a card
    pub fn domains(&self) -> BTreeSet<&str> {
        self.classes
            .iter()
            .flat_map(|c| c.domains.iter().map(String::as_str))
            .chain(self.domain_cards.iter().map(|c| c.domain.as_str()))
            .collect()
    }

    /// Cards of a domain at or below `max_level`
    pub fn cards_in_domain<'a>(
        &'a self,
        domain: &'a str,
        max_level: u8,
    ) -> impl Iterator<Item = &'a DomainCard> + 'a {
        self.domain_cards
            .iter()
            .filter(move |c| c.domain == domain && c.level <= max_level)
    }
}

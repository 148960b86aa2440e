//! Catalog entries: classes, heritage, domain cards and equipment

use crate::types::{Burden, Feature, Tier, Trait, TraitSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A playable class with its subclasses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Exactly two domains
    pub domains: Vec<String>,
    pub starting_hp: i32,
    pub starting_evasion: i32,
    pub class_feature: Feature,
    pub hope_feature: Feature,
    pub suggested_traits: TraitSet,
    #[serde(default)]
    pub subclasses: Vec<SubclassDef>,
}

impl ClassDef {
    pub fn subclass(&self, name: &str) -> Option<&SubclassDef> {
        self.subclasses.iter().find(|s| s.name == name)
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubclassDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Trait used for spellcast rolls, if the subclass casts at all
    #[serde(default)]
    pub spellcast_trait: Option<Trait>,
    pub foundation_feature: Feature,
    pub specialization_feature: Feature,
    pub mastery_feature: Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncestryDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub feature: Feature,
}

/// A domain card; the name is unique across the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCard {
    pub name: String,
    pub domain: String,
    pub level: u8,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub name: String,
    pub tier: u8,
    #[serde(rename = "trait")]
    pub attack_trait: Trait,
    pub range: String,
    /// Damage die expression, e.g. "d8+3"
    pub damage: String,
    pub burden: Burden,
    #[serde(default)]
    pub feature: Option<String>,
}

impl WeaponDef {
    pub fn is_two_handed(&self) -> bool {
        self.burden == Burden::TwoHanded
    }

    /// Damage expression with the proficiency as dice count ("d8+3" -> "2d8+3")
    pub fn damage_with_proficiency(&self, proficiency: i32) -> String {
        match self.damage.strip_prefix('d') {
            Some(rest) => format!("{}d{}", proficiency.max(1), rest),
            None => self.damage.clone(),
        }
    }
}

/// Weapon catalog split by hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapons {
    #[serde(default)]
    pub primary: Vec<WeaponDef>,
    #[serde(default)]
    pub secondary: Vec<WeaponDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorDef {
    pub name: String,
    pub tier: u8,
    /// Base "major/severe" damage thresholds
    pub thresholds: String,
    pub score: i32,
    #[serde(default)]
    pub feature: Option<String>,
}

impl ArmorDef {
    /// Parse the "N/M" threshold string
    pub fn threshold_pair(&self) -> Option<(i32, i32)> {
        let (major, severe) = self.thresholds.split_once('/')?;
        Some((major.trim().parse().ok()?, severe.trim().parse().ok()?))
    }

    pub fn tier(&self) -> Option<Tier> {
        Tier::from_number(self.tier)
    }
}

/// Example experience names grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceCatalog {
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl ExperienceCatalog {
    /// Every example name across all categories
    pub fn all_names(&self) -> Vec<&str> {
        self.categories
            .values()
            .flat_map(|names| names.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(damage: &str, burden: Burden) -> WeaponDef {
        WeaponDef {
            name: "Test".into(),
            tier: 1,
            attack_trait: Trait::Strength,
            range: "Melee".into(),
            damage: damage.into(),
            burden,
            feature: None,
        }
    }

    #[test]
    fn test_threshold_pair() {
        let armor = ArmorDef {
            name: "Leather Armor".into(),
            tier: 1,
            thresholds: "6/13".into(),
            score: 3,
            feature: None,
        };
        assert_eq!(armor.threshold_pair(), Some((6, 13)));

        let broken = ArmorDef { thresholds: "six".into(), ..armor };
        assert_eq!(broken.threshold_pair(), None);
    }

    #[test]
    fn test_damage_with_proficiency() {
        assert_eq!(weapon("d8+3", Burden::OneHanded).damage_with_proficiency(3), "3d8+3");
        assert_eq!(weapon("d12", Burden::TwoHanded).damage_with_proficiency(1), "1d12");
        assert_eq!(weapon("2", Burden::OneHanded).damage_with_proficiency(2), "2");
    }

    #[test]
    fn test_weapon_parses_from_toml() {
        let parsed: Weapons = toml::from_str(
            r#"
primary = [
    { name = "Spear", tier = 1, trait = "finesse", range = "Very Close", damage = "d10+2", burden = "Two-Handed", feature = "Cumbersome: -1 to Finesse" },
]
"#,
        )
        .unwrap();
        let spear = &parsed.primary[0];
        assert!(spear.is_two_handed());
        assert_eq!(spear.attack_trait, Trait::Finesse);
        assert!(parsed.secondary.is_empty());
    }
}

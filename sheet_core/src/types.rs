//! Core types shared across the progression engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest level a character can reach
pub const MAX_LEVEL: u8 = 10;

/// Modifier every new experience starts with
pub const EXPERIENCE_START_MODIFIER: i32 = 2;

/// The multiset every starting trait assignment must be a permutation of
pub const STARTING_TRAIT_ARRAY: [i32; 6] = [2, 1, 1, 0, 0, -1];

/// One of the six character traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Strength,
    Agility,
    Finesse,
    Instinct,
    Presence,
    Knowledge,
}

impl Trait {
    /// All traits in sheet order
    pub const ALL: [Trait; 6] = [
        Trait::Strength,
        Trait::Agility,
        Trait::Finesse,
        Trait::Instinct,
        Trait::Presence,
        Trait::Knowledge,
    ];

    /// Display name ("Strength", ...)
    pub fn name(&self) -> &'static str {
        match self {
            Trait::Strength => "Strength",
            Trait::Agility => "Agility",
            Trait::Finesse => "Finesse",
            Trait::Instinct => "Instinct",
            Trait::Presence => "Presence",
            Trait::Knowledge => "Knowledge",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Trait> {
        Trait::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Level band that gates content and scopes per-tier advancement counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "tier1")]
    One,
    #[serde(rename = "tier2")]
    Two,
    #[serde(rename = "tier3")]
    Three,
    #[serde(rename = "tier4")]
    Four,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::One, Tier::Two, Tier::Three, Tier::Four];

    /// Tier for a level: 1, 2-4, 5-7, 8-10
    pub fn from_level(level: u8) -> Tier {
        match level {
            8..=u8::MAX => Tier::Four,
            5..=7 => Tier::Three,
            2..=4 => Tier::Two,
            _ => Tier::One,
        }
    }

    /// Tier from its number (1-4)
    pub fn from_number(number: u8) -> Option<Tier> {
        match number {
            1 => Some(Tier::One),
            2 => Some(Tier::Two),
            3 => Some(Tier::Three),
            4 => Some(Tier::Four),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
            Tier::Four => 4,
        }
    }

    /// First level of this tier
    pub fn entry_level(&self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 5,
            Tier::Four => 8,
        }
    }

    /// True when reaching `level` crosses into a new tier (2, 5 or 8)
    pub fn is_tier_entry(level: u8) -> bool {
        matches!(level, 2 | 5 | 8)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {}", self.number())
    }
}

/// The six trait modifiers of a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitSet {
    pub strength: i32,
    pub agility: i32,
    pub finesse: i32,
    pub instinct: i32,
    pub presence: i32,
    pub knowledge: i32,
}

impl TraitSet {
    /// Build from values in sheet order
    pub fn from_array(values: [i32; 6]) -> Self {
        let [strength, agility, finesse, instinct, presence, knowledge] = values;
        TraitSet {
            strength,
            agility,
            finesse,
            instinct,
            presence,
            knowledge,
        }
    }

    pub fn to_array(&self) -> [i32; 6] {
        [
            self.strength,
            self.agility,
            self.finesse,
            self.instinct,
            self.presence,
            self.knowledge,
        ]
    }

    pub fn get(&self, t: Trait) -> i32 {
        match t {
            Trait::Strength => self.strength,
            Trait::Agility => self.agility,
            Trait::Finesse => self.finesse,
            Trait::Instinct => self.instinct,
            Trait::Presence => self.presence,
            Trait::Knowledge => self.knowledge,
        }
    }

    pub fn get_mut(&mut self, t: Trait) -> &mut i32 {
        match t {
            Trait::Strength => &mut self.strength,
            Trait::Agility => &mut self.agility,
            Trait::Finesse => &mut self.finesse,
            Trait::Instinct => &mut self.instinct,
            Trait::Presence => &mut self.presence,
            Trait::Knowledge => &mut self.knowledge,
        }
    }

    /// Whether the values are a permutation of +2, +1, +1, 0, 0, -1
    pub fn is_starting_array(&self) -> bool {
        let mut values = self.to_array();
        values.sort_unstable();
        let mut expected = STARTING_TRAIT_ARRAY;
        expected.sort_unstable();
        values == expected
    }

    /// First trait holding the highest value, in sheet order
    pub fn highest(&self) -> Trait {
        let mut best = Trait::Strength;
        for t in Trait::ALL {
            if self.get(t) > self.get(best) {
                best = t;
            }
        }
        best
    }
}

/// A named experience with its roll modifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub modifier: i32,
}

impl Experience {
    /// A fresh experience at the starting modifier
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Experience {
            name: name.into(),
            description: description.into(),
            modifier: EXPERIENCE_START_MODIFIER,
        }
    }
}

/// Named rules text attached to classes, subclasses and heritage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// How many hands a weapon needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Burden {
    #[serde(rename = "One-Handed")]
    OneHanded,
    #[serde(rename = "Two-Handed")]
    TwoHanded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_breakpoints() {
        assert_eq!(Tier::from_level(1), Tier::One);
        assert_eq!(Tier::from_level(2), Tier::Two);
        assert_eq!(Tier::from_level(4), Tier::Two);
        assert_eq!(Tier::from_level(5), Tier::Three);
        assert_eq!(Tier::from_level(7), Tier::Three);
        assert_eq!(Tier::from_level(8), Tier::Four);
        assert_eq!(Tier::from_level(10), Tier::Four);
    }

    #[test]
    fn test_tier_entry_levels() {
        let entries: Vec<u8> = (1..=MAX_LEVEL).filter(|l| Tier::is_tier_entry(*l)).collect();
        assert_eq!(entries, vec![2, 5, 8]);
        for tier in Tier::ALL {
            assert_eq!(Tier::from_level(tier.entry_level()), tier);
        }
    }

    #[test]
    fn test_trait_lookup_is_case_insensitive() {
        assert_eq!(Trait::from_name("agility"), Some(Trait::Agility));
        assert_eq!(Trait::from_name("KNOWLEDGE"), Some(Trait::Knowledge));
        assert_eq!(Trait::from_name("Evasion"), None);
    }

    #[test]
    fn test_starting_array() {
        assert!(TraitSet::from_array([2, 1, 1, 0, 0, -1]).is_starting_array());
        assert!(TraitSet::from_array([-1, 0, 1, 0, 2, 1]).is_starting_array());
        assert!(!TraitSet::from_array([2, 2, 1, 0, 0, -1]).is_starting_array());
        assert!(!TraitSet::default().is_starting_array());
    }

    #[test]
    fn test_highest_prefers_first_in_sheet_order() {
        let traits = TraitSet::from_array([0, 2, 1, 2, 0, -1]);
        assert_eq!(traits.highest(), Trait::Agility);
    }

    #[test]
    fn test_tier_serializes_as_table_key() {
        let json = serde_json::to_string(&Tier::Three).unwrap();
        assert_eq!(json, "\"tier3\"");
    }
}

//! GearSource - Armor, thresholds and feature-text modifiers from equipment

use crate::character::Equipment;
use crate::source::StatSource;
use crate::stats::{armor_score_bonus, parse_feature, StatAccumulator};
use crate::types::Tier;

/// Domain card that grants unarmored protection
pub const BARE_BONES: &str = "Bare Bones";

/// Unarmored base thresholds with Bare Bones, by tier, before Strength
pub const BARE_BONES_THRESHOLDS: [(i32, i32); 4] = [(9, 19), (11, 24), (13, 31), (15, 38)];

/// Base armor score with Bare Bones, before Strength
const BARE_BONES_SCORE: i32 = 3;

pub struct GearSource<'a> {
    pub equipment: &'a Equipment,
    pub level: u8,
    /// Whether the character owns Bare Bones
    pub bare_bones: bool,
    pub strength: i32,
}

impl<'a> GearSource<'a> {
    pub fn new(equipment: &'a Equipment, level: u8, bare_bones: bool, strength: i32) -> Self {
        GearSource {
            equipment,
            level,
            bare_bones,
            strength,
        }
    }

    fn unarmored_thresholds(&self) -> (i32, i32) {
        let level = i32::from(self.level);
        (level, level * 2)
    }
}

impl StatSource for GearSource<'_> {
    fn id(&self) -> &str {
        "gear"
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for text in self.equipment.features() {
            let parsed = parse_feature(text);
            stats.evasion += parsed.evasion;
            for (t, value) in parsed.traits {
                stats.add_trait(t, value);
            }
            stats.ambiguous_features.extend(parsed.ambiguous);
        }

        match self.equipment.armor() {
            Some(armor) => {
                stats.armor_score += armor.score;
                stats.thresholds = armor.threshold_pair().unwrap_or_else(|| {
                    tracing::warn!(armor = %armor.name, thresholds = %armor.thresholds, "unreadable armor thresholds");
                    self.unarmored_thresholds()
                });
            }
            None if self.bare_bones => {
                let tier = Tier::from_level(self.level);
                stats.armor_score += BARE_BONES_SCORE + self.strength;
                let (major, severe) = BARE_BONES_THRESHOLDS[usize::from(tier.number()) - 1];
                stats.thresholds = (major + self.strength, severe + self.strength);
            }
            None => stats.thresholds = self.unarmored_thresholds(),
        }

        if let Some(text) = self.equipment.secondary().and_then(|w| w.feature.as_deref()) {
            stats.armor_score += armor_score_bonus(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::tests::sample_character;
    use crate::config::ReferenceData;
    use crate::types::Trait;

    fn apply(equipment: &Equipment, level: u8, bare_bones: bool, strength: i32) -> StatAccumulator {
        let mut acc = StatAccumulator::new();
        GearSource::new(equipment, level, bare_bones, strength).apply(&mut acc);
        acc
    }

    #[test]
    fn test_unarmored_thresholds() {
        let acc = apply(&Equipment::default(), 3, false, 2);
        assert_eq!(acc.thresholds, (3, 6));
        assert_eq!(acc.armor_score, 0);
    }

    #[test]
    fn test_bare_bones() {
        let acc = apply(&Equipment::default(), 1, true, 2);
        assert_eq!(acc.thresholds, (11, 21));
        assert_eq!(acc.armor_score, 5);

        let acc = apply(&Equipment::default(), 9, true, -1);
        assert_eq!(acc.thresholds, (14, 37));
        assert_eq!(acc.armor_score, 2);
    }

    #[test]
    fn test_armor_and_feature_modifiers() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        character.equip_armor(&data, "Full Plate Armor").unwrap();
        character.equip_primary(&data, "Mace").unwrap();
        character.equip_secondary(&data, "Tower Shield").unwrap();

        let acc = apply(&character.equipment, 1, true, 2);
        assert_eq!(acc.thresholds, (8, 17));
        // 4 from the plate, 2 from the shield; Bare Bones ignored while armored
        assert_eq!(acc.armor_score, 6);
        assert_eq!(acc.evasion, -3);
        assert_eq!(acc.traits.get(Trait::Agility), -1);
    }

    #[test]
    fn test_shield_bonus_without_armor() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        character.equip_secondary(&data, "Round Shield").unwrap();
        let acc = apply(&character.equipment, 1, false, 2);
        assert_eq!(acc.armor_score, 1);
    }
}

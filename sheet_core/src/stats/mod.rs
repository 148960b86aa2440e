//! Derived stats - pure calculation from character state and reference data

mod accumulator;
mod feature;

pub use accumulator::StatAccumulator;
pub use feature::{armor_score_bonus, parse_feature, FeatureModifiers};

use crate::character::Character;
use crate::config::ReferenceData;
use crate::source::{
    AdvancementSource, BaseSource, ClassSource, GearSource, HeritageSource, StatSource, BARE_BONES,
};
use crate::types::{Tier, Trait, TraitSet};
use serde::{Deserialize, Serialize};

/// Combat statistics shown on the sheet. Never stored; recompute on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub level: u8,
    pub tier: Tier,
    pub proficiency: i32,
    pub evasion: i32,
    /// Trait values including equipment modifiers
    pub traits: TraitSet,
    pub major_threshold: i32,
    pub severe_threshold: i32,
    pub armor_score: i32,
    pub hp: i32,
    pub stress: i32,
    pub spellcast_trait: Option<Trait>,
    /// Primary weapon damage with proficiency dice, e.g. "2d8+3"
    pub primary_damage: Option<String>,
    pub secondary_damage: Option<String>,
    pub ambiguous_features: Vec<String>,
}

impl DerivedStats {
    /// Compute every derived value. Missing reference entries contribute
    /// nothing instead of failing.
    pub fn compute(character: &Character, data: &ReferenceData) -> Self {
        let class = data.class(&character.class);
        if class.is_none() {
            tracing::warn!(class = %character.class, "unknown class, derived stats use zero base");
        }

        let mut sources: Vec<Box<dyn StatSource + '_>> = vec![
            Box::new(BaseSource::new(
                character.level,
                character.traits,
                character.threshold_bonus,
            )),
            Box::new(AdvancementSource::new(&character.advancements)),
            Box::new(HeritageSource::new(&character.ancestry, &character.subclass)),
            Box::new(GearSource::new(
                &character.equipment,
                character.level,
                character.owns_card(BARE_BONES),
                character.traits.strength,
            )),
        ];
        if let Some(class) = class {
            sources.push(Box::new(ClassSource::new(class)));
        }
        sources.sort_by_key(|s| s.priority());

        let mut acc = StatAccumulator::new();
        for source in &sources {
            source.apply(&mut acc);
        }

        let spellcast_trait = class
            .and_then(|c| c.subclass(&character.subclass))
            .and_then(|s| s.spellcast_trait);
        let primary_damage = character
            .equipment
            .primary()
            .map(|w| w.damage_with_proficiency(acc.proficiency));
        let secondary_damage = character
            .equipment
            .secondary()
            .map(|w| w.damage_with_proficiency(acc.proficiency));

        DerivedStats {
            level: character.level,
            tier: character.tier(),
            proficiency: acc.proficiency,
            evasion: acc.evasion,
            traits: acc.traits,
            major_threshold: acc.major_threshold(),
            severe_threshold: acc.severe_threshold(),
            armor_score: acc.armor_score,
            hp: acc.hp,
            stress: acc.stress,
            spellcast_trait,
            primary_damage,
            secondary_damage,
            ambiguous_features: acc.ambiguous_features,
        }
    }
}

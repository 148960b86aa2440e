//! StatAccumulator - Collects contributions before they become DerivedStats

use crate::types::{Trait, TraitSet};

/// Running totals filled in by each [`StatSource`](crate::source::StatSource)
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    pub proficiency: i32,
    pub evasion: i32,
    /// Trait values after equipment modifiers
    pub traits: TraitSet,
    pub hp: i32,
    pub stress: i32,
    pub armor_score: i32,
    /// Base (major, severe) pair before the level bonus
    pub thresholds: (i32, i32),
    pub threshold_bonus: i32,
    /// Feature fragments applied under the priority rule
    pub ambiguous_features: Vec<String>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        StatAccumulator::default()
    }

    pub fn add_trait(&mut self, t: Trait, value: i32) {
        *self.traits.get_mut(t) += value;
    }

    pub fn major_threshold(&self) -> i32 {
        self.thresholds.0 + self.threshold_bonus
    }

    pub fn severe_threshold(&self) -> i32 {
        self.thresholds.1 + self.threshold_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bonus_applies_to_both() {
        let acc = StatAccumulator {
            thresholds: (6, 13),
            threshold_bonus: 3,
            ..StatAccumulator::new()
        };
        assert_eq!(acc.major_threshold(), 9);
        assert_eq!(acc.severe_threshold(), 16);
    }

    #[test]
    fn test_add_trait() {
        let mut acc = StatAccumulator::new();
        acc.add_trait(Trait::Agility, -1);
        acc.add_trait(Trait::Agility, 3);
        assert_eq!(acc.traits.agility, 2);
    }
}

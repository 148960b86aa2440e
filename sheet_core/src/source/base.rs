//! BaseSource - Level-derived values and the character's own traits

use crate::source::StatSource;
use crate::stats::StatAccumulator;
use crate::types::{Tier, TraitSet};

pub struct BaseSource {
    pub level: u8,
    pub traits: TraitSet,
    pub threshold_bonus: i32,
}

impl BaseSource {
    pub fn new(level: u8, traits: TraitSet, threshold_bonus: i32) -> Self {
        BaseSource {
            level,
            traits,
            threshold_bonus,
        }
    }
}

impl StatSource for BaseSource {
    fn id(&self) -> &str {
        "base"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        // Base proficiency follows the tier breakpoints
        stats.proficiency += i32::from(Tier::from_level(self.level).number());
        stats.traits = self.traits;
        stats.threshold_bonus += self.threshold_bonus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_proficiency_matches_tier() {
        for (level, expected) in [(1, 1), (2, 2), (4, 2), (5, 3), (7, 3), (8, 4), (10, 4)] {
            let mut acc = StatAccumulator::new();
            BaseSource::new(level, TraitSet::default(), 0).apply(&mut acc);
            assert_eq!(acc.proficiency, expected, "level {level}");
        }
    }

    #[test]
    fn test_base_copies_traits() {
        let traits = TraitSet::from_array([2, 1, 1, 0, 0, -1]);
        let mut acc = StatAccumulator::new();
        BaseSource::new(3, traits, 2).apply(&mut acc);
        assert_eq!(acc.traits, traits);
        assert_eq!(acc.threshold_bonus, 2);
    }
}

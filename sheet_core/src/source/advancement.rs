//! AdvancementSource - Counters bought with advancement points

use crate::advancement::selector::{ADD_HP, ADD_STRESS, INCREASE_EVASION, INCREASE_PROFICIENCY};
use crate::advancement::AdvancementRecord;
use crate::source::StatSource;
use crate::stats::StatAccumulator;

pub struct AdvancementSource<'a> {
    pub record: &'a AdvancementRecord,
}

impl<'a> AdvancementSource<'a> {
    pub fn new(record: &'a AdvancementRecord) -> Self {
        AdvancementSource { record }
    }

    fn count(&self, id: &str) -> i32 {
        i32::try_from(self.record.lifetime(id)).unwrap_or(i32::MAX)
    }
}

impl StatSource for AdvancementSource<'_> {
    fn id(&self) -> &str {
        "advancements"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.proficiency += self.count(INCREASE_PROFICIENCY);
        stats.evasion += self.count(INCREASE_EVASION);
        stats.hp += self.count(ADD_HP);
        stats.stress += self.count(ADD_STRESS);
    }
}

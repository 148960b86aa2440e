//! HeritageSource - Extra Stress from ancestry and subclass

use crate::source::StatSource;
use crate::stats::StatAccumulator;

/// Ancestry granting an additional Stress slot
pub const RESILIENT_ANCESTRY: &str = "Human";

/// Subclass granting an additional Stress slot
pub const STRESS_SUBCLASS: &str = "Vengeance";

pub struct HeritageSource<'a> {
    pub ancestry: &'a str,
    pub subclass: &'a str,
}

impl<'a> HeritageSource<'a> {
    pub fn new(ancestry: &'a str, subclass: &'a str) -> Self {
        HeritageSource { ancestry, subclass }
    }
}

impl StatSource for HeritageSource<'_> {
    fn id(&self) -> &str {
        "heritage"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        if self.ancestry == RESILIENT_ANCESTRY {
            stats.stress += 1;
        }
        if self.subclass == STRESS_SUBCLASS {
            stats.stress += 1;
        }
    }
}

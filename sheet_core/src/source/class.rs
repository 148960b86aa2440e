//! ClassSource - Starting HP, Stress and Evasion of the class

use crate::config::ClassDef;
use crate::source::StatSource;
use crate::stats::StatAccumulator;

pub struct ClassSource<'a> {
    pub class: &'a ClassDef,
}

impl<'a> ClassSource<'a> {
    pub fn new(class: &'a ClassDef) -> Self {
        ClassSource { class }
    }
}

impl StatSource for ClassSource<'_> {
    fn id(&self) -> &str {
        &self.class.name
    }

    fn priority(&self) -> i32 {
        -50
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.hp += self.class.starting_hp;
        // Stress slots start from the class HP value as well
        stats.stress += self.class.starting_hp;
        stats.evasion += self.class.starting_evasion;
    }
}

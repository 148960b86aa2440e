//! StatSource - Trait and implementations for derived-stat contributors

mod advancement;
mod base;
mod class;
mod gear;
mod heritage;

pub use advancement::AdvancementSource;
pub use base::BaseSource;
pub use class::ClassSource;
pub use gear::{GearSource, BARE_BONES, BARE_BONES_THRESHOLDS};
pub use heritage::HeritageSource;

use crate::stats::StatAccumulator;

/// Anything that contributes to a character's derived stats
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Suggested priorities:
    /// - Level and base traits: -100
    /// - Class: -50
    /// - Equipment: 0
    /// - Advancements and heritage: 100
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's contribution to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}

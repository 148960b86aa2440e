//! Advancement bookkeeping and selection rules

mod record;
pub mod selector;

pub use record::AdvancementRecord;
pub use selector::{
    AdvancementSelector, Budget, ComplexAdvancement, Selection, ADVANCEMENT_POINTS,
};

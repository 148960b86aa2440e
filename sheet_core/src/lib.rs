//! sheet_core - Character progression rules engine
//!
//! This library provides:
//! - Character: the aggregate being created, levelled and equipped
//! - LevelUp: the step-by-step level-up flow with atomic commit
//! - AdvancementSelector: eligibility and point-budget rules
//! - DerivedStats: pure calculation of combat statistics
//! - CharacterGenerator: random characters built through the same rules
//! - CharacterStore: keyed persistence of character snapshots

pub mod advancement;
pub mod character;
pub mod config;
pub mod error;
pub mod generator;
pub mod level_up;
pub mod loadout;
pub mod prelude;
pub mod source;
pub mod stats;
pub mod store;
pub mod types;

// Re-export core types for convenience
pub use advancement::{AdvancementRecord, AdvancementSelector, Budget, ComplexAdvancement};
pub use character::{Character, CharacterDraft, Equipment, History, Multiclass};
pub use config::{ConfigError, ReferenceData};
pub use error::{ErrorKind, ProgressionError};
pub use generator::CharacterGenerator;
pub use level_up::{ComplexChoice, ExperienceRef, LevelUp, Step, SubclassTarget, TierAchievements};
pub use loadout::{Loadout, LOADOUT_SIZE};
pub use stats::DerivedStats;
pub use store::{CharacterStore, JsonFileStore, MemoryStore, StoreError};
pub use types::{Experience, Feature, Tier, Trait, TraitSet, MAX_LEVEL};

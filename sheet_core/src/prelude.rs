//! Prelude module for convenient imports
//!
//! ```rust
//! use sheet_core::prelude::*;
//! ```

// Character state
pub use crate::character::{Character, CharacterDraft, History};
pub use crate::types::{Experience, Tier, Trait, TraitSet};

// Level-up flow
pub use crate::level_up::{ComplexChoice, ExperienceRef, LevelUp, Step, SubclassTarget};

// Calculation
pub use crate::stats::DerivedStats;

// Reference data
pub use crate::config::ReferenceData;

// Errors
pub use crate::error::{ErrorKind, ProgressionError};

// Generation and persistence
pub use crate::generator::CharacterGenerator;
pub use crate::store::{CharacterStore, JsonFileStore, MemoryStore};

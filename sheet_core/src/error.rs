//! Errors raised by the progression engine

use thiserror::Error;

/// Broad classification of a [`ProgressionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected user input; nothing was mutated and the step can be retried
    Validation,
    /// The character or an index refers to something that cannot exist
    Inconsistent,
    /// A reference-data lookup missed
    Lookup,
}

/// Level-up, loadout and equipment error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("advancements must cost exactly 2 points (selected {spent})")]
    BudgetMismatch { spent: u32 },
    #[error("advancement '{0}' is not available")]
    NotEligible(String),
    #[error("advancement '{0}' was selected more than once")]
    DuplicateAdvancement(String),
    #[error("multiclass and subclass upgrade cannot be taken in the same tier")]
    TierExclusive,
    #[error("{0}")]
    InvalidChoice(String),
    #[error("character is already at level {0}")]
    MaxLevelReached(u8),
    #[error("not allowed during the {0} step")]
    WrongStep(&'static str),
    #[error("loadout slot {0} is occupied")]
    SlotOccupied(usize),
    #[error("loadout slot {0} is empty")]
    SlotEmpty(usize),
    #[error("card '{0}' is already in the loadout")]
    CardAlreadyPlaced(String),
    #[error("loadout slot {0} is out of range")]
    SlotOutOfRange(usize),
    #[error("card '{0}' is not owned by the character")]
    CardNotOwned(String),
    #[error("advancement '{0}' is not defined in the reference data")]
    UnknownAdvancement(String),
    #[error("inconsistent character state: {0}")]
    Inconsistent(String),
    #[error("unknown {kind} '{name}'")]
    MissingReference { kind: &'static str, name: String },
}

impl ProgressionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressionError::SlotOutOfRange(_)
            | ProgressionError::CardNotOwned(_)
            | ProgressionError::UnknownAdvancement(_)
            | ProgressionError::Inconsistent(_) => ErrorKind::Inconsistent,
            ProgressionError::MissingReference { .. } => ErrorKind::Lookup,
            _ => ErrorKind::Validation,
        }
    }

    pub(crate) fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        ProgressionError::MissingReference {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ProgressionError::InvalidChoice(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ProgressionError::BudgetMismatch { spent: 1 }.kind(), ErrorKind::Validation);
        assert_eq!(ProgressionError::SlotOutOfRange(7).kind(), ErrorKind::Inconsistent);
        assert_eq!(ProgressionError::CardNotOwned("Rune Ward".into()).kind(), ErrorKind::Inconsistent);
        assert_eq!(ProgressionError::missing("class", "Necromancer").kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_messages_are_readable() {
        let err = ProgressionError::BudgetMismatch { spent: 3 };
        assert_eq!(err.to_string(), "advancements must cost exactly 2 points (selected 3)");
        let err = ProgressionError::missing("class", "Necromancer");
        assert_eq!(err.to_string(), "unknown class 'Necromancer'");
    }
}

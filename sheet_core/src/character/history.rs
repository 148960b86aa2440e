//! History - snapshot stack for single-step revert

use super::Character;

/// Deep copies of the character taken before each level-up
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Character>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Store an independent copy of `character`
    pub fn push(&mut self, character: &Character) {
        self.snapshots.push(character.clone());
    }

    /// Restore the latest snapshot into `character`; false if there is none
    pub fn revert(&mut self, character: &mut Character) -> bool {
        match self.snapshots.pop() {
            Some(snapshot) => {
                tracing::info!(name = %snapshot.name, level = snapshot.level, "reverted to snapshot");
                *character = snapshot;
                true
            }
            None => false,
        }
    }

    /// Drop the latest snapshot without restoring it
    pub(crate) fn discard_latest(&mut self) -> Option<Character> {
        self.snapshots.pop()
    }

    pub fn latest(&self) -> Option<&Character> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Forget everything, e.g. when starting a new character
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::tests::sample_character;
    use crate::config::ReferenceData;

    #[test]
    fn test_push_and_revert() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        let mut history = History::new();

        history.push(&character);
        character.name = "Renamed".into();
        character.traits.strength += 1;
        assert_eq!(history.latest().unwrap().name, "Brannoc");

        assert!(history.revert(&mut character));
        assert_eq!(character.name, "Brannoc");
        assert_eq!(character.traits.strength, 2);
        assert!(history.is_empty());
        assert!(!history.revert(&mut character));
    }

    #[test]
    fn test_clear() {
        let data = ReferenceData::builtin().unwrap();
        let character = sample_character(&data);
        let mut history = History::new();
        history.push(&character);
        history.push(&character);
        assert_eq!(history.len(), 2);
        history.clear();
        assert!(history.is_empty());
    }
}

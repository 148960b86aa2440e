//! Domain loadout: five active card slots over the owned collection

use crate::error::ProgressionError;
use serde::{Deserialize, Serialize};

/// Number of active domain card slots
pub const LOADOUT_SIZE: usize = 5;

/// Exactly five slots, each empty or holding a distinct card name.
///
/// Ownership is checked by the [`Character`](crate::character::Character)
/// wrappers; the loadout itself guards range and uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Loadout {
    slots: [Option<String>; LOADOUT_SIZE],
}

impl Loadout {
    pub fn new() -> Self {
        Loadout::default()
    }

    pub fn slots(&self) -> &[Option<String>; LOADOUT_SIZE] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|s| s.as_deref())
    }

    /// Cards currently slotted, in slot order
    pub fn cards(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|s| s.as_deref())
    }

    pub fn contains(&self, card: &str) -> bool {
        self.cards().any(|c| c == card)
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    fn check_index(index: usize) -> Result<(), ProgressionError> {
        if index >= LOADOUT_SIZE {
            return Err(ProgressionError::SlotOutOfRange(index));
        }
        Ok(())
    }

    /// Place a card into an empty slot
    pub(crate) fn place(&mut self, card: &str, index: usize) -> Result<(), ProgressionError> {
        Self::check_index(index)?;
        if self.contains(card) {
            return Err(ProgressionError::CardAlreadyPlaced(card.to_string()));
        }
        if self.slots[index].is_some() {
            return Err(ProgressionError::SlotOccupied(index));
        }
        self.slots[index] = Some(card.to_string());
        Ok(())
    }

    /// Place a card into the first empty slot; `None` when full
    pub(crate) fn place_first_empty(&mut self, card: &str) -> Result<Option<usize>, ProgressionError> {
        match self.first_empty() {
            Some(index) => self.place(card, index).map(|_| Some(index)),
            None => Ok(None),
        }
    }

    /// Empty a slot, returning what it held
    pub(crate) fn clear(&mut self, index: usize) -> Result<Option<String>, ProgressionError> {
        Self::check_index(index)?;
        Ok(self.slots[index].take())
    }

    /// Replace an occupied slot's card, returning the card sent to the vault
    pub(crate) fn replace(&mut self, index: usize, card: &str) -> Result<String, ProgressionError> {
        Self::check_index(index)?;
        if self.contains(card) {
            return Err(ProgressionError::CardAlreadyPlaced(card.to_string()));
        }
        if self.slots[index].is_none() {
            return Err(ProgressionError::SlotEmpty(index));
        }
        let previous = self.slots[index].replace(card.to_string());
        Ok(previous.unwrap_or_default())
    }
}

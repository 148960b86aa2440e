//! Equipment - armor and weapon slots

use super::Character;
use crate::config::{ArmorDef, ReferenceData, WeaponDef};
use crate::error::ProgressionError;
use serde::{Deserialize, Serialize};

/// Equipped items, stored as copies of their catalog entries.
///
/// A two-handed primary weapon never coexists with a secondary weapon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    armor: Option<ArmorDef>,
    #[serde(default)]
    primary: Option<WeaponDef>,
    #[serde(default)]
    secondary: Option<WeaponDef>,
}

impl Equipment {
    pub fn armor(&self) -> Option<&ArmorDef> {
        self.armor.as_ref()
    }

    pub fn primary(&self) -> Option<&WeaponDef> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&WeaponDef> {
        self.secondary.as_ref()
    }

    /// Feature texts of everything equipped
    pub fn features(&self) -> impl Iterator<Item = &str> {
        let armor = self.armor.as_ref().and_then(|a| a.feature.as_deref());
        let primary = self.primary.as_ref().and_then(|w| w.feature.as_deref());
        let secondary = self.secondary.as_ref().and_then(|w| w.feature.as_deref());
        armor.into_iter().chain(primary).chain(secondary)
    }

    pub fn set_armor(&mut self, armor: Option<ArmorDef>) {
        self.armor = armor;
    }

    /// Equip a primary weapon; a two-handed one drops the secondary
    pub fn set_primary(&mut self, weapon: Option<WeaponDef>) -> Option<WeaponDef> {
        let dropped = if weapon.as_ref().is_some_and(WeaponDef::is_two_handed) {
            self.secondary.take()
        } else {
            None
        };
        self.primary = weapon;
        dropped
    }

    /// Equip a secondary weapon unless a two-handed primary is held
    pub fn set_secondary(&mut self, weapon: Option<WeaponDef>) -> Result<(), ProgressionError> {
        if weapon.is_some() && self.primary.as_ref().is_some_and(WeaponDef::is_two_handed) {
            return Err(ProgressionError::invalid(
                "a two-handed primary weapon leaves no hand for a secondary",
            ));
        }
        self.secondary = weapon;
        Ok(())
    }
}

impl Character {
    fn check_item_tier(&self, name: &str, tier: u8) -> Result<(), ProgressionError> {
        if tier > self.tier().number() {
            return Err(ProgressionError::invalid(format!(
                "'{name}' is a tier {tier} item; {} is tier {}",
                self.name,
                self.tier().number()
            )));
        }
        Ok(())
    }

    pub fn equip_armor(&mut self, data: &ReferenceData, name: &str) -> Result<(), ProgressionError> {
        let armor = data
            .armor(name)
            .ok_or_else(|| ProgressionError::missing("armor", name))?;
        self.check_item_tier(name, armor.tier)?;
        self.equipment.set_armor(Some(armor.clone()));
        tracing::debug!(armor = name, "armor equipped");
        Ok(())
    }

    pub fn equip_primary(&mut self, data: &ReferenceData, name: &str) -> Result<(), ProgressionError> {
        let weapon = data
            .primary_weapon(name)
            .ok_or_else(|| ProgressionError::missing("primary weapon", name))?;
        self.check_item_tier(name, weapon.tier)?;
        if let Some(dropped) = self.equipment.set_primary(Some(weapon.clone())) {
            tracing::debug!(secondary = %dropped.name, "secondary unequipped for two-handed weapon");
        }
        Ok(())
    }

    pub fn equip_secondary(&mut self, data: &ReferenceData, name: &str) -> Result<(), ProgressionError> {
        let weapon = data
            .secondary_weapon(name)
            .ok_or_else(|| ProgressionError::missing("secondary weapon", name))?;
        self.check_item_tier(name, weapon.tier)?;
        self.equipment.set_secondary(Some(weapon.clone()))
    }

    pub fn unequip_armor(&mut self) {
        self.equipment.set_armor(None);
    }

    pub fn unequip_primary(&mut self) {
        self.equipment.set_primary(None);
    }

    pub fn unequip_secondary(&mut self) {
        self.equipment.secondary = None;
    }
}

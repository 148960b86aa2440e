//! Transient level-up choices, held until the commit

use crate::advancement::ComplexAdvancement;
use crate::types::{Experience, Trait};
use std::collections::VecDeque;

/// Which subclass receives an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubclassTarget {
    Primary,
    Multiclass,
}

/// An experience addressed during a level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceRef {
    /// Index into the character's experiences
    Existing(usize),
    /// The experience granted by this level-up's tier achievement
    New,
}

/// Answer to one queued complex advancement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexChoice {
    Traits(Trait, Trait),
    Experiences(ExperienceRef, ExperienceRef),
    DomainCard(String),
    Multiclass {
        class: String,
        domain: String,
        subclass: String,
    },
    UpgradeSubclass(SubclassTarget),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Selections {
    pub new_experience: Option<Experience>,
    pub simple: Vec<String>,
    pub pending: VecDeque<ComplexAdvancement>,
    pub resolved: Vec<(ComplexAdvancement, ComplexChoice)>,
    pub required_card: Option<String>,
}

impl Selections {
    /// Drop everything chosen from the advancement step onward
    pub fn clear_advancements(&mut self) {
        self.simple.clear();
        self.pending.clear();
        self.resolved.clear();
        self.required_card = None;
    }

    /// Class and domain of a multiclass chosen in this level-up
    pub fn pending_multiclass(&self) -> Option<(&str, &str)> {
        self.resolved.iter().find_map(|(_, choice)| match choice {
            ComplexChoice::Multiclass { class, domain, .. } => Some((class.as_str(), domain.as_str())),
            _ => None,
        })
    }

    /// Cards taken through domain-card advancements in this level-up
    pub fn advancement_cards(&self) -> impl Iterator<Item = &str> {
        self.resolved.iter().filter_map(|(_, choice)| match choice {
            ComplexChoice::DomainCard(card) => Some(card.as_str()),
            _ => None,
        })
    }

    /// Traits already picked by an earlier resolution in this level-up
    pub fn boosted_traits(&self) -> impl Iterator<Item = Trait> + '_ {
        self.resolved.iter().flat_map(|(_, choice)| match choice {
            ComplexChoice::Traits(a, b) => vec![*a, *b],
            _ => Vec::new(),
        })
    }
}

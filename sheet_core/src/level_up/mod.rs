//! Level-up state machine.
//!
//! A [`LevelUp`] walks the steps of one level gain while holding every choice
//! in transient selections. Nothing touches the character until
//! [`LevelUp::finalize`], which applies all changes to a copy and swaps it in.

mod selections;

pub use selections::{ComplexChoice, ExperienceRef, SubclassTarget};

use selections::Selections;

use crate::advancement::{AdvancementSelector, Budget, ComplexAdvancement, ADVANCEMENT_POINTS};
use crate::character::{Character, History, Multiclass};
use crate::config::{AdvancementDef, ClassDef, DomainCard, ReferenceData};
use crate::error::ProgressionError;
use crate::types::{Experience, Tier, Trait, MAX_LEVEL};
use std::collections::HashSet;

/// Current position in the level-up flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    TierAchievements,
    NewExperience,
    ChooseAdvancements,
    Resolve(ComplexAdvancement),
    RequiredDomainCard,
    /// Everything chosen; waiting for [`LevelUp::finalize`]
    Confirm,
    Complete,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::TierAchievements => "tier achievements",
            Step::NewExperience => "new experience",
            Step::ChooseAdvancements => "choose advancements",
            Step::Resolve(_) => "advancement resolution",
            Step::RequiredDomainCard => "required domain card",
            Step::Confirm => "confirmation",
            Step::Complete => "complete",
        }
    }
}

/// Automatic benefits of entering a new tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierAchievements {
    pub tier: Tier,
    /// A new experience at +2 is granted
    pub new_experience: bool,
    /// Base proficiency rises by one
    pub proficiency_increase: i32,
    /// Traits may be boosted again
    pub trait_boosts_reset: bool,
}

/// One level gain in progress
#[derive(Debug, Clone)]
pub struct LevelUp {
    new_level: u8,
    step: Step,
    selections: Selections,
    snapshot_pushed: bool,
}

/// ⌈level / 2⌉, the card level ceiling for a multiclass domain
fn multiclass_ceiling(level: u8) -> u8 {
    level.div_ceil(2)
}

impl LevelUp {
    /// Begin a level-up without recording a history snapshot
    pub fn begin(character: &Character) -> Result<Self, ProgressionError> {
        if character.level >= MAX_LEVEL {
            return Err(ProgressionError::MaxLevelReached(character.level));
        }
        let new_level = character.level + 1;
        tracing::debug!(name = %character.name, new_level, "level-up started");
        Ok(LevelUp {
            new_level,
            step: Step::TierAchievements,
            selections: Selections::default(),
            snapshot_pushed: false,
        })
    }

    /// Begin a level-up, pushing a snapshot of `character` for revert
    pub fn start(character: &Character, history: &mut History) -> Result<Self, ProgressionError> {
        let mut flow = Self::begin(character)?;
        history.push(character);
        flow.snapshot_pushed = true;
        Ok(flow)
    }

    pub fn new_level(&self) -> u8 {
        self.new_level
    }

    /// Tier the new level belongs to; advancements are counted against it
    pub fn tier(&self) -> Tier {
        Tier::from_level(self.new_level)
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    /// The experience entered for this level-up, if any
    pub fn pending_experience(&self) -> Option<&Experience> {
        self.selections.new_experience.as_ref()
    }

    fn expect_step(&self, expected: &Step) -> Result<(), ProgressionError> {
        if &self.step != expected {
            return Err(ProgressionError::WrongStep(self.step.name()));
        }
        Ok(())
    }

    /// Benefits announced when the new level opens a tier
    pub fn tier_achievements(&self) -> Option<TierAchievements> {
        Tier::is_tier_entry(self.new_level).then(|| TierAchievements {
            tier: self.tier(),
            new_experience: true,
            proficiency_increase: 1,
            trait_boosts_reset: self.tier() > Tier::Two,
        })
    }

    /// Leave the announcement step
    pub fn continue_from_achievements(&mut self) -> Result<(), ProgressionError> {
        self.expect_step(&Step::TierAchievements)?;
        self.step = if Tier::is_tier_entry(self.new_level) {
            Step::NewExperience
        } else {
            Step::ChooseAdvancements
        };
        Ok(())
    }

    /// Record the experience granted by a tier achievement
    pub fn submit_new_experience(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<(), ProgressionError> {
        self.expect_step(&Step::NewExperience)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ProgressionError::invalid("the new experience needs a name"));
        }
        self.selections.new_experience = Some(Experience::new(name, description.trim()));
        self.step = Step::ChooseAdvancements;
        Ok(())
    }

    /// Advancements currently selectable
    pub fn eligible_advancements<'a>(
        &self,
        character: &'a Character,
        data: &'a ReferenceData,
    ) -> Vec<&'a AdvancementDef> {
        AdvancementSelector::new(data, character, self.new_level).eligible()
    }

    /// Spend exactly the point budget on `ids`
    pub fn choose_advancements<S: AsRef<str>>(
        &mut self,
        character: &Character,
        data: &ReferenceData,
        ids: &[S],
    ) -> Result<(), ProgressionError> {
        self.choose_within(character, data, ids, Budget::Exact(ADVANCEMENT_POINTS))
    }

    pub(crate) fn choose_within<S: AsRef<str>>(
        &mut self,
        character: &Character,
        data: &ReferenceData,
        ids: &[S],
        budget: Budget,
    ) -> Result<(), ProgressionError> {
        self.expect_step(&Step::ChooseAdvancements)?;
        let selection = AdvancementSelector::new(data, character, self.new_level).validate(ids, budget)?;
        self.selections.clear_advancements();
        self.selections.simple = selection.simple;
        self.selections.pending = selection.complex.into();
        self.advance_queue();
        Ok(())
    }

    fn advance_queue(&mut self) {
        self.step = match self.selections.pending.pop_front() {
            Some(next) => Step::Resolve(next),
            None => Step::RequiredDomainCard,
        };
        tracing::debug!(step = self.step.name(), "level-up step");
    }

    /// Answer the complex advancement currently being resolved
    pub fn resolve(
        &mut self,
        character: &Character,
        data: &ReferenceData,
        choice: ComplexChoice,
    ) -> Result<(), ProgressionError> {
        let Step::Resolve(current) = &self.step else {
            return Err(ProgressionError::WrongStep(self.step.name()));
        };
        let current = current.clone();
        self.validate_choice(character, data, &current, &choice)?;
        self.selections.resolved.push((current, choice));
        self.advance_queue();
        Ok(())
    }

    fn validate_choice(
        &self,
        character: &Character,
        data: &ReferenceData,
        current: &ComplexAdvancement,
        choice: &ComplexChoice,
    ) -> Result<(), ProgressionError> {
        match (current, choice) {
            (ComplexAdvancement::IncreaseTraits, ComplexChoice::Traits(a, b)) => {
                if a == b {
                    return Err(ProgressionError::invalid("choose two different traits"));
                }
                let options = self.trait_options(character);
                for t in [a, b] {
                    if !options.contains(t) {
                        return Err(ProgressionError::invalid(format!(
                            "{t} was already boosted in {}",
                            self.tier()
                        )));
                    }
                }
                Ok(())
            }
            (ComplexAdvancement::IncreaseExperience, ComplexChoice::Experiences(a, b)) => {
                if a == b {
                    return Err(ProgressionError::invalid("choose two different experiences"));
                }
                let options: Vec<ExperienceRef> = self
                    .experience_options(character)
                    .into_iter()
                    .map(|(r, _)| r)
                    .collect();
                if !options.contains(a) || !options.contains(b) {
                    return Err(ProgressionError::invalid("unknown experience selected"));
                }
                Ok(())
            }
            (ComplexAdvancement::DomainCard { ceiling, .. }, ComplexChoice::DomainCard(card)) => {
                let def = data
                    .card(card)
                    .ok_or_else(|| ProgressionError::missing("domain card", card.as_str()))?;
                let excluded = self.excluded_cards(character, false);
                if excluded.contains(def.name.as_str()) {
                    return Err(ProgressionError::invalid(format!("'{card}' is already taken")));
                }
                if !self.card_accessible(character, def, *ceiling) {
                    return Err(ProgressionError::invalid(format!(
                        "'{card}' is not available at level {ceiling} or below from your domains"
                    )));
                }
                Ok(())
            }
            (
                ComplexAdvancement::Multiclass,
                ComplexChoice::Multiclass {
                    class,
                    domain,
                    subclass,
                },
            ) => {
                let def = data
                    .class(class)
                    .ok_or_else(|| ProgressionError::missing("class", class.as_str()))?;
                if !self
                    .multiclass_options(character, data)
                    .iter()
                    .any(|c| c.name == def.name)
                {
                    return Err(ProgressionError::invalid(format!(
                        "cannot multiclass into {class}"
                    )));
                }
                if !def.has_domain(domain) || character.domains.contains(domain) {
                    return Err(ProgressionError::invalid(format!(
                        "{domain} is not a new domain of {class}"
                    )));
                }
                if def.subclass(subclass).is_none() {
                    return Err(ProgressionError::missing("subclass", subclass.as_str()));
                }
                Ok(())
            }
            (ComplexAdvancement::UpgradeSubclass, ComplexChoice::UpgradeSubclass(target)) => {
                if !self.upgrade_options(character).contains(target) {
                    return Err(ProgressionError::invalid("that subclass cannot be upgraded further"));
                }
                Ok(())
            }
            (current, _) => Err(ProgressionError::invalid(format!(
                "the choice does not answer '{}'",
                current.id()
            ))),
        }
    }

    /// Traits that can still be boosted in the new tier
    pub fn trait_options(&self, character: &Character) -> Vec<Trait> {
        let tier = self.tier();
        let chosen: HashSet<Trait> = self.selections.boosted_traits().collect();
        Trait::ALL
            .into_iter()
            .filter(|t| !character.is_boosted(tier, *t) && !chosen.contains(t))
            .collect()
    }

    /// Experiences that can receive a bonus, including the new one
    pub fn experience_options<'a>(
        &'a self,
        character: &'a Character,
    ) -> Vec<(ExperienceRef, &'a Experience)> {
        let mut options: Vec<(ExperienceRef, &Experience)> = character
            .experiences
            .iter()
            .enumerate()
            .map(|(i, e)| (ExperienceRef::Existing(i), e))
            .collect();
        if let Some(new) = &self.selections.new_experience {
            options.push((ExperienceRef::New, new));
        }
        options
    }

    /// Domain of the active multiclass, or of one chosen in this level-up
    fn multiclass_domain<'a>(&'a self, character: &'a Character) -> Option<&'a str> {
        character
            .multiclass
            .as_ref()
            .map(|m| m.domain.as_str())
            .or_else(|| self.selections.pending_multiclass().map(|(_, domain)| domain))
    }

    fn card_accessible(&self, character: &Character, card: &DomainCard, ceiling: u8) -> bool {
        if character.domains.contains(&card.domain) {
            return card.level <= ceiling;
        }
        self.multiclass_domain(character) == Some(card.domain.as_str())
            && card.level <= ceiling.min(multiclass_ceiling(self.new_level))
    }

    /// Owned cards plus cards claimed elsewhere in this level-up
    fn excluded_cards<'a>(&'a self, character: &'a Character, for_required: bool) -> HashSet<&'a str> {
        let mut excluded: HashSet<&str> = character.domain_cards.iter().map(String::as_str).collect();
        excluded.extend(self.selections.advancement_cards());
        if !for_required {
            if let Some(card) = &self.selections.required_card {
                excluded.insert(card.as_str());
            }
        }
        excluded
    }

    fn offered_cards<'a>(
        &self,
        character: &Character,
        data: &'a ReferenceData,
        ceiling: u8,
        for_required: bool,
    ) -> Vec<&'a DomainCard> {
        let excluded = self.excluded_cards(character, for_required);
        let mut seen = HashSet::new();
        data.domain_cards
            .iter()
            .filter(|card| self.card_accessible(character, card, ceiling))
            .filter(|card| !excluded.contains(card.name.as_str()))
            .filter(|card| seen.insert(card.name.clone()))
            .collect()
    }

    /// Cards offered by the domain-card advancement being resolved
    pub fn domain_card_options<'a>(
        &self,
        character: &Character,
        data: &'a ReferenceData,
    ) -> Vec<&'a DomainCard> {
        match &self.step {
            Step::Resolve(ComplexAdvancement::DomainCard { ceiling, .. }) => {
                self.offered_cards(character, data, *ceiling, false)
            }
            _ => Vec::new(),
        }
    }

    /// Classes available as a multiclass
    pub fn multiclass_options<'a>(
        &self,
        character: &Character,
        data: &'a ReferenceData,
    ) -> Vec<&'a ClassDef> {
        data.classes
            .iter()
            .filter(|c| c.name != character.class)
            .filter(|c| c.domains.iter().any(|d| !character.domains.contains(d)))
            .collect()
    }

    /// Subclasses that can take an upgrade
    pub fn upgrade_options(&self, character: &Character) -> Vec<SubclassTarget> {
        let mut options = Vec::new();
        if character.mastery.is_none() {
            options.push(SubclassTarget::Primary);
        }
        if character
            .multiclass
            .as_ref()
            .is_some_and(|m| m.specialization.is_none())
        {
            options.push(SubclassTarget::Multiclass);
        }
        options
    }

    /// Cards offered for the mandatory level-up card
    pub fn required_card_options<'a>(
        &self,
        character: &Character,
        data: &'a ReferenceData,
    ) -> Vec<&'a DomainCard> {
        self.offered_cards(character, data, self.new_level, true)
    }

    /// Whether `advancement` would have at least one valid answer
    pub(crate) fn can_resolve(
        &self,
        character: &Character,
        data: &ReferenceData,
        advancement: &ComplexAdvancement,
    ) -> bool {
        match advancement {
            ComplexAdvancement::IncreaseTraits => self.trait_options(character).len() >= 2,
            ComplexAdvancement::IncreaseExperience => self.experience_options(character).len() >= 2,
            ComplexAdvancement::DomainCard { ceiling, .. } => {
                !self.offered_cards(character, data, *ceiling, false).is_empty()
            }
            ComplexAdvancement::Multiclass => !self.multiclass_options(character, data).is_empty(),
            ComplexAdvancement::UpgradeSubclass => !self.upgrade_options(character).is_empty(),
        }
    }

    /// Choose the mandatory domain card
    pub fn select_required_card(
        &mut self,
        character: &Character,
        data: &ReferenceData,
        card: &str,
    ) -> Result<(), ProgressionError> {
        self.expect_step(&Step::RequiredDomainCard)?;
        if data.card(card).is_none() {
            return Err(ProgressionError::missing("domain card", card));
        }
        if !self
            .required_card_options(character, data)
            .iter()
            .any(|c| c.name == card)
        {
            return Err(ProgressionError::invalid(format!(
                "'{card}' is not an available level {} card",
                self.new_level
            )));
        }
        self.selections.required_card = Some(card.to_string());
        self.step = Step::Confirm;
        Ok(())
    }

    /// Return to the previous step, discarding what was chosen there
    pub fn back(&mut self) -> Result<(), ProgressionError> {
        let previous = std::mem::replace(&mut self.step, Step::Complete);
        let next = match previous {
            step @ (Step::TierAchievements | Step::Complete) => {
                let name = step.name();
                self.step = step;
                return Err(ProgressionError::WrongStep(name));
            }
            Step::NewExperience => {
                self.selections.new_experience = None;
                Step::TierAchievements
            }
            Step::ChooseAdvancements => {
                self.selections.clear_advancements();
                if Tier::is_tier_entry(self.new_level) {
                    Step::NewExperience
                } else {
                    Step::TierAchievements
                }
            }
            Step::Resolve(current) => match self.selections.resolved.pop() {
                Some((previous, _)) => {
                    self.selections.pending.push_front(current);
                    Step::Resolve(previous)
                }
                None => {
                    self.selections.clear_advancements();
                    Step::ChooseAdvancements
                }
            },
            Step::RequiredDomainCard => match self.selections.resolved.pop() {
                Some((previous, _)) => Step::Resolve(previous),
                None => {
                    self.selections.clear_advancements();
                    Step::ChooseAdvancements
                }
            },
            Step::Confirm => {
                self.selections.required_card = None;
                Step::RequiredDomainCard
            }
        };
        self.step = next;
        tracing::debug!(step = self.step.name(), "level-up stepped back");
        Ok(())
    }

    /// Abandon the level-up; the character was never touched
    pub fn cancel(self, history: &mut History) {
        if self.snapshot_pushed {
            history.discard_latest();
        }
        tracing::debug!(new_level = self.new_level, "level-up cancelled");
    }

    /// Apply every selection to the character in one step
    pub fn finalize(
        &mut self,
        character: &mut Character,
        data: &ReferenceData,
    ) -> Result<(), ProgressionError> {
        self.expect_step(&Step::Confirm)?;
        if character.level + 1 != self.new_level {
            return Err(ProgressionError::Inconsistent(format!(
                "level-up to {} applied to a level {} character",
                self.new_level, character.level
            )));
        }
        let tier = self.tier();
        let mut next = character.clone();
        let mut new_experience = self.selections.new_experience.clone();
        if Tier::is_tier_entry(self.new_level) && new_experience.is_none() {
            return Err(ProgressionError::invalid("the tier achievement experience is missing"));
        }

        for id in &self.selections.simple {
            next.advancements.record(tier, id);
        }

        for (advancement, choice) in &self.selections.resolved {
            if let ComplexChoice::UpgradeSubclass(target) = choice {
                apply_subclass_upgrade(&mut next, data, *target)?;
                next.advancements.record(tier, advancement.id());
            }
        }

        for (advancement, choice) in &self.selections.resolved {
            if let ComplexChoice::Traits(a, b) = choice {
                for t in [*a, *b] {
                    *next.traits.get_mut(t) += 1;
                    next.trait_boosts.entry(tier).or_default().insert(t);
                }
                next.advancements.record(tier, advancement.id());
            }
        }

        for (advancement, choice) in &self.selections.resolved {
            if let ComplexChoice::Experiences(a, b) = choice {
                for r in [*a, *b] {
                    let experience = match r {
                        ExperienceRef::Existing(i) => next.experiences.get_mut(i),
                        ExperienceRef::New => new_experience.as_mut(),
                    };
                    let experience = experience.ok_or_else(|| {
                        ProgressionError::Inconsistent(format!("experience {r:?} does not exist"))
                    })?;
                    experience.modifier += 1;
                }
                next.advancements.record(tier, advancement.id());
            }
        }

        for (advancement, choice) in &self.selections.resolved {
            if let ComplexChoice::DomainCard(card) = choice {
                next.acquire_card(card)?;
                next.advancements.record(tier, advancement.id());
            }
        }

        for (advancement, choice) in &self.selections.resolved {
            if let ComplexChoice::Multiclass {
                class,
                domain,
                subclass,
            } = choice
            {
                let class_def = data
                    .class(class)
                    .ok_or_else(|| ProgressionError::missing("class", class.as_str()))?;
                let subclass_def = class_def
                    .subclass(subclass)
                    .ok_or_else(|| ProgressionError::missing("subclass", subclass.as_str()))?;
                next.multiclass = Some(Multiclass {
                    class: class_def.name.clone(),
                    domain: domain.clone(),
                    subclass: subclass_def.name.clone(),
                    foundation: subclass_def.foundation_feature.clone(),
                    class_feature: class_def.class_feature.clone(),
                    specialization: None,
                });
                next.advancements.record(tier, advancement.id());
            }
        }

        if let Some(experience) = new_experience.take() {
            next.experiences.push(experience);
        }

        let required = self
            .selections
            .required_card
            .as_deref()
            .ok_or_else(|| ProgressionError::invalid("choose the level-up domain card"))?;
        next.acquire_card(required)?;

        next.threshold_bonus += 1;
        next.level = self.new_level;
        next.check_invariants()?;

        *character = next;
        self.selections = Selections::default();
        self.step = Step::Complete;
        tracing::info!(name = %character.name, level = character.level, "level-up committed");
        Ok(())
    }
}

fn apply_subclass_upgrade(
    character: &mut Character,
    data: &ReferenceData,
    target: SubclassTarget,
) -> Result<(), ProgressionError> {
    match target {
        SubclassTarget::Primary => {
            let subclass = data
                .class(&character.class)
                .and_then(|c| c.subclass(&character.subclass))
                .ok_or_else(|| ProgressionError::missing("subclass", character.subclass.as_str()))?;
            if character.specialization.is_none() {
                character.specialization = Some(subclass.specialization_feature.clone());
            } else if character.mastery.is_none() {
                character.mastery = Some(subclass.mastery_feature.clone());
            } else {
                return Err(ProgressionError::Inconsistent(
                    "subclass already mastered".into(),
                ));
            }
        }
        SubclassTarget::Multiclass => {
            let multiclass = character.multiclass.as_mut().ok_or_else(|| {
                ProgressionError::Inconsistent("no multiclass to upgrade".into())
            })?;
            let subclass = data
                .class(&multiclass.class)
                .and_then(|c| c.subclass(&multiclass.subclass))
                .ok_or_else(|| ProgressionError::missing("subclass", multiclass.subclass.as_str()))?;
            multiclass.specialization = Some(subclass.specialization_feature.clone());
        }
    }
    Ok(())
}

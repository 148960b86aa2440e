//! Random character generation through the regular level-up flow

use crate::advancement::{Budget, ComplexAdvancement, ADVANCEMENT_POINTS};
use crate::advancement::selector::{MULTICLASS, UPGRADE_SUBCLASS};
use crate::character::{Character, CharacterDraft};
use crate::config::{ArmorDef, ReferenceData, WeaponDef};
use crate::error::ProgressionError;
use crate::level_up::{ComplexChoice, ExperienceRef, LevelUp, Step};
use crate::types::{Experience, MAX_LEVEL};
use rand::seq::SliceRandom;
use rand::Rng;

/// Chance to take multiclass when it is eligible
const MULTICLASS_CHANCE: f64 = 0.15;

/// Chance to take a subclass upgrade when it is eligible
const UPGRADE_CHANCE: f64 = 0.5;

const GENERATED_DESCRIPTION: &str = "No description.";

/// Armor name prefix for each tier's standard set
const ARMOR_PREFIX: [&str; 4] = ["", "Improved", "Advanced", "Legendary"];

/// Builds random but rule-abiding characters
pub struct CharacterGenerator<'a> {
    data: &'a ReferenceData,
}

impl<'a> CharacterGenerator<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        CharacterGenerator { data }
    }

    /// Create a level-1 character and level it up to `target_level`.
    /// `class` pins the class; otherwise one is picked at random.
    pub fn generate(
        &self,
        target_level: u8,
        class: Option<&str>,
        rng: &mut impl Rng,
    ) -> Result<Character, ProgressionError> {
        if !(1..=MAX_LEVEL).contains(&target_level) {
            return Err(ProgressionError::invalid(format!(
                "target level {target_level} outside 1..={MAX_LEVEL}"
            )));
        }

        let mut character = self.create(class, rng)?;
        while character.level < target_level {
            self.level_up(&mut character, rng)?;
        }
        self.equip(&mut character, rng)?;

        tracing::info!(
            name = %character.name,
            class = %character.class,
            subclass = %character.subclass,
            level = character.level,
            "character generated"
        );
        Ok(character)
    }

    fn create(&self, class: Option<&str>, rng: &mut impl Rng) -> Result<Character, ProgressionError> {
        let data = self.data;
        let class_def = match class {
            Some(name) => data
                .class(name)
                .ok_or_else(|| ProgressionError::missing("class", name))?,
            None => data
                .classes
                .choose(rng)
                .ok_or_else(|| ProgressionError::missing("class", "any"))?,
        };
        let subclass = class_def
            .subclasses
            .choose(rng)
            .ok_or_else(|| ProgressionError::missing("subclass", class_def.name.as_str()))?;
        let ancestry = data
            .ancestries
            .choose(rng)
            .ok_or_else(|| ProgressionError::missing("ancestry", "any"))?;
        let community = data
            .communities
            .choose(rng)
            .ok_or_else(|| ProgressionError::missing("community", "any"))?;

        let mut pool = data.experiences.all_names();
        pool.shuffle(rng);
        let experiences = (0..2).map(|i| match pool.get(i) {
            Some(name) => Experience::new(*name, GENERATED_DESCRIPTION),
            None => Experience::new(format!("Generated Lvl 1 Exp {}", i + 1), GENERATED_DESCRIPTION),
        });

        let starters: Vec<&str> = data
            .domain_cards
            .iter()
            .filter(|c| c.level == 1 && class_def.has_domain(&c.domain))
            .map(|c| c.name.as_str())
            .collect();
        let cards: Vec<&str> = starters.choose_multiple(rng, 2).copied().collect();

        let mut draft = CharacterDraft::new()
            .name(format!("{} {}", ancestry.name, class_def.name))
            .class(class_def.name.as_str())
            .subclass(subclass.name.as_str())
            .ancestry(ancestry.name.as_str())
            .community(community.name.as_str())
            .suggested_traits(data)?;
        for experience in experiences {
            draft = draft.experience(experience);
        }
        for card in cards {
            draft = draft.card(card);
        }
        draft.build(data)
    }

    /// Drive one level-up with random legal choices
    fn level_up(&self, character: &mut Character, rng: &mut impl Rng) -> Result<(), ProgressionError> {
        let data = self.data;
        let mut flow = LevelUp::begin(character)?;
        let level = flow.new_level();
        flow.continue_from_achievements()?;

        if flow.step() == &Step::NewExperience {
            let taken: Vec<&str> = character.experiences.iter().map(|e| e.name.as_str()).collect();
            let fresh: Vec<&str> = data
                .experiences
                .all_names()
                .into_iter()
                .filter(|name| !taken.contains(name))
                .collect();
            let name = match fresh.choose(rng) {
                Some(name) => name.to_string(),
                None => format!("Generated Lvl {level} Exp"),
            };
            flow.submit_new_experience(&name, GENERATED_DESCRIPTION)?;
        }

        let picks = self.pick_advancements(&flow, character, rng);
        let budget = match picks.cost {
            ADVANCEMENT_POINTS => Budget::Exact(ADVANCEMENT_POINTS),
            _ => Budget::AtMost(ADVANCEMENT_POINTS),
        };
        if picks.cost < ADVANCEMENT_POINTS {
            tracing::debug!(level, spent = picks.cost, "ran out of legal advancements");
        }
        flow.choose_within(character, data, &picks.ids, budget)?;

        while let Step::Resolve(current) = flow.step().clone() {
            let choice = self.random_choice(&flow, character, &current, rng)?;
            flow.resolve(character, data, choice)?;
        }

        let card = flow
            .required_card_options(character, data)
            .choose(rng)
            .map(|c| c.name.clone())
            .ok_or_else(|| ProgressionError::invalid(format!("no domain card left for level {level}")))?;
        flow.select_required_card(character, data, &card)?;
        flow.finalize(character, self.data)
    }

    /// Greedily fill the point budget
    fn pick_advancements(&self, flow: &LevelUp, character: &Character, rng: &mut impl Rng) -> Picks {
        let mut picks = Picks::default();
        loop {
            let remaining = ADVANCEMENT_POINTS - picks.cost;
            let exclusive_taken = picks.ids.iter().any(|id| id == MULTICLASS || id == UPGRADE_SUBCLASS);
            let candidates: Vec<(String, u32)> = flow
                .eligible_advancements(character, self.data)
                .into_iter()
                .filter(|d| d.cost <= remaining && !picks.ids.contains(&d.id))
                .filter(|d| !(exclusive_taken && (d.id == MULTICLASS || d.id == UPGRADE_SUBCLASS)))
                .filter(|d| match ComplexAdvancement::from_id(&d.id, flow.new_level()) {
                    Some(complex) => flow.can_resolve(character, self.data, &complex),
                    None => true,
                })
                .map(|d| (d.id.clone(), d.cost))
                .collect();
            if candidates.is_empty() {
                break;
            }

            let find = |id: &str| candidates.iter().find(|(c, _)| c == id);
            let regular: Vec<&(String, u32)> = candidates
                .iter()
                .filter(|(id, _)| id != MULTICLASS && id != UPGRADE_SUBCLASS)
                .collect();
            let chosen = if let Some(m) = find(MULTICLASS).filter(|_| rng.gen_bool(MULTICLASS_CHANCE)) {
                m
            } else if let Some(u) = find(UPGRADE_SUBCLASS).filter(|_| rng.gen_bool(UPGRADE_CHANCE)) {
                u
            } else if let Some(r) = regular.choose(rng).copied() {
                r
            } else if let Some(special) = find(UPGRADE_SUBCLASS).or_else(|| find(MULTICLASS)) {
                special
            } else {
                break;
            };

            let (id, cost) = chosen.clone();
            picks.cost += cost;
            picks.ids.push(id);
            if picks.cost >= ADVANCEMENT_POINTS {
                break;
            }
        }
        picks
    }

    fn random_choice(
        &self,
        flow: &LevelUp,
        character: &Character,
        current: &ComplexAdvancement,
        rng: &mut impl Rng,
    ) -> Result<ComplexChoice, ProgressionError> {
        let none_left = || ProgressionError::invalid(format!("no options for '{}'", current.id()));
        let choice = match current {
            ComplexAdvancement::IncreaseTraits => {
                let options = flow.trait_options(character);
                let pair: Vec<_> = options.choose_multiple(rng, 2).copied().collect();
                match pair[..] {
                    [a, b] => ComplexChoice::Traits(a, b),
                    _ => return Err(none_left()),
                }
            }
            ComplexAdvancement::IncreaseExperience => {
                let options: Vec<ExperienceRef> = flow
                    .experience_options(character)
                    .into_iter()
                    .map(|(r, _)| r)
                    .collect();
                let pair: Vec<_> = options.choose_multiple(rng, 2).copied().collect();
                match pair[..] {
                    [a, b] => ComplexChoice::Experiences(a, b),
                    _ => return Err(none_left()),
                }
            }
            ComplexAdvancement::DomainCard { .. } => {
                let card = flow
                    .domain_card_options(character, self.data)
                    .choose(rng)
                    .map(|c| c.name.clone())
                    .ok_or_else(none_left)?;
                ComplexChoice::DomainCard(card)
            }
            ComplexAdvancement::Multiclass => {
                let class = *flow
                    .multiclass_options(character, self.data)
                    .choose(rng)
                    .ok_or_else(none_left)?;
                let domains: Vec<&String> = class
                    .domains
                    .iter()
                    .filter(|d| !character.domains.contains(*d))
                    .collect();
                let domain = domains.choose(rng).ok_or_else(none_left)?;
                let subclass = class.subclasses.choose(rng).ok_or_else(none_left)?;
                ComplexChoice::Multiclass {
                    class: class.name.clone(),
                    domain: (*domain).clone(),
                    subclass: subclass.name.clone(),
                }
            }
            ComplexAdvancement::UpgradeSubclass => {
                let target = flow
                    .upgrade_options(character)
                    .choose(rng)
                    .copied()
                    .ok_or_else(none_left)?;
                ComplexChoice::UpgradeSubclass(target)
            }
        };
        Ok(choice)
    }

    /// Equip tier-appropriate gear suited to the highest trait
    fn equip(&self, character: &mut Character, rng: &mut impl Rng) -> Result<(), ProgressionError> {
        let data = self.data;
        let tier = character.tier();
        let prefix = ARMOR_PREFIX[usize::from(tier.number()) - 1];

        let in_tier: Vec<&ArmorDef> = data.armor.iter().filter(|a| a.tier() == Some(tier)).collect();
        let standard: Vec<&ArmorDef> = in_tier
            .iter()
            .copied()
            .filter(|a| a.name.contains(prefix))
            .collect();
        if let Some(armor) = standard.choose(rng).or_else(|| in_tier.choose(rng)) {
            character.equip_armor(data, &armor.name)?;
        }

        let best = character.traits.highest();
        let primaries: Vec<&WeaponDef> = data
            .weapons
            .primary
            .iter()
            .filter(|w| w.tier == tier.number())
            .collect();
        let suited: Vec<&WeaponDef> = primaries
            .iter()
            .copied()
            .filter(|w| w.attack_trait == best)
            .collect();
        if let Some(weapon) = suited.choose(rng).or_else(|| primaries.choose(rng)) {
            character.equip_primary(data, &weapon.name)?;
        }

        let holds_two_handed = character.equipment.primary().is_some_and(WeaponDef::is_two_handed);
        if !holds_two_handed {
            let secondaries: Vec<&WeaponDef> = data
                .weapons
                .secondary
                .iter()
                .filter(|w| w.tier <= tier.number())
                .collect();
            if let Some(weapon) = secondaries.choose(rng) {
                character.equip_secondary(data, &weapon.name)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Picks {
    ids: Vec<String>,
    cost: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_level_one_character() {
        let data = ReferenceData::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let character = CharacterGenerator::new(&data)
            .generate(1, Some("Wizard"), &mut rng)
            .unwrap();

        assert_eq!(character.level, 1);
        assert_eq!(character.class, "Wizard");
        assert_eq!(character.experiences.len(), 2);
        assert_eq!(character.domain_cards.len(), 2);
        assert!(character.traits.is_starting_array());
        assert!(character.equipment.armor().is_some());
        assert!(character.check_invariants().is_ok());
    }

    #[test]
    fn test_reaches_target_level() {
        let data = ReferenceData::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let generator = CharacterGenerator::new(&data);
        for level in [2, 5, 8, 10] {
            let character = generator.generate(level, None, &mut rng).unwrap();
            assert_eq!(character.level, level);
            assert_eq!(character.threshold_bonus, i32::from(level) - 1);
            assert_eq!(
                character.domain_cards.len(),
                usize::from(level) + 1 + extra_cards(&character)
            );
            assert!(character.check_invariants().is_ok());
        }
    }

    /// Cards gained through domain-card advancements
    fn extra_cards(character: &Character) -> usize {
        ["take_domain_card_t2", "take_domain_card_t3", "take_domain_card_t4"]
            .iter()
            .map(|id| character.advancements.lifetime(id) as usize)
            .sum()
    }

    #[test]
    fn test_same_seed_same_character() {
        let data = ReferenceData::builtin().unwrap();
        let generator = CharacterGenerator::new(&data);
        let a = generator
            .generate(6, None, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = generator
            .generate(6, None, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_input() {
        let data = ReferenceData::builtin().unwrap();
        let generator = CharacterGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generator.generate(0, None, &mut rng).is_err());
        assert!(generator.generate(11, None, &mut rng).is_err());
        assert!(matches!(
            generator.generate(3, Some("Necromancer"), &mut rng),
            Err(ProgressionError::MissingReference { .. })
        ));
    }

    #[test]
    fn test_two_handed_primary_has_no_secondary() {
        let data = ReferenceData::builtin().unwrap();
        let generator = CharacterGenerator::new(&data);
        for seed in 0..50 {
            let character = generator
                .generate(4, None, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            if character.equipment.primary().is_some_and(WeaponDef::is_two_handed) {
                assert!(character.equipment.secondary().is_none());
            }
        }
    }
}

//! Property tests for trait arrays, tier breakpoints and the loadout

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sheet_core::prelude::*;
use sheet_core::types::STARTING_TRAIT_ARRAY;
use sheet_core::LOADOUT_SIZE;

fn base_draft(traits: TraitSet) -> CharacterDraft {
    CharacterDraft::new()
        .name("Prop")
        .class("Rogue")
        .subclass("Nightwalker")
        .ancestry("Elf")
        .community("Slyborne")
        .traits(traits)
        .experience(Experience::new("Cutpurse", ""))
        .experience(Experience::new("Quiet", ""))
        .card("Pick and Pull")
        .card("Uncanny Disguise")
}

proptest! {
    #[test]
    fn prop_any_permutation_of_starting_array_is_accepted(
        order in Just(STARTING_TRAIT_ARRAY.to_vec()).prop_shuffle()
    ) {
        let data = ReferenceData::builtin().unwrap();
        let values: [i32; 6] = order.try_into().unwrap();
        let character = base_draft(TraitSet::from_array(values)).build(&data);
        prop_assert!(character.is_ok());
    }

    #[test]
    fn prop_non_permutations_are_rejected(values in prop::array::uniform6(-3i32..=3)) {
        let mut sorted = values;
        sorted.sort_unstable();
        let mut expected = STARTING_TRAIT_ARRAY;
        expected.sort_unstable();
        prop_assume!(sorted != expected);

        let data = ReferenceData::builtin().unwrap();
        let result = base_draft(TraitSet::from_array(values)).build(&data);
        prop_assert!(matches!(result, Err(ProgressionError::InvalidChoice(_))));
    }

    #[test]
    fn prop_tier_breakpoints(level in 1u8..=10) {
        let tier = Tier::from_level(level);
        let expected = match level {
            1 => 1,
            2..=4 => 2,
            5..=7 => 3,
            _ => 4,
        };
        prop_assert_eq!(tier.number(), expected);
        prop_assert_eq!(Tier::is_tier_entry(level), level > 1 && tier.entry_level() == level);
    }

    #[test]
    fn prop_generated_characters_hold_invariants(seed in any::<u64>(), level in 1u8..=10) {
        let data = ReferenceData::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let character = CharacterGenerator::new(&data).generate(level, None, &mut rng).unwrap();

        prop_assert_eq!(character.level, level);
        prop_assert!(character.check_invariants().is_ok());
        prop_assert_eq!(character.loadout.slots().len(), LOADOUT_SIZE);
        for card in character.loadout.cards() {
            prop_assert!(character.owns_card(card));
        }
        let stats = DerivedStats::compute(&character, &data);
        prop_assert_eq!(stats.tier, Tier::from_level(level));
    }

    #[test]
    fn prop_loadout_stays_owned_and_unique(ops in prop::collection::vec((0usize..7, 0usize..4, any::<bool>()), 0..40)) {
        let data = ReferenceData::builtin().unwrap();
        // A level 6 character owns more cards than the loadout holds
        let mut rng = StdRng::seed_from_u64(3);
        let mut character = CharacterGenerator::new(&data).generate(6, Some("Rogue"), &mut rng).unwrap();
        let owned = character.domain_cards.clone();

        for (index, card, remove) in ops {
            let card = &owned[card % owned.len()];
            // Errors are fine; the loadout must stay consistent either way
            let _ = if remove {
                character.remove_from_slot(index).map(|_| ())
            } else if character.loadout.get(index).is_some() {
                character.swap_slot(index, card).map(|_| ())
            } else {
                character.add_to_slot(card, index)
            };

            prop_assert_eq!(character.loadout.slots().len(), LOADOUT_SIZE);
            let mut seen = std::collections::HashSet::new();
            for slotted in character.loadout.cards() {
                prop_assert!(character.owns_card(slotted));
                prop_assert!(seen.insert(slotted.to_string()));
            }
        }
        prop_assert!(character.check_invariants().is_ok());
    }
}

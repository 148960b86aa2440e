//! sheet_gen - Generate a random character and print its derived sheet
//!
//! Usage: sheet_gen [--level N] [--class NAME] [--seed N] [--save FILE]

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sheet_core::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generate a random character and print its derived sheet
#[derive(Parser, Debug)]
#[command(name = "sheet_gen", version, long_about = None)]
struct Args {
    /// Target level (1-10)
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// Class to generate; random when omitted
    #[arg(long)]
    class: Option<String>,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Save the character to this JSON file
    #[arg(long)]
    save: Option<PathBuf>,
}

fn print_sheet(character: &Character, stats: &DerivedStats) {
    println!("=== {} ===", character.name);
    println!(
        "Level {} {} ({}) - {} {}",
        character.level, character.class, character.subclass, character.community, character.ancestry
    );
    if let Some(multiclass) = &character.multiclass {
        println!("Multiclass: {} ({}) via {}", multiclass.class, multiclass.subclass, multiclass.domain);
    }
    println!("Domains: {}", character.accessible_domains().join(", "));
    println!("{} | Proficiency {}", stats.tier, stats.proficiency);
    println!();

    for t in Trait::ALL {
        println!("  {:<10} {:+}", t.name(), stats.traits.get(t));
    }
    println!();
    println!("Evasion:      {}", stats.evasion);
    println!("Armor Score:  {}", stats.armor_score);
    println!("Thresholds:   {} / {}", stats.major_threshold, stats.severe_threshold);
    println!("Hit Points:   {}", stats.hp);
    println!("Stress:       {}", stats.stress);
    if let Some(t) = stats.spellcast_trait {
        println!("Spellcast:    {t}");
    }
    println!();

    let equipment = &character.equipment;
    if let Some(armor) = equipment.armor() {
        println!("Armor:     {}", armor.name);
    }
    if let (Some(weapon), Some(damage)) = (equipment.primary(), &stats.primary_damage) {
        println!("Primary:   {} ({}, {})", weapon.name, weapon.range, damage);
    }
    if let (Some(weapon), Some(damage)) = (equipment.secondary(), &stats.secondary_damage) {
        println!("Secondary: {} ({}, {})", weapon.name, weapon.range, damage);
    }
    println!();

    println!("Experiences:");
    for experience in &character.experiences {
        println!("  {} {:+}", experience.name, experience.modifier);
    }
    println!("Loadout:");
    for (i, slot) in character.loadout.slots().iter().enumerate() {
        println!("  [{}] {}", i + 1, slot.as_deref().unwrap_or("-"));
    }
    let vault = character.vault();
    if !vault.is_empty() {
        println!("Vault: {}", vault.join(", "));
    }
    for fragment in &stats.ambiguous_features {
        println!("(unparsed modifier: {fragment})");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_core=info,sheet_gen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let data = match ReferenceData::builtin() {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = %e, "failed to load reference data");
            return ExitCode::FAILURE;
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let generator = CharacterGenerator::new(&data);
    let character = match generator.generate(args.level, args.class.as_deref(), &mut rng) {
        Ok(character) => character,
        Err(e) => {
            tracing::error!(error = %e, kind = ?e.kind(), "generation failed");
            return ExitCode::FAILURE;
        }
    };

    let stats = DerivedStats::compute(&character, &data);
    print_sheet(&character, &stats);

    if let Some(path) = args.save {
        let mut store = JsonFileStore::new(path);
        if let Err(e) = store.save(&character, true) {
            tracing::error!(error = %e, "failed to save character");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

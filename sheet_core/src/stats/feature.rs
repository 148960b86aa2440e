//! Modifier extraction from equipment feature text.
//!
//! Grammar, applied to each `;`-separated fragment:
//!
//! ```text
//! modifier := signed-int WS+ "to" WS+ target      (case-insensitive)
//! target   := "Evasion" | trait-name
//! ```
//!
//! A fragment yields at most one modifier. An Evasion match wins over a
//! trait match. Text that matches nothing contributes zero. Fragments with
//! more than one candidate modifier are applied by that rule and reported as
//! ambiguous. Armor score bonuses are read separately with
//! [`armor_score_bonus`].

use crate::types::Trait;
use regex::Regex;
use std::sync::LazyLock;

static EVASION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(-?\d+)\s+to\s+Evasion").expect("valid regex"));
static TARGETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(-?\d+)\s+to\s+(\w+)").expect("valid regex"));
static PLUS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+(\d+)").expect("valid regex"));

/// Modifiers pulled out of one feature text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureModifiers {
    pub evasion: i32,
    pub traits: Vec<(Trait, i32)>,
    /// Fragments holding more than one candidate modifier
    pub ambiguous: Vec<String>,
}

impl FeatureModifiers {
    /// Net modifier to one trait
    pub fn trait_total(&self, t: Trait) -> i32 {
        self.traits
            .iter()
            .filter(|(target, _)| *target == t)
            .map(|(_, value)| value)
            .sum()
    }
}

/// Parse evasion and trait modifiers out of `text`
pub fn parse_feature(text: &str) -> FeatureModifiers {
    let mut result = FeatureModifiers::default();

    for fragment in text.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let candidates = TARGETED
            .captures_iter(fragment)
            .filter(|caps| {
                let target = &caps[2];
                target.eq_ignore_ascii_case("evasion") || Trait::from_name(target).is_some()
            })
            .count();
        if candidates > 1 {
            tracing::warn!(fragment, "feature fragment has more than one modifier");
            result.ambiguous.push(fragment.to_string());
        }

        if let Some(caps) = EVASION.captures(fragment) {
            if let Ok(value) = caps[1].parse::<i32>() {
                result.evasion += value;
            }
        } else if let Some(caps) = TARGETED.captures(fragment) {
            if let (Ok(value), Some(t)) = (caps[1].parse::<i32>(), Trait::from_name(&caps[2])) {
                result.traits.push((t, value));
            }
        }
    }

    result
}

/// Bonus armor score granted by `text`: the first "+N" when the text
/// mentions "Armor Score", otherwise zero
pub fn armor_score_bonus(text: &str) -> i32 {
    if !text.contains("Armor Score") {
        return 0;
    }
    PLUS_NUMBER
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

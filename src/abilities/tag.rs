//! Weapon ability tags
//!
//! Source data carries abilities as free text (`"SUSTAINED HITS 1"`,
//! `"ANTI-VEHICLE 4+"`). Tags are read once into [`Ability`] values when a
//! weapon is loaded. Matching is case-insensitive; text that names no known
//! ability is ignored.

use serde::{Deserialize, Serialize};

/// A weapon ability the engine knows how to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Melee volleys lose one attack per model
    Heavy,
    /// Attack count is tripled
    Blast,
    /// Each hit grants N extra hit rolls
    SustainedHits(u32),
    /// Each successful wound also inflicts N mortal wounds
    MortalWounds(u32),
    /// A natural 6 to hit inflicts one extra mortal wound
    DevastatingWounds,
    /// Hit rolls of 1 are rolled again once
    RerollOnes,
    /// Bonus damage against vehicles when strength reaches the threshold
    AntiVehicle(u32),
}

const HEAVY: &str = "HEAVY";
const BLAST: &str = "BLAST";
const REROLL_ONES: &str = "REROLL ONES";
const DEVASTATING_WOUNDS: &str = "DEVASTATING WOUNDS";
const SUSTAINED_HITS: &str = "SUSTAINED HITS";
const MORTAL_WOUNDS: &str = "MORTAL WOUNDS";
const ANTI_VEHICLE: &str = "ANTI-VEHICLE";

impl Ability {
    /// Read every ability named by one tag
    ///
    /// A single tag can name several flag abilities (`"HEAVY, BLAST"`).
    /// Valued abilities need their exact shape; a malformed value yields
    /// nothing rather than an error.
    pub fn parse_tag(tag: &str) -> Vec<Ability> {
        let upper = tag.trim().to_uppercase();
        let mut found = Vec::new();

        if upper.contains(HEAVY) {
            found.push(Ability::Heavy);
        }
        if upper.contains(BLAST) {
            found.push(Ability::Blast);
        }
        if upper.contains(REROLL_ONES) {
            found.push(Ability::RerollOnes);
        }
        if upper.contains(DEVASTATING_WOUNDS) {
            found.push(Ability::DevastatingWounds);
        }

        if upper.starts_with(SUSTAINED_HITS) {
            if let Some(n) = trailing_value(&upper, 3) {
                found.push(Ability::SustainedHits(n));
            }
        } else if upper.starts_with(MORTAL_WOUNDS) {
            if let Some(n) = trailing_value(&upper, 3) {
                found.push(Ability::MortalWounds(n));
            }
        } else if upper.starts_with(ANTI_VEHICLE) {
            if let Some(n) = trailing_value(&upper, 2) {
                found.push(Ability::AntiVehicle(n));
            }
        }

        found
    }

    /// Read all tags of a weapon, in tag order
    pub fn parse_tags<S: AsRef<str>>(tags: &[S]) -> Vec<Ability> {
        tags.iter()
            .flat_map(|tag| Ability::parse_tag(tag.as_ref()))
            .collect()
    }
}

/// Last token of a tag with exactly `tokens` words, minus any trailing `+`
fn trailing_value(tag: &str, tokens: usize) -> Option<u32> {
    let words: Vec<&str> = tag.split_whitespace().collect();
    if words.len() != tokens {
        return None;
    }
    words[tokens - 1].trim_end_matches('+').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_tags_match_case_insensitively() {
        assert_eq!(Ability::parse_tag("heavy"), vec![Ability::Heavy]);
        assert_eq!(Ability::parse_tag("Blast"), vec![Ability::Blast]);
        assert_eq!(Ability::parse_tag("reroll ones"), vec![Ability::RerollOnes]);
        assert_eq!(
            Ability::parse_tag("Devastating Wounds"),
            vec![Ability::DevastatingWounds]
        );
    }

    #[test]
    fn test_flag_tags_match_as_substrings() {
        assert_eq!(
            Ability::parse_tag("HEAVY, BLAST"),
            vec![Ability::Heavy, Ability::Blast]
        );
    }

    #[test]
    fn test_valued_tags() {
        assert_eq!(
            Ability::parse_tag("SUSTAINED HITS 2"),
            vec![Ability::SustainedHits(2)]
        );
        assert_eq!(
            Ability::parse_tag("mortal wounds 1"),
            vec![Ability::MortalWounds(1)]
        );
        assert_eq!(
            Ability::parse_tag("ANTI-VEHICLE 4+"),
            vec![Ability::AntiVehicle(4)]
        );
    }

    #[test]
    fn test_malformed_values_are_inactive() {
        assert!(Ability::parse_tag("SUSTAINED HITS D3").is_empty());
        assert!(Ability::parse_tag("SUSTAINED HITS").is_empty());
        assert!(Ability::parse_tag("MORTAL WOUNDS 1 EXTRA").is_empty());
        assert!(Ability::parse_tag("ANTI-VEHICLE").is_empty());
        assert!(Ability::parse_tag("ANTI-VEHICLE X+").is_empty());
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        assert!(Ability::parse_tag("LETHAL HITS").is_empty());
        assert!(Ability::parse_tag("").is_empty());
    }

    #[test]
    fn test_parse_tags_keeps_order() {
        let tags = ["SUSTAINED HITS 1", "RAPID FIRE 2", "HEAVY"];
        assert_eq!(
            Ability::parse_tags(&tags),
            vec![Ability::SustainedHits(1), Ability::Heavy]
        );
    }
}

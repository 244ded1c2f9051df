//! Typed unit and weapon profiles
//!
//! Profiles are built once by the catalog loader and are read-only from then
//! on. The engine borrows them; it never copies or mutates them.

use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, AbilityModifiers};
use crate::dice::DiceExpr;

/// Keyword that marks a unit as a vehicle
pub const VEHICLE_KEYWORD: &str = "Vehicle";

/// One stat line of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub toughness: u32,
    pub wounds: u32,
    /// Armour save. Carried for display, not used in resolution.
    pub save: u32,
}

/// Melee or ranged, with the ranged distance text kept as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeClass {
    Melee,
    Ranged(String),
}

impl RangeClass {
    pub fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("melee") {
            RangeClass::Melee
        } else {
            RangeClass::Ranged(text.trim().to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    pub range: RangeClass,
    pub attacks: DiceExpr,
    /// Minimum D6 result to hit (`"3+"` is 3)
    pub skill: u32,
    pub strength: u32,
    /// Armour penetration as written. Not used in resolution.
    pub ap: String,
    pub damage: DiceExpr,
    /// Ability tags as written in the source data
    pub tags: Vec<String>,
    pub abilities: Vec<Ability>,
}

impl WeaponProfile {
    /// Build a weapon from source-style text fields
    pub fn from_text(
        name: &str,
        range: &str,
        attacks: &str,
        skill: &str,
        strength: &str,
        damage: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            range: RangeClass::parse(range),
            attacks: DiceExpr::parse(attacks),
            skill: parse_stat(skill),
            strength: parse_stat(strength),
            ap: "0".to_string(),
            damage: DiceExpr::parse(damage),
            tags: Vec::new(),
            abilities: Vec::new(),
        }
    }

    /// Replace the ability tags, re-parsing them
    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self.abilities = Ability::parse_tags(&self.tags);
        self
    }

    pub fn with_ap(mut self, ap: &str) -> Self {
        self.ap = ap.to_string();
        self
    }

    pub fn is_melee(&self) -> bool {
        matches!(self.range, RangeClass::Melee)
    }

    pub fn modifiers(&self) -> AbilityModifiers {
        AbilityModifiers::from_abilities(&self.abilities)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitProfile {
    pub faction_name: String,
    pub unit_name: String,
    pub stats: Vec<StatLine>,
    pub keywords: Vec<String>,
    pub weapons: Vec<WeaponProfile>,
}

impl UnitProfile {
    pub fn new(faction_name: &str, unit_name: &str, stats: StatLine) -> Self {
        Self {
            faction_name: faction_name.to_string(),
            unit_name: unit_name.to_string(),
            stats: vec![stats],
            keywords: Vec::new(),
            weapons: Vec::new(),
        }
    }

    pub fn with_weapon(mut self, weapon: WeaponProfile) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keywords.push(keyword.to_string());
        self
    }

    /// The stat line combat uses: the first one, or all zeroes if none
    pub fn primary_stats(&self) -> StatLine {
        self.stats.first().copied().unwrap_or_default()
    }

    pub fn toughness(&self) -> u32 {
        self.primary_stats().toughness
    }

    pub fn wounds(&self) -> u32 {
        self.primary_stats().wounds
    }

    pub fn is_vehicle(&self) -> bool {
        self.keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(VEHICLE_KEYWORD))
    }

    /// Case-insensitive weapon lookup
    pub fn weapon(&self, name: &str) -> Option<&WeaponProfile> {
        self.weapons
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name))
    }

    /// Unit name in title case, for listings
    pub fn display_name(&self) -> String {
        self.unit_name
            .split(' ')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse a numeric stat written as text (`"4"`, `"3+"`). Unparsable is 0.
pub fn parse_stat(text: &str) -> u32 {
    text.trim().trim_matches('+').parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat() {
        assert_eq!(parse_stat("4"), 4);
        assert_eq!(parse_stat("3+"), 3);
        assert_eq!(parse_stat(" 2+ "), 2);
        assert_eq!(parse_stat("x"), 0);
        assert_eq!(parse_stat(""), 0);
    }

    #[test]
    fn test_range_class() {
        assert_eq!(RangeClass::parse("Melee"), RangeClass::Melee);
        assert_eq!(RangeClass::parse("melee"), RangeClass::Melee);
        assert_eq!(
            RangeClass::parse("24\""),
            RangeClass::Ranged("24\"".to_string())
        );
    }

    #[test]
    fn test_weapon_from_text() {
        let weapon = WeaponProfile::from_text("Bolt rifle", "24\"", "2", "3+", "4", "1")
            .with_tags(&["ASSAULT", "HEAVY"]);
        assert!(!weapon.is_melee());
        assert_eq!(weapon.attacks, DiceExpr::Flat(2));
        assert_eq!(weapon.skill, 3);
        assert_eq!(weapon.strength, 4);
        assert_eq!(weapon.abilities, vec![Ability::Heavy]);
        assert!(weapon.modifiers().heavy);
    }

    #[test]
    fn test_unit_without_stats_is_all_zero() {
        let mut unit = UnitProfile::new("Orks", "Boyz", StatLine::default());
        unit.stats.clear();
        assert_eq!(unit.toughness(), 0);
        assert_eq!(unit.wounds(), 0);
    }

    #[test]
    fn test_vehicle_keyword() {
        let tank = UnitProfile::new("Astra Militarum", "Leman Russ", StatLine::default())
            .with_keyword("VEHICLE");
        assert!(tank.is_vehicle());
        let infantry = UnitProfile::new("Astra Militarum", "Guardsmen", StatLine::default())
            .with_keyword("Infantry");
        assert!(!infantry.is_vehicle());
    }

    #[test]
    fn test_weapon_lookup_ignores_case() {
        let unit = UnitProfile::new("Orks", "Boyz", StatLine::default()).with_weapon(
            WeaponProfile::from_text("Choppa", "Melee", "3", "3+", "4", "1"),
        );
        assert!(unit.weapon("CHOPPA").is_some());
        assert!(unit.weapon("slugga").is_none());
    }

    #[test]
    fn test_display_name_title_case() {
        let unit = UnitProfile::new("Orks", "BEAST SNAGGA boyz", StatLine::default());
        assert_eq!(unit.display_name(), "Beast Snagga Boyz");
    }
}

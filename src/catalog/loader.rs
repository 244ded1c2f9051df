//! Load the unit catalog from JSON
//!
//! The source format is an array of units keyed by lowercase field names,
//! with every numeric stat written as text:
//!
//! ```json
//! [{
//!   "factionname": "Orks",
//!   "unitname": "Boyz",
//!   "stats": [{ "t": "5", "w": "1", "sv": "5+" }],
//!   "keywords": [{ "words": ["Infantry", "Mob"] }],
//!   "weapons": [{
//!     "name": "Choppa", "range": "Melee", "attacks": "3", "skill": "3+",
//!     "strength": "4", "ap": "-1", "damage": "1", "abilities": []
//!   }]
//! }]
//! ```
//!
//! Text is parsed into typed profiles exactly once, here.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::abilities::Ability;
use crate::catalog::profile::{parse_stat, RangeClass, StatLine, UnitProfile, WeaponProfile};
use crate::core::error::Result;
use crate::dice::DiceExpr;

#[derive(Debug, Deserialize)]
struct RawUnit {
    #[serde(default)]
    factionname: String,
    #[serde(default)]
    unitname: String,
    #[serde(default)]
    stats: Vec<RawStatLine>,
    #[serde(default)]
    keywords: Vec<RawKeywordGroup>,
    #[serde(default)]
    weapons: Vec<RawWeapon>,
}

#[derive(Debug, Deserialize)]
struct RawStatLine {
    #[serde(default)]
    t: TextValue,
    #[serde(default)]
    w: TextValue,
    #[serde(default)]
    sv: TextValue,
}

#[derive(Debug, Deserialize)]
struct RawKeywordGroup {
    #[serde(default)]
    words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawWeapon {
    #[serde(default)]
    name: String,
    #[serde(default)]
    range: TextValue,
    #[serde(default)]
    attacks: TextValue,
    #[serde(default)]
    skill: TextValue,
    #[serde(default)]
    strength: TextValue,
    #[serde(default)]
    ap: TextValue,
    #[serde(default)]
    damage: TextValue,
    #[serde(default)]
    abilities: Vec<String>,
}

/// A field that should be text but is sometimes written as a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Default for TextValue {
    fn default() -> Self {
        TextValue::Text(String::new())
    }
}

impl TextValue {
    fn into_text(self) -> String {
        match self {
            TextValue::Text(s) => s,
            TextValue::Integer(n) => n.to_string(),
            TextValue::Float(f) => f.to_string(),
        }
    }
}

/// Parse catalog JSON into typed unit profiles
pub fn parse_units(json: &str) -> Result<Vec<UnitProfile>> {
    let raw: Vec<RawUnit> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(convert_unit).collect())
}

/// Read and parse a catalog file
pub fn load_units(path: &Path) -> Result<Vec<UnitProfile>> {
    let content = fs::read_to_string(path)?;
    let units = parse_units(&content)?;
    tracing::info!(
        path = %path.display(),
        units = units.len(),
        "Loaded unit catalog"
    );
    Ok(units)
}

fn convert_unit(raw: RawUnit) -> UnitProfile {
    let stats = raw
        .stats
        .into_iter()
        .map(|line| StatLine {
            toughness: parse_stat(&line.t.into_text()),
            wounds: parse_stat(&line.w.into_text()),
            save: parse_stat(&line.sv.into_text()),
        })
        .collect::<Vec<_>>();

    if stats.is_empty() {
        tracing::debug!(unit = %raw.unitname, "Unit has no stat line, using zero stats");
    }

    UnitProfile {
        faction_name: raw.factionname,
        unit_name: raw.unitname,
        stats,
        keywords: raw.keywords.into_iter().flat_map(|k| k.words).collect(),
        weapons: raw.weapons.into_iter().map(convert_weapon).collect(),
    }
}

fn convert_weapon(raw: RawWeapon) -> WeaponProfile {
    let abilities = Ability::parse_tags(&raw.abilities);
    WeaponProfile {
        range: RangeClass::parse(&raw.range.into_text()),
        attacks: DiceExpr::parse(&raw.attacks.into_text()),
        skill: parse_stat(&raw.skill.into_text()),
        strength: parse_stat(&raw.strength.into_text()),
        ap: raw.ap.into_text(),
        damage: DiceExpr::parse(&raw.damage.into_text()),
        tags: raw.abilities,
        abilities,
        name: raw.name,
    }
}

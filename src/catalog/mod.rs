//! Unit catalog: the read-only store of unit and weapon profiles
//!
//! Loaded once, then passed by reference to whoever needs it. Lookups are
//! case-insensitive.

pub mod loader;
pub mod profile;

use std::path::Path;

use ahash::AHashMap;

use crate::core::error::{Result, SimError};

pub use loader::{load_units, parse_units};
pub use profile::{parse_stat, RangeClass, StatLine, UnitProfile, WeaponProfile, VEHICLE_KEYWORD};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: Vec<UnitProfile>,
    /// Lowercase unit name -> index; a later duplicate name shadows an earlier one
    by_name: AHashMap<String, usize>,
}

impl Catalog {
    pub fn from_units(units: Vec<UnitProfile>) -> Self {
        let by_name = units
            .iter()
            .enumerate()
            .map(|(i, u)| (u.unit_name.to_lowercase(), i))
            .collect();
        Self { units, by_name }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::from_units(parse_units(json)?))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_units(load_units(path)?))
    }

    pub fn units(&self) -> &[UnitProfile] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Faction names, unique, in first-seen order
    pub fn factions(&self) -> Vec<&str> {
        let mut seen = ahash::AHashSet::new();
        self.units
            .iter()
            .map(|u| u.faction_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Units of a faction, sorted by name
    ///
    /// Faction names are compared after normalization, so `"adeptus-custodes"`
    /// finds `"Adeptus Custodes"`.
    pub fn units_in_faction(&self, faction: &str) -> Vec<&UnitProfile> {
        let wanted = normalize_faction(faction);
        let mut units: Vec<&UnitProfile> = self
            .units
            .iter()
            .filter(|u| normalize_faction(&u.faction_name) == wanted)
            .collect();
        units.sort_by_key(|u| u.unit_name.to_lowercase());
        units
    }

    /// Like [`Catalog::units_in_faction`] but an unknown faction is an error
    pub fn require_faction(&self, faction: &str) -> Result<Vec<&UnitProfile>> {
        let units = self.units_in_faction(faction);
        if units.is_empty() {
            return Err(SimError::FactionNotFound(faction.to_string()));
        }
        Ok(units)
    }

    /// Case-insensitive unit lookup
    pub fn find_unit(&self, name: &str) -> Option<&UnitProfile> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.units[i])
    }

    /// Like [`Catalog::find_unit`] but missing units are an error
    pub fn require_unit(&self, name: &str) -> Result<&UnitProfile> {
        self.find_unit(name)
            .ok_or_else(|| SimError::UnitNotFound(name.to_string()))
    }
}

/// Lowercase, spaces and slashes to dashes, quotes dropped
pub fn normalize_faction(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != '\'' && *c != '"')
        .map(|c| if c == ' ' || c == '/' { '-' } else { c })
        .collect()
}

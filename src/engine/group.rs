//! Combat groups: a unit profile fielded at a model count with a loadout

use crate::catalog::{UnitProfile, WeaponProfile};

/// One side of a battle
///
/// Borrows its profile and weapons from the catalog. The model count is
/// always at least 1.
#[derive(Debug, Clone)]
pub struct CombatGroup<'a> {
    profile: &'a UnitProfile,
    model_count: u32,
    weapons: Vec<&'a WeaponProfile>,
}

impl<'a> CombatGroup<'a> {
    pub fn new(profile: &'a UnitProfile, model_count: u32, weapons: Vec<&'a WeaponProfile>) -> Self {
        Self {
            profile,
            model_count: model_count.max(1),
            weapons,
        }
    }

    /// Field every weapon the unit carries
    pub fn with_all_weapons(profile: &'a UnitProfile, model_count: u32) -> Self {
        Self::new(profile, model_count, profile.weapons.iter().collect())
    }

    /// Select weapons by name, case-insensitively, in the order given
    ///
    /// Names the unit does not carry are skipped.
    pub fn from_weapon_names<S: AsRef<str>>(
        profile: &'a UnitProfile,
        model_count: u32,
        names: &[S],
    ) -> Self {
        let weapons = names
            .iter()
            .filter_map(|name| {
                let found = profile.weapon(name.as_ref());
                if found.is_none() {
                    tracing::warn!(
                        unit = %profile.unit_name,
                        weapon = %name.as_ref(),
                        "Unknown weapon name skipped"
                    );
                }
                found
            })
            .collect();
        Self::new(profile, model_count, weapons)
    }

    pub fn profile(&self) -> &'a UnitProfile {
        self.profile
    }

    pub fn name(&self) -> &'a str {
        &self.profile.unit_name
    }

    pub fn model_count(&self) -> u32 {
        self.model_count
    }

    pub fn weapons(&self) -> &[&'a WeaponProfile] {
        &self.weapons
    }

    /// Wound pool at the start of a battle: models x W
    pub fn starting_wounds(&self) -> u32 {
        self.model_count.saturating_mul(self.profile.wounds())
    }
}

//! Flattened view of a weapon's abilities for the attack pipeline

use serde::{Deserialize, Serialize};

use crate::abilities::tag::Ability;

/// Attack count multiplier applied by BLAST
pub const BLAST_MULTIPLIER: u32 = 3;

/// Modifiers derived from an ability set
///
/// A pure function of the abilities: two weapons with the same tags always
/// produce equal modifiers. Valued abilities take the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityModifiers {
    pub heavy: bool,
    pub blast_multiplier: u32,
    pub sustained_hits: u32,
    pub mortal_wounds_per_hit: u32,
    pub devastating_wounds: bool,
    pub reroll_ones: bool,
    /// 0 means inactive
    pub anti_vehicle_threshold: u32,
}

impl Default for AbilityModifiers {
    fn default() -> Self {
        Self {
            heavy: false,
            blast_multiplier: 1,
            sustained_hits: 0,
            mortal_wounds_per_hit: 0,
            devastating_wounds: false,
            reroll_ones: false,
            anti_vehicle_threshold: 0,
        }
    }
}

impl AbilityModifiers {
    pub fn from_abilities(abilities: &[Ability]) -> Self {
        let mut modifiers = Self::default();
        let mut sustained = None;
        let mut mortal = None;
        let mut anti_vehicle = None;

        for ability in abilities {
            match *ability {
                Ability::Heavy => modifiers.heavy = true,
                Ability::Blast => modifiers.blast_multiplier = BLAST_MULTIPLIER,
                Ability::DevastatingWounds => modifiers.devastating_wounds = true,
                Ability::RerollOnes => modifiers.reroll_ones = true,
                Ability::SustainedHits(n) => {
                    sustained.get_or_insert(n);
                }
                Ability::MortalWounds(n) => {
                    mortal.get_or_insert(n);
                }
                Ability::AntiVehicle(n) => {
                    anti_vehicle.get_or_insert(n);
                }
            }
        }

        modifiers.sustained_hits = sustained.unwrap_or(0);
        modifiers.mortal_wounds_per_hit = mortal.unwrap_or(0);
        modifiers.anti_vehicle_threshold = anti_vehicle.unwrap_or(0);
        modifiers
    }

    /// Parse raw tags and derive modifiers in one step
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        Self::from_abilities(&Ability::parse_tags(tags))
    }

    pub fn is_blast(&self) -> bool {
        self.blast_multiplier > 1
    }

    /// Extra damage per wound against a qualifying vehicle; equals the threshold
    pub fn anti_vehicle_bonus(&self) -> u32 {
        self.anti_vehicle_threshold
    }

    pub fn anti_vehicle_applies(&self, strength: u32, target_is_vehicle: bool) -> bool {
        target_is_vehicle
            && self.anti_vehicle_threshold > 0
            && strength >= self.anti_vehicle_threshold
    }
}

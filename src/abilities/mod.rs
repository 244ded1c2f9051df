//! Weapon abilities: tag parsing and derived attack modifiers

pub mod modifiers;
pub mod tag;

pub use modifiers::{AbilityModifiers, BLAST_MULTIPLIER};
pub use tag::Ability;

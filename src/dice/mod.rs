//! Dice notation and dice sources

pub mod expression;
pub mod roller;

pub use expression::{DamageRoll, DiceExpr};
pub use roller::{DieRoller, LoadedDice, RngDice};

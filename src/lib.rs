//! Wargame Sim - dice-driven combat resolution for tabletop unit profiles

pub mod abilities;
pub mod catalog;
pub mod core;
pub mod dice;
pub mod engine;

pub use crate::catalog::{Catalog, UnitProfile, WeaponProfile};
pub use crate::core::{EngineConfig, FiringOrder, Result, SimError};
pub use crate::engine::{
    run_batch, simulate, simulate_duel, simulate_seeded, AttackMode, BattleResult, CombatGroup,
    Verdict,
};

//! Combat resolution engine
//!
//! group -> scheduler -> attack pipeline (hit -> wound -> damage) -> result

pub mod attack;
pub mod batch;
pub mod constants;
pub mod duel;
pub mod group;
pub mod log;
pub mod result;
pub mod scheduler;
pub mod wound;

pub use attack::{resolve_weapon, AttackOutcome, HitRoll, Target};
pub use batch::{run_batch, BatchSummary};
pub use duel::{simulate_duel, AttackMode};
pub use group::CombatGroup;
pub use log::{BattleLog, LogEntry, LogEntryKind};
pub use result::{Anomaly, BattleResult, SideSummary, Verdict};
pub use scheduler::{simulate, simulate_seeded, BattleState};
pub use wound::wound_threshold;

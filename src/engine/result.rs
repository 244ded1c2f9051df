//! Battle outcome
//!
//! Built once when a battle ends and read-only afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::log::{BattleLog, LogEntry};

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AttackerWins,
    DefenderWins,
    /// Mutual destruction, or the round cap was hit
    Draw,
    /// No battle was fought
    NoContest,
}

/// Something unusual that ended or prevented a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    RoundCapReached { rounds: u32 },
    NoWeaponForMode { unit: String, mode: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::RoundCapReached { rounds } => {
                write!(f, "Round cap of {} reached with both sides alive", rounds)
            }
            Anomaly::NoWeaponForMode { unit, mode } => {
                write!(f, "{} has no {} weapons", unit, mode)
            }
        }
    }
}

/// Per-side figures at the end of a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    pub name: String,
    pub models: u32,
    pub starting_wounds: u32,
    pub remaining_wounds: u32,
    /// Damage this side inflicted, mortal wounds included
    pub damage_dealt: u32,
}

impl SideSummary {
    pub fn new(name: &str, models: u32, starting_wounds: u32) -> Self {
        Self {
            name: name.to_string(),
            models,
            starting_wounds,
            remaining_wounds: starting_wounds,
            damage_dealt: 0,
        }
    }

    pub fn is_wiped(&self) -> bool {
        self.remaining_wounds == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    log: String,
    entries: Vec<LogEntry>,
    winner: String,
    loser: String,
    draw: bool,
    rounds: u32,
    verdict: Verdict,
    attacker: SideSummary,
    defender: SideSummary,
    anomaly: Option<Anomaly>,
}

impl BattleResult {
    /// Seal a finished battle. Winner and loser names follow from the verdict.
    pub(crate) fn conclude(
        log: BattleLog,
        verdict: Verdict,
        rounds: u32,
        attacker: SideSummary,
        defender: SideSummary,
        anomaly: Option<Anomaly>,
    ) -> Self {
        let (winner, loser) = match verdict {
            Verdict::AttackerWins => (attacker.name.clone(), defender.name.clone()),
            Verdict::DefenderWins => (defender.name.clone(), attacker.name.clone()),
            Verdict::Draw | Verdict::NoContest => (String::new(), String::new()),
        };

        Self {
            log: log.render(),
            entries: log.into_entries(),
            winner,
            loser,
            draw: verdict == Verdict::Draw,
            rounds,
            verdict,
            attacker,
            defender,
            anomaly,
        }
    }

    /// Rendered narrative
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Winning unit name, empty on a draw or no contest
    pub fn winner(&self) -> &str {
        &self.winner
    }

    pub fn loser(&self) -> &str {
        &self.loser
    }

    pub fn is_draw(&self) -> bool {
        self.draw
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn attacker(&self) -> &SideSummary {
        &self.attacker
    }

    pub fn defender(&self) -> &SideSummary {
        &self.defender
    }

    pub fn anomaly(&self) -> Option<&Anomaly> {
        self.anomaly.as_ref()
    }
}

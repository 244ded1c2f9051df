//! Single-weapon duels
//!
//! One attacker model uses its first weapon of the chosen mode against one
//! defender model until the defender is slain. The defender never fires back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{UnitProfile, WeaponProfile};
use crate::core::{EngineConfig, SimError};
use crate::dice::DieRoller;
use crate::engine::attack::Target;
use crate::engine::group::CombatGroup;
use crate::engine::log::{BattleLog, LogEntryKind};
use crate::engine::result::{Anomaly, BattleResult, SideSummary, Verdict};
use crate::engine::scheduler::fire_volley;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackMode {
    Melee,
    Ranged,
}

impl AttackMode {
    pub fn matches(&self, weapon: &WeaponProfile) -> bool {
        match self {
            AttackMode::Melee => weapon.is_melee(),
            AttackMode::Ranged => !weapon.is_melee(),
        }
    }

    /// First weapon of this mode in the unit's profile
    pub fn select<'a>(&self, unit: &'a UnitProfile) -> Option<&'a WeaponProfile> {
        unit.weapons.iter().find(|w| self.matches(w))
    }
}

impl fmt::Display for AttackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackMode::Melee => write!(f, "melee"),
            AttackMode::Ranged => write!(f, "ranged"),
        }
    }
}

impl FromStr for AttackMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "melee" => Ok(AttackMode::Melee),
            "ranged" => Ok(AttackMode::Ranged),
            other => Err(SimError::InvalidConfig(format!(
                "unknown attack mode '{}', expected melee or ranged",
                other
            ))),
        }
    }
}

/// Run a one-sided duel between single models
pub fn simulate_duel(
    attacker: &UnitProfile,
    defender: &UnitProfile,
    mode: AttackMode,
    config: &EngineConfig,
    dice: &mut impl DieRoller,
) -> BattleResult {
    let mut log = BattleLog::new();
    let mut attacker_side = SideSummary::new(&attacker.unit_name, 1, attacker.wounds());
    let mut defender_side = SideSummary::new(&defender.unit_name, 1, defender.wounds());

    let Some(weapon) = mode.select(attacker) else {
        let anomaly = Anomaly::NoWeaponForMode {
            unit: attacker.unit_name.clone(),
            mode: mode.to_string(),
        };
        tracing::warn!(%anomaly, "Duel not fought");
        log.push(
            LogEntryKind::Anomaly,
            format!("{} has no {} weapons!", attacker.unit_name, mode),
        );
        return BattleResult::conclude(
            log,
            Verdict::NoContest,
            0,
            attacker_side,
            defender_side,
            Some(anomaly),
        );
    };

    log.push(
        LogEntryKind::BattleStarted,
        format!(
            "💥 {} duels {} with {} ({})",
            attacker.unit_name, defender.unit_name, weapon.name, mode
        ),
    );

    let group = CombatGroup::new(attacker, 1, vec![weapon]);
    let target = Target::of(defender);
    let mut rounds = 0;

    while !defender_side.is_wiped() {
        if rounds >= config.max_rounds {
            let anomaly = Anomaly::RoundCapReached { rounds };
            tracing::warn!(%anomaly, "Duel stopped early");
            log.push(LogEntryKind::Anomaly, format!("⚠️ {}", anomaly));
            log.push(
                LogEntryKind::BattleEnded,
                format!("⚔️ {} is still standing.", defender.unit_name),
            );
            return BattleResult::conclude(
                log,
                Verdict::Draw,
                rounds,
                attacker_side,
                defender_side,
                Some(anomaly),
            );
        }
        rounds += 1;
        log.set_round(rounds);
        log.push(LogEntryKind::RoundStarted, format!("🔁 Round {}", rounds));

        fire_volley(
            &group,
            &mut attacker_side,
            &mut defender_side,
            &target,
            dice,
            &mut log,
        );
    }

    log.push(
        LogEntryKind::BattleEnded,
        format!("🏁 {} is slain after {} round(s)!", defender.unit_name, rounds),
    );
    tracing::info!(
        attacker = %attacker.unit_name,
        defender = %defender.unit_name,
        %mode,
        rounds,
        "Duel concluded"
    );

    BattleResult::conclude(
        log,
        Verdict::AttackerWins,
        rounds,
        attacker_side,
        defender_side,
        None,
    )
}

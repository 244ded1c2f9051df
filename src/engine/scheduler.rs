//! Multi-round battle loop
//!
//! Each round: attacker weapons fire in order -> defender weapons fire in
//! order -> check wound pools. Pools only ever shrink and stop at 0.

use crate::core::{EngineConfig, FiringOrder};
use crate::dice::{DieRoller, RngDice};
use crate::engine::attack::{resolve_weapon, Target};
use crate::engine::group::CombatGroup;
use crate::engine::log::{BattleLog, LogEntryKind};
use crate::engine::result::{Anomaly, BattleResult, SideSummary, Verdict};

const ROUND_SEPARATOR: &str = "--------------------------";

/// Where a battle stands after a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    InProgress,
    /// Round cap reached with both pools above 0
    BothAlive,
    AttackerWiped,
    DefenderWiped,
    /// Both pools at 0
    Draw,
}

impl BattleState {
    pub fn assess(attacker_wounds: u32, defender_wounds: u32) -> Self {
        match (attacker_wounds, defender_wounds) {
            (0, 0) => BattleState::Draw,
            (0, _) => BattleState::AttackerWiped,
            (_, 0) => BattleState::DefenderWiped,
            _ => BattleState::InProgress,
        }
    }

    pub fn is_over(&self) -> bool {
        *self != BattleState::InProgress
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            BattleState::AttackerWiped => Verdict::DefenderWins,
            BattleState::DefenderWiped => Verdict::AttackerWins,
            BattleState::Draw | BattleState::BothAlive => Verdict::Draw,
            // Only reachable if called mid-battle
            BattleState::InProgress => Verdict::NoContest,
        }
    }
}

/// Fight two groups until one is wiped out or the round cap is hit
pub fn simulate(
    attacker: &CombatGroup<'_>,
    defender: &CombatGroup<'_>,
    config: &EngineConfig,
    dice: &mut impl DieRoller,
) -> BattleResult {
    let mut log = BattleLog::new();
    let mut attacker_side = SideSummary::new(
        attacker.name(),
        attacker.model_count(),
        attacker.starting_wounds(),
    );
    let mut defender_side = SideSummary::new(
        defender.name(),
        defender.model_count(),
        defender.starting_wounds(),
    );

    log.push(
        LogEntryKind::BattleStarted,
        format!(
            "💥 Battle starts: {} x {} vs {} x {}",
            attacker.model_count(),
            attacker.name(),
            defender.model_count(),
            defender.name()
        ),
    );

    let attacker_target = Target::of(attacker.profile());
    let defender_target = Target::of(defender.profile());

    let mut state = BattleState::assess(
        attacker_side.remaining_wounds,
        defender_side.remaining_wounds,
    );
    let mut rounds = 0;

    while !state.is_over() {
        if rounds >= config.max_rounds {
            state = BattleState::BothAlive;
            break;
        }
        rounds += 1;
        log.set_round(rounds);
        log.push(LogEntryKind::RoundStarted, format!("🔁 Round {}", rounds));
        tracing::debug!(
            round = rounds,
            attacker_wounds = attacker_side.remaining_wounds,
            defender_wounds = defender_side.remaining_wounds,
            "Round started"
        );

        fire_volley(
            attacker,
            &mut attacker_side,
            &mut defender_side,
            &defender_target,
            dice,
            &mut log,
        );

        let retaliates = match config.firing_order {
            FiringOrder::Sequential => !defender_side.is_wiped(),
            FiringOrder::Simultaneous => true,
        };
        if retaliates {
            fire_volley(
                defender,
                &mut defender_side,
                &mut attacker_side,
                &attacker_target,
                dice,
                &mut log,
            );
        }

        state = BattleState::assess(
            attacker_side.remaining_wounds,
            defender_side.remaining_wounds,
        );
        if !state.is_over() && rounds < config.max_rounds {
            log.push(LogEntryKind::RoundEnded, ROUND_SEPARATOR);
        }
    }

    let anomaly = match state {
        BattleState::BothAlive => Some(Anomaly::RoundCapReached { rounds }),
        _ => None,
    };
    finish(
        log,
        state,
        rounds,
        attacker_side,
        defender_side,
        anomaly,
    )
}

/// [`simulate`] with a fresh ChaCha8 generator seeded from `seed`
pub fn simulate_seeded(
    attacker: &CombatGroup<'_>,
    defender: &CombatGroup<'_>,
    config: &EngineConfig,
    seed: u64,
) -> BattleResult {
    let mut dice = RngDice::seeded(seed);
    simulate(attacker, defender, config, &mut dice)
}

/// Fire every weapon of `shooter` at `target_side`, in loadout order
///
/// Weapons left over once the target pool hits 0 do not fire.
pub(crate) fn fire_volley(
    shooter: &CombatGroup<'_>,
    shooter_side: &mut SideSummary,
    target_side: &mut SideSummary,
    target: &Target<'_>,
    dice: &mut impl DieRoller,
    log: &mut BattleLog,
) {
    for weapon in shooter.weapons() {
        if target_side.is_wiped() {
            break;
        }

        let outcome = resolve_weapon(
            weapon,
            shooter.name(),
            shooter.model_count(),
            target,
            dice,
            log,
        );
        let dealt = outcome.total_damage();
        target_side.remaining_wounds = target_side.remaining_wounds.saturating_sub(dealt);
        shooter_side.damage_dealt = shooter_side.damage_dealt.saturating_add(dealt);

        log.push(
            LogEntryKind::Summary,
            format!(
                "📊 Summary: Hits: {} | Wounds: {} | Damage: {} (+{} mortal wounds) | {}'s Remaining Wounds: {}",
                outcome.hits,
                outcome.wounds,
                outcome.damage,
                outcome.mortal_wounds,
                target_side.name,
                target_side.remaining_wounds
            ),
        );
    }
}

fn finish(
    mut log: BattleLog,
    state: BattleState,
    rounds: u32,
    attacker: SideSummary,
    defender: SideSummary,
    anomaly: Option<Anomaly>,
) -> BattleResult {
    match state {
        BattleState::Draw => {
            log.push(
                LogEntryKind::BattleEnded,
                "☠️ Both sides wiped out in mutual destruction!",
            );
        }
        BattleState::AttackerWiped => {
            log.push(
                LogEntryKind::BattleEnded,
                format!("🏁 {} wiped out! {} wins!", attacker.name, defender.name),
            );
        }
        BattleState::DefenderWiped => {
            log.push(
                LogEntryKind::BattleEnded,
                format!("🏁 {} wiped out! {} wins!", defender.name, attacker.name),
            );
        }
        BattleState::BothAlive | BattleState::InProgress => {
            if let Some(anomaly) = &anomaly {
                tracing::warn!(%anomaly, "Battle stopped early");
                log.push(LogEntryKind::Anomaly, format!("⚠️ {}", anomaly));
            }
            log.push(
                LogEntryKind::BattleEnded,
                "⚔️ Both sides still have units alive after the battle.",
            );
        }
    }

    let verdict = state.verdict();
    tracing::info!(
        ?verdict,
        rounds,
        attacker = %attacker.name,
        defender = %defender.name,
        attacker_wounds = attacker.remaining_wounds,
        defender_wounds = defender.remaining_wounds,
        "Battle concluded"
    );

    BattleResult::conclude(log, verdict, rounds, attacker, defender, anomaly)
}

//! Monte-Carlo batches of one matchup
//!
//! Iteration `i` gets its own ChaCha8 generator seeded `base_seed + i`
//! (wrapping), so a batch is reproducible no matter how rayon schedules it.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::EngineConfig;
use crate::dice::RngDice;
use crate::engine::group::CombatGroup;
use crate::engine::result::{BattleResult, Verdict};
use crate::engine::scheduler::simulate;

/// Aggregate of many battles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub iterations: u64,
    pub attacker_wins: u64,
    pub defender_wins: u64,
    pub draws: u64,
    /// Battles that ended with an anomaly (round cap)
    pub anomalies: u64,
    pub total_rounds: u64,
}

impl BatchSummary {
    /// Summary of a single battle
    pub fn from_result(result: &BattleResult) -> Self {
        let mut summary = Self {
            iterations: 1,
            total_rounds: result.rounds() as u64,
            anomalies: result.anomaly().is_some() as u64,
            ..Default::default()
        };
        match result.verdict() {
            Verdict::AttackerWins => summary.attacker_wins = 1,
            Verdict::DefenderWins => summary.defender_wins = 1,
            Verdict::Draw => summary.draws = 1,
            Verdict::NoContest => {}
        }
        summary
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            iterations: self.iterations + other.iterations,
            attacker_wins: self.attacker_wins + other.attacker_wins,
            defender_wins: self.defender_wins + other.defender_wins,
            draws: self.draws + other.draws,
            anomalies: self.anomalies + other.anomalies,
            total_rounds: self.total_rounds + other.total_rounds,
        }
    }

    fn rate(&self, count: u64) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            count as f64 / self.iterations as f64
        }
    }

    pub fn attacker_win_rate(&self) -> f64 {
        self.rate(self.attacker_wins)
    }

    pub fn defender_win_rate(&self) -> f64 {
        self.rate(self.defender_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn average_rounds(&self) -> f64 {
        self.rate(self.total_rounds)
    }
}

/// Simulate the matchup `iterations` times in parallel
pub fn run_batch(
    attacker: &CombatGroup<'_>,
    defender: &CombatGroup<'_>,
    config: &EngineConfig,
    base_seed: u64,
    iterations: u64,
) -> BatchSummary {
    let summary = (0..iterations)
        .into_par_iter()
        .map(|i| {
            let mut dice = RngDice::seeded(base_seed.wrapping_add(i));
            let result = simulate(attacker, defender, config, &mut dice);
            BatchSummary::from_result(&result)
        })
        .reduce(BatchSummary::default, BatchSummary::merge);

    tracing::info!(
        iterations,
        base_seed,
        attacker = attacker.name(),
        defender = defender.name(),
        attacker_win_rate = summary.attacker_win_rate(),
        "Batch complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StatLine, UnitProfile, WeaponProfile};

    fn unit(name: &str, attacks: &str) -> UnitProfile {
        UnitProfile::new(
            "Test",
            name,
            StatLine {
                toughness: 4,
                wounds: 2,
                save: 4,
            },
        )
        .with_weapon(WeaponProfile::from_text("Gun", "24\"", attacks, "4+", "4", "D3"))
    }

    #[test]
    fn test_counts_add_up() {
        let a = unit("Alpha", "D6");
        let b = unit("Bravo", "2");
        let attacker = CombatGroup::with_all_weapons(&a, 5);
        let defender = CombatGroup::with_all_weapons(&b, 5);

        let summary = run_batch(&attacker, &defender, &EngineConfig::default(), 7, 200);
        assert_eq!(summary.iterations, 200);
        assert_eq!(
            summary.attacker_wins + summary.defender_wins + summary.draws,
            200
        );
        let rates = summary.attacker_win_rate() + summary.defender_win_rate() + summary.draw_rate();
        assert!((rates - 1.0).abs() < 1e-9);
        assert!(summary.average_rounds() >= 1.0);
    }

    #[test]
    fn test_same_seed_same_summary() {
        let a = unit("Alpha", "D6");
        let b = unit("Bravo", "D6");
        let attacker = CombatGroup::with_all_weapons(&a, 3);
        let defender = CombatGroup::with_all_weapons(&b, 3);
        let config = EngineConfig::default();

        let first = run_batch(&attacker, &defender, &config, 99, 64);
        let second = run_batch(&attacker, &defender, &config, 99, 64);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_batch() {
        let a = unit("Alpha", "1");
        let attacker = CombatGroup::with_all_weapons(&a, 1);
        let summary = run_batch(&attacker, &attacker, &EngineConfig::default(), 0, 0);
        assert_eq!(summary, BatchSummary::default());
        assert_eq!(summary.attacker_win_rate(), 0.0);
    }

    #[test]
    fn test_round_cap_counts_as_anomaly() {
        let a = unit("Alpha", "0");
        let attacker = CombatGroup::with_all_weapons(&a, 1);
        let config = EngineConfig::default().with_max_rounds(5);
        let summary = run_batch(&attacker, &attacker, &config, 1, 10);
        assert_eq!(summary.draws, 10);
        assert_eq!(summary.anomalies, 10);
        assert_eq!(summary.average_rounds(), 5.0);
    }
}

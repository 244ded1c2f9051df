//! Headless Battle Runner
//!
//! Simulates a matchup from a unit catalog and prints the result as JSON or
//! as the battle narrative.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use wargame_sim::core::{EngineConfig, FiringOrder, Result};
use wargame_sim::dice::RngDice;
use wargame_sim::engine::{
    run_batch, simulate, simulate_duel, AttackMode, BatchSummary, BattleResult, CombatGroup,
};
use wargame_sim::{Catalog, UnitProfile, Verdict};

/// Headless Battle Runner - unit vs unit combat simulation
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Simulate a battle between two units from a catalog")]
struct Args {
    /// Unit catalog (JSON array of units)
    #[arg(long, default_value = "data/catalog/sample_units.json")]
    catalog: PathBuf,

    /// Engine config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Attacking unit name
    #[arg(long)]
    attacker: String,

    /// Attacker weapons by name, comma separated (all weapons when omitted)
    #[arg(long, value_delimiter = ',')]
    attacker_weapons: Vec<String>,

    /// Attacking model count
    #[arg(long, default_value_t = 1)]
    attacker_count: u32,

    /// Defending unit name
    #[arg(long)]
    defender: String,

    /// Defender weapons by name, comma separated (all weapons when omitted)
    #[arg(long, value_delimiter = ',')]
    defender_weapons: Vec<String>,

    /// Defending model count
    #[arg(long, default_value_t = 1)]
    defender_count: u32,

    /// Run a single-weapon duel instead: melee or ranged
    #[arg(long)]
    mode: Option<AttackMode>,

    /// Both sides fire every round, even a side wiped that round
    #[arg(long)]
    simultaneous: bool,

    /// Run this many seeded battles and report win rates
    #[arg(long)]
    iterations: Option<u64>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output for a batch run
#[derive(Serialize)]
struct BatchReport<'a> {
    attacker: &'a str,
    defender: &'a str,
    seed: u64,
    #[serde(flatten)]
    summary: BatchSummary,
    attacker_win_rate: f64,
    defender_win_rate: f64,
    draw_rate: f64,
    average_rounds: f64,
}

/// JSON output for a single battle
#[derive(Serialize)]
struct BattleReport<'a> {
    seed: u64,
    #[serde(flatten)]
    result: &'a BattleResult,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wargame_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.simultaneous {
        config = config.with_firing_order(FiringOrder::Simultaneous);
    }

    let catalog = Catalog::load(&args.catalog)?;
    let attacker = catalog.require_unit(&args.attacker)?;
    let defender = catalog.require_unit(&args.defender)?;

    // Determine seed
    let seed = args.seed.unwrap_or_else(rand::random);

    if let Some(mode) = args.mode {
        let mut dice = RngDice::seeded(seed);
        let result = simulate_duel(attacker, defender, mode, &config, &mut dice);
        return print_battle(args, seed, &result);
    }

    let attacker_group = group(attacker, args.attacker_count, &args.attacker_weapons);
    let defender_group = group(defender, args.defender_count, &args.defender_weapons);

    match args.iterations {
        Some(iterations) => {
            let summary = run_batch(&attacker_group, &defender_group, &config, seed, iterations);
            print_batch(args, seed, &attacker_group, &defender_group, summary)
        }
        None => {
            let mut dice = RngDice::seeded(seed);
            let result = simulate(&attacker_group, &defender_group, &config, &mut dice);
            print_battle(args, seed, &result)
        }
    }
}

fn group<'a>(unit: &'a UnitProfile, count: u32, weapons: &[String]) -> CombatGroup<'a> {
    if weapons.is_empty() {
        CombatGroup::with_all_weapons(unit, count)
    } else {
        CombatGroup::from_weapon_names(unit, count, weapons)
    }
}

fn print_battle(args: &Args, seed: u64, result: &BattleResult) -> Result<()> {
    if args.format == "json" {
        let report = BattleReport { seed, result };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", result.log());
        println!();
        println!("Seed: {}", seed);
        match result.verdict() {
            Verdict::AttackerWins | Verdict::DefenderWins => {
                println!("Winner: {} ({} rounds)", result.winner(), result.rounds());
            }
            Verdict::Draw => println!("Draw after {} rounds", result.rounds()),
            Verdict::NoContest => println!("No contest"),
        }
    }
    Ok(())
}

fn print_batch(
    args: &Args,
    seed: u64,
    attacker: &CombatGroup<'_>,
    defender: &CombatGroup<'_>,
    summary: BatchSummary,
) -> Result<()> {
    if args.format == "json" {
        let report = BatchReport {
            attacker: attacker.name(),
            defender: defender.name(),
            seed,
            summary,
            attacker_win_rate: summary.attacker_win_rate(),
            defender_win_rate: summary.defender_win_rate(),
            draw_rate: summary.draw_rate(),
            average_rounds: summary.average_rounds(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "=== {} x{} vs {} x{} ===",
            attacker.name(),
            attacker.model_count(),
            defender.name(),
            defender.model_count()
        );
        println!("Battles: {} (base seed {})", summary.iterations, seed);
        println!(
            "{} wins: {} ({:.1}%)",
            attacker.name(),
            summary.attacker_wins,
            summary.attacker_win_rate() * 100.0
        );
        println!(
            "{} wins: {} ({:.1}%)",
            defender.name(),
            summary.defender_wins,
            summary.defender_win_rate() * 100.0
        );
        println!("Draws: {} ({:.1}%)", summary.draws, summary.draw_rate() * 100.0);
        println!("Average rounds: {:.2}", summary.average_rounds());
        if summary.anomalies > 0 {
            println!("Round cap reached: {}", summary.anomalies);
        }
    }
    Ok(())
}

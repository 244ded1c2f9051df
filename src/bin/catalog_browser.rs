//! Catalog browser
//!
//! Lists the factions in a unit catalog, the units of one faction, or the
//! full profile of one unit.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wargame_sim::catalog::RangeClass;
use wargame_sim::core::Result;
use wargame_sim::{Catalog, UnitProfile};

#[derive(Parser, Debug)]
#[command(name = "catalog_browser")]
#[command(about = "Browse factions and units in a unit catalog")]
struct Args {
    /// Unit catalog (JSON array of units)
    #[arg(long, default_value = "data/catalog/sample_units.json")]
    catalog: PathBuf,

    /// List the units of this faction
    #[arg(long)]
    faction: Option<String>,

    /// Show the full profile of this unit
    #[arg(long)]
    unit: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
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
    let catalog = Catalog::load(&args.catalog)?;

    if let Some(name) = &args.unit {
        let unit = catalog.require_unit(name)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(unit)?);
        } else {
            print_unit(unit);
        }
        return Ok(());
    }

    if let Some(faction) = &args.faction {
        let units = catalog.require_faction(faction)?;
        if args.json {
            let names: Vec<&str> = units.iter().map(|u| u.unit_name.as_str()).collect();
            println!("{}", serde_json::to_string_pretty(&names)?);
        } else {
            for unit in units {
                println!("{}", unit.display_name());
            }
        }
        return Ok(());
    }

    let factions = catalog.factions();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&factions)?);
    } else {
        println!("{} units in {} factions", catalog.len(), factions.len());
        for faction in factions {
            println!("  {}", faction);
        }
    }
    Ok(())
}

fn print_unit(unit: &UnitProfile) {
    let stats = unit.primary_stats();
    println!("{} ({})", unit.display_name(), unit.faction_name);
    println!(
        "  T{} W{} Sv{}+{}",
        stats.toughness,
        stats.wounds,
        stats.save,
        if unit.is_vehicle() { "  [Vehicle]" } else { "" }
    );
    if !unit.keywords.is_empty() {
        println!("  Keywords: {}", unit.keywords.join(", "));
    }
    for weapon in &unit.weapons {
        let range = match &weapon.range {
            RangeClass::Melee => "Melee".to_string(),
            RangeClass::Ranged(text) => text.clone(),
        };
        println!(
            "  - {}: {} A{} {}+ S{} AP{} D{}",
            weapon.name,
            range,
            weapon.attacks,
            weapon.skill,
            weapon.strength,
            weapon.ap,
            weapon.damage
        );
        if !weapon.tags.is_empty() {
            println!("      [{}]", weapon.tags.join(", "));
        }
    }
}

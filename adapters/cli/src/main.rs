#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lane Siege match.

mod config;
mod orders;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_siege_core::{MatchOutcome, Side};
use lane_siege_simulation::Simulation;
use lane_siege_system_opponent::PolicyTuning;
use tracing_subscriber::EnvFilter;

use crate::orders::OpeningOrder;

/// Runs a Lane Siege match without a presentation layer.
#[derive(Parser, Debug)]
#[command(name = "lane-siege")]
#[command(about = "Simulate a Lane Siege match and print the result")]
struct Args {
    /// Seed for the decision policies' random source.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Simulated seconds after which the match is abandoned undecided.
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,

    /// TOML file with a `[rules]` table overriding match constants.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Let a second policy instance play the left-hand side.
    #[arg(long)]
    autopilot: bool,

    /// Opening placement for the left-hand side, written `kind@lane:column`.
    #[arg(long = "place", value_name = "KIND@LANE:COLUMN")]
    place: Vec<OpeningOrder>,
}

/// Entry point for the Lane Siege command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rules = config::load_rules(args.rules.as_deref())?;
    let mut simulation = Simulation::new(rules, args.seed).context("failed to start the match")?;
    if args.autopilot {
        simulation = simulation.with_autopilot(PolicyTuning::default());
    }

    for order in &args.place {
        let placed =
            simulation.request_placement_named(Side::Player, &order.kind, order.lane, order.column);
        match placed {
            Ok(unit) => {
                tracing::info!(unit = unit.get(), kind = %order.kind, "opening order placed");
            }
            Err(reason) => {
                tracing::warn!(kind = %order.kind, %reason, "opening order refused");
            }
        }
    }

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let limit = Duration::from_secs(args.max_seconds);
    tracing::info!(seed = args.seed, ?frame, ?limit, "running match");
    while !simulation.outcome().is_over() && simulation.elapsed() < limit {
        let _ = simulation.advance(frame);
    }

    report(&simulation);
    Ok(())
}

fn report(simulation: &Simulation) {
    match simulation.outcome() {
        MatchOutcome::Won(Side::Player) => println!("Player wins by crossing!"),
        MatchOutcome::Won(Side::Opponent) => println!("Opponent wins by crossing!"),
        MatchOutcome::Ongoing => println!("No winner after {:.1?}", simulation.elapsed()),
    }
    println!("Elapsed: {:.1?}", simulation.elapsed());
    for side in Side::ALL {
        let wall = simulation.wall(side);
        let living = simulation
            .units()
            .living()
            .filter(|unit| unit.side == side)
            .count();
        println!(
            "{side:?}: wall {:.0} / {:.0}, bolts {}, living units {living}",
            wall.hp.ceil(),
            wall.max_hp,
            simulation.bolts(side),
        );
    }
}

//! Perft command - count action sequences to a fixed depth
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_depths(), report_results()
//! - Level 3: perft(), divide()
//! - Level 4: timing utilities, formatting

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;

use hivemind_core::{Action, GameState};

use crate::play::load_game;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PerftArgs {
    /// Maximum depth to count
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Rule set JSON file (standard rules if omitted)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Print per-action counts at the maximum depth
    #[arg(long)]
    pub divide: bool,
}

/// Count at one depth
#[derive(Clone, Debug)]
struct DepthResult {
    depth: u32,
    nodes: u64,
    elapsed: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run perft command
///
/// 1. Build the initial state
/// 2. Count every depth up to the maximum
/// 3. Optionally split the deepest count by first action
pub fn run(args: PerftArgs) -> Result<()> {
    let initial = load_game(args.rules.as_deref())?;

    tracing::info!("Running perft to depth {}", args.depth);

    let results = run_depths(&initial, args.depth)?;
    report_results(&results);

    if args.divide && args.depth > 0 {
        for (action, nodes) in divide(&initial, args.depth)? {
            println!("{:<40} {}", action.to_string(), nodes);
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_depths(initial: &GameState, max_depth: u32) -> Result<Vec<DepthResult>> {
    (1..=max_depth)
        .map(|depth| -> Result<DepthResult> {
            let start = Instant::now();
            let nodes = perft(initial, depth)?;
            let elapsed = start.elapsed();
            tracing::debug!("depth {}: {} nodes in {:?}", depth, nodes, elapsed);
            Ok(DepthResult { depth, nodes, elapsed })
        })
        .collect()
}

fn report_results(results: &[DepthResult]) {
    println!("\n=== Perft ===");
    println!("{:<6} {:>14} {:>12} {:>14}", "Depth", "Nodes", "Time (ms)", "Nodes/sec");
    for r in results {
        println!(
            "{:<6} {:>14} {:>12.1} {:>14.0}",
            r.depth,
            r.nodes,
            r.elapsed.as_secs_f64() * 1000.0,
            rate(r.nodes, r.elapsed)
        );
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Number of action sequences of exactly `depth` plies
pub fn perft(state: &GameState, depth: u32) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }
    if depth == 1 {
        return Ok(state.legal_actions().len() as u64);
    }

    let mut nodes = 0;
    for (_, child) in state.children()? {
        nodes += perft(&child, depth - 1)?;
    }
    Ok(nodes)
}

/// Perft split by first action
fn divide(state: &GameState, depth: u32) -> Result<Vec<(Action, u64)>> {
    state
        .children()?
        .into_iter()
        .map(|(action, child)| -> Result<(Action, u64)> { Ok((action, perft(&child, depth - 1)?)) })
        .collect()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn rate(nodes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        nodes as f64 / secs
    } else {
        0.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Selfplay command - many independent games, aggregated
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;

use hivemind_core::{GameResult, GameState, RuleSet, DEFAULT_MAX_TURNS};

use crate::play::{describe_result, load_rules, play_game, PolicyKind};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Rule set JSON file (standard rules if omitted)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Policy used by both sides
    #[arg(long, value_enum, default_value = "random")]
    pub policy: PolicyKind,

    /// Turns before a game is abandoned
    #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
    pub max_turns: u32,

    /// Run games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    result: GameResult,
    truncated: bool,
    turns: u32,
}

/// Aggregated results
#[derive(Clone, Debug)]
struct SelfplayResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    draws: usize,
    truncated: usize,
    avg_turns: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// 1. Load the rule set
/// 2. Play every game from its own initial state
/// 3. Report results
pub fn run(args: SelfplayArgs, seed: Option<u64>) -> Result<()> {
    let ruleset = load_rules(args.rules.as_deref())?;

    tracing::info!(
        "Starting selfplay: {} games, rules={}, policy={:?}",
        args.games,
        ruleset.name,
        args.policy
    );

    let results = play_games(&ruleset, &args, seed)?;

    report_results(&results, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games; game `i` uses seed `base + i`
fn play_games(ruleset: &RuleSet, args: &SelfplayArgs, seed: Option<u64>) -> Result<SelfplayResults> {
    let base_seed = seed.unwrap_or(42);
    let play = |i: usize| {
        play_single_game(ruleset, args.policy, i + 1, base_seed.wrapping_add(i as u64), args.max_turns)
    };

    let games: Vec<GameRecord> = if args.parallel {
        (0..args.games).into_par_iter().map(play).collect::<Result<_>>()?
    } else {
        (0..args.games).map(play).collect::<Result<_>>()?
    };

    for record in &games {
        tracing::info!(
            "Game {}: {} ({} turns)",
            record.game_number,
            describe_result(record.result, record.truncated),
            record.turns
        );
    }

    Ok(compute_statistics(games))
}

/// Report results
fn report_results(results: &SelfplayResults, json: bool) {
    if json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game from a fresh state
fn play_single_game(
    ruleset: &RuleSet,
    policy: PolicyKind,
    game_number: usize,
    seed: u64,
    max_turns: u32,
) -> Result<GameRecord> {
    let initial = GameState::with_rules(ruleset)?;
    let outcome = play_game(&initial, policy, Some(seed), max_turns)?;

    Ok(GameRecord {
        game_number,
        seed,
        result: outcome.result,
        truncated: outcome.truncated,
        turns: outcome.turns_played,
    })
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> SelfplayResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let first_wins = count(GameResult::FirstWins);
    let second_wins = count(GameResult::SecondWins);
    let draws = count(GameResult::Draw);
    let truncated = games.iter().filter(|g| g.truncated).count();

    let total_turns: u32 = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    SelfplayResults {
        games,
        first_wins,
        second_wins,
        draws,
        truncated,
        avg_turns,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &SelfplayResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        seed: u64,
        result: GameResult,
        truncated: bool,
        turns: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        first_wins: usize,
        second_wins: usize,
        draws: usize,
        truncated: usize,
        avg_turns: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        draws: results.draws,
        truncated: results.truncated,
        avg_turns: results.avg_turns,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                seed: g.seed,
                result: g.result,
                truncated: g.truncated,
                turns: g.turns,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &SelfplayResults) {
    let total = results.games.len();

    println!("\n=== Selfplay Results ===");
    println!("Total games:  {}", total);
    println!("First wins:   {} ({:.1}%)", results.first_wins, percent(results.first_wins, total));
    println!("Second wins:  {} ({:.1}%)", results.second_wins, percent(results.second_wins, total));
    println!("Draws:        {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Turn cap hit: {} ({:.1}%)", results.truncated, percent(results.truncated, total));
    println!("Avg turns:    {:.1}", results.avg_turns);
}

// ============================================================================
// TESTS
// ============================================================================

//! Play command - one game driven by a policy
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_rules(), load_game(), play_game(), report_game()
//! - Level 3: create_policy()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hivemind_core::{
    playout, FirstActionPolicy, GameResult, GameState, PlayoutResult, Policy, RandomPolicy,
    RuleSet, DEFAULT_MAX_TURNS,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Action selection strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Uniform random over legal actions
    Random,
    /// Always the first legal action
    First,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Rule set JSON file (standard rules if omitted)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Policy used by both sides
    #[arg(long, value_enum, default_value = "random")]
    pub policy: PolicyKind,

    /// Turns before the game is abandoned
    #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
    pub max_turns: u32,

    /// Print the final position as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the initial state from the rule set
/// 2. Play it out with the chosen policy
/// 3. Report the game
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let initial = load_game(args.rules.as_deref())?;

    tracing::info!(
        "Starting game: policy={:?}, max_turns={}",
        args.policy,
        args.max_turns
    );

    let outcome = play_game(&initial, args.policy, seed, args.max_turns)?;

    report_game(&outcome, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Rule set from an optional file, standard rules otherwise
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    let Some(path) = path else {
        return Ok(RuleSet::default());
    };

    let ruleset = RuleSet::load(path)?;
    tracing::info!("Loaded rule set {} from {}", ruleset.name, path.display());
    Ok(ruleset)
}

/// Initial state from an optional rule file
pub fn load_game(path: Option<&Path>) -> Result<GameState> {
    let ruleset = load_rules(path)?;
    GameState::with_rules(&ruleset)
        .with_context(|| format!("Rule set cannot start a game: {}", ruleset.name))
}

/// Play one game to completion or the turn cap
pub fn play_game(
    initial: &GameState,
    kind: PolicyKind,
    seed: Option<u64>,
    max_turns: u32,
) -> Result<PlayoutResult> {
    let mut policy = create_policy(kind, seed);
    let outcome = playout(initial, policy.as_mut(), max_turns)?;

    for (turn, action) in outcome.history.iter().enumerate() {
        tracing::debug!("{:>3}: {}", turn, action);
    }

    Ok(outcome)
}

/// Print the outcome
fn report_game(outcome: &PlayoutResult, json: bool) -> Result<()> {
    if json {
        let snapshot = outcome.final_state.snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!(
            "{} after {} turns",
            describe_result(outcome.result, outcome.truncated),
            outcome.turns_played
        );
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Policy for the given kind; unseeded random policies draw from entropy
pub fn create_policy(kind: PolicyKind, seed: Option<u64>) -> Box<dyn Policy + Send> {
    match (kind, seed) {
        (PolicyKind::First, _) => Box::new(FirstActionPolicy),
        (PolicyKind::Random, Some(s)) => Box::new(RandomPolicy::new(s)),
        (PolicyKind::Random, None) => Box::new(RandomPolicy::from_entropy()),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

pub fn describe_result(result: GameResult, truncated: bool) -> &'static str {
    match result {
        GameResult::FirstWins => "First wins",
        GameResult::SecondWins => "Second wins",
        GameResult::Draw => "Draw",
        GameResult::Ongoing if truncated => "Stalemate (turn cap)",
        GameResult::Ongoing => "Ongoing",
    }
}

// ============================================================================
// TESTS
// ============================================================================

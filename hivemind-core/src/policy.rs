//! Action selection policies and playouts
//!
//! The engine never picks actions itself; a `Policy` is handed the legal
//! actions and chooses one. Playouts drive a cloned state to the end of the
//! game (or a turn cap) with any policy.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::HiveError;
use crate::game::{Action, GameResult, GameState};

/// Turns after which a playout is abandoned as a stalemate
pub const DEFAULT_MAX_TURNS: u32 = 100;

// ============================================================================
// POLICIES
// ============================================================================

/// Chooses one action out of the legal ones
pub trait Policy {
    /// `actions` is never empty
    fn select(&mut self, state: &GameState, actions: &[Action]) -> Action;
}

/// Closures over the action list work as policies
impl<F> Policy for F
where
    F: FnMut(&[Action]) -> Action,
{
    fn select(&mut self, _state: &GameState, actions: &[Action]) -> Action {
        self(actions)
    }
}

/// Uniform random choice from a seeded generator
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Policy for RandomPolicy {
    fn select(&mut self, _state: &GameState, actions: &[Action]) -> Action {
        let idx = self.rng.gen_range(0..actions.len());
        actions[idx]
    }
}

/// Always the first legal action
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstActionPolicy;

impl Policy for FirstActionPolicy {
    fn select(&mut self, _state: &GameState, actions: &[Action]) -> Action {
        actions[0]
    }
}

// ============================================================================
// PLAYOUT
// ============================================================================

/// Outcome of a playout
#[derive(Clone, Debug)]
pub struct PlayoutResult {
    pub result: GameResult,
    pub turns_played: u32,
    /// Stopped by the turn cap before the game ended
    pub truncated: bool,
    pub history: Vec<Action>,
    pub final_state: GameState,
}

/// Play from `initial` until the game ends or `max_turns` actions were applied
pub fn playout<P: Policy + ?Sized>(
    initial: &GameState,
    policy: &mut P,
    max_turns: u32,
) -> Result<PlayoutResult, HiveError> {
    let mut state = initial.clone();
    let mut history = Vec::new();

    while !state.is_game_over() && (history.len() as u32) < max_turns {
        let action = state.step(policy)?;
        history.push(action);
    }

    let result = state.result();
    let truncated = result == GameResult::Ongoing;
    if truncated {
        tracing::debug!("playout stopped after {} turns without a result", history.len());
    }

    Ok(PlayoutResult {
        result,
        turns_played: history.len() as u32,
        truncated,
        history,
        final_state: state,
    })
}

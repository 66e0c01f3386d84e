//! HIVEMIND Core - Rules engine for a hex tile-stacking game
//!
//! This crate provides the core game logic:
//! - Hex geometry (axial coordinates, ring traversal)
//! - Stacked board and the one-hive connectivity rule
//! - Per-insect move generation and drop sites
//! - Turn/phase state machine with validated action application
//! - Pluggable action-selection policies and playouts

pub mod hex;
pub mod pieces;
pub mod board;
pub mod connectivity;
pub mod movegen;
pub mod game;
pub mod ruleset;
pub mod policy;
pub mod snapshot;
pub mod error;

// Re-exports for convenient access
pub use hex::{Hex, DIRECTIONS};
pub use pieces::{Insect, Piece, Side, STARTING_INSECTS};
pub use board::Board;
pub use game::{Action, GameResult, GameState};
pub use ruleset::RuleSet;
pub use policy::{playout, FirstActionPolicy, PlayoutResult, Policy, RandomPolicy, DEFAULT_MAX_TURNS};
pub use snapshot::{Snapshot, StoneRecord};
pub use error::HiveError;

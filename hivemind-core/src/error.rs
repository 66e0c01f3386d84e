//! Engine errors

use crate::game::Action;
use crate::hex::Hex;
use crate::pieces::{Insect, Side};

/// Contract violations reported by the board and game state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HiveError {
    #[error("no stone at {0}")]
    EmptyCell(Hex),

    #[error("move origin {0} is unoccupied")]
    IllegalOrigin(Hex),

    #[error("{side} has no {insect} left to drop")]
    InventoryExhausted { side: Side, insect: Insect },

    #[error("board has no root stone")]
    NoRoot,

    #[error("action {0} is not legal in this position")]
    IllegalAction(Action),

    #[error("invalid rule set: {0}")]
    InvalidRuleSet(String),
}

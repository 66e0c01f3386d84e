//! Game state, actions and the turn/phase state machine

use std::cell::OnceCell;
use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::connectivity;
use crate::error::HiveError;
use crate::hex::Hex;
use crate::movegen;
use crate::pieces::{Insect, Piece, Side};
use crate::policy::Policy;
use crate::ruleset::RuleSet;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    FirstWins,
    SecondWins,
    Draw,
}

/// A legal action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Drop { piece: Piece, destination: Hex },
    Move { origin: Hex, destination: Hex },
    Pass,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Drop { piece, destination } => write!(f, "drop {} at {}", piece, destination),
            Action::Move { origin, destination } => write!(f, "move {} -> {}", origin, destination),
            Action::Pass => write!(f, "pass"),
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state, mutated in place. Clone for an independent branch.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,

    /// Drop targets of the two opening turns
    anchors: [Hex; 2],

    /// Turn from which a side without its bee may only drop the bee
    bee_deadline_turn: u32,

    turn_number: u32,

    /// Unplaced insects per side
    inventory: [Vec<Insect>; 2],

    bee_placed: [bool; 2],

    /// Legal actions, derived on first request after a mutation
    actions: OnceCell<Vec<Action>>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game with the standard rule set
    pub fn new() -> Self {
        Self::from_rules(&RuleSet::default())
    }

    /// New game from a custom rule set
    pub fn with_rules(rules: &RuleSet) -> Result<Self, HiveError> {
        rules.validate()?;
        Ok(Self::from_rules(rules))
    }

    fn from_rules(rules: &RuleSet) -> Self {
        Self {
            board: Board::new(),
            anchors: [rules.first_anchor, rules.second_anchor],
            bee_deadline_turn: rules.bee_deadline_turn,
            turn_number: 0,
            inventory: [rules.starting_insects.clone(), rules.starting_insects.clone()],
            bee_placed: [false, false],
            actions: OnceCell::new(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Even turns belong to the first side
    pub fn side_to_move(&self) -> Side {
        if self.turn_number % 2 == 0 {
            Side::First
        } else {
            Side::Second
        }
    }

    /// Unplaced insects of a side
    pub fn inventory(&self, side: Side) -> &[Insect] {
        &self.inventory[side.index()]
    }

    pub fn bee_placed(&self, side: Side) -> bool {
        self.bee_placed[side.index()]
    }

    /// Distinct insect kinds a side can still drop
    fn droppable(&self, side: Side) -> Vec<Insect> {
        let inventory = self.inventory(side);
        Insect::ALL
            .into_iter()
            .filter(|insect| inventory.contains(insect))
            .collect()
    }

    /// Hexes whose top stone is held in place by the one-hive rule
    pub fn pinned(&self) -> FxHashSet<Hex> {
        connectivity::pinned(&self.board)
    }

    // ========================================================================
    // RESULT
    // ========================================================================

    /// A side loses when the bee at the bottom of a stack is surrounded
    pub fn result(&self) -> GameResult {
        let mut lost = [false, false];
        for (hex, stack) in self.board.stacks() {
            let bottom = stack[0];
            if bottom.insect == Insect::Bee && self.board.occupied_neighbors(hex).len() == 6 {
                lost[bottom.side.index()] = true;
            }
        }

        match lost {
            [true, true] => GameResult::Draw,
            [true, false] => GameResult::SecondWins,
            [false, true] => GameResult::FirstWins,
            [false, false] => GameResult::Ongoing,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.result() != GameResult::Ongoing
    }

    // ========================================================================
    // ACTION GENERATION
    // ========================================================================

    /// Legal actions for the side to move, in deterministic order
    pub fn legal_actions(&self) -> &[Action] {
        self.actions.get_or_init(|| self.derive_actions())
    }

    pub fn is_legal(&self, action: &Action) -> bool {
        self.legal_actions().contains(action)
    }

    fn derive_actions(&self) -> Vec<Action> {
        let side = self.side_to_move();
        let kinds = self.droppable(side);

        let actions: Vec<Action> = match self.turn_number {
            0 | 1 => {
                let destination = self.anchors[self.turn_number as usize];
                kinds
                    .into_iter()
                    .map(|insect| Action::Drop { piece: Piece::new(insect, side), destination })
                    .collect()
            }
            turn if turn >= self.bee_deadline_turn && !self.bee_placed(side) => {
                let bee = Piece::new(Insect::Bee, side);
                if kinds.contains(&Insect::Bee) {
                    movegen::drop_sites(&self.board, side)
                        .into_iter()
                        .map(|destination| Action::Drop { piece: bee, destination })
                        .collect()
                } else {
                    Vec::new()
                }
            }
            _ => {
                let mut actions = Vec::new();
                self.generate_drops(side, &kinds, &mut actions);
                if self.bee_placed(side) {
                    self.generate_moves(side, &mut actions);
                }
                actions
            }
        };

        tracing::debug!(
            "turn {}: {} legal actions for {}",
            self.turn_number,
            actions.len(),
            side
        );

        if actions.is_empty() {
            vec![Action::Pass]
        } else {
            actions
        }
    }

    fn generate_drops(&self, side: Side, kinds: &[Insect], actions: &mut Vec<Action>) {
        if kinds.is_empty() {
            return;
        }
        for destination in movegen::drop_sites(&self.board, side) {
            for &insect in kinds {
                actions.push(Action::Drop { piece: Piece::new(insect, side), destination });
            }
        }
    }

    fn generate_moves(&self, side: Side, actions: &mut Vec<Action>) {
        let pinned = self.pinned();

        for origin in self.board.occupied_sorted() {
            if pinned.contains(&origin) {
                continue;
            }
            let piece = match self.board.top(origin) {
                Ok(piece) if piece.side == side => piece,
                _ => continue,
            };
            let generate = movegen::generator_for(piece.insect);
            for destination in generate(&self.board, origin) {
                actions.push(Action::Move { origin, destination });
            }
        }
    }

    // ========================================================================
    // APPLY ACTION
    // ========================================================================

    /// Apply a legal action.
    ///
    /// Rejects anything not in `legal_actions()` without touching the state.
    pub fn apply(&mut self, action: Action) -> Result<(), HiveError> {
        if !self.is_legal(&action) {
            return Err(HiveError::IllegalAction(action));
        }
        self.apply_unchecked(action)
    }

    /// Apply an action without the legality check.
    ///
    /// For callers that drew `action` from `legal_actions()`. Board and
    /// inventory preconditions are still checked before anything changes.
    pub fn apply_unchecked(&mut self, action: Action) -> Result<(), HiveError> {
        let side = self.side_to_move();

        match action {
            Action::Pass => {}

            Action::Move { origin, destination } => {
                let piece = self
                    .board
                    .remove_top(origin)
                    .map_err(|_| HiveError::IllegalOrigin(origin))?;
                self.board.place(destination, piece);
            }

            Action::Drop { piece, destination } => {
                let inventory = &mut self.inventory[side.index()];
                let slot = inventory
                    .iter()
                    .position(|&insect| piece.side == side && insect == piece.insect)
                    .ok_or(HiveError::InventoryExhausted { side, insect: piece.insect })?;
                inventory.remove(slot);

                if piece.insect == Insect::Bee {
                    self.bee_placed[side.index()] = true;
                }
                self.board.place(destination, piece);
            }
        }

        tracing::trace!("turn {}: {} plays {}", self.turn_number, side, action);

        self.turn_number += 1;
        self.actions = OnceCell::new();
        Ok(())
    }

    /// Let `policy` pick one of the legal actions and apply it
    pub fn step<P: Policy + ?Sized>(&mut self, policy: &mut P) -> Result<Action, HiveError> {
        let action = policy.select(self, self.legal_actions());
        self.apply(action)?;
        Ok(action)
    }

    /// One independent successor per legal action
    pub fn children(&self) -> Result<Vec<(Action, GameState)>, HiveError> {
        self.legal_actions()
            .iter()
            .map(|&action| {
                let mut child = self.clone();
                child.apply_unchecked(action)?;
                Ok((action, child))
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::STARTING_INSECTS;

    fn drop(insect: Insect, side: Side, q: i32, r: i32) -> Action {
        Action::Drop { piece: Piece::new(insect, side), destination: Hex::new(q, r) }
    }

    /// Play the given actions, each of which must be legal
    fn play(actions: &[Action]) -> GameState {
        let mut game = GameState::new();
        for &action in actions {
            game.apply(action).unwrap_or_else(|e| panic!("{}: {}", action, e));
        }
        game
    }

    /// Opening where both bees are placed on the first two turns
    fn bees_opening() -> GameState {
        play(&[
            drop(Insect::Bee, Side::First, 0, 0),
            drop(Insect::Bee, Side::Second, 0, -1),
        ])
    }

    #[test]
    fn test_game_creation() {
        let game = GameState::new();
        assert_eq!(game.side_to_move(), Side::First);
        assert_eq!(game.turn_number(), 0);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(game.inventory(Side::First).len(), STARTING_INSECTS.len());
        assert!(!game.bee_placed(Side::First));
    }

    #[test]
    fn test_turn_zero_drops() {
        let game = GameState::new();
        let actions = game.legal_actions();

        assert_eq!(actions.len(), Insect::ALL.len());
        for (action, insect) in actions.iter().zip(Insect::ALL) {
            assert_eq!(*action, drop(insect, Side::First, 0, 0));
        }
    }

    #[test]
    fn test_turn_one_drops() {
        let game = play(&[drop(Insect::Spider, Side::First, 0, 0)]);
        assert_eq!(game.side_to_move(), Side::Second);

        let actions = game.legal_actions();
        assert_eq!(actions.len(), Insect::ALL.len());
        for action in actions {
            match action {
                Action::Drop { piece, destination } => {
                    assert_eq!(piece.side, Side::Second);
                    assert_eq!(*destination, Hex::new(0, -1));
                }
                other => panic!("unexpected {}", other),
            }
        }
    }

    #[test]
    fn test_drop_consumes_inventory() {
        let game = play(&[
            drop(Insect::Ant, Side::First, 0, 0),
            drop(Insect::Ant, Side::Second, 0, -1),
        ]);
        let ants = game.inventory(Side::First).iter().filter(|&&i| i == Insect::Ant).count();
        assert_eq!(ants, 2);
        assert_eq!(game.board().stone_count(), 2);
        assert_eq!(game.turn_number(), 2);
    }

    #[test]
    fn test_exhausted_kind_not_offered() {
        let game = play(&[
            drop(Insect::Bee, Side::First, 0, 0),
            drop(Insect::Bee, Side::Second, 0, -1),
        ]);
        let bee_drops = game
            .legal_actions()
            .iter()
            .filter(|a| matches!(a, Action::Drop { piece, .. } if piece.insect == Insect::Bee))
            .count();
        assert_eq!(bee_drops, 0);
    }

    #[test]
    fn test_no_moves_before_bee() {
        let game = play(&[
            drop(Insect::Ant, Side::First, 0, 0),
            drop(Insect::Ant, Side::Second, 0, -1),
        ]);
        assert!(game.legal_actions().iter().all(|a| matches!(a, Action::Drop { .. })));
    }

    #[test]
    fn test_moves_after_bee() {
        let game = bees_opening();
        let moves: Vec<_> = game
            .legal_actions()
            .iter()
            .filter(|a| matches!(a, Action::Move { .. }))
            .copied()
            .collect();
        // The first bee slides around its neighbor
        assert_eq!(
            moves,
            vec![
                Action::Move { origin: Hex::new(0, 0), destination: Hex::new(-1, 0) },
                Action::Move { origin: Hex::new(0, 0), destination: Hex::new(1, -1) },
            ]
        );
    }

    #[test]
    fn test_bee_deadline() {
        let game = play(&[
            drop(Insect::Ant, Side::First, 0, 0),
            drop(Insect::Ant, Side::Second, 0, -1),
            drop(Insect::Ant, Side::First, 0, 1),
            drop(Insect::Ant, Side::Second, 0, -2),
            drop(Insect::Spider, Side::First, 0, 2),
            drop(Insect::Spider, Side::Second, 0, -3),
        ]);
        assert_eq!(game.turn_number(), 6);

        let actions = game.legal_actions();
        assert!(!actions.is_empty());
        for action in actions {
            assert!(
                matches!(action, Action::Drop { piece, .. } if *piece == Piece::new(Insect::Bee, Side::First)),
                "unexpected {}",
                action
            );
        }
    }

    #[test]
    fn test_illegal_action_rejected() {
        let mut game = GameState::new();
        let bad = drop(Insect::Bee, Side::First, 3, 3);
        assert_eq!(game.apply(bad), Err(HiveError::IllegalAction(bad)));
        assert_eq!(game.turn_number(), 0);
        assert!(game.board().is_empty());

        // Wrong side
        let bad = drop(Insect::Bee, Side::Second, 0, 0);
        assert_eq!(game.apply(bad), Err(HiveError::IllegalAction(bad)));
    }

    #[test]
    fn test_unchecked_errors() {
        let mut game = bees_opening();
        let bad_move = Action::Move { origin: Hex::new(4, 4), destination: Hex::new(4, 5) };
        assert_eq!(game.apply_unchecked(bad_move), Err(HiveError::IllegalOrigin(Hex::new(4, 4))));

        let bad_drop = drop(Insect::Bee, Side::First, 0, 1);
        assert_eq!(
            game.apply_unchecked(bad_drop),
            Err(HiveError::InventoryExhausted { side: Side::First, insect: Insect::Bee })
        );
        assert_eq!(game.turn_number(), 2);
        assert_eq!(game.board().stone_count(), 2);
    }

    #[test]
    fn test_move_relocates_top() {
        let mut game = bees_opening();
        let mv = Action::Move { origin: Hex::new(0, 0), destination: Hex::new(1, -1) };
        game.apply(mv).unwrap();

        assert!(!game.board().is_occupied(Hex::new(0, 0)));
        assert_eq!(
            *game.board().top(Hex::new(1, -1)).unwrap(),
            Piece::new(Insect::Bee, Side::First)
        );
        assert_eq!(game.side_to_move(), Side::Second);
    }

    #[test]
    fn test_pass_when_nothing_legal() {
        // Empty inventory and a pinned bee leave nothing to do
        let rules = RuleSet { starting_insects: vec![Insect::Bee], ..RuleSet::default() };
        let mut game = GameState::with_rules(&rules).unwrap();
        game.apply(drop(Insect::Bee, Side::First, 0, 0)).unwrap();
        game.apply(drop(Insect::Bee, Side::Second, 0, -1)).unwrap();
        game.board.place(Hex::new(0, 1), Piece::new(Insect::Ant, Side::Second));

        assert!(game.pinned().contains(&Hex::new(0, 0)));
        assert_eq!(game.legal_actions(), &[Action::Pass]);

        game.apply(Action::Pass).unwrap();
        assert_eq!(game.turn_number(), 3);
        assert_eq!(game.board().stone_count(), 3);
    }

    #[test]
    fn test_pass_advances_turn() {
        let mut game = GameState::new();
        game.apply_unchecked(Action::Pass).unwrap();
        assert_eq!(game.side_to_move(), Side::Second);
        assert_eq!(game.legal_actions()[0].to_string(), "drop second Bee at (0, -1)");
    }

    #[test]
    fn test_first_loses_when_surrounded() {
        let mut game = bees_opening();
        // Fill the ring around the first bee directly on the board
        for hex in Hex::new(0, 0).neighbors() {
            if !game.board.is_occupied(hex) {
                game.board.place(hex, Piece::new(Insect::Ant, Side::Second));
            }
        }
        assert_eq!(game.result(), GameResult::SecondWins);
        assert!(game.is_game_over());
    }

    #[test]
    fn test_buried_bee_still_counts() {
        let mut game = bees_opening();
        game.board.place(Hex::new(0, -1), Piece::new(Insect::Beetle, Side::First));
        for hex in Hex::new(0, -1).neighbors() {
            if !game.board.is_occupied(hex) {
                game.board.place(hex, Piece::new(Insect::Ant, Side::First));
            }
        }
        assert_eq!(game.result(), GameResult::FirstWins);
    }

    #[test]
    fn test_draw_when_both_surrounded() {
        let mut game = bees_opening();
        for bee in [Hex::new(0, 0), Hex::new(0, -1)] {
            for hex in bee.neighbors() {
                if !game.board.is_occupied(hex) {
                    game.board.place(hex, Piece::new(Insect::Ant, Side::First));
                }
            }
        }
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_clone_is_independent() {
        let game = bees_opening();
        let children = game.children().unwrap();
        assert_eq!(children.len(), game.legal_actions().len());

        for (action, child) in &children {
            assert_eq!(child.turn_number(), 3);
            if let Action::Drop { destination, .. } = action {
                assert!(child.board().is_occupied(*destination));
            }
        }
        // Parent untouched
        assert_eq!(game.turn_number(), 2);
        assert_eq!(game.board().stone_count(), 2);
    }

    #[test]
    fn test_cache_invalidated() {
        let mut game = GameState::new();
        let before = game.legal_actions().to_vec();
        game.apply(before[0]).unwrap();
        assert_ne!(game.legal_actions(), before.as_slice());
    }
}

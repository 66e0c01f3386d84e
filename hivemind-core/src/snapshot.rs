//! Serializable view of a game state, for clients and logs

use serde::Serialize;

use crate::game::{GameResult, GameState};
use crate::pieces::{Insect, Piece, Side};

/// One stone at its position in a stack
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoneRecord {
    pub q: i32,
    pub r: i32,
    /// 0 for the bottom of the stack
    pub height: usize,
    pub insect: Insect,
    pub side: Side,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub turn_number: u32,
    pub side_to_move: Side,
    pub result: GameResult,
    pub stones: Vec<StoneRecord>,
    pub available: Vec<Piece>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl GameState {
    /// Every stone and every unplaced piece, in coordinate order
    pub fn snapshot(&self) -> Snapshot {
        let mut stones: Vec<StoneRecord> = self
            .board()
            .stacks()
            .flat_map(|(hex, stack)| {
                stack.iter().enumerate().map(move |(height, piece)| StoneRecord {
                    q: hex.q,
                    r: hex.r,
                    height,
                    insect: piece.insect,
                    side: piece.side,
                })
            })
            .collect();
        stones.sort_by_key(|s| (s.q, s.r, s.height));

        let available = Side::ALL
            .into_iter()
            .flat_map(|side| {
                self.inventory(side)
                    .iter()
                    .map(move |&insect| Piece::new(insect, side))
            })
            .collect();

        Snapshot {
            turn_number: self.turn_number(),
            side_to_move: self.side_to_move(),
            result: self.result(),
            stones,
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Action;
    use crate::hex::Hex;

    #[test]
    fn test_snapshot_of_new_game() {
        let snapshot = GameState::new().snapshot();
        assert!(snapshot.stones.is_empty());
        assert_eq!(snapshot.available.len(), 22);
        assert_eq!(snapshot.side_to_move, Side::First);
    }

    #[test]
    fn test_snapshot_json() {
        let mut game = GameState::new();
        game.apply(Action::Drop {
            piece: Piece::new(Insect::Beetle, Side::First),
            destination: Hex::new(0, 0),
        })
        .unwrap();

        let snapshot = game.snapshot();
        assert_eq!(
            snapshot.stones,
            vec![StoneRecord { q: 0, r: 0, height: 0, insect: Insect::Beetle, side: Side::First }]
        );

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["turn_number"], 1);
        assert_eq!(json["side_to_move"], "Second");
        assert_eq!(json["stones"][0]["insect"], "Beetle");
        assert_eq!(json["available"].as_array().unwrap().len(), 21);
    }
}

//! One-hive rule: articulation points of the occupied-hex graph

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::Board;
use crate::hex::Hex;

/// DFS frame for the iterative low-link walk
struct Frame {
    node: Hex,
    parent: Option<Hex>,
    neighbors: Vec<Hex>,
    cursor: usize,
    children: u32,
}

impl Frame {
    fn new(board: &Board, node: Hex, parent: Option<Hex>) -> Self {
        Self {
            node,
            parent,
            neighbors: board.occupied_neighbors(node),
            cursor: 0,
            children: 0,
        }
    }
}

/// Hexes whose removal would split the hive.
///
/// Builds a single DFS tree from the board's root; an empty board has no
/// articulation points.
pub fn articulation_points(board: &Board) -> FxHashSet<Hex> {
    let mut points = FxHashSet::default();
    let Ok(root) = board.dfs_root() else {
        return points;
    };

    let mut index: FxHashMap<Hex, u32> = FxHashMap::default();
    let mut lowlink: FxHashMap<Hex, u32> = FxHashMap::default();
    let mut counter = 0;
    index.insert(root, counter);
    lowlink.insert(root, counter);

    let mut stack = vec![Frame::new(board, root, None)];

    while let Some(frame) = stack.last_mut() {
        if let Some(&neighbor) = frame.neighbors.get(frame.cursor) {
            frame.cursor += 1;
            if Some(neighbor) == frame.parent {
                continue;
            }

            let node = frame.node;
            if let Some(&seen) = index.get(&neighbor) {
                // Back edge
                if let Some(low) = lowlink.get_mut(&node) {
                    *low = (*low).min(seen);
                }
            } else {
                frame.children += 1;
                counter += 1;
                index.insert(neighbor, counter);
                lowlink.insert(neighbor, counter);
                stack.push(Frame::new(board, neighbor, Some(node)));
            }
            continue;
        }

        let (node, parent, children) = (frame.node, frame.parent, frame.children);
        stack.pop();

        match parent {
            Some(parent) => {
                let node_low = lowlink[&node];
                if let Some(low) = lowlink.get_mut(&parent) {
                    *low = (*low).min(node_low);
                }
                if parent != root && node_low >= index[&parent] {
                    points.insert(parent);
                }
            }
            None => {
                if children >= 2 {
                    points.insert(node);
                }
            }
        }
    }

    points
}

/// Hexes whose top stone may not move: sole occupants of articulation points
pub fn pinned(board: &Board) -> FxHashSet<Hex> {
    articulation_points(board)
        .into_iter()
        .filter(|&hex| board.height(hex) == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Insect, Piece, Side};
    use std::collections::VecDeque;

    fn board_with(hexes: &[(i32, i32)]) -> Board {
        let mut board = Board::new();
        for &(q, r) in hexes {
            board.place(Hex::new(q, r), Piece::new(Insect::Ant, Side::First));
        }
        board
    }

    /// Connectivity of the occupied set minus `without`, by flood fill
    fn connected_without(board: &Board, without: Option<Hex>) -> bool {
        let cells: FxHashSet<Hex> = board.occupied().filter(|&h| Some(h) != without).collect();
        let Some(&start) = cells.iter().next() else {
            return true;
        };
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(hex) = queue.pop_front() {
            for n in hex.neighbors() {
                if cells.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == cells.len()
    }

    fn brute_force_points(board: &Board) -> FxHashSet<Hex> {
        board
            .occupied()
            .filter(|&h| !connected_without(board, Some(h)))
            .collect()
    }

    #[test]
    fn test_empty_board() {
        assert!(articulation_points(&Board::new()).is_empty());
    }

    #[test]
    fn test_single_and_pair() {
        assert!(articulation_points(&board_with(&[(0, 0)])).is_empty());
        assert!(articulation_points(&board_with(&[(0, 0), (0, -1)])).is_empty());
    }

    #[test]
    fn test_line() {
        let board = board_with(&[(0, 0), (0, 1), (0, 2), (0, 3)]);
        let points = articulation_points(&board);
        let expected: FxHashSet<Hex> = [Hex::new(0, 1), Hex::new(0, 2)].into_iter().collect();
        assert_eq!(points, expected);
    }

    #[test]
    fn test_line_from_middle_root() {
        // Root in the middle has two DFS children
        let board = board_with(&[(0, 1), (0, 0), (0, 2)]);
        let points = articulation_points(&board);
        assert_eq!(points.len(), 1);
        assert!(points.contains(&Hex::new(0, 1)));
    }

    #[test]
    fn test_ring_has_no_points() {
        let ring: Vec<(i32, i32)> = Hex::new(0, 0).neighbors().iter().map(|h| (h.q, h.r)).collect();
        let board = board_with(&ring);
        assert!(articulation_points(&board).is_empty());
    }

    #[test]
    fn test_star() {
        // Center with three non-touching arms
        let board = board_with(&[(0, 0), (0, -1), (1, 0), (-1, 1)]);
        let points = articulation_points(&board);
        assert_eq!(points.len(), 1);
        assert!(points.contains(&Hex::new(0, 0)));
    }

    #[test]
    fn test_matches_brute_force() {
        let board = board_with(&[
            (0, 0), (0, -1), (1, -1), (2, -1), (2, 0), (-1, 0), (-2, 0),
            (-2, 1), (0, 1), (0, 2), (1, 2), (-1, 3), (0, 3),
        ]);
        assert_eq!(articulation_points(&board), brute_force_points(&board));
    }

    #[test]
    fn test_stale_root_is_reseeded() {
        let mut board = board_with(&[(0, 0), (0, 1), (0, 2), (0, 3)]);
        board.remove_top(Hex::new(0, 0)).unwrap();
        let points = articulation_points(&board);
        assert_eq!(points.len(), 1);
        assert!(points.contains(&Hex::new(0, 2)));
    }

    #[test]
    fn test_stacked_point_is_not_pinned() {
        let mut board = board_with(&[(0, 0), (0, 1), (0, 2)]);
        assert!(pinned(&board).contains(&Hex::new(0, 1)));

        board.place(Hex::new(0, 1), Piece::new(Insect::Beetle, Side::Second));
        assert!(articulation_points(&board).contains(&Hex::new(0, 1)));
        assert!(pinned(&board).is_empty());
    }
}

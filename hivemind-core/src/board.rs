//! Stacked hex board

use rustc_hash::FxHashMap;

use crate::error::HiveError;
use crate::hex::Hex;
use crate::pieces::Piece;

/// Board: hex -> stack of stones, bottom first.
///
/// A hex with no stones is absent from the map; stacks are never empty.
#[derive(Clone, Debug, Default)]
pub struct Board {
    stacks: FxHashMap<Hex, Vec<Piece>>,

    /// First hex ever occupied, seed for connectivity analysis
    root: Option<Hex>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Number of occupied hexes
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Number of stones, buried ones included
    pub fn stone_count(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.stacks.contains_key(&hex)
    }

    /// Stack height (0 if unoccupied)
    pub fn height(&self, hex: Hex) -> usize {
        self.stacks.get(&hex).map_or(0, Vec::len)
    }

    /// Topmost stone at hex
    pub fn top(&self, hex: Hex) -> Result<&Piece, HiveError> {
        self.stacks
            .get(&hex)
            .and_then(|stack| stack.last())
            .ok_or(HiveError::EmptyCell(hex))
    }

    /// Whole stack at hex, bottom first
    pub fn stack(&self, hex: Hex) -> Option<&[Piece]> {
        self.stacks.get(&hex).map(Vec::as_slice)
    }

    /// Occupied neighbors in ring order
    pub fn occupied_neighbors(&self, hex: Hex) -> Vec<Hex> {
        hex.neighbors()
            .into_iter()
            .filter(|n| self.is_occupied(*n))
            .collect()
    }

    /// Iterate occupied hexes (arbitrary order)
    pub fn occupied(&self) -> impl Iterator<Item = Hex> + '_ {
        self.stacks.keys().copied()
    }

    /// Occupied hexes in coordinate order
    pub fn occupied_sorted(&self) -> Vec<Hex> {
        let mut hexes: Vec<Hex> = self.occupied().collect();
        hexes.sort_unstable();
        hexes
    }

    /// Iterate stacks (arbitrary order)
    pub fn stacks(&self) -> impl Iterator<Item = (Hex, &[Piece])> + '_ {
        self.stacks.iter().map(|(&hex, stack)| (hex, stack.as_slice()))
    }

    /// Remembered root hex, which may have been vacated since
    pub fn root(&self) -> Option<Hex> {
        self.root
    }

    /// Occupied hex to start a traversal from.
    ///
    /// Falls back to the smallest occupied coordinate when the root was
    /// vacated by a move.
    pub fn dfs_root(&self) -> Result<Hex, HiveError> {
        match self.root {
            Some(root) if self.is_occupied(root) => Ok(root),
            _ => {
                let fallback = self.occupied().min().ok_or(HiveError::NoRoot)?;
                tracing::debug!("root {:?} vacated, re-seeding from {}", self.root, fallback);
                Ok(fallback)
            }
        }
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Push a stone onto hex
    pub fn place(&mut self, hex: Hex, piece: Piece) {
        self.stacks.entry(hex).or_default().push(piece);
        if self.root.is_none() {
            self.root = Some(hex);
        }
    }

    /// Pop the top stone of hex, vacating it if the stack empties
    pub fn remove_top(&mut self, hex: Hex) -> Result<Piece, HiveError> {
        let stack = self.stacks.get_mut(&hex).ok_or(HiveError::EmptyCell(hex))?;
        let piece = stack.pop().ok_or(HiveError::EmptyCell(hex))?;
        if stack.is_empty() {
            self.stacks.remove(&hex);
        }
        Ok(piece)
    }
}

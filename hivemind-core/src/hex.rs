//! Hex grid geometry with axial coordinates

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        *self + direction_hex(direction)
    }

    /// All six neighbors in ring order
    pub fn neighbors(&self) -> [Hex; 6] {
        std::array::from_fn(|d| self.neighbor(d))
    }

    /// Multiply a direction vector by `n`
    pub fn scale(&self, n: i32) -> Hex {
        Hex::new(self.q * n, self.r * n)
    }

    /// Walk once around this hex, yielding `(prev, current, next)` neighbor
    /// triples. The first triple's `prev` is the last neighbor.
    pub fn circle(&self) -> impl Iterator<Item = (Hex, Hex, Hex)> {
        let ring = self.neighbors();
        (0..6).map(move |i| (ring[(i + 5) % 6], ring[i], ring[(i + 1) % 6]))
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex::new(self.q + other.q, self.r + other.r)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Unit offsets walking clockwise from north: N, NE, SE, S, SW, NW.
///
/// `circle()` and `neighbors()` depend on this order being a closed ring.
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(0, -1),
    Hex::new(1, -1),
    Hex::new(1, 0),
    Hex::new(0, 1),
    Hex::new(-1, 1),
    Hex::new(-1, 0),
];

/// Offset for a ring index, wrapping past 5
pub fn direction_hex(direction: usize) -> Hex {
    DIRECTIONS[direction % 6]
}

pub fn directions() -> impl Iterator<Item = Hex> {
    DIRECTIONS.into_iter()
}

//! Insect kinds, sides and pieces

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    First = 0,
    Second = 1,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::First, Side::Second];

    pub fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Index into per-side arrays
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// Insect kind, which selects the movement rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Insect {
    Bee,
    Spider,
    Ant,
    Grasshopper,
    Beetle,
}

impl Insect {
    /// Every kind, in the order drops are offered
    pub const ALL: [Insect; 5] = [
        Insect::Bee,
        Insect::Spider,
        Insect::Ant,
        Insect::Grasshopper,
        Insect::Beetle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Insect::Bee => "Bee",
            Insect::Spider => "Spider",
            Insect::Ant => "Ant",
            Insect::Grasshopper => "Grasshopper",
            Insect::Beetle => "Beetle",
        }
    }
}

impl fmt::Display for Insect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stone: one insect owned by one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub insect: Insect,
    pub side: Side,
}

impl Piece {
    pub const fn new(insect: Insect, side: Side) -> Self {
        Self { insect, side }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.insect)
    }
}

/// Starting inventory of each side
pub const STARTING_INSECTS: [Insect; 11] = [
    Insect::Bee,
    Insect::Spider,
    Insect::Spider,
    Insect::Ant,
    Insect::Ant,
    Insect::Ant,
    Insect::Grasshopper,
    Insect::Grasshopper,
    Insect::Grasshopper,
    Insect::Beetle,
    Insect::Beetle,
];

//! Destination generators, one per insect kind, plus drop sites

use std::collections::{BTreeSet, VecDeque};

use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::error::HiveError;
use crate::hex::{directions, Hex};
use crate::pieces::{Insect, Side};

/// Spider walks exactly this many slides
const SPIDER_DISTANCE: u32 = 3;

/// Destination generator for one insect kind
pub type Generator = fn(&Board, Hex) -> BTreeSet<Hex>;

/// Movement rule for each insect kind
pub fn generator_for(insect: Insect) -> Generator {
    match insect {
        Insect::Bee => single_slides,
        Insect::Spider => spider_walks,
        Insect::Ant => ant_walks,
        Insect::Grasshopper => jumps,
        Insect::Beetle => climbs,
    }
}

/// Destinations for the top stone at `origin`
pub fn destinations(board: &Board, origin: Hex) -> Result<BTreeSet<Hex>, HiveError> {
    let piece = board.top(origin)?;
    Ok(generator_for(piece.insect)(board, origin))
}

// ============================================================================
// SLIDES
// ============================================================================

/// The hex a slider leaves behind, when moving it vacates the hex
fn vacated(board: &Board, origin: Hex) -> Option<Hex> {
    (board.height(origin) == 1).then_some(origin)
}

/// Single slides from `hex`, treating `ignore` as empty.
///
/// A slide needs exactly one of the two flanking hexes occupied: one to keep
/// contact with the hive, one open to pass through.
fn slides_from(board: &Board, hex: Hex, ignore: Option<Hex>) -> Vec<Hex> {
    let occupied = |h: Hex| Some(h) != ignore && board.is_occupied(h);
    hex.circle()
        .filter(|&(prev, candidate, next)| {
            !occupied(candidate) && (occupied(prev) ^ occupied(next))
        })
        .map(|(_, candidate, _)| candidate)
        .collect()
}

/// Bee: one slide
pub fn single_slides(board: &Board, origin: Hex) -> BTreeSet<Hex> {
    slides_from(board, origin, vacated(board, origin)).into_iter().collect()
}

/// Breadth-first walk over single slides.
///
/// With `target` set, yields hexes at exactly that shortest slide distance;
/// otherwise every reachable hex except the origin.
fn walks(board: &Board, origin: Hex, target: Option<u32>) -> BTreeSet<Hex> {
    let ignore = vacated(board, origin);
    let mut distance: FxHashMap<Hex, u32> = FxHashMap::default();
    let mut queue = VecDeque::from([origin]);
    let mut result = BTreeSet::new();
    distance.insert(origin, 0);

    while let Some(hex) = queue.pop_front() {
        let d = distance[&hex];
        match target {
            Some(t) if d == t => {
                result.insert(hex);
                continue;
            }
            None if hex != origin => {
                result.insert(hex);
            }
            _ => {}
        }

        for next in slides_from(board, hex, ignore) {
            if !distance.contains_key(&next) {
                distance.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }

    result
}

/// Spider: exactly three slides
pub fn spider_walks(board: &Board, origin: Hex) -> BTreeSet<Hex> {
    walks(board, origin, Some(SPIDER_DISTANCE))
}

/// Ant: any number of slides
pub fn ant_walks(board: &Board, origin: Hex) -> BTreeSet<Hex> {
    walks(board, origin, None)
}

// ============================================================================
// JUMPS AND CLIMBS
// ============================================================================

/// Grasshopper: straight jump over a run of occupied hexes
pub fn jumps(board: &Board, origin: Hex) -> BTreeSet<Hex> {
    let mut result = BTreeSet::new();
    for offset in directions() {
        if !board.is_occupied(origin + offset) {
            continue;
        }
        let mut distance = 2;
        while board.is_occupied(origin + offset.scale(distance)) {
            distance += 1;
        }
        result.insert(origin + offset.scale(distance));
    }
    result
}

/// Beetle: slide or climb, gated by the heights of the flanking stacks
pub fn climbs(board: &Board, origin: Hex) -> BTreeSet<Hex> {
    let mut result = BTreeSet::new();
    let height = board.height(origin);

    if height > 1 {
        // On top of the hive: step down or across unless boxed in
        for (prev, candidate, next) in origin.circle() {
            if board.height(candidate) < height
                && (board.height(prev) < height || board.height(next) < height)
            {
                result.insert(candidate);
            }
        }
    } else {
        result.extend(single_slides(board, origin));
    }

    // Climb up or stay level unless both flanks tower over the origin
    for (prev, candidate, next) in origin.circle() {
        let (h_prev, h_candidate, h_next) =
            (board.height(prev), board.height(candidate), board.height(next));
        if h_candidate >= height && !(h_prev > height && h_next > height) {
            result.insert(candidate);
        }
    }

    result
}

// ============================================================================
// DROPS
// ============================================================================

/// Empty hexes touching the hive where every neighboring stone belongs to `side`
pub fn drop_sites(board: &Board, side: Side) -> BTreeSet<Hex> {
    let candidates: BTreeSet<Hex> = board
        .occupied()
        .flat_map(|hex| hex.neighbors())
        .filter(|&n| !board.is_occupied(n))
        .collect();

    candidates
        .into_iter()
        .filter(|&hex| {
            board
                .occupied_neighbors(hex)
                .into_iter()
                .all(|n| board.top(n).map_or(false, |piece| piece.side == side))
        })
        .collect()
}

//! Attractor search: omnidirectional nearest-target and eye raycasts.
//!
//! Candidates are kept in a `BTreeSet`, so iteration is always by `(x, y)`
//! and ties in the nearest search resolve to the smallest coordinate.

use crate::grid::Grid;
use predators_data::{Creature, Direction, Feature, Position};
use std::collections::BTreeSet;

/// Union of standing food cells and unhatched egg cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    cells: BTreeSet<Position>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources<F, E>(food: F, eggs: E) -> Self
    where
        F: IntoIterator<Item = Position>,
        E: IntoIterator<Item = Position>,
    {
        let mut cells: BTreeSet<Position> = food.into_iter().collect();
        cells.extend(eggs);
        Self { cells }
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn insert(&mut self, pos: Position) -> bool {
        self.cells.insert(pos)
    }

    pub fn remove(&mut self, pos: Position) -> bool {
        self.cells.remove(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Closest candidate by Manhattan distance within `radius`, first in
    /// `(x, y)` order on ties.
    pub fn nearest(&self, head: Position, radius: u32) -> Option<Position> {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        let lo = Position::new(head.x.saturating_sub(r), i32::MIN);
        let hi = Position::new(head.x.saturating_add(r), i32::MAX);

        let mut best: Option<(i32, Position)> = None;
        for &candidate in self.cells.range(lo..=hi) {
            let dist = head.manhattan(candidate);
            if dist > r {
                continue;
            }
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, candidate));
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Walks from the eye outward along the head→eye vector to the grid edge.
    /// Returns that heading if any cell on the ray holds a candidate.
    pub fn eye_scan(&self, grid: &Grid, head: Position, eye: Position) -> Option<Direction> {
        let (dx, dy) = (eye.x - head.x, eye.y - head.y);
        let dir = Direction::from_delta(dx, dy)?;
        let mut cell = eye;
        loop {
            cell = cell.offset(dx, dy);
            if !grid.contains(cell) {
                return None;
            }
            if self.contains(cell) {
                return Some(dir);
            }
        }
    }
}

/// Outcome of one targeting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    /// The eye saw something; step straight toward the eye side.
    Eye(Direction),
    /// Head toward the nearest attractor.
    Toward(Position),
    /// Nothing in range; keep the current heading.
    Wander,
}

/// Eye holders only look along their ray; everyone else searches the
/// surrounding window.
pub fn steer(creature: &Creature, targets: &TargetSet, grid: &Grid, radius: u32) -> Steering {
    let head = creature.head();
    if let Some(eye) = creature.body.part(Feature::Eye) {
        return targets
            .eye_scan(grid, head, eye)
            .map_or(Steering::Wander, Steering::Eye);
    }
    match targets.nearest(head, radius) {
        Some(pos) => Steering::Toward(pos),
        None => Steering::Wander,
    }
}

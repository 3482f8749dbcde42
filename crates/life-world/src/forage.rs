//! Target selection and movement rules.
//!
//! Traits such as `speed` and `vision` are carried on every organism but not yet
//! consulted. A [`Forager`] is where a trait becomes behavior: the step engine only
//! asks it where to aim and where to go, so a trait-aware forager can be swapped in
//! without touching the tick transition.

use crate::grid::WorldGrid;
use crate::organism::Organism;
use crate::terrain::TerrainMap;
use life_core::{Cell, CellState};

pub trait Forager: Send + Sync {
    /// Food cell the organism heads for, if any
    fn select_target(&self, organism: &Organism, grid: &WorldGrid, terrain: &TerrainMap) -> Option<Cell>;

    /// Cell the organism ends the tick on
    fn next_position(&self, organism: &Organism, target: Option<Cell>, terrain: &TerrainMap) -> Cell;
}

/// Head for the nearest food on the organism's own terrain, one cell per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestFood;

impl Forager for NearestFood {
    fn select_target(&self, organism: &Organism, grid: &WorldGrid, terrain: &TerrainMap) -> Option<Cell> {
        nearest_food(organism, grid, terrain)
    }

    fn next_position(&self, organism: &Organism, target: Option<Cell>, terrain: &TerrainMap) -> Cell {
        match target {
            Some(target) => unit_step(organism, target, terrain),
            None => organism.position,
        }
    }
}

/// Scan the whole grid for the food cell on the organism's habitat closest to it.
///
/// Distance is plain Euclidean, without wrapping. Among equidistant cells the first
/// in row-major order wins, i.e. lowest row, then lowest column.
pub fn nearest_food(organism: &Organism, grid: &WorldGrid, terrain: &TerrainMap) -> Option<Cell> {
    let mut best: Option<(i64, Cell)> = None;

    for (cell, state) in grid.iter() {
        if state != CellState::Food || !organism.can_occupy(terrain.get(cell)) {
            continue;
        }
        let distance = organism.position.distance_squared(&cell);
        if best.map_or(true, |(min, _)| distance < min) {
            best = Some((distance, cell));
        }
    }

    best.map(|(_, cell)| cell)
}

/// Move one cell toward `target` on each axis, wrapping at the edges.
///
/// The organism stays put if the destination is not its habitat.
pub fn unit_step(organism: &Organism, target: Cell, terrain: &TerrainMap) -> Cell {
    let (d_row, d_col) = organism.position.step_toward(&target);
    if d_row == 0 && d_col == 0 {
        return organism.position;
    }

    let destination = organism.position.offset(d_row, d_col).wrap(terrain.size());
    if organism.can_occupy(terrain.get(destination)) {
        destination
    } else {
        organism.position
    }
}

//! Per-tick occupancy grid, derived from organism positions and surviving food.

use crate::organism::OrganismSet;
use crate::terrain::TerrainMap;
use life_core::{Cell, CellState, FoodConfig, Terrain};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A square toroidal grid of cell states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGrid {
    size: i32,
    cells: Vec<CellState>,
}

impl WorldGrid {
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        Self {
            size,
            cells: vec![CellState::Empty; (size * size) as usize],
        }
    }

    /// Project the next grid from the surviving organisms and the previous food layout.
    ///
    /// Organism cells are marked first. Previous food survives unless it was eaten
    /// this tick or now lies under an organism. Food is then topped up to
    /// `food.spawn_target` on empty land cells, with at most `food.spawn_attempts`
    /// random draws; any shortfall is left for the next tick.
    pub fn rebuild<R: Rng + ?Sized>(
        previous: &WorldGrid,
        organisms: &OrganismSet,
        eaten: &HashSet<Cell>,
        terrain: &TerrainMap,
        food: &FoodConfig,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::new(terrain.size());

        let mut occupied = HashSet::with_capacity(organisms.len());
        for organism in organisms.iter() {
            grid.set(organism.position, CellState::Organism);
            occupied.insert(organism.position.wrap(grid.size));
        }

        let mut food_count = 0;
        for cell in previous.food_cells() {
            if previous.size != grid.size || eaten.contains(&cell) || occupied.contains(&cell) {
                continue;
            }
            grid.set(cell, CellState::Food);
            food_count += 1;
        }

        food_count += grid.spawn_food(
            terrain,
            food.spawn_target.saturating_sub(food_count),
            food.spawn_attempts,
            rng,
        );

        if food_count < food.spawn_target {
            debug!(
                food_count,
                target = food.spawn_target,
                "Food spawn budget exhausted before reaching target"
            );
        }

        grid
    }

    /// Starting grid for a fresh world: `draws` random cells marked as food.
    ///
    /// Draws ignore terrain and organisms and may repeat, so the grid can hold
    /// fewer than `draws` food cells. Organisms are not marked; the first tick's
    /// rebuild does that, after feeding has read this layout.
    pub fn seed_food<R: Rng + ?Sized>(size: i32, draws: usize, rng: &mut R) -> Self {
        let mut grid = Self::new(size);
        if grid.size == 0 {
            return grid;
        }
        for _ in 0..draws {
            let cell = Cell::new(rng.gen_range(0..grid.size), rng.gen_range(0..grid.size));
            grid.set(cell, CellState::Food);
        }
        grid
    }

    /// Place up to `wanted` food cells on empty land, drawing at most `attempts` cells.
    /// Returns how many were placed.
    fn spawn_food<R: Rng + ?Sized>(
        &mut self,
        terrain: &TerrainMap,
        wanted: usize,
        attempts: u32,
        rng: &mut R,
    ) -> usize {
        if self.size == 0 {
            return 0;
        }

        let mut placed = 0;
        let mut tries = 0;
        while placed < wanted && tries < attempts {
            let cell = Cell::new(rng.gen_range(0..self.size), rng.gen_range(0..self.size));
            if self.get(cell) == CellState::Empty && terrain.get(cell) == Terrain::Land {
                self.set(cell, CellState::Food);
                placed += 1;
            }
            tries += 1;
        }
        placed
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Get cell state at a position (with toroidal wrapping)
    pub fn get(&self, cell: Cell) -> CellState {
        self.cells[self.cell_to_index(cell.wrap(self.size))]
    }

    /// Set cell state at a position.
    ///
    /// The tick transition never patches a grid; this is for assembling one
    /// from outside, e.g. a pre-seeded scenario.
    pub fn set(&mut self, cell: Cell, state: CellState) {
        let index = self.cell_to_index(cell.wrap(self.size));
        self.cells[index] = state;
    }

    pub fn is_food(&self, cell: Cell) -> bool {
        self.get(cell) == CellState::Food
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    pub fn food_count(&self) -> usize {
        self.count(CellState::Food)
    }

    /// Food cells in row-major order
    pub fn food_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.iter()
            .filter(|(_, state)| *state == CellState::Food)
            .map(|(cell, _)| cell)
    }

    fn cell_to_index(&self, cell: Cell) -> usize {
        (cell.row * self.size + cell.col) as usize
    }

    pub fn index_to_cell(&self, index: usize) -> Cell {
        Cell::new(index as i32 / self.size, index as i32 % self.size)
    }

    /// Row-major iterator over all cells and their state
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &state)| (self.index_to_cell(i), state))
    }
}

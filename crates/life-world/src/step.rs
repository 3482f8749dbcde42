//! The tick transition: metabolism, feeding, targeting, movement, grid rebuild.

use crate::forage::{Forager, NearestFood};
use crate::grid::WorldGrid;
use crate::organism::{Organism, OrganismSet};
use crate::terrain::TerrainMap;
use life_core::{Cell, EnergyConfig, FoodConfig};
use rand::Rng;
use std::collections::HashSet;

/// What happened to one organism during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum Fate {
    /// Metabolism took its energy to zero or below
    Starved,
    Survived {
        organism: Organism,
        /// Cell it ate from, if any
        ate: Option<Cell>,
    },
}

/// Everything a tick produces besides stats
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub organisms: OrganismSet,
    pub grid: WorldGrid,
    pub eaten: HashSet<Cell>,
    pub deaths: usize,
}

/// Stateless tick transition.
///
/// Holds only parameters; every call reads the previous organisms and grid and
/// returns fresh ones.
#[derive(Debug, Clone)]
pub struct StepEngine<F = NearestFood> {
    forager: F,
    energy: EnergyConfig,
    food: FoodConfig,
}

impl StepEngine<NearestFood> {
    pub fn new(energy: EnergyConfig, food: FoodConfig) -> Self {
        Self::with_forager(NearestFood, energy, food)
    }
}

impl<F: Forager> StepEngine<F> {
    pub fn with_forager(forager: F, energy: EnergyConfig, food: FoodConfig) -> Self {
        Self {
            forager,
            energy,
            food,
        }
    }

    /// Advance one organism against the pre-tick grid.
    ///
    /// Reads nothing but its own state, `grid` and `terrain`, so organisms can be
    /// advanced in any order.
    pub fn advance_organism(&self, organism: &Organism, grid: &WorldGrid, terrain: &TerrainMap) -> Fate {
        let mut next = organism.clone();
        if !next.metabolize(self.energy.metabolic_cost) {
            return Fate::Starved;
        }

        let ate = if grid.is_food(organism.position) {
            next.add_energy(self.energy.energy_from_food);
            Some(organism.position.wrap(grid.size()))
        } else {
            None
        };

        let target = self.forager.select_target(organism, grid, terrain);
        next.position = self.forager.next_position(organism, target, terrain);

        Fate::Survived { organism: next, ate }
    }

    /// Produce the next organisms and grid from the current ones.
    pub fn step<R: Rng + ?Sized>(
        &self,
        organisms: &OrganismSet,
        grid: &WorldGrid,
        terrain: &TerrainMap,
        rng: &mut R,
    ) -> StepOutcome {
        let mut survivors = OrganismSet::new();
        let mut eaten = HashSet::new();
        let mut deaths = 0;

        for organism in organisms.iter() {
            match self.advance_organism(organism, grid, terrain) {
                Fate::Starved => deaths += 1,
                Fate::Survived { organism, ate } => {
                    if let Some(cell) = ate {
                        eaten.insert(cell);
                    }
                    survivors.insert(organism);
                }
            }
        }

        let grid = WorldGrid::rebuild(grid, &survivors, &eaten, terrain, &self.food, rng);

        StepOutcome {
            organisms: survivors,
            grid,
            eaten,
            deaths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::{CellState, OrganismId, Terrain, Traits};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine(metabolic_cost: f64, energy_from_food: f64, spawn_target: usize) -> StepEngine {
        StepEngine::new(
            EnergyConfig {
                metabolic_cost,
                energy_from_food,
            },
            FoodConfig {
                spawn_target,
                spawn_attempts: 100,
            },
        )
    }

    fn organism(row: i32, col: i32, energy: f64) -> Organism {
        Organism::new(OrganismId::new(), Cell::new(row, col), Terrain::Land, energy, Traits::default())
    }

    #[test]
    fn test_starving_organism_dies() {
        let engine = engine(1.0, 10.0, 0);
        let terrain = TerrainMap::uniform(10, Terrain::Land);
        let grid = WorldGrid::new(10);

        assert_eq!(engine.advance_organism(&organism(0, 0, 1.0), &grid, &terrain), Fate::Starved);
        assert_eq!(engine.advance_organism(&organism(0, 0, 0.5), &grid, &terrain), Fate::Starved);
    }

    #[test]
    fn test_dead_organism_does_not_eat() {
        let engine = engine(1.0, 10.0, 0);
        let terrain = TerrainMap::uniform(10, Terrain::Land);
        let mut grid = WorldGrid::new(10);
        grid.set(Cell::new(0, 0), CellState::Food);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let outcome = engine.step(&vec![organism(0, 0, 1.0)].into_iter().collect(), &grid, &terrain, &mut rng);

        assert!(outcome.organisms.is_empty());
        assert_eq!(outcome.deaths, 1);
        assert!(outcome.eaten.is_empty());
        assert!(outcome.grid.is_food(Cell::new(0, 0)));
    }

    #[test]
    fn test_feeding_uses_pre_move_cell() {
        let engine = engine(1.0, 10.0, 0);
        let terrain = TerrainMap::uniform(10, Terrain::Land);
        let mut grid = WorldGrid::new(10);
        grid.set(Cell::new(2, 2), CellState::Food);
        grid.set(Cell::new(2, 3), CellState::Food);

        match engine.advance_organism(&organism(2, 2, 5.0), &grid, &terrain) {
            Fate::Survived { organism, ate } => {
                assert_eq!(organism.energy, 14.0);
                assert_eq!(ate, Some(Cell::new(2, 2)));
                // Its own cell is the nearest food, so it stays
                assert_eq!(organism.position, Cell::new(2, 2));
            }
            Fate::Starved => panic!("organism should survive"),
        }
    }

    #[test]
    fn test_moves_toward_food_without_eating() {
        let engine = engine(1.0, 10.0, 0);
        let terrain = TerrainMap::uniform(10, Terrain::Land);
        let mut grid = WorldGrid::new(10);
        grid.set(Cell::new(5, 8), CellState::Food);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let start = organism(5, 5, 10.0);
        let id = start.id;

        let outcome = engine.step(&vec![start].into_iter().collect(), &grid, &terrain, &mut rng);

        let moved = outcome.organisms.get(&id).unwrap();
        assert_eq!(moved.position, Cell::new(5, 6));
        assert_eq!(moved.energy, 9.0);
        assert!(outcome.grid.is_food(Cell::new(5, 8)));
        assert_eq!(outcome.grid.get(Cell::new(5, 6)), CellState::Organism);
        assert_eq!(outcome.grid.get(Cell::new(5, 5)), CellState::Empty);
    }

    #[test]
    fn test_shared_food_is_recorded_once() {
        let engine = engine(1.0, 10.0, 0);
        let terrain = TerrainMap::uniform(10, Terrain::Land);
        let mut grid = WorldGrid::new(10);
        grid.set(Cell::new(4, 4), CellState::Food);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let organisms: OrganismSet = vec![organism(4, 4, 5.0), organism(4, 4, 7.0)].into_iter().collect();

        let outcome = engine.step(&organisms, &grid, &terrain, &mut rng);

        assert_eq!(outcome.eaten.len(), 1);
        assert_eq!(outcome.organisms.len(), 2);
        // Both ate from the same cell
        assert_eq!(outcome.organisms.total_energy(), 14.0 + 16.0);
        assert_eq!(outcome.grid.get(Cell::new(4, 4)), CellState::Organism);
    }

    #[test]
    fn test_organisms_may_share_a_cell() {
        let engine = engine(1.0, 10.0, 0);
        let terrain = TerrainMap::uniform(10, Terrain::Land);
        let mut grid = WorldGrid::new(10);
        grid.set(Cell::new(0, 5), CellState::Food);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let organisms: OrganismSet = vec![organism(1, 4, 5.0), organism(1, 6, 5.0)].into_iter().collect();

        let outcome = engine.step(&organisms, &grid, &terrain, &mut rng);

        assert_eq!(outcome.organisms.len(), 2);
        for o in outcome.organisms.iter() {
            assert_eq!(o.position, Cell::new(0, 5));
        }
        assert_eq!(outcome.grid.get(Cell::new(0, 5)), CellState::Organism);
        assert_eq!(outcome.grid.count(CellState::Organism), 1);
    }

    #[test]
    fn test_order_does_not_change_result() {
        let engine = engine(1.0, 10.0, 0);
        let terrain = TerrainMap::uniform(12, Terrain::Land);
        let mut grid = WorldGrid::new(12);
        for cell in [Cell::new(1, 1), Cell::new(6, 9), Cell::new(11, 3)] {
            grid.set(cell, CellState::Food);
        }
        let members = vec![organism(1, 1, 3.0), organism(5, 5, 1.0), organism(10, 2, 8.0)];

        let forward: OrganismSet = members.iter().cloned().collect();
        let backward: OrganismSet = members.iter().rev().cloned().collect();
        let a = engine.step(&forward, &grid, &terrain, &mut ChaCha8Rng::seed_from_u64(1));
        let b = engine.step(&backward, &grid, &terrain, &mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(a.organisms, b.organisms);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.eaten, b.eaten);
    }
}

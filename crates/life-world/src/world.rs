//! Immutable world snapshot: terrain, grid, organisms and stats after a tick.

use crate::forage::Forager;
use crate::grid::WorldGrid;
use crate::organism::OrganismSet;
use crate::stats::StatsAggregator;
use crate::step::StepEngine;
use crate::terrain::TerrainMap;
use life_core::{Result, SimulationConfig, Stats};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// One fully committed state of a run.
///
/// The terrain is shared between consecutive snapshots and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub terrain: Arc<TerrainMap>,
    pub grid: WorldGrid,
    pub organisms: OrganismSet,
    pub stats: Stats,
}

impl World {
    /// Generate terrain, place the initial organisms and seed the initial food.
    #[instrument(skip(config, rng), fields(grid_size = config.world.grid_size))]
    pub fn generate<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let world_config = &config.world;

        let terrain = TerrainMap::generate(
            world_config.grid_size,
            world_config.terrain_block_size,
            world_config.land_probability,
            rng,
        );
        let organisms = OrganismSet::place_initial(
            world_config.initial_organisms,
            &terrain,
            world_config.initial_energy,
            rng,
        );
        let grid = WorldGrid::seed_food(terrain.size(), config.food.spawn_target, rng);

        let world = Self::from_parts(Arc::new(terrain), grid, organisms, config.history_len);

        info!(
            event = "world_created",
            land_cells = world.terrain.land_cells(),
            organisms = world.organisms.len(),
            food = world.stats.food_count,
            "World generated"
        );

        Ok(world)
    }

    /// Assemble a world at step 0 from existing parts
    pub fn from_parts(
        terrain: Arc<TerrainMap>,
        grid: WorldGrid,
        organisms: OrganismSet,
        history_len: usize,
    ) -> Self {
        let stats = StatsAggregator::initial(&organisms, &grid, history_len);
        Self {
            terrain,
            grid,
            organisms,
            stats,
        }
    }

    /// Compute the next snapshot. `self` is left untouched.
    pub fn next<F: Forager, R: Rng + ?Sized>(&self, engine: &StepEngine<F>, rng: &mut R) -> World {
        let outcome = engine.step(&self.organisms, &self.grid, &self.terrain, rng);
        let stats = StatsAggregator::summarize(&self.stats, &outcome);

        World {
            terrain: Arc::clone(&self.terrain),
            grid: outcome.grid,
            organisms: outcome.organisms,
            stats,
        }
    }

    pub fn size(&self) -> i32 {
        self.terrain.size()
    }
}

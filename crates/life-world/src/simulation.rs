//! Simulation owner: holds the current snapshot and advances it tick by tick.

use crate::forage::{Forager, NearestFood};
use crate::step::StepEngine;
use crate::world::World;
use life_core::{Result, SimulationConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct Simulation<F = NearestFood> {
    config: SimulationConfig,
    engine: StepEngine<F>,
    rng: ChaCha8Rng,
    world: Arc<World>,
}

impl Simulation<NearestFood> {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_forager(config, NearestFood)
    }
}

impl<F: Forager> Simulation<F> {
    #[instrument(skip(config, forager), fields(seed = ?config.seed))]
    pub fn with_forager(config: SimulationConfig, forager: F) -> Result<Self> {
        config.validate()?;

        let mut rng = rng_for(&config);
        let world = World::generate(&config, &mut rng)?;
        Ok(Self::assemble(config, forager, rng, world))
    }

    /// Resume from an existing world, e.g. a hand-built scenario
    pub fn from_world(config: SimulationConfig, forager: F, world: World) -> Result<Self> {
        config.validate()?;

        let rng = rng_for(&config);
        Ok(Self::assemble(config, forager, rng, world))
    }

    fn assemble(config: SimulationConfig, forager: F, rng: ChaCha8Rng, world: World) -> Self {
        let engine = StepEngine::with_forager(forager, config.energy.clone(), config.food.clone());
        Self {
            config,
            engine,
            rng,
            world: Arc::new(world),
        }
    }

    /// Execute one tick and publish the resulting snapshot
    pub fn step(&mut self) -> Arc<World> {
        let was_extinct = self.world.stats.is_extinct();
        let next = self.world.next(&self.engine, &mut self.rng);
        let stats = &next.stats;

        debug!(
            event = "tick",
            step = stats.step,
            population = stats.organism_count,
            food = stats.food_count,
            total_energy = stats.total_energy,
            deaths = stats.deaths,
            eaten = stats.food_eaten,
            "Tick complete"
        );

        if stats.is_extinct() && !was_extinct {
            info!(
                event = "extinction",
                step = stats.step,
                peak_population = stats.history.peak_population(),
                "Population reached zero"
            );
        }

        self.world = Arc::new(next);
        Arc::clone(&self.world)
    }

    /// Run the given number of ticks, returning the last snapshot
    pub fn run(&mut self, ticks: u64) -> Arc<World> {
        for _ in 0..ticks {
            self.step();
        }
        self.snapshot()
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> Arc<World> {
        Arc::clone(&self.world)
    }

    pub fn tick(&self) -> u64 {
        self.world.stats.step
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

fn rng_for(config: &SimulationConfig) -> ChaCha8Rng {
    match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

//! Command-line arguments.

use clap::Parser;
use life_core::{EnergyConfig, FoodConfig, SimulationConfig, WorldConfig};

/// Headless Life Engine run: ticks a world at a fixed rate and reports its stats.
#[derive(Debug, Parser)]
#[command(name = "life-runner", version)]
pub struct Args {
    /// Side length of the square grid
    #[arg(long, default_value_t = WorldConfig::default().grid_size)]
    pub grid_size: i32,

    /// Number of food cells kept on the grid
    #[arg(long, default_value_t = FoodConfig::default().spawn_target)]
    pub food: usize,

    /// Ticks per second
    #[arg(long, default_value_t = SimulationConfig::default().ticks_per_second)]
    pub speed: u32,

    /// Energy every organism loses per tick
    #[arg(long, default_value_t = EnergyConfig::default().metabolic_cost)]
    pub metabolic_cost: f64,

    /// Energy gained from one food cell
    #[arg(long, default_value_t = EnergyConfig::default().energy_from_food)]
    pub energy_from_food: f64,

    /// Organisms placed at startup
    #[arg(long, default_value_t = WorldConfig::default().initial_organisms)]
    pub organisms: usize,

    /// Random seed; omit for a fresh world every run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Log a population summary every N ticks (0 = never)
    #[arg(long, default_value_t = 10)]
    pub log_every: u64,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    pub fn to_config(&self) -> SimulationConfig {
        let defaults = SimulationConfig::default();
        SimulationConfig {
            seed: self.seed,
            ticks_per_second: self.speed,
            world: WorldConfig {
                grid_size: self.grid_size,
                initial_organisms: self.organisms,
                ..defaults.world
            },
            food: FoodConfig {
                spawn_target: self.food,
                ..defaults.food
            },
            energy: EnergyConfig {
                metabolic_cost: self.metabolic_cost,
                energy_from_food: self.energy_from_food,
            },
            ..defaults
        }
    }
}

//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest grid side accepted at the configuration boundary
pub const MAX_GRID_SIZE: i32 = 1024;

/// World generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub grid_size: i32,
    /// Side length of the square blocks that share one terrain value
    pub terrain_block_size: i32,
    /// Probability that a terrain block is land (0.0 to 1.0)
    pub land_probability: f64,
    /// Organisms placed when the world is created
    pub initial_organisms: usize,
    /// Starting energy for each initial organism
    pub initial_energy: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 30,
            terrain_block_size: 5,
            land_probability: 0.3,
            initial_organisms: 10,
            initial_energy: 20.0,
        }
    }
}

/// Food replenishment parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodConfig {
    /// Number of food cells the grid is topped back up to every tick
    pub spawn_target: usize,
    /// Random draws allowed per tick while topping up
    pub spawn_attempts: u32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            spawn_target: 60,
            spawn_attempts: 100,
        }
    }
}

/// Energy accounting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Energy deducted from every organism every tick
    pub metabolic_cost: f64,
    /// Energy gained from eating one food cell
    pub energy_from_food: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            metabolic_cost: 1.0,
            energy_from_food: 10.0,
        }
    }
}

/// Full configuration of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducibility; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Ticks per second when driven by the scheduler
    pub ticks_per_second: u32,
    /// Number of samples kept in the stats history
    pub history_len: usize,
    pub world: WorldConfig,
    pub food: FoodConfig,
    pub energy: EnergyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ticks_per_second: 2,
            history_len: 256,
            world: WorldConfig::default(),
            food: FoodConfig::default(),
            energy: EnergyConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Reject configurations the tick transition is not defined for
    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        if !(1..=MAX_GRID_SIZE).contains(&world.grid_size) {
            return Err(Error::InvalidConfig(format!(
                "grid_size must be in 1..={}, got {}",
                MAX_GRID_SIZE, world.grid_size
            )));
        }
        if world.terrain_block_size < 1 {
            return Err(Error::InvalidConfig(format!(
                "terrain_block_size must be positive, got {}",
                world.terrain_block_size
            )));
        }
        if !(0.0..=1.0).contains(&world.land_probability) {
            return Err(Error::InvalidConfig(format!(
                "land_probability must be in [0, 1], got {}",
                world.land_probability
            )));
        }
        check_amount("initial_energy", world.initial_energy)?;
        check_amount("metabolic_cost", self.energy.metabolic_cost)?;
        check_amount("energy_from_food", self.energy.energy_from_food)?;
        if self.ticks_per_second == 0 {
            return Err(Error::InvalidConfig(
                "ticks_per_second must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_amount(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.grid_size, 30);
        assert_eq!(config.world.terrain_block_size, 5);
        assert_eq!(config.world.initial_organisms, 10);
        assert_eq!(config.food.spawn_target, 60);
        assert_eq!(config.food.spawn_attempts, 100);
        assert_eq!(config.energy.metabolic_cost, 1.0);
        assert_eq!(config.energy.energy_from_food, 10.0);
        assert_eq!(config.ticks_per_second, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_grid() {
        let mut config = SimulationConfig::default();
        config.world.grid_size = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.world.grid_size = -4;
        assert!(config.validate().is_err());

        config.world.grid_size = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_amounts() {
        let mut config = SimulationConfig::default();
        config.energy.metabolic_cost = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.energy.energy_from_food = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.world.land_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.ticks_per_second = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = SimulationConfig {
            seed: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.seed, Some(42));
        assert_eq!(deserialized.world.grid_size, config.world.grid_size);
        assert_eq!(deserialized.food.spawn_target, config.food.spawn_target);
    }
}

//! World simulation engine.
//!
//! This module implements the toroidal grid world where organisms move, feed and starve,
//! and the pure tick transition that advances it.

pub mod terrain;
pub mod grid;
pub mod organism;
pub mod forage;
pub mod step;
pub mod stats;
pub mod world;
pub mod simulation;

pub use terrain::TerrainMap;
pub use grid::WorldGrid;
pub use organism::{Organism, OrganismSet};
pub use forage::{Forager, NearestFood};
pub use step::{StepEngine, StepOutcome};
pub use stats::StatsAggregator;
pub use world::World;
pub use simulation::Simulation;

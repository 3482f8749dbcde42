//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an organism
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Draw an id from the given RNG so seeded runs produce the same ids
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grid cell coordinate on a square toroidal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Apply toroidal wrapping for a grid of the given size
    pub fn wrap(&self, size: i32) -> Self {
        Self {
            row: self.row.rem_euclid(size),
            col: self.col.rem_euclid(size),
        }
    }

    /// Squared Euclidean distance, measured without wrapping.
    ///
    /// Orders cells exactly like the Euclidean distance does.
    pub fn distance_squared(&self, other: &Cell) -> i64 {
        let d_row = (self.row - other.row) as i64;
        let d_col = (self.col - other.col) as i64;
        d_row * d_row + d_col * d_col
    }

    /// Unit step toward `target` on each axis independently: -1, 0 or +1
    pub fn step_toward(&self, target: &Cell) -> (i32, i32) {
        (
            (target.row - self.row).signum(),
            (target.col - self.col).signum(),
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Terrain classification of a cell, also used as an organism's habitat
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Land,
    Water,
}

/// Per-tick occupancy of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Food,
    Organism,
}

/// Fixed-shape trait record carried by every organism.
///
/// Only `color_hue` and `size` are read today, by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub speed: u32,
    pub vision: u32,
    /// Hue in degrees, `[0, 360)`
    pub color_hue: u16,
    pub size: u32,
    pub pattern: u32,
}

impl Traits {
    pub const DEFAULT_SPEED: u32 = 1;
    pub const DEFAULT_VISION: u32 = 2;
    pub const DEFAULT_SIZE: u32 = 1;
    pub const DEFAULT_PATTERN: u32 = 0;

    /// Default traits with a uniformly random hue
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            color_hue: rng.gen_range(0..360),
            ..Self::default()
        }
    }
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            speed: Self::DEFAULT_SPEED,
            vision: Self::DEFAULT_VISION,
            color_hue: 0,
            size: Self::DEFAULT_SIZE,
            pattern: Self::DEFAULT_PATTERN,
        }
    }
}

//! Population statistics and trend tracking.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Direction of change between two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl Trend {
    pub fn between(previous: usize, current: usize) -> Self {
        match current.cmp(&previous) {
            Ordering::Greater => Trend::Rising,
            Ordering::Less => Trend::Falling,
            Ordering::Equal => Trend::Steady,
        }
    }
}

/// One post-tick sample of the headline counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySample {
    pub step: u64,
    pub population: usize,
    pub food: usize,
    pub total_energy: i64,
}

/// Bounded ring of recent samples, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationHistory {
    capacity: usize,
    samples: VecDeque<HistorySample>,
}

impl PopulationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn push(&mut self, sample: HistorySample) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    pub fn previous(&self) -> Option<&HistorySample> {
        self.samples.len().checked_sub(2).and_then(|i| self.samples.get(i))
    }

    /// Population trend over the last tick, `Steady` until two samples exist
    pub fn population_trend(&self) -> Trend {
        match (self.previous(), self.latest()) {
            (Some(prev), Some(cur)) => Trend::between(prev.population, cur.population),
            _ => Trend::Steady,
        }
    }

    /// Food trend over the last tick, `Steady` until two samples exist
    pub fn food_trend(&self) -> Trend {
        match (self.previous(), self.latest()) {
            (Some(prev), Some(cur)) => Trend::between(prev.food, cur.food),
            _ => Trend::Steady,
        }
    }

    /// Highest population seen in the retained window
    pub fn peak_population(&self) -> usize {
        self.samples.iter().map(|s| s.population).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> + '_ {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Summary counters for the world after a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    /// Ticks completed so far
    pub step: u64,
    pub organism_count: usize,
    /// Sum of surviving energy, rounded for display
    pub total_energy: i64,
    pub food_count: usize,
    /// Distinct habitats present in the surviving population
    pub species_count: usize,
    /// Organisms that died during the last tick
    pub deaths: usize,
    /// Food cells eaten during the last tick
    pub food_eaten: usize,
    pub history: PopulationHistory,
}

impl Stats {
    pub fn is_extinct(&self) -> bool {
        self.organism_count == 0
    }

    pub fn sample(&self) -> HistorySample {
        HistorySample {
            step: self.step,
            population: self.organism_count,
            food: self.food_count,
            total_energy: self.total_energy,
        }
    }
}

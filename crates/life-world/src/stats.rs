//! Reduction of a post-tick world into summary counters.

use crate::grid::WorldGrid;
use crate::organism::OrganismSet;
use crate::step::StepOutcome;
use life_core::{PopulationHistory, Stats};
use std::collections::HashSet;

pub struct StatsAggregator;

impl StatsAggregator {
    /// Counters for a freshly created world, recorded as step 0
    pub fn initial(organisms: &OrganismSet, grid: &WorldGrid, history_len: usize) -> Stats {
        Self::reduce(0, organisms, grid, PopulationHistory::new(history_len))
    }

    /// Counters after a tick; only the step counter and history carry over from `previous`
    pub fn summarize(previous: &Stats, outcome: &StepOutcome) -> Stats {
        let mut stats = Self::reduce(
            previous.step + 1,
            &outcome.organisms,
            &outcome.grid,
            previous.history.clone(),
        );
        stats.deaths = outcome.deaths;
        stats.food_eaten = outcome.eaten.len();
        stats
    }

    fn reduce(
        step: u64,
        organisms: &OrganismSet,
        grid: &WorldGrid,
        mut history: PopulationHistory,
    ) -> Stats {
        let species: HashSet<_> = organisms.iter().map(|o| o.habitat).collect();

        let mut stats = Stats {
            step,
            organism_count: organisms.len(),
            total_energy: organisms.total_energy().round() as i64,
            food_count: grid.food_count(),
            species_count: species.len(),
            deaths: 0,
            food_eaten: 0,
            history: PopulationHistory::new(0),
        };
        history.push(stats.sample());
        stats.history = history;
        stats
    }
}

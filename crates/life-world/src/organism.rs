//! Organism state and the organism collection.

use crate::terrain::TerrainMap;
use life_core::{Cell, OrganismId, Terrain, Traits};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// An organism in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub id: OrganismId,
    pub position: Cell,
    pub habitat: Terrain,
    pub energy: f64,
    pub traits: Traits,
}

impl Organism {
    pub fn new(
        id: OrganismId,
        position: Cell,
        habitat: Terrain,
        energy: f64,
        traits: Traits,
    ) -> Self {
        Self {
            id,
            position,
            habitat,
            energy,
            traits,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Deduct the metabolic cost; returns whether the organism survives it
    pub fn metabolize(&mut self, cost: f64) -> bool {
        self.energy -= cost;
        self.is_alive()
    }

    pub fn add_energy(&mut self, amount: f64) {
        self.energy += amount;
    }

    pub fn can_occupy(&self, terrain: Terrain) -> bool {
        self.habitat == terrain
    }
}

/// All living organisms, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganismSet {
    members: BTreeMap<OrganismId, Organism>,
}

impl OrganismSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `count` land organisms with `energy` each, placed on land where possible.
    ///
    /// Each organism gets up to `size * size` random draws to find a cell matching
    /// its habitat and otherwise takes an unconstrained random cell. An organism
    /// that cannot be placed at all (an empty map) is left out.
    pub fn place_initial<R: Rng + ?Sized>(
        count: usize,
        terrain: &TerrainMap,
        energy: f64,
        rng: &mut R,
    ) -> Self {
        let mut set = Self::new();
        let habitat = Terrain::Land;
        let attempts = (terrain.size() as usize).pow(2);

        for _ in 0..count {
            let position = match find_habitat_cell(terrain, habitat, attempts, rng) {
                Some(cell) => cell,
                None => match random_cell(terrain.size(), rng) {
                    Some(cell) => {
                        warn!(
                            habitat = ?habitat,
                            position = %cell,
                            "No matching habitat found, placing organism anywhere"
                        );
                        cell
                    }
                    None => {
                        warn!("Grid has no cells, organism dropped");
                        continue;
                    }
                },
            };

            let id = OrganismId::from_rng(rng);
            let traits = Traits::random(rng);
            set.insert(Organism::new(id, position, habitat, energy, traits));
        }

        set
    }

    pub fn insert(&mut self, organism: Organism) -> Option<Organism> {
        self.members.insert(organism.id, organism)
    }

    pub fn get(&self, id: &OrganismId) -> Option<&Organism> {
        self.members.get(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Organisms in id order
    pub fn iter(&self) -> impl Iterator<Item = &Organism> + '_ {
        self.members.values()
    }

    pub fn total_energy(&self) -> f64 {
        self.iter().map(|o| o.energy).sum()
    }
}

impl FromIterator<Organism> for OrganismSet {
    fn from_iter<I: IntoIterator<Item = Organism>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(|o| (o.id, o)).collect(),
        }
    }
}

impl IntoIterator for OrganismSet {
    type Item = Organism;
    type IntoIter = std::collections::btree_map::IntoValues<OrganismId, Organism>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_values()
    }
}

fn random_cell<R: Rng + ?Sized>(size: i32, rng: &mut R) -> Option<Cell> {
    if size <= 0 {
        return None;
    }
    Some(Cell::new(rng.gen_range(0..size), rng.gen_range(0..size)))
}

fn find_habitat_cell<R: Rng + ?Sized>(
    terrain: &TerrainMap,
    habitat: Terrain,
    attempts: usize,
    rng: &mut R,
) -> Option<Cell> {
    for _ in 0..attempts {
        let cell = random_cell(terrain.size(), rng)?;
        if terrain.get(cell) == habitat {
            return Some(cell);
        }
    }
    None
}

//! Block-random land/water map, fixed for the life of a run.

use life_core::{Cell, Terrain};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Immutable terrain classification of a square toroidal grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMap {
    size: i32,
    block_size: i32,
    cells: Vec<Terrain>,
}

impl TerrainMap {
    /// Partition the grid into `block_size` squares and give each block one
    /// terrain, land with probability `land_probability`.
    ///
    /// Blocks on the far edges are clipped when `size` is not a multiple of
    /// `block_size`. One random draw is made per block, in row-major block order.
    pub fn generate<R: Rng + ?Sized>(
        size: i32,
        block_size: i32,
        land_probability: f64,
        rng: &mut R,
    ) -> Self {
        let size = size.max(0);
        let block_size = block_size.max(1);
        let blocks_per_side = (size + block_size - 1) / block_size;

        let blocks: Vec<Terrain> = (0..blocks_per_side * blocks_per_side)
            .map(|_| {
                if rng.gen::<f64>() < land_probability {
                    Terrain::Land
                } else {
                    Terrain::Water
                }
            })
            .collect();

        let mut cells = Vec::with_capacity((size * size) as usize);
        for row in 0..size {
            for col in 0..size {
                let block = (row / block_size) * blocks_per_side + col / block_size;
                cells.push(blocks[block as usize]);
            }
        }

        Self {
            size,
            block_size,
            cells,
        }
    }

    /// A map where every cell has the same terrain
    pub fn uniform(size: i32, terrain: Terrain) -> Self {
        Self::from_fn(size, |_| terrain)
    }

    /// Build a map cell by cell; the block size is recorded as 1
    pub fn from_fn(size: i32, mut f: impl FnMut(Cell) -> Terrain) -> Self {
        let size = size.max(0);
        let mut cells = Vec::with_capacity((size * size) as usize);
        for row in 0..size {
            for col in 0..size {
                cells.push(f(Cell::new(row, col)));
            }
        }
        Self {
            size,
            block_size: 1,
            cells,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn block_size(&self) -> i32 {
        self.block_size
    }

    /// Terrain at a cell (with toroidal wrapping)
    pub fn get(&self, cell: Cell) -> Terrain {
        let wrapped = cell.wrap(self.size);
        self.cells[(wrapped.row * self.size + wrapped.col) as usize]
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }

    pub fn land_cells(&self) -> usize {
        self.count(Terrain::Land)
    }

    /// Row-major iterator over all cells and their terrain
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Terrain)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &terrain)| (Cell::new(i as i32 / size, i as i32 % size), terrain))
    }
}

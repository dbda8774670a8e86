//! In-memory terrain world
//!
//! Holds generated chunk columns and feeds the generator the height maps of already
//! generated neighbours, so border smoothing happens automatically as the world grows.

use std::collections::HashMap;

use log::debug;

use crate::chunk::{Cardinal, ChunkColumn, NeighborHeightMaps};
use crate::postprocess::{prune_floating_blocks, PruneSummary};
use crate::terrain::{GenerationContext, TerrainGenerator, WriteSummary};
use crate::tilemap::Tilemap;

/// What generating one chunk column did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnStats {
    pub write: WriteSummary,
    pub prune: PruneSummary,
    /// Number of neighbours the column was smoothed against
    pub neighbors: usize,
}

/// Totals over many generated columns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub columns: usize,
    pub smoothed_columns: usize,
    pub water_blocks: usize,
    pub ice_blocks: usize,
    pub clusters_removed: usize,
    pub blocks_removed: usize,
    pub max_height: u16,
}

impl WorldStats {
    fn add(&mut self, stats: &ColumnStats) {
        self.columns += 1;
        if stats.neighbors > 0 {
            self.smoothed_columns += 1;
        }
        self.water_blocks += stats.write.water_blocks;
        self.ice_blocks += stats.write.ice_blocks;
        self.clusters_removed += stats.prune.clusters_removed;
        self.blocks_removed += stats.prune.blocks_removed;
        self.max_height = self.max_height.max(stats.write.y_max);
    }
}

pub struct TerrainWorld {
    generator: TerrainGenerator,
    context: GenerationContext,
    columns: HashMap<(i32, i32), ChunkColumn>,
    prune_floating: bool,
}

impl TerrainWorld {
    pub fn new(generator: TerrainGenerator) -> Self {
        let context = generator.new_context();
        Self {
            generator,
            context,
            columns: HashMap::new(),
            prune_floating: true,
        }
    }

    /// Skip the floating-block pass
    pub fn without_pruning(mut self) -> Self {
        self.prune_floating = false;
        self
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn get(&self, chunk_x: i32, chunk_z: i32) -> Option<&ChunkColumn> {
        self.columns.get(&(chunk_x, chunk_z))
    }

    pub fn contains(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.columns.contains_key(&(chunk_x, chunk_z))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &ChunkColumn> {
        self.columns.values()
    }

    /// Height maps of the generated neighbours of a chunk column
    pub fn neighbor_height_maps(&self, chunk_x: i32, chunk_z: i32) -> NeighborHeightMaps {
        let mut neighbors = NeighborHeightMaps::new();
        for direction in Cardinal::ALL {
            let (dx, dz) = direction.offset();
            if let Some(column) = self.columns.get(&(chunk_x + dx, chunk_z + dz)) {
                neighbors.set(direction, column.terrain_height_map.clone());
            }
        }
        neighbors
    }

    /// Generate a chunk column unless it already exists. Returns `None` if it did.
    pub fn generate(&mut self, chunk_x: i32, chunk_z: i32) -> Option<ColumnStats> {
        if self.contains(chunk_x, chunk_z) {
            return None;
        }

        let neighbors = self.neighbor_height_maps(chunk_x, chunk_z);
        let neighbor_count = Cardinal::ALL.iter().filter(|d| neighbors.get(**d).is_some()).count();

        let mut column = self.generator.new_chunk_column(chunk_x, chunk_z);
        let write = self.generator.generate(&mut self.context, &mut column, &neighbors);
        let prune = if self.prune_floating {
            prune_floating_blocks(&mut column, self.generator.sea_level())
        } else {
            PruneSummary::default()
        };
        if prune.clusters_removed > 0 {
            debug!(
                "Chunk column ({}, {}): pruned {} floating clusters ({} blocks)",
                chunk_x, chunk_z, prune.clusters_removed, prune.blocks_removed
            );
        }

        self.columns.insert((chunk_x, chunk_z), column);
        Some(ColumnStats {
            write,
            prune,
            neighbors: neighbor_count,
        })
    }

    /// Generate every column within `radius` chunks of a centre, row by row
    pub fn generate_area(&mut self, center_x: i32, center_z: i32, radius: i32) -> WorldStats {
        let mut stats = WorldStats::default();
        for chunk_z in center_z - radius..=center_z + radius {
            for chunk_x in center_x - radius..=center_x + radius {
                if let Some(column_stats) = self.generate(chunk_x, chunk_z) {
                    stats.add(&column_stats);
                }
            }
        }
        stats
    }

    /// Terrain height at a world block position, if its column exists
    pub fn terrain_height(&self, world_x: i64, world_z: i64) -> Option<u16> {
        let cs = self.generator.config().chunk_size as i64;
        let chunk_x = world_x.div_euclid(cs) as i32;
        let chunk_z = world_z.div_euclid(cs) as i32;
        let column = self.get(chunk_x, chunk_z)?;
        Some(column.terrain_height(world_x.rem_euclid(cs) as usize, world_z.rem_euclid(cs) as usize))
    }

    /// Block bounds `(min_x, min_z, max_x, max_z)` of the generated area, max exclusive
    pub fn block_bounds(&self) -> Option<(i64, i64, i64, i64)> {
        let cs = self.generator.config().chunk_size as i64;
        let min_x = self.columns.keys().map(|k| k.0).min()? as i64 * cs;
        let min_z = self.columns.keys().map(|k| k.1).min()? as i64 * cs;
        let max_x = (self.columns.keys().map(|k| k.0).max()? as i64 + 1) * cs;
        let max_z = (self.columns.keys().map(|k| k.1).max()? as i64 + 1) * cs;
        Some((min_x, min_z, max_x, max_z))
    }

    /// Terrain heights of the whole generated area, 0 where no column exists.
    /// Returns the map and the world position of its first cell.
    pub fn height_map(&self) -> Option<(Tilemap<u16>, i64, i64)> {
        let (min_x, min_z, max_x, max_z) = self.block_bounds()?;
        let mut map = Tilemap::new((max_x - min_x) as usize, (max_z - min_z) as usize);
        for z in min_z..max_z {
            for x in min_x..max_x {
                if let Some(height) = self.terrain_height(x, z) {
                    map.set((x - min_x) as usize, (z - min_z) as usize, height);
                }
            }
        }
        Some((map, min_x, min_z))
    }
}

//! Floating-block pruning
//!
//! Distortion and 3D noise occasionally leave tiny blobs of rock hanging in the air.
//! Starting from every block above sea level that has air a few blocks below it, a
//! bounded flood fill decides whether the blob is attached to something substantial.
//! Small blobs are removed; anything that reaches the size cap, or the edge of the
//! chunk column where support may continue next door, is left alone.

use std::collections::{HashSet, VecDeque};

use crate::chunk::{ChunkColumn, AIR};

/// A connected group of this many blocks is treated as supported terrain
pub const MAX_FLOATING_CLUSTER: usize = 20;

/// How far below a block to look for air
const AIR_PROBE_DEPTH: usize = 4;

const NEIGHBOURS: [(i32, i32, i32); 6] = [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub clusters_removed: usize,
    pub blocks_removed: usize,
    pub flood_fills: usize,
}

/// Buffers reused by every flood fill of one pruning pass
#[derive(Default)]
struct FillScratch {
    queue: VecDeque<(usize, usize, usize)>,
    visited: Vec<usize>,
    seen: HashSet<usize>,
}

impl FillScratch {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            visited: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }
}

/// Remove floating clusters of fewer than [`MAX_FLOATING_CLUSTER`] blocks above
/// `sea_level`. Height maps and `y_max` are brought up to date afterwards.
pub fn prune_floating_blocks(column: &mut ChunkColumn, sea_level: usize) -> PruneSummary {
    let cs = column.chunk_size;
    let map_height = column.map_height;
    let mut summary = PruneSummary::default();
    let mut resolved: HashSet<usize> = HashSet::new();
    let mut scratch = FillScratch::with_capacity(MAX_FLOATING_CLUSTER * 2);
    let mut touched_columns: HashSet<(usize, usize)> = HashSet::new();

    for y in sea_level.max(1)..map_height {
        for z in 0..cs {
            for x in 0..cs {
                let index = column.index(x, y, z);
                if column.block(x, y, z) == AIR || resolved.contains(&index) {
                    continue;
                }
                let air_below = (1..=AIR_PROBE_DEPTH)
                    .take_while(|&d| d <= y)
                    .any(|d| column.is_air(x, y - d, z));
                if !air_below {
                    continue;
                }

                summary.flood_fills += 1;
                if flood_fill(column, (x, y, z), &mut scratch) {
                    resolved.extend(scratch.visited.iter().copied());
                } else {
                    summary.clusters_removed += 1;
                    summary.blocks_removed += scratch.visited.len();
                    for &idx in &scratch.visited {
                        let (bx, by, bz) = unindex(idx, cs);
                        column.set_block(bx, by, bz, AIR);
                        touched_columns.insert((bx, bz));
                    }
                }
            }
        }
    }

    if !touched_columns.is_empty() {
        for (x, z) in touched_columns {
            refresh_heights(column, x, z);
        }
        column.y_max = column.rain_height_map.iter().copied().max().unwrap_or(0);
    }
    summary
}

/// Breadth-first fill over non-air blocks, leaving the reached blocks in
/// `scratch.visited`. Returns true (supported) at the size cap or the chunk edge.
fn flood_fill(column: &ChunkColumn, start: (usize, usize, usize), scratch: &mut FillScratch) -> bool {
    let cs = column.chunk_size as i32;
    let map_height = column.map_height as i32;
    let FillScratch { queue, visited, seen } = scratch;

    queue.clear();
    visited.clear();
    seen.clear();
    queue.push_back(start);
    seen.insert(column.index(start.0, start.1, start.2));

    while let Some((x, y, z)) = queue.pop_front() {
        visited.push(column.index(x, y, z));
        if visited.len() >= MAX_FLOATING_CLUSTER {
            return true;
        }
        if x == 0 || z == 0 || x as i32 == cs - 1 || z as i32 == cs - 1 {
            return true;
        }

        for (dx, dy, dz) in NEIGHBOURS {
            let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
            if ny < 0 || ny >= map_height {
                continue;
            }
            let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
            if column.block(nx, ny, nz) == AIR {
                continue;
            }
            if seen.insert(column.index(nx, ny, nz)) {
                queue.push_back((nx, ny, nz));
            }
        }
    }

    false
}

#[inline]
fn unindex(index: usize, chunk_size: usize) -> (usize, usize, usize) {
    let x = index % chunk_size;
    let z = (index / chunk_size) % chunk_size;
    let y = index / (chunk_size * chunk_size);
    (x, y, z)
}

fn refresh_heights(column: &mut ChunkColumn, x: usize, z: usize) {
    let mut terrain = 0;
    let mut rain = 0;
    for y in (0..column.map_height).rev() {
        let block = column.block(x, y, z);
        if rain == 0 && (block != AIR || column.fluid(x, y, z) != AIR) {
            rain = y;
        }
        if block != AIR {
            terrain = y;
            break;
        }
    }
    let idx = column.column_index(x, z);
    column.terrain_height_map[idx] = terrain as u16;
    column.rain_height_map[idx] = rain.max(terrain) as u16;
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROCK: u16 = 2;

    /// Flat ground up to y = 10 in a 16x16x64 column
    fn ground() -> ChunkColumn {
        let mut column = ChunkColumn::new(0, 0, 16, 64);
        for y in 0..=10 {
            column.fill_layer(y, ROCK);
        }
        column.recompute_terrain_heights();
        column.rain_height_map = column.terrain_height_map.clone();
        column.y_max = 10;
        column
    }

    /// A snake of `len` connected blocks hovering at y = 30, away from the chunk edge
    fn add_cluster(column: &mut ChunkColumn, len: usize) {
        let mut placed = 0;
        'outer: for z in 4..12 {
            for x in 4..12 {
                if placed == len {
                    break 'outer;
                }
                let x = if z % 2 == 0 { x } else { 15 - x };
                column.set_block(x, 30, z, ROCK);
                placed += 1;
            }
        }
    }

    #[test]
    fn test_nineteen_blocks_are_removed() {
        let mut column = ground();
        add_cluster(&mut column, 19);
        let summary = prune_floating_blocks(&mut column, 5);
        assert_eq!(summary.clusters_removed, 1);
        assert_eq!(summary.blocks_removed, 19);
        assert_eq!(column.count_blocks(ROCK), 16 * 16 * 11);
    }

    #[test]
    fn test_twenty_blocks_are_kept() {
        let mut column = ground();
        add_cluster(&mut column, 20);
        let summary = prune_floating_blocks(&mut column, 5);
        assert_eq!(summary.clusters_removed, 0);
        assert_eq!(column.count_blocks(ROCK), 16 * 16 * 11 + 20);

        let mut column = ground();
        add_cluster(&mut column, 45);
        prune_floating_blocks(&mut column, 5);
        assert_eq!(column.count_blocks(ROCK), 16 * 16 * 11 + 45);
    }

    #[test]
    fn test_separate_clusters_removed_in_one_pass() {
        let mut column = ground();
        add_cluster(&mut column, 6);
        // A long overhang on a pillar is scanned between the two floating blobs
        for y in 11..=35 {
            column.set_block(2, y, 2, ROCK);
        }
        for z in 3..=13 {
            column.set_block(2, 35, z, ROCK);
        }
        for x in 3..=12 {
            column.set_block(x, 35, 13, ROCK);
        }
        column.set_block(7, 40, 7, ROCK);
        column.set_block(7, 41, 7, ROCK);

        let summary = prune_floating_blocks(&mut column, 5);
        assert_eq!(summary.clusters_removed, 2);
        assert_eq!(summary.blocks_removed, 8);
        assert_eq!(column.block(7, 41, 7), AIR);
        assert_eq!(column.block(12, 35, 13), ROCK);
    }

    #[test]
    fn test_cluster_at_chunk_edge_is_kept() {
        let mut column = ground();
        column.set_block(0, 30, 7, ROCK);
        column.set_block(1, 30, 7, ROCK);
        prune_floating_blocks(&mut column, 5);
        assert_eq!(column.block(0, 30, 7), ROCK);
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let mut column = ground();
        add_cluster(&mut column, 7);
        // An overhang attached to a pillar stays
        for y in 11..=25 {
            column.set_block(12, y, 12, ROCK);
        }
        for x in 8..12 {
            column.set_block(x, 25, 12, ROCK);
        }
        let first = prune_floating_blocks(&mut column, 5);
        assert_eq!(first.clusters_removed, 1);
        let snapshot = column.clone();
        let second = prune_floating_blocks(&mut column, 5);
        assert_eq!(second.clusters_removed, 0);
        assert_eq!(column, snapshot);
        assert_eq!(column.block(8, 25, 12), ROCK);
    }

    #[test]
    fn test_heights_refresh_after_removal() {
        let mut column = ground();
        column.set_block(7, 40, 7, ROCK);
        column.terrain_height_map[7 * 16 + 7] = 40;
        column.rain_height_map[7 * 16 + 7] = 40;
        column.y_max = 40;
        prune_floating_blocks(&mut column, 5);
        assert_eq!(column.terrain_height(7, 7), 10);
        assert_eq!(column.y_max, 10);
    }
}

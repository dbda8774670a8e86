//! Border smoothing against already generated neighbours
//!
//! When a chunk column is generated next to one that already exists, the new
//! column's terrain is pulled toward the neighbour's edge heights so no cliff
//! appears along the shared border. The pull is strongest on the border row and
//! fades out toward the far side of the chunk.

use log::warn;

use crate::chunk::{Cardinal, NeighborHeightMaps};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeightedTaper {
    /// Height the terrain is pulled toward
    pub terrain_y_pos: f64,
    /// 0 = untouched, 1 = forced to `terrain_y_pos`
    pub weight: f64,
}

/// Fill `taper_map` (one entry per horizontal cell, `z * chunk_size + x`) from the
/// present neighbours. Diagonals are ignored when an adjacent straight neighbour
/// exists, since the straight one already covers that corner.
/// Height maps that do not cover a full chunk column are skipped with a warning.
pub fn compute_taper_map(neighbors: &NeighborHeightMaps, chunk_size: usize, taper_map: &mut [WeightedTaper]) {
    let cells = chunk_size * chunk_size;
    let usable = |dir: Cardinal| neighbors.get(dir).filter(|map| map.len() == cells);

    let active: Vec<(Cardinal, &[u16])> = Cardinal::ALL
        .iter()
        .filter_map(|&dir| match neighbors.get(dir) {
            Some(map) if map.len() != cells => {
                warn!(
                    "Ignoring {} neighbour height map of {} cells, expected {}",
                    dir,
                    map.len(),
                    cells
                );
                None
            }
            map => map.map(|map| (dir, map)),
        })
        .filter(|(dir, _)| match dir.adjacent_straights() {
            Some(straights) => straights.iter().all(|s| usable(*s).is_none()),
            None => true,
        })
        .collect();

    let last = chunk_size as f64 - 1.0;
    for lz in 0..chunk_size {
        for lx in 0..chunk_size {
            let mut weight: f64 = 0.0;
            let mut height_sum = 0.0;
            let mut inverse_sum = 0.0;

            for &(dir, map) in &active {
                let (dx, dz) = dir.offset();
                let dist_x = match dx {
                    1 => last - lx as f64,
                    -1 => lx as f64,
                    _ => 0.0,
                };
                let dist_z = match dz {
                    1 => last - lz as f64,
                    -1 => lz as f64,
                    _ => 0.0,
                };
                let distance = (dist_x * dist_x + dist_z * dist_z).sqrt();

                // Nearest cell on the neighbour's facing edge
                let nx = match dx {
                    1 => 0,
                    -1 => chunk_size - 1,
                    _ => lx,
                };
                let nz = match dz {
                    1 => 0,
                    -1 => chunk_size - 1,
                    _ => lz,
                };
                let edge_height = map[nz * chunk_size + nx] as f64;

                let falloff = 1.0 - (distance / chunk_size as f64).clamp(0.0, 1.0);
                weight = weight.max(falloff * falloff);

                let inverse = 1.0 / ((distance + 1.0) * (distance + 1.0));
                height_sum += edge_height * inverse;
                inverse_sum += inverse;
            }

            taper_map[lz * chunk_size + lx] = if inverse_sum > 0.0 {
                WeightedTaper {
                    terrain_y_pos: height_sum / inverse_sum,
                    weight,
                }
            } else {
                WeightedTaper::default()
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_neighbors_no_taper() {
        let mut taper = vec![WeightedTaper { terrain_y_pos: 5.0, weight: 0.3 }; 16];
        compute_taper_map(&NeighborHeightMaps::new(), 4, &mut taper);
        assert!(taper.iter().all(|t| t.weight == 0.0));
    }

    #[test]
    fn test_border_row_is_fully_weighted() {
        let mut neighbors = NeighborHeightMaps::new();
        let mut west = vec![50u16; 16];
        west[1 * 4 + 3] = 80;
        neighbors.set(Cardinal::West, west);
        let mut taper = vec![WeightedTaper::default(); 16];
        compute_taper_map(&neighbors, 4, &mut taper);

        assert_eq!(taper[1 * 4].weight, 1.0);
        assert_eq!(taper[1 * 4].terrain_y_pos, 80.0);
        assert_eq!(taper[0].terrain_y_pos, 50.0);
        // Fades toward the far side
        assert!(taper[1 * 4 + 3].weight < taper[1 * 4 + 1].weight);
        assert!(taper[1 * 4 + 3].weight > 0.0);
    }

    #[test]
    fn test_diagonal_suppressed_by_straight() {
        let mut neighbors = NeighborHeightMaps::new();
        neighbors.set(Cardinal::North, vec![40u16; 16]);
        neighbors.set(Cardinal::NorthEast, vec![200u16; 16]);
        let mut taper = vec![WeightedTaper::default(); 16];
        compute_taper_map(&neighbors, 4, &mut taper);
        assert!(taper.iter().all(|t| t.terrain_y_pos == 40.0));
    }

    #[test]
    fn test_wrongly_sized_neighbor_is_skipped() {
        let mut neighbors = NeighborHeightMaps::new();
        neighbors.set(Cardinal::West, vec![70u16; 9]);
        let mut taper = vec![WeightedTaper::default(); 16];
        compute_taper_map(&neighbors, 4, &mut taper);
        assert!(taper.iter().all(|t| t.weight == 0.0));

        // A bad straight neighbour does not hide a good diagonal
        neighbors.set(Cardinal::NorthWest, vec![30u16; 16]);
        compute_taper_map(&neighbors, 4, &mut taper);
        assert_eq!(taper[0].weight, 1.0);
        assert_eq!(taper[0].terrain_y_pos, 30.0);
    }

    #[test]
    fn test_lone_diagonal_pulls_corner() {
        let mut neighbors = NeighborHeightMaps::new();
        neighbors.set(Cardinal::SouthEast, vec![90u16; 16]);
        let mut taper = vec![WeightedTaper::default(); 16];
        compute_taper_map(&neighbors, 4, &mut taper);
        assert_eq!(taper[3 * 4 + 3].weight, 1.0);
        assert!(taper[0].weight < 0.1);
    }
}

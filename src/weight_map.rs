//! Lerped weighted index map
//!
//! Turns a discrete landform-index map into one that answers "how much of each
//! landform is here" for any fractional position. Every cell stores the normalised
//! histogram of indices within a square neighbourhood, and lookups blend the four
//! surrounding cells bilinearly. Transitions between landforms become gradual instead
//! of stepping at cell edges.

use crate::tilemap::{IntDataMap2D, Tilemap};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedIndex {
    pub index: usize,
    pub weight: f64,
}

#[derive(Clone, Debug)]
pub struct LerpedWeightedIndex2DMap {
    cells: Tilemap<Vec<WeightedIndex>>,
    top_left_padding: usize,
    index_count: usize,
}

impl LerpedWeightedIndex2DMap {
    /// Build from a padded index map. Indices at or above `index_count` are ignored.
    pub fn new(map: &IntDataMap2D, index_count: usize, smoothing_radius: usize) -> Self {
        let size = map.size;
        let radius = smoothing_radius as i64;
        let mut cells = Tilemap::new(size, size);
        let mut histogram = vec![0u32; index_count];

        for z in 0..size {
            for x in 0..size {
                histogram.fill(0);
                let mut total = 0u32;
                for dz in -radius..=radius {
                    for dx in -radius..=radius {
                        let sx = (x as i64 + dx).clamp(0, size as i64 - 1) as usize;
                        let sz = (z as i64 + dz).clamp(0, size as i64 - 1) as usize;
                        let value = map.get_int(sx, sz);
                        if value >= 0 && (value as usize) < index_count {
                            histogram[value as usize] += 1;
                            total += 1;
                        }
                    }
                }

                let weights: Vec<WeightedIndex> = histogram
                    .iter()
                    .enumerate()
                    .filter(|(_, &count)| count > 0)
                    .map(|(index, &count)| WeightedIndex {
                        index,
                        weight: count as f64 / total as f64,
                    })
                    .collect();
                cells.set(x, z, weights);
            }
        }

        Self {
            cells,
            top_left_padding: map.top_left_padding,
            index_count,
        }
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Sparse weights of the cell at an unpadded integer position
    pub fn cell(&self, x: i64, z: i64) -> &[WeightedIndex] {
        let size = self.cells.width as i64;
        let px = (x + self.top_left_padding as i64).clamp(0, size - 1) as usize;
        let pz = (z + self.top_left_padding as i64).clamp(0, size - 1) as usize;
        self.cells.get(px, pz)
    }

    /// Write the blended weight of every index at a fractional unpadded position into
    /// `out` (length `index_count`). Weights sum to 1 wherever the map has valid data.
    pub fn weights_at(&self, x: f64, z: f64, out: &mut [f64]) {
        out.fill(0.0);
        let x0 = x.floor();
        let z0 = z.floor();
        let fx = x - x0;
        let fz = z - z0;
        let (ix, iz) = (x0 as i64, z0 as i64);

        let corners = [
            (ix, iz, (1.0 - fx) * (1.0 - fz)),
            (ix + 1, iz, fx * (1.0 - fz)),
            (ix, iz + 1, (1.0 - fx) * fz),
            (ix + 1, iz + 1, fx * fz),
        ];
        for (cx, cz, factor) in corners {
            if factor == 0.0 {
                continue;
            }
            for w in self.cell(cx, cz) {
                out[w.index] += w.weight * factor;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_map() -> IntDataMap2D {
        // Left half index 0, right half index 1
        let mut map = IntDataMap2D::filled(8, 2, 0);
        for z in 0..map.size {
            for x in map.size / 2..map.size {
                map.set_int(x, z, 1);
            }
        }
        map
    }

    #[test]
    fn test_weights_are_normalised() {
        let weights_map = LerpedWeightedIndex2DMap::new(&split_map(), 2, 2);
        let mut out = vec![0.0; 2];
        for i in 0..40 {
            let x = i as f64 * 0.2;
            weights_map.weights_at(x, 3.3, &mut out);
            let sum: f64 = out.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum {} at x={}", sum, x);
        }
    }

    #[test]
    fn test_blend_near_border_and_pure_far_away() {
        let weights_map = LerpedWeightedIndex2DMap::new(&split_map(), 2, 1);
        let mut out = vec![0.0; 2];
        weights_map.weights_at(0.0, 4.0, &mut out);
        assert_eq!(out, vec![1.0, 0.0]);
        weights_map.weights_at(7.0, 4.0, &mut out);
        assert_eq!(out, vec![0.0, 1.0]);
        // Inner cells 3 and 4 sit either side of the split
        weights_map.weights_at(3.5, 4.0, &mut out);
        assert!((out[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_map_has_single_index() {
        let map = IntDataMap2D::filled(4, 1, 2);
        let weights_map = LerpedWeightedIndex2DMap::new(&map, 3, 2);
        assert_eq!(weights_map.cell(1, 1), &[WeightedIndex { index: 2, weight: 1.0 }]);
    }
}

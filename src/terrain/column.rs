//! Per-position solidity evaluation
//!
//! Every horizontal position of a chunk column is evaluated independently: blend the
//! landform octave tables, distort the sample position, derive the vertical offset
//! from oceanicity and upheaval, then walk Y upward deciding solid or air. The walk
//! skips noise evaluation wherever the analytical noise bounds already decide the
//! outcome, and stops at the first Y that is provably air.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::chunk::BlockId;
use crate::landform::{lerp, Landforms};
use crate::noise_layer::apply_isotropic_threshold;
use crate::tilemap::{bilerp, bilerp_packed_rgb};

use super::taper::WeightedTaper;
use super::TerrainGenerator;

/// Divisor turning the ceiling taper into a threshold offset, times `geo_upheaval_amplitude`
const GEO_TAPER_DIVISOR: f64 = 40.0;

/// Vertical offset below which the ceiling taper kicks in
const GEO_TAPER_MIN_DIST_Y: f64 = -2.0;

/// Wobble is only added this close (in blocks) to the taper height
const WOBBLE_RANGE: f64 = 10.0;

/// Raw horizontal distortion per degree of surface temperature offset
const TEMPERATURE_DISTORTION_DIVISOR: f64 = 20.0;

/// How a column is walked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnEvalMode {
    /// Bound shortcuts and break at the first provably-air Y
    #[default]
    Fast,
    /// Sample the noise at every Y with no shortcut or break
    Exhaustive,
}

/// Solidity of one horizontal position over the full world height
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnResult {
    pub solid: Vec<bool>,
    pub water_block: BlockId,
    /// Packed climate at this position
    pub climate: i32,
    /// Degrees added to the climate's surface temperature, from the distortion field
    pub temperature_offset: f32,
}

impl ColumnResult {
    pub fn new(map_height: usize) -> Self {
        Self {
            solid: vec![false; map_height],
            water_block: 0,
            climate: 0,
            temperature_offset: 0.0,
        }
    }

    pub fn top_solid(&self) -> Option<usize> {
        self.solid.iter().rposition(|&s| s)
    }
}

/// Per-layer agreement across every column of a chunk. Flags start true and are only
/// ever cleared while columns are evaluated.
pub struct LayerFlags {
    fully_solid: Vec<AtomicBool>,
    fully_empty: Vec<AtomicBool>,
}

impl LayerFlags {
    pub fn new(map_height: usize) -> Self {
        let flags = Self {
            fully_solid: (0..map_height).map(|_| AtomicBool::new(true)).collect(),
            fully_empty: (0..map_height).map(|_| AtomicBool::new(true)).collect(),
        };
        flags.reset();
        flags
    }

    /// Back to "every layer could still be fully solid and fully empty". The top
    /// layer is never evaluated and always air.
    pub fn reset(&self) {
        for flag in self.fully_solid.iter().chain(&self.fully_empty) {
            flag.store(true, Ordering::Relaxed);
        }
        if let Some(top) = self.fully_solid.last() {
            top.store(false, Ordering::Relaxed);
        }
    }

    pub fn len(&self) -> usize {
        self.fully_solid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fully_solid.is_empty()
    }

    #[inline]
    pub fn mark_not_solid(&self, y: usize) {
        self.fully_solid[y].store(false, Ordering::Relaxed);
    }

    /// Layer `y` and everything above it has air somewhere
    pub fn mark_not_solid_from(&self, y: usize) {
        for flag in &self.fully_solid[y..] {
            flag.store(false, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn mark_not_empty(&self, y: usize) {
        self.fully_empty[y].store(false, Ordering::Relaxed);
    }

    pub fn is_fully_solid(&self, y: usize) -> bool {
        self.fully_solid[y].load(Ordering::Relaxed)
    }

    pub fn is_fully_empty(&self, y: usize) -> bool {
        self.fully_empty[y].load(Ordering::Relaxed)
    }
}

/// Values sampled once per chunk at its four corners, in the order
/// top-left, top-right, bottom-left, bottom-right (x grows right, z grows down).
#[derive(Clone, Debug)]
pub struct ChunkCorners {
    pub landform_weights: [Vec<f64>; 4],
    pub amplitudes: [Vec<f64>; 4],
    pub thresholds: [Vec<f64>; 4],
    pub climate: [i32; 4],
    pub ocean: [f64; 4],
    pub upheaval: [f64; 4],
}

#[derive(Default)]
struct ColumnScratch {
    amplitudes: Vec<f64>,
    thresholds: Vec<f64>,
    weights: Vec<f64>,
}

impl ColumnScratch {
    fn prepare(&mut self, octave_count: usize, landform_count: usize) {
        if self.amplitudes.len() != octave_count {
            self.amplitudes.resize(octave_count, 0.0);
            self.thresholds.resize(octave_count, 0.0);
        }
        if self.weights.len() != landform_count {
            self.weights.resize(landform_count, 0.0);
        }
    }
}

thread_local! {
    /// Blended octave tables and landform weights of the column a worker is on.
    /// Allocated once per thread, never shared.
    static COLUMN_SCRATCH: RefCell<ColumnScratch> = RefCell::new(ColumnScratch::default());
}

#[inline]
fn bilerp_into(out: &mut [f64], corners: &[Vec<f64>; 4], fx: f64, fz: f64) {
    for (i, value) in out.iter_mut().enumerate() {
        *value = bilerp(corners[0][i], corners[1][i], corners[2][i], corners[3][i], fx, fz);
    }
}

/// Landform-weighted inverted threshold at `y`, read `dist_y` blocks higher up the
/// per-landform curves.
#[inline]
pub fn landform_threshold(landforms: &Landforms, weights: &[f64], y: usize, dist_y: f64, map_height: usize) -> f64 {
    let position = y as f64 + dist_y;
    let base = position.floor().clamp(0.0, (map_height - 2) as f64) as usize;
    let slide = dist_y - dist_y.floor();

    let mut threshold = 0.0;
    for (variant, &weight) in landforms.iter().zip(weights) {
        if weight == 0.0 {
            continue;
        }
        let curve = &variant.terrain_y_thresholds;
        threshold += weight * lerp(curve[base], curve[base + 1], slide);
    }
    threshold
}

/// Ceiling taper for strongly upheaved columns: pushes the threshold up near the top
/// of the world so raised terrain thins out instead of hitting the ceiling.
#[inline]
pub fn geo_taper(threshold: f64, y: usize, dist_y: f64, taper_threshold: f64, map_height: usize, geo_upheaval_amplitude: f64) -> f64 {
    let yf = y as f64;
    if yf <= taper_threshold || dist_y >= GEO_TAPER_MIN_DIST_Y {
        return threshold;
    }
    let amount = (-dist_y).clamp(yf - map_height as f64, yf);
    threshold + (yf - taper_threshold) * amount / (GEO_TAPER_DIVISOR * geo_upheaval_amplitude)
}

impl TerrainGenerator {
    /// Evaluate one horizontal position of a chunk column into `result`, clearing the
    /// matching layer flags.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn evaluate_column(
        &self,
        corners: &ChunkCorners,
        taper: Option<&WeightedTaper>,
        chunk_x: i32,
        chunk_z: i32,
        lx: usize,
        lz: usize,
        mode: ColumnEvalMode,
        flags: &LayerFlags,
        result: &mut ColumnResult,
    ) {
        COLUMN_SCRATCH.with(|scratch| {
            let mut scratch = scratch.borrow_mut();
            scratch.prepare(self.landforms.octave_count(), self.landforms.len());
            let ColumnScratch { amplitudes, thresholds, weights } = &mut *scratch;
            self.evaluate_with_scratch(
                corners, taper, chunk_x, chunk_z, lx, lz, mode, flags, result, amplitudes, thresholds, weights,
            );
        });
    }

    #[allow(clippy::too_many_arguments, clippy::neg_cmp_op_on_partial_ord)]
    fn evaluate_with_scratch(
        &self,
        corners: &ChunkCorners,
        taper: Option<&WeightedTaper>,
        chunk_x: i32,
        chunk_z: i32,
        lx: usize,
        lz: usize,
        mode: ColumnEvalMode,
        flags: &LayerFlags,
        result: &mut ColumnResult,
        amplitudes: &mut [f64],
        thresholds: &mut [f64],
        weights: &mut [f64],
    ) {
        let cs = self.chunk_size;
        let map_height = self.map_height;
        let fx = lx as f64 / cs as f64;
        let fz = lz as f64 / cs as f64;

        bilerp_into(amplitudes, &corners.amplitudes, fx, fz);
        bilerp_into(thresholds, &corners.thresholds, fx, fz);
        bilerp_into(weights, &corners.landform_weights, fx, fz);

        let world_x = (chunk_x as i64 * cs as i64 + lx as i64) as f64;
        let world_z = (chunk_z as i64 * cs as i64 + lz as i64) as f64;

        // Horizontal distortion, one raw vector shaped two ways
        let config = &self.config;
        let max_dist = self.distortion.max_amount();
        let dist = self.distortion.sample(world_x, world_z);
        let dist_terrain = apply_isotropic_threshold(
            dist * config.terrain_distortion_multiplier,
            config.terrain_distortion_threshold,
            max_dist * config.terrain_distortion_multiplier,
        );
        let dist_geo = apply_isotropic_threshold(
            dist * config.geo_distortion_multiplier,
            config.geo_distortion_threshold,
            max_dist * config.geo_distortion_multiplier,
        );

        // Vertical offset: oceanicity sinks land, upheaval lifts or sinks it
        let ocean = bilerp(corners.ocean[0], corners.ocean[1], corners.ocean[2], corners.ocean[3], fx, fz);
        let oceanicity = ocean * self.oceanicity_factor;
        let upheaval_strength = bilerp(
            corners.upheaval[0],
            corners.upheaval[1],
            corners.upheaval[2],
            corners.upheaval[3],
            fx,
            fz,
        );
        let upheaval_noise = self
            .geo_upheaval_noise
            .noise_2d(world_x + dist_geo.x, world_z + dist_geo.z);
        let dist_y = oceanicity + upheaval_strength * (0.5 - upheaval_noise);

        result.solid.fill(false);
        result.water_block = if oceanicity > 1.0 {
            self.block_ids.salt_water
        } else {
            self.block_ids.water
        };
        result.climate = bilerp_packed_rgb(
            corners.climate[0],
            corners.climate[1],
            corners.climate[2],
            corners.climate[3],
            fx,
            fz,
        );
        result.temperature_offset = (dist.x / TEMPERATURE_DISTORTION_DIVISOR) as f32;

        let column = self.terrain_noise.for_column(
            config.vertical_noise_relative_frequency,
            amplitudes,
            thresholds,
            world_x + dist_terrain.x,
            world_z + dist_terrain.z,
        );
        let taper = taper.filter(|t| t.weight > 0.0);

        for y in 1..map_height - 1 {
            let mut threshold = landform_threshold(&self.landforms, weights, y, dist_y, map_height);
            threshold = geo_taper(
                threshold,
                y,
                dist_y,
                self.upheaval_taper_threshold,
                map_height,
                config.geo_upheaval_amplitude,
            );

            if let Some(taper) = taper {
                let yf = y as f64;
                let target = if yf <= taper.terrain_y_pos { -1.0 } else { 1.0 };
                let y_diff = (yf - taper.terrain_y_pos).abs();
                let mut wobble = if y_diff > WOBBLE_RANGE {
                    0.0
                } else {
                    self.distortion.wobble(-world_x / 10.0, yf / 10.0, -world_z / 10.0) / (y_diff / 2.0).max(1.0)
                };
                wobble *= (2.0 * (1.0 - taper.weight)).clamp(0.0, 1.0) * 0.1;
                threshold = lerp(threshold, target + wobble, taper.weight);
            }

            let solid = match mode {
                ColumnEvalMode::Fast => {
                    if threshold <= column.bound_min {
                        true
                    } else if !(threshold < column.bound_max) {
                        // Provably air here; the threshold never drops back into
                        // solid range above this point
                        flags.mark_not_solid_from(y);
                        break;
                    } else {
                        column.noise_sign(y as f64, threshold) > 0.0
                    }
                }
                ColumnEvalMode::Exhaustive => column.noise_sign(y as f64, threshold) > 0.0,
            };

            if solid {
                result.solid[y] = true;
                flags.mark_not_empty(y);
            } else {
                flags.mark_not_solid(y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landform::LandformVariant;

    fn single_landform(positions: Vec<f64>, keys: Vec<f64>, height: usize) -> Landforms {
        let variant: LandformVariant = serde_json::from_value(serde_json::json!({
            "code": "test",
            "terrain_octaves": [0.6, 0.3, 0.1],
            "terrain_y_key_positions": positions,
            "terrain_y_key_thresholds": keys,
        }))
        .unwrap();
        Landforms::init(vec![variant], height, 4).unwrap()
    }

    #[test]
    fn test_landform_threshold_reads_offset_curve() {
        let landforms = single_landform(vec![0.0, 1.0], vec![1.0, 0.0], 128);
        let curve = landforms.get(0).unwrap().terrain_y_thresholds.clone();
        let t = landform_threshold(&landforms, &[1.0], 40, 0.0, 128);
        assert_eq!(t, curve[40]);
        let t = landform_threshold(&landforms, &[1.0], 40, 10.5, 128);
        assert!((t - lerp(curve[50], curve[51], 0.5)).abs() < 1e-12);
        // Clamped below the world
        let t = landform_threshold(&landforms, &[1.0], 5, -50.0, 128);
        assert_eq!(t, curve[0]);
    }

    #[test]
    fn test_geo_taper_only_near_ceiling() {
        assert_eq!(geo_taper(0.3, 100, -50.0, 230.0, 256, 255.0), 0.3);
        assert_eq!(geo_taper(0.3, 240, 5.0, 230.0, 256, 255.0), 0.3);
        let tapered = geo_taper(0.3, 240, -50.0, 230.0, 256, 255.0);
        assert!((tapered - (0.3 + 10.0 * 50.0 / (40.0 * 255.0))).abs() < 1e-12);
    }

    #[test]
    fn test_layer_flags_only_clear() {
        let flags = LayerFlags::new(8);
        assert!(flags.is_fully_solid(3));
        assert!(!flags.is_fully_solid(7));
        flags.mark_not_solid(3);
        flags.mark_not_empty(2);
        assert!(!flags.is_fully_solid(3));
        assert!(!flags.is_fully_empty(2));
        flags.mark_not_solid_from(5);
        assert!(!flags.is_fully_solid(5) && !flags.is_fully_solid(6));
        assert!(flags.is_fully_solid(4));
    }

    #[test]
    fn test_top_solid() {
        let mut result = ColumnResult::new(10);
        assert_eq!(result.top_solid(), None);
        result.solid[3] = true;
        result.solid[6] = true;
        assert_eq!(result.top_solid(), Some(6));
    }
}

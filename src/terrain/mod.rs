//! Terrain density and solidity engine
//!
//! One call generates one chunk column:
//!
//! 1. Serial setup: border taper from neighbour height maps, landform weights and
//!    octave tables at the four chunk corners, climate/ocean/upheaval corners.
//! 2. Parallel section: every horizontal position walks its column on the
//!    generator's bounded thread pool ([`column`]).
//! 3. Join, then the serial write pass ([`writer`]).

pub mod column;
pub mod taper;
pub mod writer;

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::chunk::{BlockIds, BlockRegistry, ChunkColumn, NeighborHeightMaps};
use crate::config::WorldGenConfig;
use crate::error::{Result, TerrainError};
use crate::landform::{LandformVariant, Landforms};
use crate::noise_layer::{DistortionNoise, NormalizedSimplexFractalNoise, NormalizedSimplexNoise};
use crate::region::{MapRegion, NoiseRegionMaps, RegionCache, RegionMapProvider};
use crate::seeds::TerrainSeeds;
use crate::tilemap::{bilerp_packed_rgb, IntDataMap2D};
use crate::weight_map::LerpedWeightedIndex2DMap;

pub use column::{ChunkCorners, ColumnEvalMode, ColumnResult, LayerFlags};
pub use taper::{compute_taper_map, WeightedTaper};
pub use writer::{write_chunk_column, WriteSummary};

/// Corner order shared with [`ChunkCorners`]
const CORNER_OFFSETS: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Scratch reused across chunk column generations. Sized for one generator.
pub struct GenerationContext {
    column_results: Vec<ColumnResult>,
    layer_flags: LayerFlags,
    taper_map: Vec<WeightedTaper>,
}

impl GenerationContext {
    pub fn new(chunk_size: usize, map_height: usize) -> Self {
        let cells = chunk_size * chunk_size;
        Self {
            column_results: (0..cells).map(|_| ColumnResult::new(map_height)).collect(),
            layer_flags: LayerFlags::new(map_height),
            taper_map: vec![WeightedTaper::default(); cells],
        }
    }

    /// Column results of the last generation, `z * chunk_size + x`
    pub fn column_results(&self) -> &[ColumnResult] {
        &self.column_results
    }

    pub fn layer_flags(&self) -> &LayerFlags {
        &self.layer_flags
    }

    pub fn taper_map(&self) -> &[WeightedTaper] {
        &self.taper_map
    }
}

pub struct TerrainGenerator {
    pub(crate) config: WorldGenConfig,
    pub(crate) seeds: TerrainSeeds,
    pub(crate) landforms: Arc<Landforms>,
    pub(crate) block_ids: BlockIds,
    pub(crate) map_height: usize,
    pub(crate) chunk_size: usize,
    pub(crate) sea_level: usize,
    pub(crate) region_chunk_size: usize,
    pub(crate) oceanicity_factor: f64,
    pub(crate) upheaval_taper_threshold: f64,
    pub(crate) terrain_noise: NormalizedSimplexFractalNoise,
    pub(crate) distortion: DistortionNoise,
    pub(crate) geo_upheaval_noise: NormalizedSimplexNoise,
    provider: Arc<dyn RegionMapProvider>,
    regions: RegionCache<MapRegion>,
    landform_weight_maps: RegionCache<LerpedWeightedIndex2DMap>,
    pool: ThreadPool,
    eval_mode: ColumnEvalMode,
    bulk_layers: bool,
}

impl TerrainGenerator {
    /// Set up noise, caches and the worker pool. `landforms` must have been
    /// initialized for this config's height and octave count.
    pub fn new(
        config: WorldGenConfig,
        seeds: TerrainSeeds,
        landforms: Arc<Landforms>,
        block_ids: BlockIds,
        provider: Arc<dyn RegionMapProvider>,
    ) -> Result<Self> {
        config.validate()?;
        let octave_count = config.terrain_octave_count();
        if landforms.octave_count() != octave_count {
            return Err(TerrainError::InvalidConfig(format!(
                "landforms were initialized with {} octaves, world uses {}",
                landforms.octave_count(),
                octave_count
            )));
        }
        if let Some(variant) = landforms.iter().find(|v| v.terrain_y_thresholds.len() != config.map_height) {
            return Err(TerrainError::InvalidConfig(format!(
                "landform '{}' was initialized for height {}, world height is {}",
                variant.code,
                variant.terrain_y_thresholds.len(),
                config.map_height
            )));
        }

        let threads = config.worker_threads();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("terrain-gen-{}", i))
            .build()?;

        info!(
            "Terrain generator ready: seed {}, height {}, sea level {}, {} landforms, {} octaves, {} worker threads",
            seeds.master,
            config.map_height,
            config.sea_level(),
            landforms.len(),
            octave_count,
            threads
        );

        Ok(Self {
            map_height: config.map_height,
            chunk_size: config.chunk_size,
            sea_level: config.sea_level(),
            region_chunk_size: config.region_chunk_size(),
            oceanicity_factor: config.oceanicity_factor(),
            upheaval_taper_threshold: config.upheaval_taper_threshold(),
            terrain_noise: NormalizedSimplexFractalNoise::new(octave_count, config.terrain_noise_frequency, seeds.terrain),
            distortion: DistortionNoise::new(
                &config.distortion_amplitudes,
                &config.distortion_frequencies,
                seeds.distort_x,
                seeds.distort_z,
            ),
            geo_upheaval_noise: NormalizedSimplexNoise::from_default_octaves(
                config.upheaval_octaves,
                config.upheaval_frequency,
                config.upheaval_persistence,
                seeds.upheaval,
            ),
            provider,
            regions: RegionCache::new(),
            landform_weight_maps: RegionCache::new(),
            pool,
            eval_mode: ColumnEvalMode::Fast,
            bulk_layers: true,
            config,
            seeds,
            landforms,
            block_ids,
        })
    }

    /// Generator over noise-synthesised region maps with the default block registry
    pub fn from_variants(config: WorldGenConfig, seed: u64, variants: Vec<LandformVariant>) -> Result<Self> {
        config.validate()?;
        let seeds = TerrainSeeds::from_master(seed);
        let landforms = Arc::new(Landforms::init(variants, config.map_height, config.terrain_octave_count())?);
        let block_ids = BlockIds::resolve(&BlockRegistry::default())?;
        let provider = Arc::new(NoiseRegionMaps::new(&config, &seeds, landforms.clone()));
        Self::new(config, seeds, landforms, block_ids, provider)
    }

    pub fn with_eval_mode(mut self, mode: ColumnEvalMode) -> Self {
        self.eval_mode = mode;
        self
    }

    /// Disable to write every layer column by column
    pub fn with_bulk_layers(mut self, bulk_layers: bool) -> Self {
        self.bulk_layers = bulk_layers;
        self
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    pub fn seeds(&self) -> &TerrainSeeds {
        &self.seeds
    }

    pub fn landforms(&self) -> &Landforms {
        &self.landforms
    }

    pub fn block_ids(&self) -> &BlockIds {
        &self.block_ids
    }

    pub fn sea_level(&self) -> usize {
        self.sea_level
    }

    pub fn new_context(&self) -> GenerationContext {
        GenerationContext::new(self.chunk_size, self.map_height)
    }

    pub fn new_chunk_column(&self, chunk_x: i32, chunk_z: i32) -> ChunkColumn {
        ChunkColumn::new(chunk_x, chunk_z, self.chunk_size, self.map_height)
    }

    /// Region maps for a region coordinate, generated on first use
    pub fn region(&self, region_x: i32, region_z: i32) -> Arc<MapRegion> {
        self.regions
            .get_or_insert_with((region_x, region_z), || self.provider.generate(region_x, region_z))
    }

    fn landform_weight_map(&self, region_x: i32, region_z: i32, region: &MapRegion) -> Arc<LerpedWeightedIndex2DMap> {
        self.landform_weight_maps.get_or_insert_with((region_x, region_z), || {
            LerpedWeightedIndex2DMap::new(
                &region.landform_map,
                self.landforms.len(),
                self.config.landform_smoothing_radius,
            )
        })
    }

    /// Region coordinate and chunk position inside it
    pub fn region_of_chunk(&self, chunk_x: i32, chunk_z: i32) -> ((i32, i32), (i32, i32)) {
        let rcs = self.region_chunk_size as i32;
        (
            (chunk_x.div_euclid(rcs), chunk_z.div_euclid(rcs)),
            (chunk_x.rem_euclid(rcs), chunk_z.rem_euclid(rcs)),
        )
    }

    /// Sample every per-chunk input at the four chunk corners
    pub fn sample_corners(&self, chunk_x: i32, chunk_z: i32) -> ChunkCorners {
        let ((region_x, region_z), (rl_x, rl_z)) = self.region_of_chunk(chunk_x, chunk_z);
        let region = self.region(region_x, region_z);
        let weight_map = self.landform_weight_map(region_x, region_z, &region);

        let rcs = self.region_chunk_size as f64;
        let landform_step = region.landform_map.inner_size() as f64 / rcs;
        let climate_step = region.climate_map.inner_size() as f64 / rcs;
        let landform_count = self.landforms.len();
        let octave_count = self.landforms.octave_count();

        let landform_weights = CORNER_OFFSETS.map(|(dx, dz)| {
            let mut weights = vec![0.0; landform_count];
            weight_map.weights_at(
                (rl_x + dx) as f64 * landform_step,
                (rl_z + dz) as f64 * landform_step,
                &mut weights,
            );
            weights
        });

        let mut amplitudes: [Vec<f64>; 4] = Default::default();
        let mut thresholds: [Vec<f64>; 4] = Default::default();
        for corner in 0..4 {
            amplitudes[corner] = vec![0.0; octave_count];
            thresholds[corner] = vec![0.0; octave_count];
            self.landforms
                .blend_octaves(&landform_weights[corner], &mut amplitudes[corner], &mut thresholds[corner]);
        }

        let climate_pos = |(dx, dz): (i32, i32)| ((rl_x + dx) as f64 * climate_step, (rl_z + dz) as f64 * climate_step);

        ChunkCorners {
            climate: CORNER_OFFSETS.map(|offset| {
                let (x, z) = climate_pos(offset);
                lerped_packed(&region.climate_map, x, z)
            }),
            ocean: CORNER_OFFSETS.map(|offset| {
                let (x, z) = climate_pos(offset);
                region.ocean_map.lerped_unpadded(x, z)
            }),
            upheaval: CORNER_OFFSETS.map(|offset| {
                let (x, z) = climate_pos(offset);
                region.upheaval_map.lerped_unpadded(x, z)
            }),
            landform_weights,
            amplitudes,
            thresholds,
        }
    }

    /// Evaluate the solidity of every position of a chunk column into `ctx` without
    /// writing blocks.
    pub fn evaluate_chunk(
        &self,
        ctx: &mut GenerationContext,
        chunk_x: i32,
        chunk_z: i32,
        neighbors: &NeighborHeightMaps,
        mode: ColumnEvalMode,
    ) {
        let cs = self.chunk_size;
        let corners = self.sample_corners(chunk_x, chunk_z);
        let smoothing = neighbors.requires_border_smoothing();
        if smoothing {
            compute_taper_map(neighbors, cs, &mut ctx.taper_map);
        }
        ctx.layer_flags.reset();

        let GenerationContext {
            column_results,
            layer_flags,
            taper_map,
        } = ctx;
        let flags: &LayerFlags = layer_flags;
        let tapers: &[WeightedTaper] = taper_map;

        // Returns once every column is done
        self.pool.install(|| {
            column_results.par_iter_mut().enumerate().for_each(|(index, result)| {
                let taper = if smoothing { Some(&tapers[index]) } else { None };
                self.evaluate_column(&corners, taper, chunk_x, chunk_z, index % cs, index / cs, mode, flags, result);
            });
        });
    }

    /// Generate terrain for `column` (which must match this generator's dimensions)
    pub fn generate(
        &self,
        ctx: &mut GenerationContext,
        column: &mut ChunkColumn,
        neighbors: &NeighborHeightMaps,
    ) -> WriteSummary {
        debug_assert_eq!(column.chunk_size, self.chunk_size);
        debug_assert_eq!(column.map_height, self.map_height);

        self.evaluate_chunk(ctx, column.chunk_x, column.chunk_z, neighbors, self.eval_mode);
        let summary = write_chunk_column(
            column,
            &ctx.column_results,
            &ctx.layer_flags,
            &self.block_ids,
            self.sea_level,
            self.config.water_freezing_temperature,
            self.bulk_layers,
        );

        debug!(
            "Chunk column ({}, {}): y_base {}, y_top {}, y_max {}, {} water, {} ice, smoothing {}",
            column.chunk_x,
            column.chunk_z,
            summary.y_base,
            summary.y_top,
            summary.y_max,
            summary.water_blocks,
            summary.ice_blocks,
            neighbors.requires_border_smoothing()
        );
        summary
    }

    /// Allocate a context and a column and generate it
    pub fn generate_column(&self, chunk_x: i32, chunk_z: i32, neighbors: &NeighborHeightMaps) -> ChunkColumn {
        let mut ctx = self.new_context();
        let mut column = self.new_chunk_column(chunk_x, chunk_z);
        self.generate(&mut ctx, &mut column, neighbors);
        column
    }
}

/// Packed climate at a fractional unpadded map position
fn lerped_packed(map: &IntDataMap2D, x: f64, z: f64) -> i32 {
    let x0 = x.floor();
    let z0 = z.floor();
    let (ix, iz) = (x0 as i64, z0 as i64);
    bilerp_packed_rgb(
        map.get_unpadded_int(ix, iz),
        map.get_unpadded_int(ix + 1, iz),
        map.get_unpadded_int(ix, iz + 1),
        map.get_unpadded_int(ix + 1, iz + 1),
        x - x0,
        z - z0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Cardinal, AIR};
    use crate::region::{pack_climate, UniformRegionMaps};

    const SCENARIO_SEED: u64 = 1239123912;

    fn small_config() -> WorldGenConfig {
        WorldGenConfig {
            map_height: 128,
            chunk_size: 16,
            region_size: 256,
            max_threads: Some(2),
            ..Default::default()
        }
    }

    fn default_generator(config: WorldGenConfig, seed: u64) -> TerrainGenerator {
        TerrainGenerator::from_variants(config, seed, Landforms::default_variants().unwrap()).unwrap()
    }

    /// Single "plains" landform with a linear threshold, no distortion, no upheaval
    fn plains_generator(sea_level: usize) -> TerrainGenerator {
        let config = WorldGenConfig {
            map_height: 256,
            sea_level: Some(sea_level),
            distortion_amplitudes: vec![0.0; 4],
            max_threads: Some(2),
            ..Default::default()
        };
        let variant: LandformVariant = serde_json::from_value(serde_json::json!({
            "code": "plains",
            "terrain_octaves": [0.0],
            "terrain_y_key_positions": [0.0, 1.0],
            "terrain_y_key_thresholds": [1.0, 0.0],
        }))
        .unwrap();
        let seeds = TerrainSeeds::from_master(SCENARIO_SEED);
        let landforms = Arc::new(Landforms::init(vec![variant], 256, config.terrain_octave_count()).unwrap());
        let block_ids = BlockIds::resolve(&BlockRegistry::default()).unwrap();
        let provider = Arc::new(UniformRegionMaps::new(&config).with_climate(pack_climate(150, 120, 120)));
        TerrainGenerator::new(config, seeds, landforms, block_ids, provider).unwrap()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = default_generator(small_config(), 42);
        let b = default_generator(small_config(), 42);
        let first = a.generate_column(3, -2, &NeighborHeightMaps::new());
        let second = b.generate_column(3, -2, &NeighborHeightMaps::new());
        assert_eq!(first, second);

        // Same again with border smoothing data present
        let mut neighbors = NeighborHeightMaps::new();
        neighbors.set(Cardinal::West, a.generate_column(2, -2, &NeighborHeightMaps::new()).terrain_height_map);
        assert_eq!(a.generate_column(3, -2, &neighbors), b.generate_column(3, -2, &neighbors));
    }

    #[test]
    fn test_context_reuse_matches_fresh() {
        let generator = default_generator(small_config(), 9);
        let mut ctx = generator.new_context();
        let mut scratch_column = generator.new_chunk_column(0, 0);
        generator.generate(&mut ctx, &mut scratch_column, &NeighborHeightMaps::new());

        let mut reused = generator.new_chunk_column(5, 1);
        generator.generate(&mut ctx, &mut reused, &NeighborHeightMaps::new());
        assert_eq!(reused, generator.generate_column(5, 1, &NeighborHeightMaps::new()));
    }

    #[test]
    fn test_early_exit_matches_exhaustive() {
        let generator = default_generator(small_config(), 1234);
        let mut fast = generator.new_context();
        let mut full = generator.new_context();
        for (cx, cz) in [(0, 0), (7, -3), (-12, 20), (40, 41)] {
            let none = NeighborHeightMaps::new();
            generator.evaluate_chunk(&mut fast, cx, cz, &none, ColumnEvalMode::Fast);
            generator.evaluate_chunk(&mut full, cx, cz, &none, ColumnEvalMode::Exhaustive);
            for (index, (a, b)) in fast.column_results().iter().zip(full.column_results()).enumerate() {
                // Covers both the solid shortcut and the break: nothing the exhaustive
                // walk finds solid above the break point
                assert_eq!(a.solid, b.solid, "chunk ({}, {}) cell {}", cx, cz, index);
            }
        }
    }

    #[test]
    fn test_nan_threshold_is_air_in_both_modes() {
        let mut generator = default_generator(small_config(), 1234);
        // NaN vertical offset turns every threshold into NaN
        generator.oceanicity_factor = f64::NAN;
        let none = NeighborHeightMaps::new();

        for mode in [ColumnEvalMode::Fast, ColumnEvalMode::Exhaustive] {
            let mut ctx = generator.new_context();
            generator.evaluate_chunk(&mut ctx, 2, -1, &none, mode);
            for (index, result) in ctx.column_results().iter().enumerate() {
                assert_eq!(result.top_solid(), None, "{:?} cell {}", mode, index);
            }
            for y in 1..128 {
                assert!(!ctx.layer_flags().is_fully_solid(y), "{:?} y {}", mode, y);
            }
        }

        let column = generator.generate_column(2, -1, &none);
        assert_eq!(column.count_blocks(generator.block_ids().rock), 0);
        assert!(column.terrain_height_map.iter().all(|&h| h == 0));
    }

    #[test]
    fn test_temperature_offset_follows_distortion() {
        let generator = default_generator(small_config(), 17);
        let mut ctx = generator.new_context();
        generator.evaluate_chunk(&mut ctx, 0, 0, &NeighborHeightMaps::new(), ColumnEvalMode::Fast);
        let limit = (generator.distortion.max_amount() / 20.0) as f32 + 1e-6;
        let offsets: Vec<f32> = ctx.column_results().iter().map(|r| r.temperature_offset).collect();
        assert!(offsets.iter().all(|o| o.abs() <= limit));
        assert!(offsets.iter().any(|&o| o != offsets[0]));

        // Without distortion the freeze line follows the climate map alone
        let plains = plains_generator(100);
        let mut ctx = plains.new_context();
        plains.evaluate_chunk(&mut ctx, 0, 0, &NeighborHeightMaps::new(), ColumnEvalMode::Fast);
        assert!(ctx.column_results().iter().all(|r| r.temperature_offset == 0.0));
    }

    #[test]
    fn test_bulk_write_matches_column_writes() {
        let bulk = default_generator(small_config(), 77);
        let slow = default_generator(small_config(), 77).with_bulk_layers(false);
        for (cx, cz) in [(0, 0), (-4, 9)] {
            let none = NeighborHeightMaps::new();
            assert_eq!(bulk.generate_column(cx, cz, &none), slow.generate_column(cx, cz, &none));
        }
    }

    #[test]
    fn test_bulk_layers_are_used() {
        // Dry plains: nothing pushes the ground down, so the lowest layers are solid everywhere
        let config = small_config();
        let seeds = TerrainSeeds::from_master(5);
        let landforms = Arc::new(
            Landforms::init(Landforms::default_variants().unwrap(), 128, config.terrain_octave_count()).unwrap(),
        );
        let block_ids = BlockIds::resolve(&BlockRegistry::default()).unwrap();
        let provider = Arc::new(UniformRegionMaps::new(&config));
        let generator = TerrainGenerator::new(config, seeds, landforms, block_ids, provider).unwrap();
        let mut ctx = generator.new_context();
        let mut column = generator.new_chunk_column(1, 1);
        let summary = generator.generate(&mut ctx, &mut column, &NeighborHeightMaps::new());
        assert!(summary.y_base > 1);
        assert!(summary.y_top < 128);
        for y in 1..summary.y_base {
            assert!(ctx.layer_flags().is_fully_solid(y));
        }
    }

    #[test]
    fn test_plains_scenario_height() {
        let generator = plains_generator(100);
        let column = generator.generate_column(0, 0, &NeighborHeightMaps::new());
        let ids = generator.block_ids();

        // All amplitudes zero: noise is 0.5 everywhere, solid while y / 256 < 0.5
        let expected_top = 127;
        for lz in 0..32 {
            for lx in 0..32 {
                assert_eq!(column.block(lx, 0, lz), ids.mantle);
                for y in 1..=expected_top {
                    assert_eq!(column.block(lx, y, lz), ids.rock, "({}, {}, {})", lx, y, lz);
                }
                for y in expected_top + 1..256 {
                    assert_eq!(column.block(lx, y, lz), AIR);
                }
                assert_eq!(column.terrain_height(lx, lz), expected_top as u16);
            }
        }
        assert_eq!(column.count_fluids(ids.water), 0);
        assert_eq!(column.count_fluids(ids.salt_water), 0);
        assert_eq!(column.y_max, expected_top as u16);
    }

    #[test]
    fn test_plains_scenario_floods_below_sea_level() {
        let generator = plains_generator(140);
        let column = generator.generate_column(0, 0, &NeighborHeightMaps::new());
        let ids = generator.block_ids();
        // Layers 128..=139 are water in every cell
        assert_eq!(column.count_fluids(ids.water), 12 * 32 * 32);
        assert_eq!(column.rain_height_map[0], 139);
        assert_eq!(column.terrain_height_map[0], 127);
    }

    #[test]
    fn test_border_smoothing_bound() {
        let generator = default_generator(small_config(), 31337);
        let cs = 16;
        let none = NeighborHeightMaps::new();
        let first = generator.generate_column(0, 0, &none);
        let unsmoothed = generator.generate_column(1, 0, &none);

        let mut neighbors = NeighborHeightMaps::new();
        neighbors.set(Cardinal::West, first.terrain_height_map.clone());
        let smoothed = generator.generate_column(1, 0, &neighbors);

        for lz in 0..cs {
            let target = first.terrain_height(cs - 1, lz) as i32;
            let before = unsmoothed.terrain_height(0, lz) as i32;
            let after = smoothed.terrain_height(0, lz) as i32;
            // Fully weighted border row snaps to the neighbour's edge
            assert_eq!(after, target, "row {}", lz);
            assert!((after - before).abs() <= (target - before).abs());
        }
    }

    #[test]
    fn test_region_caches_fill_once() {
        let generator = default_generator(small_config(), 3);
        let none = NeighborHeightMaps::new();
        generator.generate_column(0, 0, &none);
        generator.generate_column(1, 0, &none);
        assert_eq!(generator.regions.len(), 1);
        assert_eq!(generator.landform_weight_maps.len(), 1);
        generator.generate_column(-1, 0, &none);
        assert_eq!(generator.regions.len(), 2);
    }

    #[test]
    fn test_corner_weights_agree_across_region_border() {
        let generator = default_generator(small_config(), 11);
        // Chunk 15 is the last of region 0, chunk 16 the first of region 1
        let left = generator.sample_corners(15, 3);
        let right = generator.sample_corners(16, 3);
        for (a, b) in left.landform_weights[1].iter().zip(&right.landform_weights[0]) {
            assert!((a - b).abs() < 1e-9);
        }
        assert_eq!(left.climate[1], right.climate[0]);
        assert!((left.ocean[1] - right.ocean[0]).abs() < 1e-9);
    }

    #[test]
    fn test_mismatched_octaves_rejected() {
        let config = small_config();
        let seeds = TerrainSeeds::from_master(1);
        let landforms = Arc::new(Landforms::init(Landforms::default_variants().unwrap(), 128, 3).unwrap());
        let block_ids = BlockIds::resolve(&BlockRegistry::default()).unwrap();
        let provider = Arc::new(UniformRegionMaps::new(&config));
        let result = TerrainGenerator::new(config, seeds, landforms, block_ids, provider);
        assert!(matches!(result, Err(TerrainError::InvalidConfig(_))));
    }
}

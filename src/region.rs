//! Region-scale maps
//!
//! A map region covers `region_size` x `region_size` blocks and carries the coarse
//! climate, ocean, upheaval and landform maps the terrain engine samples at chunk
//! corners. Regions are produced by a [`RegionMapProvider`] and memoized in a
//! [`RegionCache`] that many generator threads can hit concurrently.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::trace;
use parking_lot::RwLock;
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::WorldGenConfig;
use crate::landform::Landforms;
use crate::noise_layer::{NormalizedSimplexNoise, SimplexNoise};
use crate::seeds::TerrainSeeds;
use crate::tilemap::IntDataMap2D;

/// Blocks per landform patch before warping
const LANDFORM_PATCH_BLOCKS: f64 = 192.0;

/// Amplitude (blocks) of the warp that breaks up landform patch edges
const LANDFORM_PATCH_WARP: f64 = 64.0;

/// Climate, ocean, upheaval and landform maps of one region
#[derive(Clone, Debug)]
pub struct MapRegion {
    /// Packed `(temperature << 16) | (rain << 8) | humidity`, each 0-255
    pub climate_map: IntDataMap2D,
    /// 0 = land, 255 = deep ocean
    pub ocean_map: IntDataMap2D,
    /// 0-255 strength of geological upheaval
    pub upheaval_map: IntDataMap2D,
    /// Landform variant index per landform-map cell
    pub landform_map: IntDataMap2D,
}

/// Source of region maps. Implementations must be deterministic per region coordinate.
pub trait RegionMapProvider: Send + Sync {
    fn generate(&self, region_x: i32, region_z: i32) -> MapRegion;
}

pub fn pack_climate(temperature: u8, rain: u8, humidity: u8) -> i32 {
    ((temperature as i32) << 16) | ((rain as i32) << 8) | humidity as i32
}

pub fn climate_temperature(climate: i32) -> i32 {
    (climate >> 16) & 0xff
}

pub fn climate_rain(climate: i32) -> i32 {
    (climate >> 8) & 0xff
}

/// Raw 0-255 temperature to degrees Celsius
pub fn scaled_temperature(unscaled: f64) -> f32 {
    (unscaled / 4.25 - 20.0) as f32
}

/// Degrees Celsius at `height_above_sea` blocks above sea level for a packed climate
pub fn surface_temperature(climate: i32, height_above_sea: i32) -> f32 {
    let unscaled = climate_temperature(climate) as f64 - height_above_sea.max(0) as f64 / 1.5;
    scaled_temperature(unscaled.clamp(0.0, 255.0))
}

// =============================================================================
// Noise-backed provider
// =============================================================================

/// Synthesises every region map from seeded noise.
pub struct NoiseRegionMaps {
    region_size: usize,
    climate_scale: usize,
    climate_inner: usize,
    landform_scale: usize,
    landform_inner: usize,
    padding: usize,
    temperature: NormalizedSimplexNoise,
    rain: NormalizedSimplexNoise,
    humidity: NormalizedSimplexNoise,
    ocean: NormalizedSimplexNoise,
    upheaval: NormalizedSimplexNoise,
    patch_warp_x: SimplexNoise,
    patch_warp_z: SimplexNoise,
    landforms: Arc<Landforms>,
    landform_seed: u64,
}

impl NoiseRegionMaps {
    pub fn new(config: &WorldGenConfig, seeds: &TerrainSeeds, landforms: Arc<Landforms>) -> Self {
        Self {
            region_size: config.region_size,
            climate_scale: config.climate_map_scale,
            climate_inner: config.climate_map_inner_size(),
            landform_scale: config.landform_map_scale,
            landform_inner: config.landform_map_inner_size(),
            padding: config.map_padding,
            temperature: NormalizedSimplexNoise::from_default_octaves(4, 1.0 / 3000.0, 0.5, seeds.climate),
            rain: NormalizedSimplexNoise::from_default_octaves(4, 1.0 / 2200.0, 0.5, seeds.climate.wrapping_add(1)),
            humidity: NormalizedSimplexNoise::from_default_octaves(3, 1.0 / 1500.0, 0.5, seeds.climate.wrapping_add(2)),
            ocean: NormalizedSimplexNoise::from_default_octaves(5, 1.0 / 4000.0, 0.55, seeds.ocean),
            upheaval: NormalizedSimplexNoise::from_default_octaves(4, 1.0 / 1800.0, 0.6, seeds.upheaval_map),
            patch_warp_x: SimplexNoise::new(&[LANDFORM_PATCH_WARP], &[1.0 / 300.0], seeds.landforms.wrapping_add(1)),
            patch_warp_z: SimplexNoise::new(&[LANDFORM_PATCH_WARP], &[1.0 / 300.0], seeds.landforms.wrapping_add(2)),
            landforms,
            landform_seed: seeds.landforms,
        }
    }

    fn climate_at(&self, world_x: f64, world_z: f64) -> i32 {
        let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        pack_climate(
            to_byte(self.temperature.noise_2d(world_x, world_z)),
            to_byte(self.rain.noise_2d(world_x, world_z)),
            to_byte(self.humidity.noise_2d(world_x, world_z)),
        )
    }

    fn ocean_at(&self, world_x: f64, world_z: f64) -> i32 {
        let n = self.ocean.noise_2d(world_x, world_z);
        (((n - 0.55) / 0.45) * 255.0).round().clamp(0.0, 255.0) as i32
    }

    fn upheaval_at(&self, world_x: f64, world_z: f64) -> i32 {
        let n = self.upheaval.noise_2d(world_x, world_z);
        (((n - 0.5) / 0.5) * 160.0).round().clamp(0.0, 255.0) as i32
    }

    /// Landform index for a world position: one seeded weighted choice per warped
    /// patch, restricted to variants whose climate range admits the patch centre.
    fn landform_at(&self, world_x: f64, world_z: f64) -> i32 {
        let wx = world_x + self.patch_warp_x.noise_2d(world_x, world_z);
        let wz = world_z + self.patch_warp_z.noise_2d(world_x, world_z);
        let patch_x = (wx / LANDFORM_PATCH_BLOCKS).floor() as i64;
        let patch_z = (wz / LANDFORM_PATCH_BLOCKS).floor() as i64;

        let centre_x = (patch_x as f64 + 0.5) * LANDFORM_PATCH_BLOCKS;
        let centre_z = (patch_z as f64 + 0.5) * LANDFORM_PATCH_BLOCKS;
        let climate = self.climate_at(centre_x, centre_z);
        let temperature = scaled_temperature(climate_temperature(climate) as f64);
        let rain = climate_rain(climate) as f32;

        let eligible: Vec<(usize, f64)> = self
            .landforms
            .iter()
            .filter(|v| v.weight > 0.0 && v.accepts_climate(temperature, rain))
            .map(|v| (v.index, v.weight))
            .collect();
        let candidates = if eligible.is_empty() {
            self.landforms.iter().map(|v| (v.index, v.weight.max(0.0))).collect()
        } else {
            eligible
        };

        let mut rng = ChaCha8Rng::seed_from_u64(patch_seed(self.landform_seed, patch_x, patch_z));
        match WeightedIndex::new(candidates.iter().map(|(_, w)| *w)) {
            Ok(dist) => candidates[dist.sample(&mut rng)].0 as i32,
            // All weights zero
            Err(_) => candidates.first().map(|(i, _)| *i as i32).unwrap_or(0),
        }
    }

    fn build_map(
        &self,
        region_x: i32,
        region_z: i32,
        inner: usize,
        scale: usize,
        sample: impl Fn(f64, f64) -> i32,
    ) -> IntDataMap2D {
        let mut map = IntDataMap2D::filled(inner, self.padding, 0);
        let origin_x = region_x as f64 * self.region_size as f64;
        let origin_z = region_z as f64 * self.region_size as f64;
        for pz in 0..map.size {
            for px in 0..map.size {
                let world_x = origin_x + (px as f64 - self.padding as f64) * scale as f64;
                let world_z = origin_z + (pz as f64 - self.padding as f64) * scale as f64;
                map.set_int(px, pz, sample(world_x, world_z));
            }
        }
        map
    }
}

fn patch_seed(seed: u64, patch_x: i64, patch_z: i64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    patch_x.hash(&mut hasher);
    patch_z.hash(&mut hasher);
    hasher.finish()
}

impl RegionMapProvider for NoiseRegionMaps {
    fn generate(&self, region_x: i32, region_z: i32) -> MapRegion {
        let (ci, cs) = (self.climate_inner, self.climate_scale);
        MapRegion {
            climate_map: self.build_map(region_x, region_z, ci, cs, |x, z| self.climate_at(x, z)),
            ocean_map: self.build_map(region_x, region_z, ci, cs, |x, z| self.ocean_at(x, z)),
            upheaval_map: self.build_map(region_x, region_z, ci, cs, |x, z| self.upheaval_at(x, z)),
            landform_map: self.build_map(region_x, region_z, self.landform_inner, self.landform_scale, |x, z| {
                self.landform_at(x, z)
            }),
        }
    }
}

// =============================================================================
// Constant provider
// =============================================================================

/// Same value everywhere; a flat, featureless world for controlled experiments.
#[derive(Clone, Debug)]
pub struct UniformRegionMaps {
    pub climate: i32,
    pub ocean: i32,
    pub upheaval: i32,
    pub landform: i32,
    climate_inner: usize,
    landform_inner: usize,
    padding: usize,
}

impl UniformRegionMaps {
    /// Temperate, dry land, no upheaval, landform 0
    pub fn new(config: &WorldGenConfig) -> Self {
        Self {
            climate: pack_climate(150, 120, 120),
            ocean: 0,
            upheaval: 0,
            landform: 0,
            climate_inner: config.climate_map_inner_size(),
            landform_inner: config.landform_map_inner_size(),
            padding: config.map_padding,
        }
    }

    pub fn with_climate(mut self, climate: i32) -> Self {
        self.climate = climate;
        self
    }

    pub fn with_ocean(mut self, ocean: i32) -> Self {
        self.ocean = ocean;
        self
    }

    pub fn with_upheaval(mut self, upheaval: i32) -> Self {
        self.upheaval = upheaval;
        self
    }

    pub fn with_landform(mut self, landform: i32) -> Self {
        self.landform = landform;
        self
    }
}

impl RegionMapProvider for UniformRegionMaps {
    fn generate(&self, _region_x: i32, _region_z: i32) -> MapRegion {
        MapRegion {
            climate_map: IntDataMap2D::filled(self.climate_inner, self.padding, self.climate),
            ocean_map: IntDataMap2D::filled(self.climate_inner, self.padding, self.ocean),
            upheaval_map: IntDataMap2D::filled(self.climate_inner, self.padding, self.upheaval),
            landform_map: IntDataMap2D::filled(self.landform_inner, self.padding, self.landform),
        }
    }
}

// =============================================================================
// Cache
// =============================================================================

/// Concurrent memoizing map from region coordinate to a lazily built value.
/// Lookups take a shared lock; only the first touch of a key takes the exclusive one.
pub struct RegionCache<V> {
    entries: RwLock<HashMap<(i32, i32), Arc<V>>>,
}

impl<V> Default for RegionCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> RegionCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: (i32, i32)) -> Option<Arc<V>> {
        self.entries.read().get(&key).cloned()
    }

    /// Return the cached value, building it exactly once per key
    pub fn get_or_insert_with(&self, key: (i32, i32), build: impl FnOnce() -> V) -> Arc<V> {
        if let Some(value) = self.entries.read().get(&key) {
            return value.clone();
        }

        let mut entries = self.entries.write();
        if let Some(value) = entries.get(&key) {
            return value.clone();
        }
        trace!("Region cache miss at {:?}", key);
        let value = Arc::new(build());
        entries.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rayon::prelude::*;

    fn landforms() -> Arc<Landforms> {
        Arc::new(Landforms::init(Landforms::default_variants().unwrap(), 256, 9).unwrap())
    }

    #[test]
    fn test_cache_builds_once_under_contention() {
        let cache: RegionCache<usize> = RegionCache::new();
        let builds = AtomicUsize::new(0);
        let values: Vec<usize> = (0..64)
            .into_par_iter()
            .map(|i| {
                *cache.get_or_insert_with((i % 2, 0), || {
                    builds.fetch_add(1, Ordering::SeqCst);
                    (i % 2) as usize * 10
                })
            })
            .collect();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(*v, (i % 2) * 10);
        }
    }

    #[test]
    fn test_noise_maps_are_deterministic() {
        let config = WorldGenConfig::default();
        let seeds = TerrainSeeds::from_master(42);
        let a = NoiseRegionMaps::new(&config, &seeds, landforms()).generate(1, -2);
        let b = NoiseRegionMaps::new(&config, &seeds, landforms()).generate(1, -2);
        assert_eq!(a.climate_map, b.climate_map);
        assert_eq!(a.landform_map, b.landform_map);
        assert_eq!(a.landform_map.inner_size(), config.landform_map_inner_size());
        assert_eq!(a.climate_map.inner_size(), config.climate_map_inner_size());
    }

    #[test]
    fn test_landform_indices_are_valid() {
        let config = WorldGenConfig::default();
        let landforms = landforms();
        let count = landforms.len() as i32;
        let region = NoiseRegionMaps::new(&config, &TerrainSeeds::from_master(7), landforms).generate(0, 0);
        assert!(region.landform_map.data.iter().all(|&v| v >= 0 && v < count));
    }

    #[test]
    fn test_adjacent_region_padding_matches() {
        // The padding of one region overlaps the inner cells of its neighbour
        let config = WorldGenConfig::default();
        let provider = NoiseRegionMaps::new(&config, &TerrainSeeds::from_master(3), landforms());
        let left = provider.generate(0, 0);
        let right = provider.generate(1, 0);
        let inner = left.ocean_map.inner_size() as i64;
        assert_eq!(left.ocean_map.get_unpadded_int(inner, 4), right.ocean_map.get_unpadded_int(0, 4));
    }

    #[test]
    fn test_climate_packing() {
        let climate = pack_climate(85, 200, 10);
        assert_eq!(climate_temperature(climate), 85);
        assert_eq!(climate_rain(climate), 200);
        assert_eq!(surface_temperature(climate, 0), 0.0);
        assert!(surface_temperature(climate, 30) < 0.0);
    }
}

//! World generation configuration
//!
//! All tunables of the terrain core live here. Values serialize to JSON so a world can
//! be regenerated exactly; missing fields fall back to the defaults of a 256-high world.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Sea level as a fraction of world height
const SEA_LEVEL_RATIO: f64 = 0.4313725490196078;

/// Reference world height the octave count and oceanicity factor are tuned for
const REFERENCE_MAP_HEIGHT: usize = 256;

/// Octaves used by the fractal terrain noise at the reference world height
const REFERENCE_TERRAIN_OCTAVES: usize = 9;

/// Global terrain generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    // =========================================================================
    // World dimensions
    // =========================================================================

    /// Height of the world in blocks (must be a multiple of `chunk_size`)
    pub map_height: usize,

    /// Horizontal and vertical edge length of one chunk
    pub chunk_size: usize,

    /// Horizontal edge length of one map region (must be a multiple of `chunk_size`)
    pub region_size: usize,

    /// Explicit sea level; derived from `map_height` when absent
    pub sea_level: Option<usize>,

    // =========================================================================
    // Terrain noise
    // =========================================================================

    /// Frequency of the first terrain octave; each further octave doubles it
    pub terrain_noise_frequency: f64,

    /// Vertical frequency relative to the horizontal one (lower = taller features)
    pub vertical_noise_relative_frequency: f64,

    // =========================================================================
    // Horizontal distortion
    // =========================================================================

    /// Amplitude (in blocks) of each distortion octave
    pub distortion_amplitudes: Vec<f64>,

    /// Frequency of each distortion octave (world units)
    pub distortion_frequencies: Vec<f64>,

    /// Scale applied to the raw distortion before thresholding, for terrain sampling
    pub terrain_distortion_multiplier: f64,

    /// Distortion magnitude below which terrain sampling is not displaced
    pub terrain_distortion_threshold: f64,

    /// Scale applied to the raw distortion before thresholding, for upheaval sampling
    pub geo_distortion_multiplier: f64,

    /// Distortion magnitude below which upheaval sampling is not displaced
    pub geo_distortion_threshold: f64,

    // =========================================================================
    // Upheaval and oceanicity
    // =========================================================================

    /// Octaves of the normalized upheaval noise
    pub upheaval_octaves: u32,

    /// Horizontal frequency of the upheaval noise
    pub upheaval_frequency: f64,

    /// Amplitude decay per upheaval octave
    pub upheaval_persistence: f64,

    /// Divisor range of the ceiling taper applied to strongly upheaved columns
    pub geo_upheaval_amplitude: f64,

    /// Fraction of world height above which the upheaval ceiling taper applies
    pub upheaval_taper_ratio: f64,

    /// Converts raw ocean map values (0-255) into a Y displacement; derived when absent
    pub oceanicity_factor: Option<f64>,

    /// Surface temperature (Celsius) below which the top water layer freezes
    pub water_freezing_temperature: f32,

    // =========================================================================
    // Region maps
    // =========================================================================

    /// Blocks per landform map cell
    pub landform_map_scale: usize,

    /// Radius (in landform map cells) used to blend neighbouring landforms
    pub landform_smoothing_radius: usize,

    /// Blocks per climate/ocean/upheaval map cell
    pub climate_map_scale: usize,

    /// Padding cells around every region map; must exceed the smoothing radius so
    /// blended landform weights agree across region borders
    pub map_padding: usize,

    // =========================================================================
    // Threading
    // =========================================================================

    /// Hard cap on worker threads (None = no cap beyond available cores)
    pub max_threads: Option<usize>,

    /// Cores left free for the rest of the server
    pub reserved_threads: usize,

    /// Resource-constrained deployment: halve the worker count again
    pub reduced_threads: bool,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            map_height: 256,
            chunk_size: 32,
            region_size: 512,
            sea_level: None,
            terrain_noise_frequency: 0.0005,
            vertical_noise_relative_frequency: 0.5,
            distortion_amplitudes: vec![55.0, 40.0, 30.0, 10.0],
            distortion_frequencies: vec![1.0 / 2000.0, 1.0 / 1000.0, 1.0 / 500.0, 1.0 / 260.0],
            terrain_distortion_multiplier: 10.0,
            terrain_distortion_threshold: 10.0,
            geo_distortion_multiplier: 4.0,
            geo_distortion_threshold: 40.0,
            upheaval_octaves: 6,
            upheaval_frequency: 1.0 / 400.0,
            upheaval_persistence: 0.775,
            geo_upheaval_amplitude: 255.0,
            upheaval_taper_ratio: 0.9,
            oceanicity_factor: None,
            water_freezing_temperature: -15.0,
            landform_map_scale: 4,
            landform_smoothing_radius: 2,
            climate_map_scale: 32,
            map_padding: 3,
            max_threads: None,
            reserved_threads: 2,
            reduced_threads: false,
        }
    }
}

impl WorldGenConfig {
    /// Load a config from a JSON file. Absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot index safely
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(TerrainError::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.map_height < 4 || self.map_height % self.chunk_size != 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "map_height {} must be at least 4 and a multiple of chunk_size {}",
                self.map_height, self.chunk_size
            )));
        }
        if self.region_size == 0 || self.region_size % self.chunk_size != 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "region_size {} must be a positive multiple of chunk_size {}",
                self.region_size, self.chunk_size
            )));
        }
        for (name, scale) in [
            ("landform_map_scale", self.landform_map_scale),
            ("climate_map_scale", self.climate_map_scale),
        ] {
            if scale == 0 || self.region_size % scale != 0 {
                return Err(TerrainError::InvalidConfig(format!(
                    "{} {} must divide region_size {}",
                    name, scale, self.region_size
                )));
            }
        }
        if self.map_padding <= self.landform_smoothing_radius {
            return Err(TerrainError::InvalidConfig(format!(
                "map_padding {} must exceed landform_smoothing_radius {}",
                self.map_padding, self.landform_smoothing_radius
            )));
        }
        if self.distortion_amplitudes.len() != self.distortion_frequencies.len() {
            return Err(TerrainError::InvalidConfig(
                "distortion_amplitudes and distortion_frequencies differ in length".into(),
            ));
        }
        if self.sea_level() >= self.map_height - 1 {
            return Err(TerrainError::InvalidConfig(format!(
                "sea level {} must lie below the world ceiling {}",
                self.sea_level(),
                self.map_height - 1
            )));
        }
        Ok(())
    }

    pub fn sea_level(&self) -> usize {
        self.sea_level
            .unwrap_or_else(|| (SEA_LEVEL_RATIO * self.map_height as f64) as usize)
    }

    pub fn oceanicity_factor(&self) -> f64 {
        self.oceanicity_factor
            .unwrap_or(self.map_height as f64 / REFERENCE_MAP_HEIGHT as f64 * 0.33333)
    }

    /// Chunks per region edge
    pub fn region_chunk_size(&self) -> usize {
        self.region_size / self.chunk_size
    }

    /// Landform map resolution inside one region (without padding)
    pub fn landform_map_inner_size(&self) -> usize {
        self.region_size / self.landform_map_scale
    }

    /// Climate/ocean/upheaval map resolution inside one region (without padding)
    pub fn climate_map_inner_size(&self) -> usize {
        self.region_size / self.climate_map_scale
    }

    /// Y above which strongly upheaved columns get their threshold tapered
    pub fn upheaval_taper_threshold(&self) -> f64 {
        (self.map_height as f64 * self.upheaval_taper_ratio).floor()
    }

    /// Octaves the fractal terrain noise uses for this world height.
    /// Taller worlds get more octaves so vertical banding stays invisible.
    pub fn terrain_octave_count(&self) -> usize {
        terrain_octave_count(self.map_height)
    }

    /// Largest displacement the distortion noise can produce before any multiplier
    pub fn max_distortion_amount(&self) -> f64 {
        self.distortion_amplitudes.iter().map(|a| a.abs()).sum()
    }

    /// Worker threads for the per-column parallel section
    pub fn worker_threads(&self) -> usize {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let mut threads = cores.saturating_sub(self.reserved_threads).max(1);
        if let Some(cap) = self.max_threads {
            threads = threads.min(cap.max(1));
        }
        if self.reduced_threads {
            threads = (threads / 2).max(1);
        }
        threads
    }
}

/// Octave count for a world height: 9 at 256 blocks, one more per doubling,
/// one fewer per halving, never below 4.
pub fn terrain_octave_count(map_height: usize) -> usize {
    let ratio = map_height.max(1) as f64 / REFERENCE_MAP_HEIGHT as f64;
    let delta = ratio.log2().round() as i64;
    (REFERENCE_TERRAIN_OCTAVES as i64 + delta).max(4) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WorldGenConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sea_level(), 110);
        assert_eq!(config.region_chunk_size(), 16);
    }

    #[test]
    fn test_octave_count_scales_with_height() {
        assert_eq!(terrain_octave_count(256), 9);
        assert_eq!(terrain_octave_count(512), 10);
        assert_eq!(terrain_octave_count(128), 8);
        assert_eq!(terrain_octave_count(8), 4);
    }

    #[test]
    fn test_invalid_height_rejected() {
        let config = WorldGenConfig { map_height: 100, ..Default::default() };
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: WorldGenConfig = serde_json::from_str(r#"{ "map_height": 128 }"#).unwrap();
        assert_eq!(config.map_height, 128);
        assert_eq!(config.chunk_size, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reduced_threads_never_zero() {
        let config = WorldGenConfig {
            max_threads: Some(1),
            reduced_threads: true,
            ..Default::default()
        };
        assert_eq!(config.worker_threads(), 1);
    }
}

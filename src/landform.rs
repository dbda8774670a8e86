//! Landform variants and their vertical threshold curves
//!
//! A landform is one terrain archetype ("plains", "mountains"). It describes, through
//! sparse key points, how hard it is for a block to be solid at each relative height.
//! At world-gen init those key points are expanded into one threshold per world Y and
//! the octave tables are stretched to the world's octave count. After that a variant
//! is immutable and shared read-only by every worker thread.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Default landform set, embedded so the generator runs without external files
pub const DEFAULT_LANDFORMS_JSON: &str = include_str!("../assets/landforms.json");

/// Amplitude decay applied per synthetic octave appended to a short octave table
const OCTAVE_DECAY: f64 = 0.8;

fn default_weight() -> f64 {
    1.0
}
fn default_min_temp() -> f32 {
    -50.0
}
fn default_max_temp() -> f32 {
    50.0
}
fn default_max_rain() -> f32 {
    255.0
}
fn default_color() -> String {
    "#808080".to_string()
}

/// One discrete terrain archetype
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LandformVariant {
    pub code: String,

    /// Relative chance of being picked for a landform map cell
    #[serde(default = "default_weight")]
    pub weight: f64,

    /// Amplitude of each terrain noise octave
    pub terrain_octaves: Vec<f64>,

    /// Threshold subtracted from each terrain noise octave
    #[serde(default)]
    pub terrain_octave_thresholds: Vec<f64>,

    /// Key heights as a fraction of world height, ascending
    pub terrain_y_key_positions: Vec<f64>,

    /// Solidity at each key height: 1 = always solid, 0 = never solid
    pub terrain_y_key_thresholds: Vec<f64>,

    #[serde(default = "default_min_temp")]
    pub min_temp: f32,
    #[serde(default = "default_max_temp")]
    pub max_temp: f32,
    #[serde(default)]
    pub min_rain: f32,
    #[serde(default = "default_max_rain")]
    pub max_rain: f32,

    /// Debug visualization color, `#rrggbb`
    #[serde(default = "default_color")]
    pub color: String,

    /// Position in the landform registry, matches landform map values
    #[serde(skip)]
    pub index: usize,

    /// Dense per-Y threshold, inverted: 0 = surely solid, 1 = surely air
    #[serde(skip)]
    pub terrain_y_thresholds: Vec<f64>,
}

impl LandformVariant {
    /// Expand key points and octave tables for a world of `map_height` blocks.
    pub fn init(&mut self, map_height: usize, octave_count: usize) -> Result<()> {
        self.validate_octaves()?;
        self.terrain_y_thresholds = lerp_thresholds(
            &self.code,
            &self.terrain_y_key_positions,
            &self.terrain_y_key_thresholds,
            map_height,
        )?;

        if self.terrain_octaves.len() > octave_count {
            warn!(
                "Landform '{}' defines {} octaves, world uses {}; extra octaves dropped",
                self.code,
                self.terrain_octaves.len(),
                octave_count
            );
        }
        self.terrain_octaves = expand_octaves(&self.terrain_octaves, octave_count);
        self.terrain_octave_thresholds = expand_thresholds(&self.terrain_octave_thresholds, octave_count);
        Ok(())
    }

    fn validate_octaves(&self) -> Result<()> {
        if let Some(bad) = self.terrain_octaves.iter().find(|a| !a.is_finite() || **a < 0.0) {
            return Err(TerrainError::InvalidOctaves {
                landform: self.code.clone(),
                reason: format!("amplitude {} is negative or not finite", bad),
            });
        }
        if self.terrain_octave_thresholds.len() > self.terrain_octaves.len() {
            return Err(TerrainError::InvalidOctaves {
                landform: self.code.clone(),
                reason: format!(
                    "{} octave thresholds for {} octaves",
                    self.terrain_octave_thresholds.len(),
                    self.terrain_octaves.len()
                ),
            });
        }
        Ok(())
    }

    /// Whether a landform map cell with this climate may pick the variant
    pub fn accepts_climate(&self, temperature: f32, rain: f32) -> bool {
        temperature >= self.min_temp
            && temperature <= self.max_temp
            && rain >= self.min_rain
            && rain <= self.max_rain
    }

    /// Color as packed 0xRRGGBB, gray when the config string is malformed
    pub fn color_int(&self) -> u32 {
        u32::from_str_radix(self.color.trim_start_matches('#'), 16).unwrap_or(0x808080)
    }
}

/// Interpolate sparse `(position, threshold)` keys into one inverted threshold per Y.
/// Below the first key and above the last the curve is flat.
pub fn lerp_thresholds(
    code: &str,
    positions: &[f64],
    thresholds: &[f64],
    map_height: usize,
) -> Result<Vec<f64>> {
    if positions.len() != thresholds.len() {
        return Err(TerrainError::MismatchedKeyArrays {
            landform: code.to_string(),
            positions: positions.len(),
            thresholds: thresholds.len(),
        });
    }
    if positions.is_empty() {
        return Err(TerrainError::InvalidYKeys {
            landform: code.to_string(),
            reason: "no key positions defined".into(),
        });
    }

    for (name, keys) in [("position", positions), ("threshold", thresholds)] {
        if let Some((index, value)) = keys.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(TerrainError::InvalidYKeys {
                landform: code.to_string(),
                reason: format!("key {} {} is {}", name, index, value),
            });
        }
    }

    let key_ys: Vec<usize> = positions
        .iter()
        .map(|p| (p.clamp(0.0, 1.0) * map_height as f64) as usize)
        .collect();
    for pair in key_ys.windows(2) {
        if pair[1] == pair[0] {
            return Err(TerrainError::ZeroWidthThresholdSegment {
                landform: code.to_string(),
                y_start: pair[0],
                y_end: pair[1],
            });
        }
        if pair[1] < pair[0] {
            return Err(TerrainError::InvalidYKeys {
                landform: code.to_string(),
                reason: format!("key position Y {} follows Y {}", pair[1], pair[0]),
            });
        }
    }

    let last = key_ys.len() - 1;
    let mut dense = Vec::with_capacity(map_height);
    let mut segment = 0;
    for y in 0..map_height {
        let value = if y < key_ys[0] {
            thresholds[0]
        } else if y >= key_ys[last] {
            thresholds[last]
        } else {
            while y >= key_ys[segment + 1] {
                segment += 1;
            }
            let (y0, y1) = (key_ys[segment], key_ys[segment + 1]);
            let t = (y - y0) as f64 / (y1 - y0) as f64;
            lerp(thresholds[segment], thresholds[segment + 1], t)
        };
        dense.push(1.0 - value);
    }
    Ok(dense)
}

/// Stretch an octave amplitude table to `count` entries. Missing octaves continue the
/// last one with a 0.8 decay, then the whole table is rescaled to its original sum.
pub fn expand_octaves(octaves: &[f64], count: usize) -> Vec<f64> {
    if octaves.len() >= count {
        return octaves[..count].to_vec();
    }
    let Some(&last) = octaves.last() else {
        return vec![0.0; count];
    };

    let original_sum: f64 = octaves.iter().sum();
    let mut expanded = octaves.to_vec();
    let mut amplitude = last;
    while expanded.len() < count {
        amplitude *= OCTAVE_DECAY;
        expanded.push(amplitude);
    }

    let expanded_sum: f64 = expanded.iter().sum();
    if expanded_sum > 0.0 {
        let scale = original_sum / expanded_sum;
        for amp in expanded.iter_mut() {
            *amp *= scale;
        }
    }
    expanded
}

/// Stretch an octave threshold table to `count` entries by repeating the last one
pub fn expand_thresholds(thresholds: &[f64], count: usize) -> Vec<f64> {
    let fill = thresholds.last().copied().unwrap_or(0.0);
    let mut expanded: Vec<f64> = thresholds.iter().copied().take(count).collect();
    expanded.resize(count, fill);
    expanded
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Deserialize)]
struct LandformsFile {
    variants: Vec<LandformVariant>,
}

/// All landform variants of a world, indexed by landform map value
#[derive(Clone, Debug)]
pub struct Landforms {
    variants: Vec<LandformVariant>,
    octave_count: usize,
}

impl Landforms {
    /// Parse variants from JSON of the form `{ "variants": [ ... ] }`
    pub fn parse_json(json: &str) -> Result<Vec<LandformVariant>> {
        let file: LandformsFile = serde_json::from_str(json)?;
        Ok(file.variants)
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Vec<LandformVariant>> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_json(&text)
    }

    pub fn default_variants() -> Result<Vec<LandformVariant>> {
        Self::parse_json(DEFAULT_LANDFORMS_JSON)
    }

    /// Validate and expand every variant. Fails on the first malformed variant.
    pub fn init(mut variants: Vec<LandformVariant>, map_height: usize, octave_count: usize) -> Result<Self> {
        if variants.is_empty() {
            return Err(TerrainError::NoLandforms);
        }
        for (index, variant) in variants.iter_mut().enumerate() {
            variant.index = index;
            variant.init(map_height, octave_count)?;
        }
        info!(
            "Initialized {} landforms ({} octaves, map height {})",
            variants.len(),
            octave_count,
            map_height
        );
        Ok(Self { variants, octave_count })
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn octave_count(&self) -> usize {
        self.octave_count
    }

    pub fn get(&self, index: usize) -> Option<&LandformVariant> {
        self.variants.get(index)
    }

    pub fn by_code(&self, code: &str) -> Option<&LandformVariant> {
        self.variants.iter().find(|v| v.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LandformVariant> {
        self.variants.iter()
    }

    /// Weighted blend of octave amplitudes and thresholds for a landform weight vector
    pub fn blend_octaves(&self, weights: &[f64], amplitudes: &mut [f64], thresholds: &mut [f64]) {
        amplitudes.fill(0.0);
        thresholds.fill(0.0);
        for (variant, &weight) in self.variants.iter().zip(weights) {
            if weight == 0.0 {
                continue;
            }
            for i in 0..self.octave_count {
                amplitudes[i] += weight * variant.terrain_octaves[i];
                thresholds[i] += weight * variant.terrain_octave_thresholds[i];
            }
        }
    }
}

//! Column-oriented fractal simplex noise
//!
//! The terrain density at `(x, y, z)` is
//!
//! ```text
//! N(y) = 0.5 + 0.5 * sum_i a_i * (s_i(x * f_i, y * f_i * v, z * f_i) - t_i)
//! ```
//!
//! where `a_i`/`t_i` are the per-octave amplitude and threshold (already blended by
//! landform weight for this column), `f_i` doubles per octave and `v` is the vertical
//! relative frequency. Because every `s_i` lies in [-1, 1] the whole column is bounded
//! by `[bound_min, bound_max]` without sampling anything, which is what lets the
//! solidity engine skip most Y levels.

use noise::Simplex;

use super::simplex::sample_3d;
use crate::seeds::noise_seed;

/// Slack added to the analytical bounds so a sample can never sit exactly on one
const BOUND_EPSILON: f64 = 1e-9;

/// Margin a partial sum must clear before an octave shortcut decides the sign
const SHORTCUT_MARGIN: f64 = 1e-9;

pub struct NormalizedSimplexFractalNoise {
    octaves: Vec<Simplex>,
    frequencies: Vec<f64>,
}

impl NormalizedSimplexFractalNoise {
    pub fn new(octave_count: usize, base_frequency: f64, seed: u64) -> Self {
        Self {
            octaves: (0..octave_count as u32)
                .map(|i| Simplex::new(noise_seed(seed, i)))
                .collect(),
            frequencies: (0..octave_count)
                .map(|i| base_frequency * 2f64.powi(i as i32))
                .collect(),
        }
    }

    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }

    /// Prepare the noise for one column. `amplitudes` and `thresholds` must hold one
    /// entry per octave; nothing is sampled until a Y is requested.
    pub fn for_column<'a>(
        &'a self,
        vertical_relative_frequency: f64,
        amplitudes: &'a [f64],
        thresholds: &'a [f64],
        x: f64,
        z: f64,
    ) -> ColumnNoise<'a> {
        debug_assert_eq!(amplitudes.len(), self.octaves.len());
        debug_assert_eq!(thresholds.len(), self.octaves.len());

        let mut lower = 0.0;
        let mut upper = 0.0;
        for (&amp, &threshold) in amplitudes.iter().zip(thresholds) {
            if amp == 0.0 {
                continue;
            }
            let (lo, hi) = octave_range(amp, threshold);
            lower += lo;
            upper += hi;
        }

        ColumnNoise {
            noise: self,
            amplitudes,
            thresholds,
            x,
            z,
            vertical_relative_frequency,
            lower,
            upper,
            bound_min: 0.5 + lower - BOUND_EPSILON,
            bound_max: 0.5 + upper + BOUND_EPSILON,
        }
    }
}

/// Range of one octave's contribution `0.5 * a * (s - t)` for `s` in [-1, 1]
#[inline]
fn octave_range(amp: f64, threshold: f64) -> (f64, f64) {
    let a = 0.5 * amp;
    let lo = a * (-1.0 - threshold);
    let hi = a * (1.0 - threshold);
    if lo <= hi { (lo, hi) } else { (hi, lo) }
}

/// Lazily evaluated fractal noise for one horizontal position.
pub struct ColumnNoise<'a> {
    noise: &'a NormalizedSimplexFractalNoise,
    amplitudes: &'a [f64],
    thresholds: &'a [f64],
    x: f64,
    z: f64,
    vertical_relative_frequency: f64,
    lower: f64,
    upper: f64,
    /// No Y in this column produces a value at or below this
    pub bound_min: f64,
    /// No Y in this column produces a value at or above this
    pub bound_max: f64,
}

impl<'a> ColumnNoise<'a> {
    #[inline]
    fn octave(&self, i: usize, y: f64) -> f64 {
        let freq = self.noise.frequencies[i];
        let sample = sample_3d(
            &self.noise.octaves[i],
            self.x * freq,
            y * freq * self.vertical_relative_frequency,
            self.z * freq,
        );
        0.5 * self.amplitudes[i] * (sample - self.thresholds[i])
    }

    /// Full noise value at `y`, every octave evaluated.
    pub fn value(&self, y: f64) -> f64 {
        let mut sum = 0.5;
        for i in 0..self.amplitudes.len() {
            if self.amplitudes[i] == 0.0 {
                continue;
            }
            sum += self.octave(i, y);
        }
        sum
    }

    /// Positive when the noise at `y` exceeds `threshold` (solid), zero or negative
    /// otherwise. Stops sampling octaves as soon as the remaining octaves can no
    /// longer change the sign, so the magnitude is only meaningful as a sign.
    pub fn noise_sign(&self, y: f64, threshold: f64) -> f64 {
        let mut partial = 0.5;
        let mut remaining_lo = self.lower;
        let mut remaining_hi = self.upper;

        for i in 0..self.amplitudes.len() {
            let amp = self.amplitudes[i];
            if amp == 0.0 {
                continue;
            }
            if partial + remaining_lo > threshold + SHORTCUT_MARGIN {
                return partial + remaining_lo - threshold;
            }
            if partial + remaining_hi < threshold - SHORTCUT_MARGIN {
                return partial + remaining_hi - threshold;
            }
            let (lo, hi) = octave_range(amp, self.thresholds[i]);
            partial += self.octave(i, y);
            remaining_lo -= lo;
            remaining_hi -= hi;
        }

        partial - threshold
    }
}

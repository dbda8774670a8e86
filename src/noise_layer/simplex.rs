//! Multi-octave simplex sums
//!
//! Raw samples from `noise::Simplex` are clamped to [-1, 1] so the analytical bounds
//! derived from the amplitudes always hold.

use noise::{NoiseFn, Simplex};

use crate::seeds::noise_seed;

#[inline]
pub(crate) fn sample_2d(octave: &Simplex, x: f64, z: f64) -> f64 {
    octave.get([x, z]).clamp(-1.0, 1.0)
}

#[inline]
pub(crate) fn sample_3d(octave: &Simplex, x: f64, y: f64, z: f64) -> f64 {
    octave.get([x, y, z]).clamp(-1.0, 1.0)
}

/// Sum of simplex octaves with explicit per-octave amplitudes and frequencies.
/// Output lies in `[-max_value(), max_value()]`.
pub struct SimplexNoise {
    octaves: Vec<Simplex>,
    amplitudes: Vec<f64>,
    frequencies: Vec<f64>,
}

impl SimplexNoise {
    pub fn new(amplitudes: &[f64], frequencies: &[f64], seed: u64) -> Self {
        let count = amplitudes.len().min(frequencies.len());
        Self {
            octaves: (0..count as u32).map(|i| Simplex::new(noise_seed(seed, i))).collect(),
            amplitudes: amplitudes[..count].to_vec(),
            frequencies: frequencies[..count].to_vec(),
        }
    }

    pub fn noise_2d(&self, x: f64, z: f64) -> f64 {
        let mut sum = 0.0;
        for ((octave, &amp), &freq) in self.octaves.iter().zip(&self.amplitudes).zip(&self.frequencies) {
            if amp != 0.0 {
                sum += amp * sample_2d(octave, x * freq, z * freq);
            }
        }
        sum
    }

    pub fn noise_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut sum = 0.0;
        for ((octave, &amp), &freq) in self.octaves.iter().zip(&self.amplitudes).zip(&self.frequencies) {
            if amp != 0.0 {
                sum += amp * sample_3d(octave, x * freq, y * freq, z * freq);
            }
        }
        sum
    }

    /// Largest absolute value the sum can reach
    pub fn max_value(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.abs()).sum()
    }
}

/// Simplex octave sum rescaled to [0, 1].
pub struct NormalizedSimplexNoise {
    inner: SimplexNoise,
    total_amplitude: f64,
}

impl NormalizedSimplexNoise {
    /// Octave `i` has amplitude `persistence^i` and frequency `frequency * 2^i`.
    pub fn from_default_octaves(octaves: u32, frequency: f64, persistence: f64, seed: u64) -> Self {
        let amplitudes: Vec<f64> = (0..octaves).map(|i| persistence.powi(i as i32)).collect();
        let frequencies: Vec<f64> = (0..octaves).map(|i| frequency * 2f64.powi(i as i32)).collect();
        let inner = SimplexNoise::new(&amplitudes, &frequencies, seed);
        let total_amplitude = inner.max_value();
        Self { inner, total_amplitude }
    }

    pub fn noise_2d(&self, x: f64, z: f64) -> f64 {
        if self.total_amplitude <= 0.0 {
            return 0.5;
        }
        (0.5 + 0.5 * self.inner.noise_2d(x, z) / self.total_amplitude).clamp(0.0, 1.0)
    }

    pub fn noise_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        if self.total_amplitude <= 0.0 {
            return 0.5;
        }
        (0.5 + 0.5 * self.inner.noise_3d(x, y, z) / self.total_amplitude).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplex_sum_within_bounds() {
        let noise = SimplexNoise::new(&[55.0, 40.0, 30.0, 10.0], &[0.01, 0.02, 0.04, 0.08], 99);
        let max = noise.max_value();
        assert_eq!(max, 135.0);
        for i in 0..500 {
            let v = noise.noise_2d(i as f64 * 7.3, i as f64 * -3.1);
            assert!(v.abs() <= max);
        }
    }

    #[test]
    fn test_normalized_noise_range() {
        let noise = NormalizedSimplexNoise::from_default_octaves(6, 1.0 / 400.0, 0.775, 5);
        for i in 0..1000 {
            let v = noise.noise_2d(i as f64 * 13.7, i as f64 * 5.9);
            assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        let a = NormalizedSimplexNoise::from_default_octaves(4, 0.01, 0.5, 1);
        let b = NormalizedSimplexNoise::from_default_octaves(4, 0.01, 0.5, 1);
        assert_eq!(a.noise_2d(12.5, -40.25), b.noise_2d(12.5, -40.25));
    }

    #[test]
    fn test_zero_amplitudes_are_silent() {
        let noise = SimplexNoise::new(&[0.0, 0.0], &[0.1, 0.2], 3);
        assert_eq!(noise.noise_2d(10.0, 20.0), 0.0);
        assert_eq!(noise.max_value(), 0.0);
    }
}

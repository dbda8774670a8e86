//! Horizontal distortion noise
//!
//! Two independent simplex sums give the raw X and Z offsets. Taken component-wise
//! they reach further along the diagonals than along the axes, so the pair is treated
//! as one vector and its magnitude is compressed isotropically ("fair warp").

use std::ops::Mul;

use super::simplex::SimplexNoise;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VectorXZ {
    pub x: f64,
    pub z: f64,
}

impl VectorXZ {
    pub const ZERO: Self = Self { x: 0.0, z: 0.0 };

    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.z * self.z
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }
}

impl Mul<f64> for VectorXZ {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

pub struct DistortionNoise {
    noise_x: SimplexNoise,
    noise_z: SimplexNoise,
    max_amount: f64,
}

impl DistortionNoise {
    pub fn new(amplitudes: &[f64], frequencies: &[f64], seed_x: u64, seed_z: u64) -> Self {
        let noise_x = SimplexNoise::new(amplitudes, frequencies, seed_x);
        let noise_z = SimplexNoise::new(amplitudes, frequencies, seed_z);
        let max_amount = noise_x.max_value();
        Self { noise_x, noise_z, max_amount }
    }

    /// Largest magnitude `sample` can return
    pub fn max_amount(&self) -> f64 {
        self.max_amount
    }

    /// Distortion vector at a world position, magnitude at most `max_amount()`
    pub fn sample(&self, world_x: f64, world_z: f64) -> VectorXZ {
        if self.max_amount <= 0.0 {
            return VectorXZ::ZERO;
        }
        let raw = VectorXZ::new(
            self.noise_x.noise_2d(world_x, world_z),
            self.noise_z.noise_2d(world_x, world_z),
        );
        fair_warp(raw, self.max_amount)
    }

    /// Scalar field from the X component, used for the small wobble at chunk borders
    pub fn wobble(&self, x: f64, y: f64, z: f64) -> f64 {
        if self.max_amount <= 0.0 {
            return 0.0;
        }
        self.noise_x.noise_3d(x, y, z) / self.max_amount
    }
}

/// Compress a raw vector so its magnitude never exceeds `maximum`, identically in
/// every direction. Near-linear for small vectors.
pub fn fair_warp(raw: VectorXZ, maximum: f64) -> VectorXZ {
    let length = raw.length();
    if length <= 0.0 || maximum <= 0.0 {
        return VectorXZ::ZERO;
    }
    let damped = maximum * (length / maximum).tanh();
    raw * (damped / length)
}

/// Zero out distortions shorter than `threshold` and ease the rest in quadratically,
/// so a vector of length `maximum` comes out with length `maximum - threshold`.
pub fn apply_isotropic_threshold(dist: VectorXZ, threshold: f64, maximum: f64) -> VectorXZ {
    let length_sq = dist.length_squared();
    let threshold_sq = threshold * threshold;
    if length_sq <= threshold_sq || maximum <= threshold {
        return VectorXZ::ZERO;
    }

    // 0 at the threshold, 1 at the maximum
    let maximum_sq = maximum * maximum;
    let base_curve = (length_sq - threshold_sq) / length_sq;
    let base_curve_at_maximum = (maximum_sq - threshold_sq) / maximum_sq;
    let mut slide = base_curve / base_curve_at_maximum;
    slide *= slide;

    let force_down = slide * ((maximum - threshold) / maximum);
    dist * force_down
}

//! Seeded, band-limited noise fields used by the terrain engine
//!
//! Every function here is a pure function of (coordinates, seed). The only state a
//! sampler carries is the seeded permutation tables owned by the `noise` crate.

pub mod distortion;
pub mod fractal;
pub mod simplex;

pub use distortion::{apply_isotropic_threshold, fair_warp, DistortionNoise, VectorXZ};
pub use fractal::{ColumnNoise, NormalizedSimplexFractalNoise};
pub use simplex::{NormalizedSimplexNoise, SimplexNoise};

//! Seed management for terrain generation
//!
//! Every noise field gets its own seed derived from the 64-bit world seed, so
//! overriding one field (e.g. for experimentation) leaves every other field as it was.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for all terrain generation systems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainSeeds {
    /// World seed (used for display/reference)
    pub master: u64,
    /// Fractal terrain density noise
    pub terrain: u64,
    /// Horizontal distortion, X component
    pub distort_x: u64,
    /// Horizontal distortion, Z component
    pub distort_z: u64,
    /// Geological upheaval noise
    pub upheaval: u64,
    /// Region-scale climate map synthesis
    pub climate: u64,
    /// Region-scale ocean map synthesis
    pub ocean: u64,
    /// Region-scale upheaval map synthesis
    pub upheaval_map: u64,
    /// Landform selection per landform-map cell
    pub landforms: u64,
}

impl TerrainSeeds {
    /// Create seeds from a world seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            terrain: derive_seed(master, "terrain"),
            distort_x: derive_seed(master, "distort_x"),
            distort_z: derive_seed(master, "distort_z"),
            upheaval: derive_seed(master, "upheaval"),
            climate: derive_seed(master, "climate"),
            ocean: derive_seed(master, "ocean"),
            upheaval_map: derive_seed(master, "upheaval_map"),
            landforms: derive_seed(master, "landforms"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> TerrainSeedsBuilder {
        TerrainSeedsBuilder::new(master)
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct TerrainSeedsBuilder {
    seeds: TerrainSeeds,
}

impl TerrainSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: TerrainSeeds::from_master(master),
        }
    }

    /// Override the terrain density seed
    pub fn terrain(mut self, seed: u64) -> Self {
        self.seeds.terrain = seed;
        self
    }

    /// Override the upheaval noise seed
    pub fn upheaval(mut self, seed: u64) -> Self {
        self.seeds.upheaval = seed;
        self
    }

    /// Override the landform selection seed
    pub fn landforms(mut self, seed: u64) -> Self {
        self.seeds.landforms = seed;
        self
    }

    pub fn build(self) -> TerrainSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

/// Fold a 64-bit seed into the 32-bit seed space of the `noise` crate, offset per octave.
pub fn noise_seed(seed: u64, octave: u32) -> u32 {
    let folded = (seed ^ (seed >> 32)) as u32;
    folded.wrapping_add(octave.wrapping_mul(0x9E37_79B9))
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, terrain: {}, distort: ({}, {}), upheaval: {}, \
             climate: {}, ocean: {}, upheaval_map: {}, landforms: {} }}",
            self.master,
            self.terrain,
            self.distort_x,
            self.distort_z,
            self.upheaval,
            self.climate,
            self.ocean,
            self.upheaval_map,
            self.landforms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let seeds1 = TerrainSeeds::from_master(1239123912);
        let seeds2 = TerrainSeeds::from_master(1239123912);
        assert_eq!(seeds1, seeds2);
    }

    #[test]
    fn test_different_systems_get_different_seeds() {
        let seeds = TerrainSeeds::from_master(12345);
        assert_ne!(seeds.terrain, seeds.distort_x);
        assert_ne!(seeds.distort_x, seeds.distort_z);
        assert_ne!(seeds.upheaval, seeds.upheaval_map);
    }

    #[test]
    fn test_builder_override() {
        let seeds = TerrainSeeds::builder(12345).upheaval(7).build();
        assert_eq!(seeds.upheaval, 7);
        assert_eq!(seeds.terrain, TerrainSeeds::from_master(12345).terrain);
    }

    #[test]
    fn test_noise_seed_varies_per_octave() {
        assert_ne!(noise_seed(42, 0), noise_seed(42, 1));
        assert_eq!(noise_seed(42, 3), noise_seed(42, 3));
    }
}

//! Voxel terrain generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod chunk;
pub mod config;
pub mod error;
pub mod export;
pub mod landform;
pub mod noise_layer;
pub mod postprocess;
pub mod region;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod weight_map;
pub mod world;

pub use error::{Result, TerrainError};

//! Error taxonomy for terrain generation
//!
//! Everything here is raised at world-gen initialization. The per-column hot loop
//! is infallible and assumes the configuration already passed validation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("landform '{landform}' has a zero-width threshold segment: key positions {y_start} and {y_end} both map to the same world Y")]
    ZeroWidthThresholdSegment {
        landform: String,
        y_start: usize,
        y_end: usize,
    },

    #[error("landform '{landform}' defines {positions} Y key positions but {thresholds} Y key thresholds")]
    MismatchedKeyArrays {
        landform: String,
        positions: usize,
        thresholds: usize,
    },

    #[error("landform '{landform}' has invalid Y keys: {reason}")]
    InvalidYKeys { landform: String, reason: String },

    #[error("landform '{landform}' has invalid octaves: {reason}")]
    InvalidOctaves { landform: String, reason: String },

    #[error("no landform variants configured")]
    NoLandforms,

    #[error("failed to find block entry for '{0}'")]
    UnknownBlockCode(String),

    #[error("invalid world generation config: {0}")]
    InvalidConfig(String),

    #[error("failed to build terrain worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TerrainError>;

//! Error types for the simulation engine.
//!
//! Nothing inside a tick fails: out-of-bounds placements are ignored and
//! every lethal condition is a state transition. The only caller-visible
//! failures come from configuration.

use thiserror::Error;

/// Rejected configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid size must be in 1..={max}, got {value}")]
    GridSize { value: u16, max: u16 },

    #[error("{name} must be positive")]
    NonPositive { name: &'static str },

    #[error("{name} ({value}) must be smaller than the grid size ({grid_size})")]
    RadiusTooLarge {
        name: &'static str,
        value: u32,
        grid_size: u16,
    },

    #[error("{name} must be in [0.0, 1.0], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

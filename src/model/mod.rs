//! Engine façade for the binary and the integration tests.

pub use predators_core::{config, error, grid, lifecycle, metrics, systems, targeting, world};
pub use predators_data as data;

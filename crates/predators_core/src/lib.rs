//! # Predators Core
//!
//! The tick engine for a grid-based artificial-life simulation: creatures
//! hatch from eggs, hunt food and eggs, grow weapon, leg and eye features,
//! age, lay eggs and die. Ageing creatures may merge into cooperation
//! groups led by a single nucleus.
//!
//! ## Example
//!
//! ```
//! use predators_core::config::AppConfig;
//! use predators_core::world::World;
//!
//! let mut config = AppConfig::default();
//! config.world.grid_size = 10;
//! config.world.seed = Some(7);
//! config.lifecycle.incubate_cycles = 1;
//!
//! let mut world = World::new(config).unwrap();
//! assert!(world.add_egg(5, 5));
//! let report = world.advance_tick();
//! assert_eq!(report.hatched.len(), 1);
//! assert_eq!(world.population(), 1);
//! ```

/// Simulation parameters and their validation
pub mod config;
/// Typed engine errors
pub mod error;
/// Grid bounds and the display grid
pub mod grid;
/// Hatching, feeding and creature construction
pub mod lifecycle;
/// Tick counters and logging setup
pub mod metrics;
/// Per-tick rules (growth, movement, interaction, cooperation, statistics)
pub mod systems;
/// Nearest-target search and eye raycasts
pub mod targeting;
/// The world and its tick scheduler
pub mod world;

pub use error::{ConfigError, Result, SimError};
pub use world::{TickReport, World, WorldSnapshot};

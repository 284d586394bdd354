pub mod data;

pub use data::entity::{
    Body, CoopState, Creature, Direction, Egg, Feature, GroupId, Position, MAX_BODY_CELLS,
    MAX_FEATURES,
};
pub use data::grid::CellCode;
pub use data::stats::{DeathCause, PopulationStats};

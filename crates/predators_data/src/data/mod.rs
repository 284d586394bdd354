//! Core data structures for the predator simulation.

pub mod entity;
pub mod grid;
pub mod stats;

//! Per-tick rules, each free of world ownership so they can be tested alone.

pub mod cooperation;
pub mod growth;
pub mod interaction;
pub mod movement;
pub mod stats;

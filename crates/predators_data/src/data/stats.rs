use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Starvation,
    GroupStarvation,
    Killed,
    Idle,
    Overgrowth,
    /// Last remaining nucleus, or a member whose nucleus died.
    GroupCollapse,
}

impl DeathCause {
    pub const fn label(self) -> &'static str {
        match self {
            DeathCause::Starvation => "starvation",
            DeathCause::GroupStarvation => "group_starvation",
            DeathCause::Killed => "killed",
            DeathCause::Idle => "idle",
            DeathCause::Overgrowth => "overgrowth",
            DeathCause::GroupCollapse => "group_collapse",
        }
    }
}

/// Counters the presentation layer reads after every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub cycle: u64,
    pub population: usize,
    pub unhatched_eggs: usize,
    pub food_count: usize,
    pub group_count: usize,
    pub abundance: f64,
    pub coop_probability: f64,
    /// Highest hunger among live creatures this tick.
    pub max_hunger: i32,
    /// Highest age ever observed on a live creature.
    pub max_age: u64,
    pub total_births: u64,
    pub total_deaths: u64,
    pub total_kills: u64,
    pub total_merges: u64,
    pub total_eggs_laid: u64,
}

//! Runtime counters and logging setup for the simulation.
//!
//! The world records one tick at a time; every `log_interval` ticks a
//! summary line is emitted at info level. Event totals (kills, merges,
//! deaths by cause) accumulate in named counters for the whole run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub struct Metrics {
    tick_count: AtomicU64,
    population: AtomicU64,
    food_count: AtomicU64,
    log_interval: u64,
    counters: Mutex<HashMap<String, AtomicU64>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("tick_count", &self.tick_count())
            .field("population", &self.population())
            .field("log_interval", &self.log_interval)
            .finish()
    }
}

impl Metrics {
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            population: AtomicU64::new(0),
            food_count: AtomicU64::new(0),
            log_interval,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, population: usize, food: usize, groups: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.population.store(population as u64, Ordering::Relaxed);
        self.food_count.store(food as u64, Ordering::Relaxed);

        if self.log_interval > 0 && tick % self.log_interval == 0 {
            tracing::info!(
                tick = tick,
                population = population,
                food = food,
                groups = groups,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn set_log_interval(&mut self, log_interval: u64) {
        self.log_interval = log_interval;
    }

    /// Adds `by` to a named counter.
    pub fn increment_counter(&self, name: &str, by: u64) {
        if by == 0 {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(by, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.population.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn food_count(&self) -> u64 {
        self.food_count.load(Ordering::Relaxed)
    }
}

/// Installs a global fmt subscriber honouring `RUST_LOG`, defaulting to info.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tick_counts() {
        let metrics = Metrics::new(0);
        metrics.record_tick(Duration::from_millis(1), 12, 4, 1);
        metrics.record_tick(Duration::from_millis(1), 10, 3, 1);
        assert_eq!(metrics.tick_count(), 2);
        assert_eq!(metrics.population(), 10);
        assert_eq!(metrics.food_count(), 3);
    }

    #[test]
    fn test_named_counters() {
        let metrics = Metrics::default();
        metrics.increment_counter("kills", 2);
        metrics.increment_counter("kills", 1);
        metrics.increment_counter("merges", 0);
        assert_eq!(metrics.counter("kills"), 3);
        assert_eq!(metrics.counter("merges"), 0);
    }
}

//! Population statistics and the category grid handed to renderers.

use crate::grid::DisplayGrid;
use predators_data::{CellCode, Creature, Egg, Feature, PopulationStats, Position};
use std::collections::BTreeSet;

/// Refreshes the per-tick gauges. `max_age` is a running maximum; every
/// other gauge reflects the live set only.
pub fn update_population_stats(
    stats: &mut PopulationStats,
    cycle: u64,
    creatures: &[Creature],
    eggs: &[Egg],
    food_count: usize,
    group_count: usize,
) {
    let live = creatures.iter().filter(|c| c.alive);
    let (population, max_hunger, oldest) = live.fold((0usize, 0i32, 0u64), |(n, hunger, age), c| {
        (n + 1, hunger.max(c.hunger), age.max(c.age))
    });

    stats.cycle = cycle;
    stats.population = population;
    stats.unhatched_eggs = eggs.iter().filter(|e| !e.hatched).count();
    stats.food_count = food_count;
    stats.group_count = group_count;
    stats.max_hunger = max_hunger;
    stats.max_age = stats.max_age.max(oldest);
}

fn neutral_code(creature: &Creature) -> CellCode {
    if creature.coop.is_nucleus {
        CellCode::NucleusNeutral
    } else if creature.is_old {
        CellCode::OldNeutral
    } else {
        CellCode::Neutral
    }
}

fn feature_code(feature: Feature) -> CellCode {
    match feature {
        Feature::Weapon => CellCode::Weapon,
        Feature::Leg => CellCode::Leg,
        Feature::Eye => CellCode::Eye,
    }
}

/// Rebuilds `display` from scratch. Later layers overwrite earlier ones:
/// eggs, then food, then creature parts.
pub fn paint_display(
    display: &mut DisplayGrid,
    eggs: &[Egg],
    food: &BTreeSet<Position>,
    creatures: &[Creature],
) {
    display.clear();
    for egg in eggs.iter().filter(|e| !e.hatched) {
        display.stamp(egg.position, CellCode::Egg);
    }
    for &cell in food {
        display.stamp(cell, CellCode::Food);
    }
    for creature in creatures.iter().filter(|c| c.alive) {
        display.stamp(creature.head(), neutral_code(creature));
        for feature in creature.body.features() {
            if let Some(cell) = creature.body.part(feature) {
                display.stamp(cell, feature_code(feature));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predators_data::Direction;
    use uuid::Uuid;

    #[test]
    fn test_creature_layer_wins() {
        let mut display = DisplayGrid::new(6);
        let mut c = Creature::new(Uuid::nil(), Position::new(2, 2), Direction::East, 5, 0);
        c.grant(Feature::Weapon);
        let eggs = vec![Egg::new(Position::new(2, 2), 3), Egg::new(Position::new(0, 0), 3)];
        let food: BTreeSet<Position> = [Position::new(3, 2), Position::new(5, 5)].into();

        paint_display(&mut display, &eggs, &food, &[c]);
        assert_eq!(display.get(2, 2), CellCode::Neutral);
        assert_eq!(display.get(3, 2), CellCode::Weapon);
        assert_eq!(display.get(0, 0), CellCode::Egg);
        assert_eq!(display.get(5, 5), CellCode::Food);
    }

    #[test]
    fn test_nucleus_code_beats_old_code() {
        let mut c = Creature::new(Uuid::nil(), Position::new(1, 1), Direction::East, 5, 0);
        c.is_old = true;
        assert_eq!(neutral_code(&c), CellCode::OldNeutral);
        c.coop.is_nucleus = true;
        assert_eq!(neutral_code(&c), CellCode::NucleusNeutral);
    }

    #[test]
    fn test_max_age_is_running() {
        let mut stats = PopulationStats::default();
        let mut c = Creature::new(Uuid::nil(), Position::new(1, 1), Direction::East, 7, 0);
        c.age = 30;
        update_population_stats(&mut stats, 3, &[c.clone()], &[], 2, 0);
        assert_eq!(stats.max_age, 30);
        assert_eq!(stats.max_hunger, 7);
        c.age = 1;
        update_population_stats(&mut stats, 4, &[c], &[], 2, 0);
        assert_eq!(stats.max_age, 30);
        assert_eq!(stats.population, 1);
    }
}

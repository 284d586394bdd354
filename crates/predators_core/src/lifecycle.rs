use predators_data::{Creature, Direction, Egg, Position};
use rand::Rng;
use uuid::Uuid;

pub fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}

/// A fresh hatchling: full hunger, no features, random heading.
pub fn create_creature_with_rng<R: Rng>(
    position: Position,
    hunger_cycles: u32,
    cycle: u64,
    rng: &mut R,
) -> Creature {
    let id = Uuid::from_u128(rng.gen::<u128>());
    let direction = random_direction(rng);
    Creature::new(id, position, direction, hunger_as_i32(hunger_cycles), cycle)
}

#[inline]
pub fn hunger_as_i32(hunger_cycles: u32) -> i32 {
    i32::try_from(hunger_cycles).unwrap_or(i32::MAX)
}

/// Stamps every not-yet-observed, unhatched egg with `boundary_cycle`.
pub fn observe_eggs(eggs: &mut [Egg], boundary_cycle: u64) {
    for egg in eggs.iter_mut().filter(|e| !e.hatched && e.born_cycle.is_none()) {
        egg.born_cycle = Some(boundary_cycle);
    }
}

/// Hatches every egg whose incubation window has elapsed by `cycle`.
pub fn hatch_eggs<R: Rng>(
    eggs: &mut [Egg],
    cycle: u64,
    hunger_cycles: u32,
    rng: &mut R,
) -> Vec<Creature> {
    let mut hatchlings = Vec::new();
    for egg in eggs.iter_mut().filter(|e| !e.hatched) {
        if egg.is_due(cycle) {
            egg.hatched = true;
            hatchlings.push(create_creature_with_rng(
                egg.position,
                hunger_cycles,
                cycle,
                rng,
            ));
        }
    }
    hatchlings
}

/// A meal restores hunger to the full budget.
pub fn feed(creature: &mut Creature, hunger_cycles: u32) {
    creature.hunger = hunger_as_i32(hunger_cycles);
}

/// Newborns sit out the tick they hatched on.
pub fn is_newborn(creature: &Creature, cycle: u64) -> bool {
    creature.born_cycle == cycle && creature.age == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hatch_waits_for_incubation() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut eggs = vec![Egg::new(Position::new(2, 3), 2)];
        observe_eggs(&mut eggs, 0);
        assert!(hatch_eggs(&mut eggs, 1, 40, &mut rng).is_empty());
        let born = hatch_eggs(&mut eggs, 2, 40, &mut rng);
        assert_eq!(born.len(), 1);
        assert_eq!(born[0].head(), Position::new(2, 3));
        assert_eq!(born[0].hunger, 40);
        assert_eq!(born[0].feature_count(), 0);
        assert!(eggs[0].hatched);
    }

    #[test]
    fn test_observation_is_sticky() {
        let mut eggs = vec![Egg::new(Position::new(0, 0), 5)];
        observe_eggs(&mut eggs, 3);
        observe_eggs(&mut eggs, 9);
        assert_eq!(eggs[0].born_cycle, Some(3));
    }

    #[test]
    fn test_seeded_creation_is_reproducible() {
        let a = create_creature_with_rng(Position::new(1, 1), 10, 0, &mut ChaCha8Rng::seed_from_u64(7));
        let b = create_creature_with_rng(Position::new(1, 1), 10, 0, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a.id, b.id);
        assert_eq!(a.direction, b.direction);
    }
}

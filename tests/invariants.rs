mod common;

use common::WorldBuilder;
use predators_lib::model::data::{Feature, MAX_BODY_CELLS, MAX_FEATURES};
use predators_lib::model::world::World;
use proptest::prelude::*;

fn check_invariants(world: &World) -> Result<(), TestCaseError> {
    for c in &world.creatures {
        prop_assert!(c.alive, "dead creature left in the live set");
        prop_assert!(c.cell_count() <= MAX_BODY_CELLS);
        prop_assert!(c.feature_count() <= MAX_FEATURES);
        prop_assert!(world.grid.contains(c.head()));
        if let Some(gid) = c.coop.group {
            let group = world.groups.get(gid);
            prop_assert!(group.is_some(), "creature points at a missing group");
            prop_assert!(group.is_some_and(|g| g.contains(c.id)));
        }
    }

    for group in world.groups.iter() {
        prop_assert!(group.size() >= 2);
        prop_assert_eq!(group.members[0], group.nucleus);
        let mut nuclei = 0;
        for feature in Feature::ALL {
            let holders = group
                .members
                .iter()
                .filter_map(|id| world.creature(*id))
                .filter(|c| c.has_feature(feature))
                .count();
            prop_assert!(holders <= 1, "{:?} held twice in one group", feature);
        }
        for id in &group.members {
            let member = world.creature(*id);
            prop_assert!(member.is_some(), "group member missing from the live set");
            if let Some(m) = member {
                prop_assert_eq!(m.coop.group, Some(group.id));
                if m.coop.is_nucleus {
                    nuclei += 1;
                }
            }
        }
        prop_assert_eq!(nuclei, 1);
    }

    for cell in &world.food {
        prop_assert!(world.grid.contains(*cell));
    }
    prop_assert_eq!(world.stats().unhatched_eggs, world.unhatched_egg_count());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_world_invariants_hold_every_tick(
        seed in any::<u64>(),
        eggs in prop::collection::vec((0i32..12, 0i32..12), 1..40),
        food in prop::collection::vec((0i32..12, 0i32..12), 0..40),
    ) {
        let mut world = WorldBuilder::new()
            .with_seed(seed)
            .with_grid_size(12)
            .with_config(|c| {
                c.lifecycle.incubate_cycles = 2;
                c.lifecycle.maturity_cycles = 15;
                c.lifecycle.lay_egg_interval = 6;
                c.lifecycle.hunger_cycles = 25;
                c.evolution.feature_rarity = 0.0;
                c.movement.food_attract_radius = 4;
                c.social.recruit_radius = 3;
            })
            .build();
        for (x, y) in eggs {
            world.add_egg(x, y);
        }
        for (x, y) in food {
            world.add_food(x, y);
        }

        for _ in 0..80 {
            world.advance_tick();
            check_invariants(&world)?;
        }
    }

    #[test]
    fn prop_add_food_is_idempotent(x in -5i32..15, y in -5i32..15, repeats in 1usize..5) {
        let mut world = WorldBuilder::new().build();
        let first = world.add_food(x, y);
        for _ in 1..repeats {
            prop_assert!(!world.add_food(x, y));
        }
        let inside = (0..10).contains(&x) && (0..10).contains(&y);
        prop_assert_eq!(first, inside);
        prop_assert_eq!(world.food_count(), usize::from(inside));
    }
}

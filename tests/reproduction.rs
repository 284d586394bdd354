mod common;

use common::{CreatureBuilder, WorldBuilder};
use predators_lib::model::data::Feature;

#[test]
fn test_complete_creature_lays_on_interval() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.lifecycle.lay_egg_interval = 5)
        .with_creature(CreatureBuilder::new(1).at(5, 5).complete().build())
        .build();

    for tick in 1..=4 {
        let report = world.advance_tick();
        assert_eq!(report.eggs_laid, 0, "laid early on tick {tick}");
        assert!(world.eggs.is_empty());
    }

    let report = world.advance_tick();
    assert_eq!(report.eggs_laid, 1);
    assert_eq!(world.eggs.len(), 1);
    assert_eq!(world.eggs[0].position, world.creatures[0].head());
    assert_eq!(world.eggs[0].incubate_cycles, 20);
    assert_eq!(world.creatures[0].last_lay_cycle, 5);
    assert_eq!(world.stats().total_eggs_laid, 1);
}

#[test]
fn test_lay_timer_restarts_after_laying() {
    let mut world = WorldBuilder::new()
        .with_config(|c| {
            c.lifecycle.lay_egg_interval = 3;
            c.movement.food_attract_radius = 1;
        })
        .with_creature(CreatureBuilder::new(1).at(5, 5).complete().build())
        .build();

    let laid: Vec<usize> = (0..9).map(|_| world.advance_tick().eggs_laid).collect();
    assert_eq!(laid, vec![0, 0, 1, 0, 0, 1, 0, 0, 1]);
}

#[test]
fn test_incomplete_creature_never_lays() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.lifecycle.lay_egg_interval = 2)
        .with_creature(
            CreatureBuilder::new(1)
                .with_feature(Feature::Weapon)
                .with_feature(Feature::Eye)
                .build(),
        )
        .build();

    for _ in 0..10 {
        assert_eq!(world.advance_tick().eggs_laid, 0);
    }
}

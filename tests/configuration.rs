mod common;

use common::WorldBuilder;
use predators_lib::model::config::AppConfig;
use predators_lib::model::error::{ConfigError, SimError};
use predators_lib::model::world::World;

#[test]
fn test_zero_grid_is_rejected() {
    let mut config = AppConfig::default();
    config.world.grid_size = 0;
    let err = World::new(config).unwrap_err();
    assert!(matches!(
        err,
        SimError::Config(ConfigError::GridSize { value: 0, .. })
    ));
}

#[test]
fn test_radius_must_fit_grid() {
    let mut config = AppConfig::default();
    config.world.grid_size = 4;
    config.movement.food_attract_radius = 4;
    config.social.recruit_radius = 1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::RadiusTooLarge {
            name: "food_attract_radius",
            ..
        })
    ));
}

#[test]
fn test_changing_grid_size_resets_state() {
    let mut world = WorldBuilder::new().with_food(1, 1).with_egg(2, 2).build();
    world.advance_tick();

    let mut config = world.config.clone();
    config.world.grid_size = 20;
    world.configure(config).unwrap();

    assert_eq!(world.cycle, 0);
    assert_eq!(world.food_count(), 0);
    assert_eq!(world.unhatched_egg_count(), 0);
    assert_eq!(world.snapshot_grid().cells.len(), 400);
    assert!(world.add_food(15, 15));
}

#[test]
fn test_same_grid_keeps_state() {
    let mut world = WorldBuilder::new().with_food(1, 1).build();
    world.advance_tick();

    let mut config = world.config.clone();
    config.lifecycle.hunger_cycles = 99;
    world.configure(config).unwrap();

    assert_eq!(world.cycle, 1);
    assert_eq!(world.food_count(), 1);
    assert_eq!(world.config.lifecycle.hunger_cycles, 99);
}

#[test]
fn test_invalid_reconfigure_leaves_world_untouched() {
    let mut world = WorldBuilder::new().with_food(1, 1).build();
    let mut config = world.config.clone();
    config.evolution.feature_rarity = 1.5;
    assert!(world.configure(config).is_err());
    assert_eq!(world.config.evolution.feature_rarity, 0.3);
    assert_eq!(world.food_count(), 1);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = AppConfig::from_toml(
        r#"
        [world]
        grid_size = 25

        [social]
        recruit_radius = 3
        "#,
    )
    .unwrap();
    assert_eq!(config.world.grid_size, 25);
    assert_eq!(config.social.recruit_radius, 3);
    assert_eq!(config.lifecycle.hunger_cycles, 40);
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use predators_core::config::AppConfig;
use predators_core::targeting::TargetSet;
use predators_core::world::World;
use predators_data::Position;

fn seeded_world(size: u16, eggs: i32) -> World {
    let mut config = AppConfig::default();
    config.world.grid_size = size;
    config.world.seed = Some(42);
    config.lifecycle.incubate_cycles = 1;
    config.log_interval = 0;
    let mut world = World::new(config).expect("valid benchmark config");
    let size = i32::from(size);
    for i in 0..eggs {
        world.add_egg((i * 7) % size, (i * 13) % size);
        world.add_food((i * 11) % size, (i * 3) % size);
    }
    world
}

fn bench_world_tick(c: &mut Criterion) {
    c.bench_function("world_tick_100x100_500_eggs", |b| {
        let mut world = seeded_world(100, 500);
        b.iter(|| black_box(world.advance_tick()))
    });
}

fn bench_world_first_hundred_ticks(c: &mut Criterion) {
    c.bench_function("world_100_ticks_40x40", |b| {
        b.iter(|| {
            let mut world = seeded_world(40, 120);
            for _ in 0..100 {
                world.advance_tick();
            }
            black_box(world.stats().population)
        })
    });
}

fn bench_nearest_target(c: &mut Criterion) {
    let targets = TargetSet::from_sources(
        (0..1000).map(|i| Position::new((i * 37) % 200, (i * 91) % 200)),
        std::iter::empty(),
    );
    c.bench_function("target_nearest_radius_5", |b| {
        b.iter(|| black_box(targets.nearest(black_box(Position::new(100, 100)), 5)))
    });
}

criterion_group!(
    benches,
    bench_world_tick,
    bench_world_first_hundred_ticks,
    bench_nearest_target
);
criterion_main!(benches);

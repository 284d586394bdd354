use predators_lib::model::config::AppConfig;
use predators_lib::model::data::{Creature, Direction, Feature, Position};
use predators_lib::model::world::World;
use uuid::Uuid;

type WorldMod = Box<dyn FnOnce(&mut World)>;

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    creatures: Vec<Creature>,
    mods: Vec<WorldMod>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.grid_size = 10;
        config.world.seed = Some(0);
        config.log_interval = 0;
        Self {
            config,
            creatures: Vec::new(),
            mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_grid_size(mut self, size: u16) -> Self {
        self.config.world.grid_size = size;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_creature(mut self, creature: Creature) -> Self {
        self.creatures.push(creature);
        self
    }

    pub fn with_egg(mut self, x: i32, y: i32) -> Self {
        self.mods.push(Box::new(move |world| {
            world.add_egg(x, y);
        }));
        self
    }

    pub fn with_food(mut self, x: i32, y: i32) -> Self {
        self.mods.push(Box::new(move |world| {
            world.add_food(x, y);
        }));
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config).expect("Failed to create world in test builder");
        for modifier in self.mods {
            modifier(&mut world);
        }
        for c in self.creatures {
            assert!(world.spawn_creature(c), "creature rejected by test builder");
        }
        world
    }
}

#[allow(dead_code)]
pub struct CreatureBuilder {
    id: u128,
    position: Position,
    direction: Direction,
    hunger: i32,
    age: u64,
    old: bool,
    features: Vec<Feature>,
}

#[allow(dead_code)]
impl CreatureBuilder {
    pub fn new(id: u128) -> Self {
        Self {
            id,
            position: Position::new(5, 5),
            direction: Direction::East,
            hunger: 40,
            age: 1,
            old: false,
            features: Vec::new(),
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn facing(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn hunger(mut self, hunger: i32) -> Self {
        self.hunger = hunger;
        self
    }

    /// Marks the creature old from `age` onward.
    pub fn old(mut self, age: u64) -> Self {
        self.age = age;
        self.old = true;
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn complete(self) -> Self {
        self.with_feature(Feature::Weapon)
            .with_feature(Feature::Leg)
            .with_feature(Feature::Eye)
    }

    pub fn build(self) -> Creature {
        let mut c = Creature::new(
            Uuid::from_u128(self.id),
            self.position,
            self.direction,
            self.hunger,
            0,
        );
        c.age = self.age;
        if self.old {
            c.is_old = true;
            c.old_since_age = Some(self.age);
            // Keep loss draws out of short tests.
            c.last_feature_loss_age = Some(self.age);
        }
        for f in self.features {
            c.grant(f);
        }
        c
    }
}

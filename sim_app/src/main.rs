//! Headless grid physics demo
//!
//! Builds a small level (floor, a stair, a one-way platform, a ramp and a
//! handful of randomly dropped crates), then walks a player across it at a
//! fixed tick rate while logging contacts.
//!
//! Usage: `sim_demo [config.toml|config.ron] [seconds]`

use grid_physics::foundation::logging;
use grid_physics::prelude::*;
use rand::Rng;
use std::time::{Duration, Instant};

const TICK_RATE: u32 = 60;
const DEFAULT_SECONDS: f64 = 5.0;
const PLAYER_SPEED: f64 = 3.0;
const CRATE_COUNT: u32 = 6;

struct Demo {
    world: PhysicsWorld,
    player: Id,
    clock: TickClock,
    contacts: usize,
}

impl Demo {
    fn new(config: WorldConfig) -> Result<Self, PhysicsError> {
        let mut world = PhysicsWorld::new(config)?;
        build_level(&mut world);

        let player = Id::new(Space::Player, 1);
        world.spawn(
            Body::new(
                player,
                Profile::rect(Vec2::new(-8.0, 1.0), Vec2::new(0.8, 1.6))
                    .with_vel(Vec2::new(PLAYER_SPEED, 0.0)),
                Attributes::SOLID,
            ),
            true,
        );
        spawn_crates(&mut world);

        Ok(Self {
            world,
            player,
            clock: TickClock::from_rate(TICK_RATE),
            contacts: 0,
        })
    }

    fn run(&mut self, seconds: f64) {
        let total_ticks = (seconds * f64::from(TICK_RATE)).ceil() as u64;
        log::info!("Running {} ticks at {} Hz", total_ticks, TICK_RATE);

        let frame = Duration::from_secs_f64(self.clock.tick_duration());
        let mut last = Instant::now();
        while self.clock.tick() < total_ticks {
            std::thread::sleep(frame);
            let now = Instant::now();
            let due = self.clock.advance((now - last).as_secs_f64());
            last = now;

            for _ in 0..due {
                self.tick();
            }
        }

        log::info!(
            "Finished after {} ticks, {} contacts resolved",
            self.world.tick(),
            self.contacts
        );
    }

    fn tick(&mut self) {
        // keep walking right; snap zeroes vx when a wall blocks
        if let Err(e) = self.world.update(self.player, |body| {
            let vel = *body.profile.vel();
            body.profile.set_vel(Vec2::new(PLAYER_SPEED, vel.y));
        }) {
            log::warn!("Failed to steer player: {}", e);
        }

        let dt = self.clock.tick_duration();
        for (id, result) in self.world.step(dt) {
            if result.snap {
                self.contacts += 1;
                log::trace!(
                    "{} adjusted by ({:.3}, {:.3})",
                    id,
                    result.pos_adjustment.x,
                    result.pos_adjustment.y
                );
            }
        }

        if self.world.tick() % u64::from(TICK_RATE) == 0 {
            if let Some(body) = self.world.body(self.player) {
                let pos = body.profile.pos();
                log::info!("Tick {}: player at ({:.2}, {:.2})", self.world.tick(), pos.x, pos.y);
            }
            let deltas = self.world.take_deltas();
            log::debug!("{} bodies changed since last sample", deltas.len());
        }
    }
}

fn build_level(world: &mut PhysicsWorld) {
    let walls = [
        // floor
        (Profile::rect(Vec2::new(0.0, -0.5), Vec2::new(30.0, 1.0)), Attributes::SOLID),
        // single step
        (Profile::rect(Vec2::new(-3.0, 0.15), Vec2::new(2.0, 0.3)), Attributes::SOLID | Attributes::STAIR),
        // one-way ledge
        (Profile::rect(Vec2::new(2.0, 2.0), Vec2::new(3.0, 0.2)), Attributes::PLATFORM),
        // slope rising to the right
        (
            Profile::polygon(
                Vec2::new(7.0, 0.0),
                vec![Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 1.5)],
            ),
            Attributes::SOLID | Attributes::RAMP,
        ),
        // end wall
        (Profile::rect(Vec2::new(12.0, 2.0), Vec2::new(1.0, 4.0)), Attributes::SOLID),
    ];

    for (index, (profile, attributes)) in (1u32..).zip(walls) {
        world.spawn(Body::new(Id::new(Space::Wall, index), profile, attributes), false);
    }
    log::info!("Level built: {} static bodies", world.grid().len());
}

fn spawn_crates(world: &mut PhysicsWorld) {
    let mut rng = rand::thread_rng();
    for index in 0..CRATE_COUNT {
        let pos = Vec2::new(rng.gen_range(-10.0..10.0), rng.gen_range(3.0..6.0));
        let size = rng.gen_range(0.4..0.9);
        world.spawn(
            Body::new(
                Id::new(Space::Pickup, index + 1),
                Profile::rect(pos, Vec2::new(size, size)),
                Attributes::SOLID,
            ),
            true,
        );
    }
}

fn load_config(path: Option<&String>) -> Result<WorldConfig, ConfigError> {
    match path {
        Some(path) => WorldConfig::load_from_file(path),
        None => Ok(WorldConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let loaded = load_config(args.first());

    // the configured level can only be applied once the file is read
    let level = loaded
        .as_ref()
        .map_or_else(|_| "info".to_string(), |config| config.log_level.clone());
    logging::init_with_level(&level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}, using defaults", e);
        WorldConfig::default()
    });
    let seconds = args
        .get(1)
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let mut demo = Demo::new(config)?;
    demo.run(seconds);
    Ok(())
}

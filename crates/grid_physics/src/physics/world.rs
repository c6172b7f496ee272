//! Fixed-tick world driver
//!
//! Owns the grid and runs the per-tick pipeline for every dynamic body:
//! integrate, relocate in the grid, gather candidates, snap, relocate again.
//! Static bodies are indexed but never moved by the world.

use std::collections::{BTreeSet, HashMap};

use crate::core::config::WorldConfig;
use crate::foundation::delta::DEFAULT_TTL;
use crate::foundation::math::Vec2;
use crate::foundation::time::Stopwatch;
use crate::physics::collider_options::ColliderOptions;
use crate::physics::collision::{ProfileDelta, SnapResult};
use crate::physics::id::{Attributes, Id};
use crate::physics::PhysicsError;
use crate::spatial::{Body, Grid, LineHit};

/// Grid plus the set of bodies it simulates
#[derive(Debug)]
pub struct PhysicsWorld {
    config: WorldConfig,
    grid: Grid,
    dynamic: BTreeSet<Id>,
    filters: HashMap<Id, ColliderOptions>,
    tick: u64,
}

impl PhysicsWorld {
    /// Create an empty world after validating the configuration
    pub fn new(config: WorldConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        log::info!(
            "Physics world: tile size {}, gravity {:?}",
            config.grid.tile_size,
            config.gravity
        );
        Ok(Self {
            grid: Grid::new(&config.grid),
            config,
            dynamic: BTreeSet::new(),
            filters: HashMap::new(),
            tick: 0,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Spatial index
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Ticks stepped so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Add or replace a body. Dynamic bodies are integrated and resolved
    /// every step.
    pub fn spawn(&mut self, mut body: Body, dynamic: bool) {
        if self.config.delta.ttl != DEFAULT_TTL {
            body.profile.set_delta_ttl(self.config.delta.ttl);
        }
        body.profile.advance_tick(self.tick);
        log::debug!(
            "Spawn {} ({}, {})",
            body.id,
            body.profile.shape().name(),
            if dynamic { "dynamic" } else { "static" }
        );
        if dynamic {
            self.dynamic.insert(body.id);
        } else {
            self.dynamic.remove(&body.id);
        }
        self.grid.upsert(body);
    }

    /// Remove a body. Absent ids are a no-op.
    pub fn despawn(&mut self, id: Id) -> Option<Body> {
        self.dynamic.remove(&id);
        self.filters.remove(&id);
        self.grid.delete(id)
    }

    /// Stored body
    pub fn body(&self, id: Id) -> Option<&Body> {
        self.grid.get(id)
    }

    /// Mutate a body through a closure; the grid is updated afterwards so
    /// moves and resizes are re-indexed.
    pub fn update<F>(&mut self, id: Id, f: F) -> Result<(), PhysicsError>
    where
        F: FnOnce(&mut Body),
    {
        let mut body = self.grid.get(id).cloned().ok_or(PhysicsError::UnknownBody(id))?;
        f(&mut body);
        if body.id != id {
            log::warn!("Body {} changed its id to {}, keeping {}", id, body.id, id);
            body.id = id;
        }
        self.grid.upsert(body);
        Ok(())
    }

    /// Override which bodies a dynamic body collides with. The body itself
    /// is always excluded.
    pub fn set_collider_options(&mut self, id: Id, options: ColliderOptions) {
        self.filters.insert(id, options);
    }

    /// Filter used when resolving `id`
    pub fn collider_options(&self, id: Id) -> ColliderOptions {
        self.filters
            .get(&id)
            .cloned()
            .unwrap_or_else(|| {
                ColliderOptions::all_spaces()
                    .with_attributes(Attributes::DEAD | Attributes::INTANGIBLE, false)
            })
            .with_ids([id], false)
    }

    /// Advance every dynamic body by `dt` seconds, in id order
    pub fn step(&mut self, dt: f64) -> Vec<(Id, SnapResult)> {
        let stopwatch = Stopwatch::start_new();
        self.tick += 1;
        let gravity = self.config.gravity();

        let ids: Vec<Id> = self.dynamic.iter().copied().collect();
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(mut body) = self.grid.get(id).cloned() else {
                continue;
            };
            body.profile.advance_tick(self.tick);
            body.profile.apply_forces();
            body.profile.integrate(dt, &gravity);
            self.grid.upsert(body.clone());

            let result = self.resolve(&mut body);
            self.grid.upsert(body);
            results.push((id, result));
        }

        log::debug!(
            "Tick {}: {} dynamic bodies, {} contacts in {:.3} ms",
            self.tick,
            results.len(),
            results.iter().filter(|(_, result)| result.snap).count(),
            stopwatch.elapsed_millis()
        );
        results
    }

    /// One resolution pass for a body without integrating it
    pub fn snap_body(&mut self, id: Id) -> Result<SnapResult, PhysicsError> {
        let mut body = self.grid.get(id).cloned().ok_or(PhysicsError::UnknownBody(id))?;
        let result = self.resolve(&mut body);
        self.grid.upsert(body);
        Ok(result)
    }

    /// Closest body crossed by `origin + ray * t`, `t` in `[0, 1]`
    pub fn raycast(&self, origin: Vec2, ray: Vec2, options: &ColliderOptions) -> Option<LineHit> {
        self.grid.query_line(origin, ray, options)
    }

    /// Drain pending profile changes of every body
    pub fn take_deltas(&mut self) -> Vec<(Id, ProfileDelta)> {
        self.grid.drain_deltas()
    }

    fn resolve(&self, body: &mut Body) -> SnapResult {
        let options = self.collider_options(body.id);
        let candidates = self.grid.query_colliders(&body.profile, &options);
        let result = body.profile.snap(candidates, &self.config.snap);
        if result.snap {
            log::trace!("{} snapped by {:?}", body.id, result.pos_adjustment);
        }
        result
    }
}

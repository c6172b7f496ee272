//! # Grid Physics
//!
//! A 2D collision engine built around a uniform-grid spatial index and a
//! per-tick penetration-resolution pass ("snap").
//!
//! ## Features
//!
//! - **Uniform Grid**: Tile-bucketed broad phase with DDA raycasting
//! - **Profiles**: Rectangles, circles, rotated convex polygons and composites
//! - **Snap**: Single-axis resolution with stair, ramp and one-way platform rules
//! - **Change Tracking**: Per-attribute deltas for network or replay sampling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grid_physics::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let mut world = PhysicsWorld::new(WorldConfig::default())?;
//!     world.spawn(
//!         Body::new(
//!             Id::new(Space::Wall, 1),
//!             Profile::rect(Vec2::new(0.0, -0.5), Vec2::new(20.0, 1.0)),
//!             Attributes::SOLID,
//!         ),
//!         false,
//!     );
//!     world.spawn(
//!         Body::new(
//!             Id::new(Space::Player, 1),
//!             Profile::rect(Vec2::new(0.0, 3.0), Vec2::new(1.0, 1.0)),
//!             Attributes::SOLID,
//!         ),
//!         true,
//!     );
//!
//!     for _ in 0..60 {
//!         world.step(1.0 / 60.0);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{DeltaConfig, GridConfig, SnapConfig, WorldConfig},
        foundation::{
            math::{Axis, Vec2, Vec2Ext},
            time::{Stopwatch, TickClock},
        },
        physics::{
            collision::{Aabb, Line, Profile, ProfileDelta, Shape, SnapResult, SubProfile},
            Attributes, ColliderOptions, Id, PhysicsError, PhysicsWorld, Space,
        },
        spatial::{Body, Grid, LineHit},
    };
}

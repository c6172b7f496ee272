//! Physics module for collision detection and response
//!
//! Profiles describe shape and motion, the collider filter selects which
//! bodies a query sees, snap resolves penetrations, and the world driver
//! runs the whole pipeline once per tick.

pub mod collider_options;
pub mod collision;
pub mod id;
mod snap;
pub mod world;

#[cfg(test)]
mod tests;

pub use collider_options::ColliderOptions;
pub use collision::{Profile, ProfileDelta, Shape, SnapResult, SubProfile};
pub use id::{Attributes, Id, Space, SpaceMask};
pub use world::PhysicsWorld;

use crate::config::ConfigError;

/// Errors surfaced by the world driver
#[derive(thiserror::Error, Debug)]
pub enum PhysicsError {
    /// Configuration failed to load or validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No body is registered under this id
    #[error("Unknown body: {0}")]
    UnknownBody(Id),
}

//! # Core Module
//!
//! Shared abstractions used by every subsystem of the collision core.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for grid, snap and change tracking
//! - **Foundation**: Low-level utilities (math, change tracking, timing, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    WorldConfig,
    GridConfig,
    SnapConfig,
    DeltaConfig,
    Config,
    ConfigError,
};

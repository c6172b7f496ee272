//! # Unified Configuration
//!
//! Every tunable of the collision core lives here: grid tile size, snap
//! tolerances and stair stepping, change-tracking TTL and world gravity.
//!
//! ## Design Goals
//!
//! - **Centralized**: All configuration types in one place for easy discovery
//! - **Serializable**: Loadable from TOML or RON through [`Config`]
//! - **Type Safe**: Defaults for every field, explicit `validate`

use serde::{Serialize, Deserialize};

use crate::foundation::math::{constants, Vec2};

// Re-export from the config module for compatibility
pub use crate::config::{Config, ConfigError};

/// # Grid Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// World units per grid tile
    pub tile_size: f64,
}

impl GridConfig {
    /// Create a grid configuration with the given tile size
    pub fn new(tile_size: f64) -> Self {
        Self { tile_size }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tile_size must be positive and finite, got {}",
                self.tile_size
            )));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// # Snap Configuration
///
/// Tolerances and per-contact-type tuning for penetration resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Below this an adjustment or relative velocity counts as zero
    pub epsilon: f64,
    /// Tallest lift a stair contact may apply in one tick
    pub max_step_height: f64,
    /// Fraction of the remaining stair height lifted per tick
    pub stair_smoothing: f64,
    /// Smallest lift per tick while climbing, so climbs always finish
    pub min_stair_lift: f64,
    /// Allow the pass-through ("reverse") branch of box adjustment
    pub reverse_overlap: bool,
    /// Only take the reverse branch once the overlap passes half the
    /// combined extent
    pub reverse_depth_guard: bool,
}

impl SnapConfig {
    /// Set the maximum stair step height
    pub fn with_max_step_height(mut self, height: f64) -> Self {
        self.max_step_height = height;
        self
    }

    /// Set the stair smoothing fraction
    pub fn with_stair_smoothing(mut self, smoothing: f64) -> Self {
        self.stair_smoothing = smoothing;
        self
    }

    /// Enable or disable the reverse-overlap branch
    pub fn with_reverse_overlap(mut self, enabled: bool) -> Self {
        self.reverse_overlap = enabled;
        self
    }

    /// Require deep penetration before taking the reverse branch
    pub fn with_reverse_depth_guard(mut self, enabled: bool) -> Self {
        self.reverse_depth_guard = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "epsilon must be in (0, 1), got {}",
                self.epsilon
            )));
        }
        if self.max_step_height < 0.0 {
            return Err(ConfigError::Invalid("max_step_height cannot be negative".to_string()));
        }
        if !(self.stair_smoothing > 0.0 && self.stair_smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "stair_smoothing must be in (0, 1], got {}",
                self.stair_smoothing
            )));
        }
        if self.min_stair_lift < 0.0 {
            return Err(ConfigError::Invalid("min_stair_lift cannot be negative".to_string()));
        }
        Ok(())
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            epsilon: constants::EPSILON,
            max_step_height: 0.5,
            stair_smoothing: 0.5,
            min_stair_lift: 0.05,
            reverse_overlap: true,
            reverse_depth_guard: false,
        }
    }
}

/// # Delta Configuration
///
/// How long a change to a tracked profile attribute stays reportable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaConfig {
    /// Samples each change is reported for (1 = pop once)
    pub ttl: u8,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            ttl: crate::foundation::delta::DEFAULT_TTL,
        }
    }
}

/// # World Configuration
///
/// Top-level configuration for a [`PhysicsWorld`](crate::physics::PhysicsWorld).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Constant acceleration applied to dynamic bodies
    pub gravity: Vec2,
    /// Log level for the demo binary and `logging::init_with_level`
    pub log_level: String,
    /// Grid settings
    pub grid: GridConfig,
    /// Snap settings
    pub snap: SnapConfig,
    /// Change tracking settings
    pub delta: DeltaConfig,
}

impl WorldConfig {
    /// Create a new world configuration with defaults
    pub fn new() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
            log_level: "info".to_string(),
            grid: GridConfig::default(),
            snap: SnapConfig::default(),
            delta: DeltaConfig::default(),
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the grid tile size
    pub fn with_tile_size(mut self, tile_size: f64) -> Self {
        self.grid.tile_size = tile_size;
        self
    }

    /// Set snap settings
    pub fn with_snap(mut self, snap: SnapConfig) -> Self {
        self.snap = snap;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Gravity applied each step
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        self.grid.validate()?;
        self.snap.validate()?;
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for WorldConfig {}

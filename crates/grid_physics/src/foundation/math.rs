//! Math utilities and types
//!
//! Provides the 2D vector type used by every profile, line and grid query,
//! plus the handful of operations the collision code needs on top of nalgebra.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// Math constants
pub mod constants {
    /// Tolerance used for every approximate comparison in the engine
    pub const EPSILON: f64 = 1e-6;

    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Approximately zero
    pub fn approx_zero(value: f64) -> bool {
        value.abs() < constants::EPSILON
    }
}

/// Axis selector for per-axis vector access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis (positive is up)
    Y,
}

impl Axis {
    /// Both axes in X, Y order
    pub const BOTH: [Self; 2] = [Self::X, Self::Y];

    /// The perpendicular axis
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Unit vector along this axis
    pub fn unit(self) -> Vec2 {
        match self {
            Self::X => Vec2::new(1.0, 0.0),
            Self::Y => Vec2::new(0.0, 1.0),
        }
    }
}

/// Extension trait for Vec2 with the operations collision code relies on
pub trait Vec2Ext: Sized {
    /// Add `other * scale`
    fn add_scaled(&self, other: &Vec2, scale: f64) -> Vec2;

    /// Normalize, leaving vectors shorter than epsilon untouched
    fn normalize_or_self(&self) -> Vec2;

    /// Rotate counter-clockwise by `angle` radians
    fn rotate(&self, angle: f64) -> Vec2;

    /// Scalar 2D cross product (z of the 3D cross)
    fn cross2(&self, other: &Vec2) -> f64;

    /// Heading angle in radians
    fn heading(&self) -> f64;

    /// Both components approximately zero
    fn approx_zero(&self) -> bool;

    /// Component along an axis
    fn axis(&self, axis: Axis) -> f64;

    /// Overwrite the component along an axis
    fn set_axis(&mut self, axis: Axis, value: f64);
}

impl Vec2Ext for Vec2 {
    fn add_scaled(&self, other: &Vec2, scale: f64) -> Vec2 {
        self + other * scale
    }

    fn normalize_or_self(&self) -> Vec2 {
        let length = self.norm();
        if length < constants::EPSILON {
            *self
        } else {
            self / length
        }
    }

    fn rotate(&self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    fn cross2(&self, other: &Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }

    fn approx_zero(&self) -> bool {
        utils::approx_zero(self.x) && utils::approx_zero(self.y)
    }

    fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    fn set_axis(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

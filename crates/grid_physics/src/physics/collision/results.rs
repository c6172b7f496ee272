//! Mergeable query results
//!
//! Every query on a profile returns one of these accumulators so that
//! composite profiles can fold the answers of their parts into one:
//! booleans merge with OR, intersection parameters with MIN, and adjustment
//! vectors keep the larger magnitude per axis.

use crate::foundation::math::{constants::EPSILON, Axis, Vec2, Vec2Ext};

/// Per-axis maximum by absolute value, keeping the sign of the winner
pub fn abs_max(a: &Vec2, b: &Vec2) -> Vec2 {
    let pick = |x: f64, y: f64| if y.abs() > x.abs() { y } else { x };
    Vec2::new(pick(a.x, b.x), pick(a.y, b.y))
}

/// Pair of axis flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Axes {
    /// X flag
    pub x: bool,
    /// Y flag
    pub y: bool,
}

impl Axes {
    /// Neither axis
    pub const NONE: Self = Self { x: false, y: false };
    /// Both axes
    pub const BOTH: Self = Self { x: true, y: true };

    /// Only the given axis
    pub const fn only(axis: Axis) -> Self {
        match axis {
            Axis::X => Self { x: true, y: false },
            Axis::Y => Self { x: false, y: true },
        }
    }

    /// Flag for an axis
    pub const fn get(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Whether any flag is set
    pub const fn any(&self) -> bool {
        self.x || self.y
    }

    /// OR-merge
    pub fn merge(&mut self, other: Self) {
        self.x |= other.x;
        self.y |= other.y;
    }

    /// Keep only the components whose flag is set
    pub fn mask(&self, v: &Vec2) -> Vec2 {
        Vec2::new(
            if self.x { v.x } else { 0.0 },
            if self.y { v.y } else { 0.0 },
        )
    }
}

/// Result of a point containment test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainsResult {
    /// Point lies inside
    pub contains: bool,
    /// The part that contained it is deliberately non-colliding
    pub ignored: bool,
}

impl ContainsResult {
    /// Plain result
    pub const fn new(contains: bool) -> Self {
        Self { contains, ignored: false }
    }

    /// OR-merge
    pub fn merge(&mut self, other: Self) {
        self.contains |= other.contains;
        self.ignored |= other.ignored;
    }
}

/// Result of a line intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectResult {
    /// Line crosses the shape boundary
    pub hit: bool,
    /// The hit was on a deliberately non-colliding part
    pub ignored: bool,
    /// Line parameter of the closest crossing (1.0 when no hit)
    pub t: f64,
}

impl Default for IntersectResult {
    fn default() -> Self {
        Self::miss()
    }
}

impl IntersectResult {
    /// No crossing
    pub const fn miss() -> Self {
        Self { hit: false, ignored: false, t: 1.0 }
    }

    /// Crossing at `t`
    pub const fn hit(t: f64) -> Self {
        Self { hit: true, ignored: false, t }
    }

    /// From an optional parameter
    pub fn from_t(t: Option<f64>) -> Self {
        t.map_or_else(Self::miss, Self::hit)
    }

    /// Hit parameter, if any
    pub fn t(&self) -> Option<f64> {
        self.hit.then_some(self.t)
    }

    /// OR flags, MIN parameter over hits
    pub fn merge(&mut self, other: Self) {
        if other.hit && (!self.hit || other.t < self.t) {
            self.t = other.t;
        }
        self.hit |= other.hit;
        self.ignored |= other.ignored;
    }
}

/// Result of a shape overlap test
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlapResult {
    /// Shapes overlap
    pub overlap: bool,
    /// The overlapping part is deliberately non-colliding
    pub ignored: bool,
    /// Penetration measure used for ranking (larger = deeper)
    pub amount: f64,
}

impl OverlapResult {
    /// No overlap
    pub const fn none() -> Self {
        Self { overlap: false, ignored: false, amount: 0.0 }
    }

    /// Overlap when `amount` is positive
    pub fn from_amount(amount: f64) -> Self {
        if amount > EPSILON {
            Self { overlap: true, ignored: false, amount }
        } else {
            Self::none()
        }
    }

    /// Overlap flag with a ranking amount
    pub fn new(overlap: bool, amount: f64) -> Self {
        Self {
            overlap,
            ignored: false,
            amount: if overlap { amount.max(0.0) } else { 0.0 },
        }
    }

    /// OR flags, MAX amount
    pub fn merge(&mut self, other: Self) {
        self.overlap |= other.overlap;
        self.ignored |= other.ignored;
        self.amount = self.amount.max(other.amount);
    }
}

/// Axis-aligned penetration between two boxes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxAdjustment {
    /// Shift that removes the overlap on each axis
    pub direct: Vec2,
    /// Shift that pushes through to the far side on each axis
    pub reverse: Vec2,
    /// Sign of (self - other) position per axis
    pub side: Vec2,
}

impl BoxAdjustment {
    /// Pick direct or reverse per axis from the relative velocity.
    ///
    /// With `allow_reverse`, an axis takes the reverse branch whenever the
    /// relative position and relative velocity signs match: the profile is
    /// moving away from the other's center, so it entered from the far side.
    /// `depth_guard` additionally requires the overlap to exceed half the
    /// combined extent (the direct shift is longer than the reverse one).
    pub fn choose(&self, relative_velocity: &Vec2, allow_reverse: bool, depth_guard: bool) -> Vec2 {
        let mut out = self.direct;
        if !allow_reverse {
            return out;
        }
        for axis in Axis::BOTH {
            let side = self.side.axis(axis);
            let velocity = relative_velocity.axis(axis);
            let direct = self.direct.axis(axis);
            let reverse = self.reverse.axis(axis);
            if direct.abs() < EPSILON || side == 0.0 || velocity.abs() < EPSILON {
                continue;
            }
            if side.signum() != velocity.signum() {
                continue;
            }
            if depth_guard && direct.abs() <= reverse.abs() {
                continue;
            }
            out.set_axis(axis, reverse);
        }
        out
    }
}

/// Aggregated outcome of resolving one profile against its candidates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    /// At least one contact was resolved
    pub snap: bool,
    /// At least one contact was deliberately suppressed
    pub ignored: bool,
    /// Position correction applied (abs-max per axis across contacts)
    pub pos_adjustment: Vec2,
    /// Axes whose velocity was vetoed
    pub veto: Axes,
    /// External velocity handed to the profile
    pub ext_velocity: Vec2,
    /// Residual carried motion folded into applied force
    pub force: Vec2,
}

impl SnapResult {
    /// Merge another result into this one
    pub fn merge(&mut self, other: &Self) {
        self.snap |= other.snap;
        self.ignored |= other.ignored;
        self.pos_adjustment = abs_max(&self.pos_adjustment, &other.pos_adjustment);
        self.veto.merge(other.veto);
        self.ext_velocity = abs_max(&self.ext_velocity, &other.ext_velocity);
        self.force = abs_max(&self.force, &other.force);
    }
}

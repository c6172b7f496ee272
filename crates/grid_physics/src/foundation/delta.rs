//! Change tracking for values that are sampled by an outside consumer
//!
//! A [`Tracked`] value remembers the tick it last changed on and how many more
//! times that change may be reported. Writers go through a single
//! compare-and-set mutator; readers drain changes with [`Tracked::take_delta`].

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::foundation::math::constants::EPSILON;

/// Default number of samples a change stays reportable (pop-once)
pub const DEFAULT_TTL: u8 = 1;

/// A value with "changed since last sample" bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracked<T> {
    value: T,
    dirty_since: Option<u64>,
    ttl_remaining: u8,
    ttl: u8,
}

impl<T> Tracked<T>
where
    T: Clone + AbsDiffEq<Epsilon = f64>,
{
    /// Create a clean tracked value with the default TTL
    pub fn new(value: T) -> Self {
        Self::with_ttl(value, DEFAULT_TTL)
    }

    /// Create a clean tracked value reporting each change `ttl` times
    pub fn with_ttl(value: T, ttl: u8) -> Self {
        Self {
            value,
            dirty_since: None,
            ttl_remaining: 0,
            ttl: ttl.max(1),
        }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Set the value, returning `false` (and leaving the change state alone)
    /// when it is approximately equal to the current one.
    pub fn set(&mut self, value: T, tick: u64) -> bool {
        if self.value.abs_diff_eq(&value, EPSILON) {
            return false;
        }
        self.value = value;
        if self.dirty_since.is_none() {
            self.dirty_since = Some(tick);
        }
        self.ttl_remaining = self.ttl;
        true
    }

    /// Whether an unreported change is pending
    pub fn is_dirty(&self) -> bool {
        self.ttl_remaining > 0
    }

    /// Tick of the oldest unreported change
    pub fn dirty_since(&self) -> Option<u64> {
        self.dirty_since
    }

    /// Report the pending change, if any. Each change is reported at most
    /// `ttl` times, after which the value reads clean again.
    pub fn take_delta(&mut self) -> Option<T> {
        if self.ttl_remaining == 0 {
            return None;
        }
        self.ttl_remaining -= 1;
        if self.ttl_remaining == 0 {
            self.dirty_since = None;
        }
        Some(self.value.clone())
    }
}

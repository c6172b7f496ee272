//! Per-tick penetration resolution
//!
//! [`Profile::snap`] walks the broad-phase candidates deepest first, works out
//! how far the profile has to move to leave each one, narrows the correction
//! to a single axis where the contact geometry calls for it, and applies the
//! result. Contacts are tagged for the next tick's ignore-list either when a
//! one-way platform chose not to block or when the contact settled with no
//! relative motion. A tagged contact stays suppressed for as long as it keeps
//! overlapping; once the overlap is gone it is no longer a candidate and
//! drops off the list.

use std::collections::BTreeSet;

use crate::core::config::SnapConfig;
use crate::foundation::math::{Axis, Vec2, Vec2Ext};
use crate::physics::collision::{Axes, Profile, SnapResult};
use crate::physics::id::{Attributes, Id};
use crate::spatial::{Body, CandidateQueue};

impl Profile {
    /// Resolve overlaps against `candidates` and update velocity, external
    /// velocity and the ignore-list.
    ///
    /// Contacts listed in the previous tick's ignore-list are not resolved;
    /// they are reported as ignored and listed again.
    pub fn snap(&mut self, candidates: CandidateQueue<'_>, config: &SnapConfig) -> SnapResult {
        let eps = config.epsilon;
        let start = *self.pos();
        let previous = self.ignored().clone();
        let mut next_ignored: BTreeSet<Id> = BTreeSet::new();
        let mut result = SnapResult::default();
        let mut carried = Vec2::zeros();

        for candidate in candidates {
            let body = candidate.body;
            let other = &body.profile;

            let raw = self.edge_adjustment(other, config);
            if raw == Vec2::zeros() {
                continue;
            }
            if previous.contains(&body.id) {
                log::trace!("Snap {} ignoring listed contact", body.id);
                result.ignored = true;
                next_ignored.insert(body.id);
                continue;
            }

            let relative = self.total_vel() - other.total_vel();

            let axes = select_axes(&raw, &relative, eps);
            let (resolved, axes) = self.apply_overrides(body, &raw, axes, &relative, config);

            if resolved.x.abs() < eps && resolved.y.abs() < eps {
                if body.attributes.contains(Attributes::PLATFORM) {
                    result.ignored = true;
                    next_ignored.insert(body.id);
                }
                continue;
            }

            let pos = self.pos() + resolved;
            self.set_pos(pos);
            let vetoed = self.veto_into(&resolved, eps);
            result.veto.merge(vetoed);
            carried += other.total_vel();
            result.snap = true;

            if relative.x.abs() < eps && relative.y.abs() < eps {
                next_ignored.insert(body.id);
            }
            log::trace!(
                "Snap against {} ({}): raw {:?}, axes {:?}, applied {:?}",
                body.id,
                other.shape().name(),
                raw,
                axes,
                resolved
            );
        }

        if result.snap {
            result.pos_adjustment = self.pos() - start;
            let vetoed = self.veto_into(&result.pos_adjustment, eps);
            result.veto.merge(vetoed);

            if carried.y < -eps {
                let push = Vec2::new(carried.x, 0.0);
                self.set_ext_vel(Vec2::zeros());
                if push.x.abs() >= eps {
                    self.add_force(push);
                    result.force = push;
                }
            } else {
                self.set_ext_vel(carried);
                result.ext_velocity = carried;
            }
        } else {
            self.set_ext_vel(Vec2::zeros());
        }

        self.replace_ignored(next_ignored);
        result
    }

    /// Attribute-specific rewrites of the chosen adjustment
    fn apply_overrides(
        &self,
        body: &Body,
        raw: &Vec2,
        axes: Axes,
        relative: &Vec2,
        config: &SnapConfig,
    ) -> (Vec2, Axes) {
        let eps = config.epsilon;
        let attributes = body.attributes;
        let mut resolved = axes.mask(raw);
        let mut axes = axes;

        if attributes.contains(Attributes::RAMP) && raw.y > eps {
            resolved = Vec2::new(0.0, raw.y);
            axes = Axes::only(Axis::Y);
        } else if attributes.contains(Attributes::STAIR) && axes == Axes::only(Axis::X) {
            let step = body.profile.bounds().max.y - self.bounds().min.y;
            let lift = if step > eps { stair_lift(step, config) } else { 0.0 };
            resolved = Vec2::new(0.0, lift);
            axes = Axes::only(Axis::Y);
        }

        if attributes.contains(Attributes::PLATFORM) {
            let lift = if raw.y > 0.0 && relative.y <= eps { raw.y } else { 0.0 };
            resolved = Vec2::new(0.0, lift);
            axes = Axes::only(Axis::Y);
        }

        (resolved, axes)
    }

    /// Zero velocity components that point against `adjustment`
    fn veto_into(&mut self, adjustment: &Vec2, eps: f64) -> Axes {
        let mut vel = *self.vel();
        let mut vetoed = Axes::NONE;
        for axis in Axis::BOTH {
            let push = adjustment.axis(axis);
            if push.abs() >= eps && vel.axis(axis) * push < 0.0 {
                vel.set_axis(axis, 0.0);
                vetoed.merge(Axes::only(axis));
            }
        }
        if vetoed.any() {
            self.set_vel(vel);
        }
        vetoed
    }
}

/// Decide which axes a contact is resolved on
pub(crate) fn select_axes(raw: &Vec2, relative: &Vec2, eps: f64) -> Axes {
    let small_x = raw.x.abs() < eps;
    let small_y = raw.y.abs() < eps;
    match (small_x, small_y) {
        (true, true) => return Axes::NONE,
        (true, false) => return Axes::only(Axis::Y),
        (false, true) => return Axes::only(Axis::X),
        (false, false) => {}
    }

    let still_x = relative.x.abs() < eps;
    let still_y = relative.y.abs() < eps;
    let pick_x = match (still_x, still_y) {
        (true, false) => false,
        (false, true) => true,
        (true, true) => raw.x.abs() > raw.y.abs(),
        (false, false) => (raw.x / relative.x).abs() < (raw.y / relative.y).abs(),
    };
    if pick_x {
        Axes::only(Axis::X)
    } else {
        Axes::only(Axis::Y)
    }
}

/// Height lifted this tick while climbing a step of `step` remaining height
pub(crate) fn stair_lift(step: f64, config: &SnapConfig) -> f64 {
    (step * config.stair_smoothing)
        .max(step.min(config.min_stair_lift))
        .min(config.max_step_height)
}

//! Collision profile: kinematic state plus shape
//!
//! A profile is the unit the grid indexes and snap resolves. Kinematic
//! attributes are [`Tracked`] so a network or replay layer can sample what
//! changed since the last tick; every setter is a no-op when the new value is
//! approximately equal to the old one.

use std::collections::BTreeSet;

use crate::core::config::SnapConfig;
use crate::foundation::delta::Tracked;
use crate::foundation::math::{constants::EPSILON, Axis, Vec2, Vec2Ext};
use crate::physics::id::Id;

use super::primitives::{Aabb, Line};
use super::results::{abs_max, BoxAdjustment, ContainsResult, IntersectResult, OverlapResult};
use super::shape::{Composite, Polygon, Shape, SubProfile};

/// Fraction of the half extent the corner rays are pulled in by
const RAY_INSET: f64 = 0.1;

/// Tracked attributes that changed since the last sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDelta {
    /// Tick the snapshot was taken on
    pub tick: u64,
    /// Position
    pub pos: Option<Vec2>,
    /// Dimension
    pub dim: Option<Vec2>,
    /// Velocity
    pub vel: Option<Vec2>,
    /// Acceleration
    pub acc: Option<Vec2>,
    /// Jerk
    pub jerk: Option<Vec2>,
    /// Facing direction
    pub dir: Option<Vec2>,
    /// External (carried) velocity
    pub ext_vel: Option<Vec2>,
}

impl ProfileDelta {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.pos.is_none()
            && self.dim.is_none()
            && self.vel.is_none()
            && self.acc.is_none()
            && self.jerk.is_none()
            && self.dir.is_none()
            && self.ext_vel.is_none()
    }
}

/// Shape, position and motion of one collidable body
#[derive(Debug, Clone)]
pub struct Profile {
    pos: Tracked<Vec2>,
    dim: Tracked<Vec2>,
    vel: Tracked<Vec2>,
    acc: Tracked<Vec2>,
    jerk: Tracked<Vec2>,
    dir: Tracked<Vec2>,
    ext_vel: Tracked<Vec2>,
    force: Vec2,
    shape: Shape,
    ignored: BTreeSet<Id>,
    tick: u64,
}

impl Profile {
    fn with_shape(pos: Vec2, dim: Vec2, shape: Shape) -> Self {
        Self {
            pos: Tracked::new(pos),
            dim: Tracked::new(dim.abs()),
            vel: Tracked::new(Vec2::zeros()),
            acc: Tracked::new(Vec2::zeros()),
            jerk: Tracked::new(Vec2::zeros()),
            dir: Tracked::new(Vec2::new(1.0, 0.0)),
            ext_vel: Tracked::new(Vec2::zeros()),
            force: Vec2::zeros(),
            shape,
            ignored: BTreeSet::new(),
            tick: 0,
        }
    }

    /// Axis-aligned rectangle centered at `pos`
    pub fn rect(pos: Vec2, dim: Vec2) -> Self {
        Self::with_shape(pos, dim, Shape::Rect)
    }

    /// Circle centered at `pos`
    pub fn circle(pos: Vec2, radius: f64) -> Self {
        let diameter = radius.abs() * 2.0;
        Self::with_shape(pos, Vec2::new(diameter, diameter), Shape::Circle)
    }

    /// Convex polygon from local-space points, facing +X
    pub fn polygon(pos: Vec2, points: Vec<Vec2>) -> Self {
        let polygon = Polygon::new(points, pos, Vec2::new(1.0, 0.0));
        let dim = polygon.bounds().dimension();
        Self::with_shape(pos, dim, Shape::Polygon(polygon))
    }

    /// Bounding rectangle `dim` carrying `children` at their offsets
    pub fn composite(pos: Vec2, dim: Vec2, children: Vec<SubProfile>) -> Self {
        let mut profile = Self::with_shape(pos, dim, Shape::Composite(Composite::new(children)));
        profile.refresh_children();
        profile
    }

    /// Builder form of [`set_delta_ttl`](Self::set_delta_ttl)
    pub fn with_delta_ttl(mut self, ttl: u8) -> Self {
        self.set_delta_ttl(ttl);
        self
    }

    /// Report each change `ttl` times instead of once. Pending changes are
    /// discarded.
    pub fn set_delta_ttl(&mut self, ttl: u8) {
        self.pos = Tracked::with_ttl(*self.pos.get(), ttl);
        self.dim = Tracked::with_ttl(*self.dim.get(), ttl);
        self.vel = Tracked::with_ttl(*self.vel.get(), ttl);
        self.acc = Tracked::with_ttl(*self.acc.get(), ttl);
        self.jerk = Tracked::with_ttl(*self.jerk.get(), ttl);
        self.dir = Tracked::with_ttl(*self.dir.get(), ttl);
        self.ext_vel = Tracked::with_ttl(*self.ext_vel.get(), ttl);
    }

    /// Builder form of [`set_vel`](Self::set_vel)
    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.set_vel(vel);
        self
    }

    /// Builder form of [`set_dir`](Self::set_dir)
    pub fn with_dir(mut self, dir: Vec2) -> Self {
        self.set_dir(dir);
        self
    }

    // Accessors

    /// Center position
    pub fn pos(&self) -> &Vec2 {
        self.pos.get()
    }

    /// Full dimensions
    pub fn dim(&self) -> &Vec2 {
        self.dim.get()
    }

    /// Velocity
    pub fn vel(&self) -> &Vec2 {
        self.vel.get()
    }

    /// Acceleration
    pub fn acc(&self) -> &Vec2 {
        self.acc.get()
    }

    /// Jerk
    pub fn jerk(&self) -> &Vec2 {
        self.jerk.get()
    }

    /// Unit facing direction
    pub fn dir(&self) -> &Vec2 {
        self.dir.get()
    }

    /// Velocity carried from the surface last stood on
    pub fn ext_vel(&self) -> &Vec2 {
        self.ext_vel.get()
    }

    /// Own plus carried velocity
    pub fn total_vel(&self) -> Vec2 {
        self.vel.get() + self.ext_vel.get()
    }

    /// Force applied at the start of the next step
    pub fn force(&self) -> &Vec2 {
        &self.force
    }

    /// Shape variant
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Circle radius (half the X dimension)
    pub fn radius(&self) -> f64 {
        self.dim.get().x * 0.5
    }

    /// Ids whose contacts are suppressed this tick
    pub fn ignored(&self) -> &BTreeSet<Id> {
        &self.ignored
    }

    /// Current tick
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Children of a composite, empty for other shapes
    pub fn children(&self) -> &[SubProfile] {
        match &self.shape {
            Shape::Composite(composite) => composite.children(),
            _ => &[],
        }
    }

    // Mutators

    /// Move the center. Polygons rebuild their sides and composites
    /// re-place their children.
    pub fn set_pos(&mut self, pos: Vec2) -> bool {
        if !self.pos.set(pos, self.tick) {
            return false;
        }
        let dir = *self.dir.get();
        match &mut self.shape {
            Shape::Polygon(polygon) => polygon.rebuild(pos, dir),
            Shape::Composite(composite) => {
                for child in composite.children_mut() {
                    child.follow_position(&pos);
                }
            }
            Shape::Rect | Shape::Circle => {}
        }
        true
    }

    /// Resize. Polygons keep their outline; their dimension is informational.
    pub fn set_dim(&mut self, dim: Vec2) -> bool {
        self.dim.set(dim.abs(), self.tick)
    }

    /// Set velocity
    pub fn set_vel(&mut self, vel: Vec2) -> bool {
        self.vel.set(vel, self.tick)
    }

    /// Set acceleration
    pub fn set_acc(&mut self, acc: Vec2) -> bool {
        self.acc.set(acc, self.tick)
    }

    /// Set jerk
    pub fn set_jerk(&mut self, jerk: Vec2) -> bool {
        self.jerk.set(jerk, self.tick)
    }

    /// Face a direction. Zero-length input is ignored.
    pub fn set_dir(&mut self, dir: Vec2) -> bool {
        if dir.norm() < EPSILON {
            return false;
        }
        let dir = dir.normalize_or_self();
        if !self.dir.set(dir, self.tick) {
            return false;
        }
        match &mut self.shape {
            Shape::Polygon(polygon) => polygon.rebuild(*self.pos.get(), dir),
            Shape::Composite(composite) => {
                for child in composite.children_mut() {
                    child.follow_direction(&dir);
                }
            }
            Shape::Rect | Shape::Circle => {}
        }
        true
    }

    /// Set carried velocity
    pub fn set_ext_vel(&mut self, ext_vel: Vec2) -> bool {
        self.ext_vel.set(ext_vel, self.tick)
    }

    /// Accumulate a force (impulse) for the next step
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Fold the accumulated force into velocity and clear it
    pub fn apply_forces(&mut self) {
        if self.force.approx_zero() {
            self.force = Vec2::zeros();
            return;
        }
        let vel = self.vel.get() + self.force;
        self.set_vel(vel);
        self.force = Vec2::zeros();
    }

    /// Zero all motion
    pub fn stop(&mut self) {
        self.set_vel(Vec2::zeros());
        self.set_acc(Vec2::zeros());
        self.set_jerk(Vec2::zeros());
        self.set_ext_vel(Vec2::zeros());
        self.force = Vec2::zeros();
    }

    /// Semi-implicit Euler step with a constant extra acceleration
    pub fn integrate(&mut self, dt: f64, gravity: &Vec2) {
        let acc = self.acc.get().add_scaled(self.jerk.get(), dt);
        self.set_acc(acc);
        let vel = self.vel.get().add_scaled(&(acc + gravity), dt);
        self.set_vel(vel);
        let pos = self.pos.get().add_scaled(&self.total_vel(), dt);
        self.set_pos(pos);
    }

    /// Add a child to a composite. Returns `false` for other shapes.
    pub fn add_child(&mut self, child: SubProfile) -> bool {
        let Shape::Composite(composite) = &mut self.shape else {
            return false;
        };
        composite.push(child);
        self.refresh_children();
        true
    }

    /// Change the relative angle of an attached child
    pub fn set_attachment_angle(&mut self, index: usize, angle: f64) -> bool {
        let Shape::Composite(composite) = &mut self.shape else {
            return false;
        };
        composite
            .children_mut()
            .get_mut(index)
            .is_some_and(|child| child.set_angle(angle))
    }

    /// Move to a new tick; changes made from now on are stamped with it
    pub fn advance_tick(&mut self, tick: u64) {
        self.tick = tick;
        if let Shape::Composite(composite) = &mut self.shape {
            for child in composite.children_mut() {
                child.advance_tick(tick);
            }
        }
    }

    /// Drain pending changes
    pub fn take_deltas(&mut self) -> ProfileDelta {
        ProfileDelta {
            tick: self.tick,
            pos: self.pos.take_delta(),
            dim: self.dim.take_delta(),
            vel: self.vel.take_delta(),
            acc: self.acc.take_delta(),
            jerk: self.jerk.take_delta(),
            dir: self.dir.take_delta(),
            ext_vel: self.ext_vel.take_delta(),
        }
    }

    pub(crate) fn replace_ignored(&mut self, ignored: BTreeSet<Id>) {
        self.ignored = ignored;
    }

    fn refresh_children(&mut self) {
        let pos = *self.pos.get();
        let dir = *self.dir.get();
        if let Shape::Composite(composite) = &mut self.shape {
            for child in composite.children_mut() {
                child.follow_position(&pos);
                child.follow_direction(&dir);
            }
        }
    }

    // Geometry

    /// World-space bounding box
    pub fn bounds(&self) -> Aabb {
        match &self.shape {
            Shape::Polygon(polygon) => polygon.bounds(),
            _ => Aabb::from_center(*self.pos.get(), *self.dim.get()),
        }
    }

    fn geom(&self) -> Geom<'_> {
        match &self.shape {
            Shape::Circle => Geom::Circle(*self.pos.get(), self.radius()),
            Shape::Polygon(polygon) => Geom::Polygon(polygon),
            Shape::Rect | Shape::Composite(_) => Geom::Rect(self.bounds()),
        }
    }

    /// Point containment
    pub fn contains(&self, point: &Vec2) -> ContainsResult {
        let mut result = ContainsResult::new(self.geom().contains(point));
        if let Shape::Composite(composite) = &self.shape {
            for child in composite.children() {
                if result.contains {
                    break;
                }
                result.merge(child.profile().contains(point));
            }
        }
        result
    }

    /// Closest boundary crossing along a line
    pub fn intersects(&self, line: &Line) -> IntersectResult {
        let mut result = IntersectResult::from_t(self.geom().intersect(line));
        if let Shape::Composite(composite) = &self.shape {
            for child in composite.children() {
                result.merge(child.profile().intersects(line));
            }
        }
        result
    }

    /// Shape overlap with another profile
    pub fn overlap(&self, other: &Self) -> OverlapResult {
        match &self.shape {
            Shape::Composite(composite) => {
                let own = other.overlap_geom(&self.geom());
                if own.overlap {
                    return own;
                }
                let mut result = own;
                for child in composite.children() {
                    result.merge(child.profile().overlap(other));
                }
                result
            }
            _ => other.overlap_geom(&self.geom()),
        }
    }

    fn overlap_geom(&self, geom: &Geom<'_>) -> OverlapResult {
        match &self.shape {
            Shape::Composite(composite) => {
                let own = self.geom().overlap(geom);
                if own.overlap {
                    return own;
                }
                let mut result = own;
                for child in composite.children() {
                    result.merge(child.profile().overlap_geom(geom));
                }
                result
            }
            _ => self.geom().overlap(geom),
        }
    }

    /// Box-versus-box penetration, treating both profiles as their bounds
    pub fn box_adjustment(&self, other: &Self) -> BoxAdjustment {
        box_adjustment(&self.bounds(), &other.bounds())
    }

    /// Minimum translation that pushes this profile out of `other`.
    ///
    /// Rectangles use [`box_adjustment`](Self::box_adjustment) with the
    /// direct or reverse branch picked from relative velocity; composites
    /// take the per-axis abs-max over their rectangle and children; circles
    /// and polygons are sampled with rays along each axis.
    pub fn edge_adjustment(&self, other: &Self, config: &SnapConfig) -> Vec2 {
        match &other.shape {
            Shape::Rect => {
                let relative = self.total_vel() - other.total_vel();
                self.box_adjustment(other).choose(
                    &relative,
                    config.reverse_overlap,
                    config.reverse_depth_guard,
                )
            }
            Shape::Composite(composite) => {
                let relative = self.total_vel() - other.total_vel();
                let mut adjustment = self.box_adjustment(other).choose(
                    &relative,
                    config.reverse_overlap,
                    config.reverse_depth_guard,
                );
                for child in composite.children() {
                    adjustment = abs_max(&adjustment, &self.edge_adjustment(child.profile(), config));
                }
                adjustment
            }
            Shape::Circle | Shape::Polygon(_) => self.ray_adjustment(other),
        }
    }

    /// Per-axis penetration found by casting rays across this profile's
    /// bounds toward `other`: one through the center and two near the corners.
    fn ray_adjustment(&self, other: &Self) -> Vec2 {
        let own = self.bounds();
        if !own.overlaps(&other.bounds()) {
            return Vec2::zeros();
        }
        let center = own.center();
        let half = own.half_extents();
        let delta = center - other.bounds().center();

        let mut adjustment = Vec2::zeros();
        for axis in Axis::BOTH {
            let reach = half.axis(axis);
            if reach < EPSILON {
                continue;
            }
            let side = if delta.axis(axis).abs() < EPSILON {
                1.0
            } else {
                delta.axis(axis).signum()
            };
            let across = axis.other();
            let inset = half.axis(across) * (1.0 - RAY_INSET);

            let mut depth: f64 = 0.0;
            let mut buried = 0;
            for offset in [0.0, inset, -inset] {
                let mut start = center;
                start.set_axis(across, center.axis(across) + offset);
                start.set_axis(axis, center.axis(axis) + side * reach);
                if other.contains(&start).contains {
                    buried += 1;
                    continue;
                }
                let ray = Line::new(start, axis.unit() * (-side * 2.0 * reach));
                if let Some(t) = other.intersects(&ray).t() {
                    depth = depth.max((1.0 - t) * 2.0 * reach);
                }
            }

            if buried == 3 {
                adjustment.set_axis(axis, self.box_adjustment(other).direct.axis(axis));
            } else {
                adjustment.set_axis(axis, side * depth);
            }
        }
        adjustment
    }
}

/// Box-versus-box penetration of two bounds
pub fn box_adjustment(own: &Aabb, other: &Aabb) -> BoxAdjustment {
    if !own.overlaps(other) {
        return BoxAdjustment::default();
    }
    let delta = own.center() - other.center();
    let reach = own.half_extents() + other.half_extents();

    let mut result = BoxAdjustment::default();
    for axis in Axis::BOTH {
        let d = delta.axis(axis);
        let side = if d.abs() < EPSILON { 1.0 } else { d.signum() };
        let overlap = reach.axis(axis) - d.abs();
        result.direct.set_axis(axis, side * overlap);
        result.reverse.set_axis(axis, -side * (2.0 * reach.axis(axis) - overlap));
        result.side.set_axis(axis, side);
    }
    result
}

/// Non-composite geometry used by the pairwise tests
#[derive(Debug, Clone, Copy)]
enum Geom<'a> {
    Rect(Aabb),
    Circle(Vec2, f64),
    Polygon(&'a Polygon),
}

impl Geom<'_> {
    fn bounds(&self) -> Aabb {
        match self {
            Self::Rect(rect) => *rect,
            Self::Circle(center, radius) => Aabb::from_center(*center, Vec2::repeat(radius * 2.0)),
            Self::Polygon(polygon) => polygon.bounds(),
        }
    }

    fn contains(&self, point: &Vec2) -> bool {
        match self {
            Self::Rect(rect) => rect.contains(point),
            Self::Circle(center, radius) => (point - center).norm() <= radius + EPSILON,
            Self::Polygon(polygon) => polygon.contains(point),
        }
    }

    fn intersect(&self, line: &Line) -> Option<f64> {
        match self {
            Self::Rect(rect) => rect.intersect_line(line),
            Self::Circle(center, radius) => circle_line(center, *radius, line),
            Self::Polygon(polygon) => polygon.intersect(line),
        }
    }

    fn overlap(&self, other: &Geom<'_>) -> OverlapResult {
        match (self, other) {
            (Self::Rect(a), Geom::Rect(b)) => OverlapResult::new(a.overlaps(b), a.overlap_area(b)),
            (Self::Rect(rect), Geom::Circle(center, radius))
            | (Self::Circle(center, radius), Geom::Rect(rect)) => rect_circle(rect, center, *radius),
            (Self::Circle(c1, r1), Geom::Circle(c2, r2)) => {
                OverlapResult::from_amount(r1 + r2 - (c1 - c2).norm())
            }
            (Self::Polygon(polygon), _) => polygon_overlap(polygon, other),
            (_, Geom::Polygon(polygon)) => polygon_overlap(polygon, self),
        }
    }
}

fn rect_circle(rect: &Aabb, center: &Vec2, radius: f64) -> OverlapResult {
    let circle = Aabb::from_center(*center, Vec2::repeat(radius * 2.0));
    if !rect.overlaps(&circle) {
        return OverlapResult::none();
    }
    let half = rect.half_extents();
    let d = (center - rect.center()).abs();
    let hit = d.x <= half.x
        || d.y <= half.y
        || Vec2::new(d.x - half.x, d.y - half.y).norm() <= radius;
    OverlapResult::new(hit, rect.overlap_area(&circle))
}

fn polygon_overlap(polygon: &Polygon, other: &Geom<'_>) -> OverlapResult {
    let own = polygon.bounds();
    let theirs = other.bounds();
    if !own.overlaps(&theirs) {
        return OverlapResult::none();
    }
    let hit = polygon.contains(&theirs.center())
        || polygon.sides().iter().any(|side| other.intersect(side).is_some())
        || polygon
            .sides()
            .first()
            .is_some_and(|side| other.contains(&side.origin));
    OverlapResult::new(hit, own.overlap_area(&theirs))
}

/// First crossing of a circle boundary along a segment
fn circle_line(center: &Vec2, radius: f64, line: &Line) -> Option<f64> {
    let f = line.origin - center;
    let a = line.ray.dot(&line.ray);
    let b = 2.0 * f.dot(&line.ray);
    let c = f.dot(&f) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a < EPSILON {
        return None;
    }
    let root = discriminant.sqrt();
    [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
        .into_iter()
        .find(|t| (-EPSILON..=1.0 + EPSILON).contains(t))
        .map(|t| t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box(x: f64, y: f64) -> Profile {
        Profile::rect(Vec2::new(x, y), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_setters_skip_approx_equal_values() {
        let mut profile = unit_box(0.0, 0.0);
        assert!(!profile.set_pos(Vec2::new(1e-9, 0.0)));
        assert!(profile.take_deltas().is_empty());

        profile.advance_tick(4);
        assert!(profile.set_pos(Vec2::new(2.0, 0.0)));
        let delta = profile.take_deltas();
        assert_eq!(delta.tick, 4);
        assert_eq!(delta.pos, Some(Vec2::new(2.0, 0.0)));
        assert!(profile.take_deltas().is_empty());
    }

    #[test]
    fn test_delta_ttl() {
        let mut profile = unit_box(0.0, 0.0).with_delta_ttl(2);
        profile.set_vel(Vec2::new(1.0, 0.0));
        assert!(profile.take_deltas().vel.is_some());
        assert!(profile.take_deltas().vel.is_some());
        assert!(profile.take_deltas().vel.is_none());
    }

    #[test]
    fn test_integrate_and_forces() {
        let mut profile = unit_box(0.0, 0.0).with_vel(Vec2::new(1.0, 0.0));
        profile.add_force(Vec2::new(1.0, 0.0));
        profile.apply_forces();
        assert_eq!(*profile.vel(), Vec2::new(2.0, 0.0));
        assert_eq!(*profile.force(), Vec2::zeros());

        profile.integrate(0.5, &Vec2::new(0.0, -2.0));
        assert_relative_eq!(*profile.vel(), Vec2::new(2.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(*profile.pos(), Vec2::new(1.0, -0.5), epsilon = 1e-12);

        profile.stop();
        assert_eq!(*profile.vel(), Vec2::zeros());
    }

    #[test]
    fn test_rect_overlap_is_symmetric() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(0.5, 0.25);
        let ab = a.overlap(&b);
        let ba = b.overlap(&a);
        assert!(ab.overlap && ba.overlap);
        assert_relative_eq!(ab.amount, 0.5 * 0.75, epsilon = 1e-12);
        assert_relative_eq!(ab.amount, ba.amount, epsilon = 1e-12);

        assert!(!a.overlap(&unit_box(1.0, 0.0)).overlap);
    }

    #[test]
    fn test_circle_overlap_depth() {
        let a = Profile::circle(Vec2::zeros(), 1.0);
        let b = Profile::circle(Vec2::new(1.5, 0.0), 1.0);
        assert_relative_eq!(a.overlap(&b).amount, 0.5, epsilon = 1e-12);

        let far = Profile::circle(Vec2::new(3.0, 0.0), 1.0);
        let result = a.overlap(&far);
        assert!(!result.overlap);
        assert_eq!(result.amount, 0.0);
    }

    #[test]
    fn test_rect_circle_corner() {
        let rect = unit_box(0.0, 0.0);
        // bounds overlap near the corner but the circle misses it
        let near = Profile::circle(Vec2::new(0.9, 0.9), 0.5);
        assert!(!rect.overlap(&near).overlap);
        let touching = Profile::circle(Vec2::new(0.8, 0.8), 0.5);
        assert!(rect.overlap(&touching).overlap);
        assert!(touching.overlap(&rect).overlap);
    }

    #[test]
    fn test_polygon_overlap() {
        let diamond = Profile::polygon(
            Vec2::zeros(),
            vec![
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-1.0, 0.0),
                Vec2::new(0.0, -1.0),
            ],
        );
        assert!(diamond.overlap(&unit_box(1.0, 0.0)).overlap);
        // inside the diamond's bounds, outside its outline
        let corner = Profile::rect(Vec2::new(0.9, 0.9), Vec2::new(0.2, 0.2));
        assert!(!diamond.overlap(&corner).overlap);
        assert!(!corner.overlap(&diamond).overlap);
    }

    #[test]
    fn test_circle_contains_and_intersects() {
        let circle = Profile::circle(Vec2::zeros(), 1.0);
        assert!(circle.contains(&Vec2::new(0.5, 0.5)).contains);
        assert!(!circle.contains(&Vec2::new(1.0, 1.0)).contains);

        let line = Line::new(Vec2::new(-2.0, 0.0), Vec2::new(4.0, 0.0));
        assert_relative_eq!(circle.intersects(&line).t, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_composite_children_follow() {
        let gun = SubProfile::new(Profile::rect(Vec2::zeros(), Vec2::new(0.5, 0.1)), Vec2::new(1.0, 0.0))
            .attached(0.0);
        let mut body = Profile::composite(Vec2::new(5.0, 5.0), Vec2::new(1.0, 2.0), vec![gun]);
        assert_eq!(*body.children()[0].profile().pos(), Vec2::new(6.0, 5.0));

        body.set_pos(Vec2::new(0.0, 0.0));
        assert_eq!(*body.children()[0].profile().pos(), Vec2::new(1.0, 0.0));

        body.set_dir(Vec2::new(0.0, 1.0));
        assert_relative_eq!(*body.children()[0].profile().dir(), Vec2::new(0.0, 1.0), epsilon = 1e-12);

        assert!(body.set_attachment_angle(0, std::f64::consts::FRAC_PI_2));
        assert_relative_eq!(*body.children()[0].profile().dir(), Vec2::new(-1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_composite_queries_reach_children() {
        let arm = SubProfile::new(Profile::rect(Vec2::zeros(), Vec2::new(1.0, 1.0)), Vec2::new(2.0, 0.0));
        let body = Profile::composite(Vec2::zeros(), Vec2::new(1.0, 1.0), vec![arm]);

        assert!(body.contains(&Vec2::new(2.2, 0.0)).contains);
        assert!(!body.contains(&Vec2::new(1.2, 0.0)).contains);

        let query = unit_box(2.5, 0.0);
        assert!(body.overlap(&query).overlap);
        assert!(query.overlap(&body).overlap);
    }

    #[test]
    fn test_box_adjustment_branches() {
        let adjustment = box_adjustment(
            &Aabb::from_center(Vec2::new(0.75, 0.0), Vec2::new(1.0, 1.0)),
            &Aabb::from_center(Vec2::zeros(), Vec2::new(1.0, 1.0)),
        );
        assert_relative_eq!(adjustment.direct.x, 0.25, epsilon = 1e-12);
        assert_relative_eq!(adjustment.reverse.x, -1.75, epsilon = 1e-12);
        assert_eq!(adjustment.side.x, 1.0);
    }

    #[test]
    fn test_edge_adjustment_against_ramp() {
        let ramp = Profile::polygon(
            Vec2::zeros(),
            vec![Vec2::new(-1.0, -1.0), Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0)],
        );
        let walker = Profile::rect(Vec2::new(0.5, 0.65), Vec2::new(0.5, 0.5));
        let adjustment = walker.edge_adjustment(&ramp, &SnapConfig::default());
        // deepest ray is the right corner: slope at x = 0.725 vs bottom at 0.4
        assert_relative_eq!(adjustment.y, 0.325, epsilon = 1e-6);
    }
}

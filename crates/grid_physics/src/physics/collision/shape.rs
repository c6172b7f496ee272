//! Concrete geometry carried by a profile
//!
//! The variant set is closed: snap relies on knowing exactly which shapes
//! exist. Rectangles and circles need no data beyond the profile's position
//! and dimension; polygons keep their local outline plus a cached world-space
//! side list, and composites own their sub-profiles.

use crate::foundation::math::{constants::EPSILON, Vec2, Vec2Ext};
use super::primitives::{Aabb, Line};
use super::profile::Profile;

/// Shape variant of a profile
#[derive(Debug, Clone)]
pub enum Shape {
    /// Axis-aligned rectangle, half extents from dimension
    Rect,
    /// Circle, radius = dimension.x / 2
    Circle,
    /// Convex polygon rotated by the profile's direction
    Polygon(Polygon),
    /// Bounding rectangle plus rigidly offset children
    Composite(Composite),
}

impl Shape {
    /// Short name for logging
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Polygon(_) => "polygon",
            Self::Composite(_) => "composite",
        }
    }
}

/// Convex polygon with cached world-space sides
///
/// Points must describe a convex outline; non-convex input is not checked
/// and produces unspecified results.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Vec2>,
    sides: Vec<Line>,
    bounds: Aabb,
}

impl Polygon {
    /// Create from local-space points, placed at `pos` facing `dir`
    pub fn new(points: Vec<Vec2>, pos: Vec2, dir: Vec2) -> Self {
        let mut polygon = Self {
            points,
            sides: Vec::new(),
            bounds: Aabb::new(pos, pos),
        };
        polygon.rebuild(pos, dir);
        polygon
    }

    /// Local-space outline
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// World-space sides, each running from a vertex to the next
    pub fn sides(&self) -> &[Line] {
        &self.sides
    }

    /// World-space bounding box of the outline
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Recompute world sides for a new position or direction
    pub fn rebuild(&mut self, pos: Vec2, dir: Vec2) {
        let angle = dir.heading();
        let world: Vec<Vec2> = self.points.iter().map(|p| p.rotate(angle) + pos).collect();

        self.sides.clear();
        for (i, start) in world.iter().enumerate() {
            let end = world[(i + 1) % world.len()];
            if (end - start).norm() >= EPSILON {
                self.sides.push(Line::between(*start, end));
            }
        }
        self.bounds = Aabb::from_points(&world).unwrap_or_else(|| Aabb::new(pos, pos));
    }

    /// Point containment by ray parity.
    ///
    /// A ray toward +X must cross the outline exactly once (more means the
    /// point is outside a convex shape), and a second ray toward -X must also
    /// cross exactly once to rule out grazing a vertex from outside.
    pub fn contains(&self, point: &Vec2) -> bool {
        if self.sides.len() < 3 || !self.bounds.contains(point) {
            return false;
        }
        let reach = self.bounds.dimension().norm() + 1.0;
        if self.crossings(&Line::new(*point, Vec2::new(reach, 0.0)), 1) != 1 {
            return false;
        }
        self.crossings(&Line::new(*point, Vec2::new(-reach, 0.0)), 1) == 1
    }

    /// Closest crossing of any side along `line`
    pub fn intersect(&self, line: &Line) -> Option<f64> {
        self.sides
            .iter()
            .filter_map(|side| line.intersect(side))
            .min_by(f64::total_cmp)
    }

    /// Distinct crossings along `line`, giving up once `limit` is exceeded
    fn crossings(&self, line: &Line, limit: usize) -> usize {
        let mut hits: Vec<f64> = Vec::with_capacity(limit + 1);
        for side in &self.sides {
            if let Some(t) = line.intersect(side) {
                if hits.iter().all(|h| (h - t).abs() >= EPSILON) {
                    hits.push(t);
                    if hits.len() > limit {
                        break;
                    }
                }
            }
        }
        hits.len()
    }
}

/// Orientation link between a composite and one of its children
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Direction assigned by the parent
    pub base_direction: Vec2,
    /// Rotation of the child relative to the base direction, radians
    pub angle: f64,
}

impl Attachment {
    /// Direction the child should face
    pub fn facing(&self) -> Vec2 {
        self.base_direction.rotate(self.angle)
    }
}

/// Child of a composite at a fixed local offset
#[derive(Debug, Clone)]
pub struct SubProfile {
    profile: Profile,
    offset: Vec2,
    attachment: Option<Attachment>,
}

impl SubProfile {
    /// Child with a fixed offset and independent facing
    pub fn new(profile: Profile, offset: Vec2) -> Self {
        Self {
            profile,
            offset,
            attachment: None,
        }
    }

    /// Make the child follow the parent's direction rotated by `angle`
    pub fn attached(mut self, angle: f64) -> Self {
        self.attachment = Some(Attachment {
            base_direction: *self.profile.dir(),
            angle,
        });
        self
    }

    /// The child profile
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Offset from the parent position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Attachment, if the child follows the parent's facing
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Re-place the child relative to its parent
    pub(crate) fn follow_position(&mut self, parent_pos: &Vec2) {
        self.profile.set_pos(parent_pos + self.offset);
    }

    /// Re-aim an attached child from the parent's direction
    pub(crate) fn follow_direction(&mut self, parent_dir: &Vec2) {
        if let Some(attachment) = self.attachment.as_mut() {
            attachment.base_direction = *parent_dir;
            let facing = attachment.facing();
            self.profile.set_dir(facing);
        }
    }

    /// Change an attached child's relative angle
    pub(crate) fn set_angle(&mut self, angle: f64) -> bool {
        let Some(attachment) = self.attachment.as_mut() else {
            return false;
        };
        attachment.angle = angle;
        let facing = attachment.facing();
        self.profile.set_dir(facing);
        true
    }

    pub(crate) fn advance_tick(&mut self, tick: u64) {
        self.profile.advance_tick(tick);
    }
}

/// Bounding rectangle with owned children
#[derive(Debug, Clone, Default)]
pub struct Composite {
    children: Vec<SubProfile>,
}

impl Composite {
    /// Create from children (positions are refreshed by the owning profile)
    pub fn new(children: Vec<SubProfile>) -> Self {
        Self { children }
    }

    /// Children in insertion order
    pub fn children(&self) -> &[SubProfile] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [SubProfile] {
        &mut self.children
    }

    pub(crate) fn push(&mut self, child: SubProfile) {
        self.children.push(child);
    }
}

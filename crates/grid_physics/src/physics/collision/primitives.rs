//! Primitive collision shapes and intersection algorithms
//!
//! Provides the parametric line segment used for raycasts and polygon edges,
//! and the axis-aligned box every profile reports for the broad phase.

use crate::foundation::math::{constants::EPSILON, Axis, Vec2, Vec2Ext};

/// Parametric line segment `origin + ray * t` for `t` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start of the segment
    pub origin: Vec2,
    /// Offset from start to end
    pub ray: Vec2,
}

impl Line {
    /// Creates a new line. A zero-length ray becomes the unit X ray.
    pub fn new(origin: Vec2, ray: Vec2) -> Self {
        let ray = if ray.norm() < EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            ray
        };
        Self { origin, ray }
    }

    /// Line between two points
    pub fn between(start: Vec2, end: Vec2) -> Self {
        Self::new(start, end - start)
    }

    /// Point at parameter `t`
    pub fn point(&self, t: f64) -> Vec2 {
        self.origin.add_scaled(&self.ray, t)
    }

    /// End point (`t = 1`)
    pub fn end(&self) -> Vec2 {
        self.origin + self.ray
    }

    /// Length of the segment
    pub fn length(&self) -> f64 {
        self.ray.norm()
    }

    /// Intersect two segments.
    ///
    /// Returns this line's parameter at the crossing, or `None` when the
    /// segments are parallel or either parameter falls outside `[0, 1]`.
    pub fn intersect(&self, other: &Line) -> Option<f64> {
        let denom = self.ray.cross2(&other.ray);
        if denom.abs() < EPSILON {
            return None;
        }

        let offset = other.origin - self.origin;
        let t = offset.cross2(&other.ray) / denom;
        let u = offset.cross2(&self.ray) / denom;

        let in_range = |v: f64| (-EPSILON..=1.0 + EPSILON).contains(&v);
        if in_range(t) && in_range(u) {
            Some(t.clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Create from corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create from center and full dimensions
    pub fn from_center(center: Vec2, dimension: Vec2) -> Self {
        let half = dimension.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    /// Smallest box containing every point
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Full dimensions
    pub fn dimension(&self) -> Vec2 {
        self.max - self.min
    }

    /// Half extents
    pub fn half_extents(&self) -> Vec2 {
        self.dimension() * 0.5
    }

    /// Point containment, inclusive of the boundary
    pub fn contains(&self, point: &Vec2) -> bool {
        point.x >= self.min.x - EPSILON
            && point.x <= self.max.x + EPSILON
            && point.y >= self.min.y - EPSILON
            && point.y <= self.max.y + EPSILON
    }

    /// Overlap length along one axis (negative when separated)
    pub fn axis_overlap(&self, other: &Aabb, axis: Axis) -> f64 {
        self.max.axis(axis).min(other.max.axis(axis)) - self.min.axis(axis).max(other.min.axis(axis))
    }

    /// Overlap lengths along both axes
    pub fn overlap_extents(&self, other: &Aabb) -> Vec2 {
        Vec2::new(self.axis_overlap(other, Axis::X), self.axis_overlap(other, Axis::Y))
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let extents = self.overlap_extents(other);
        extents.x > EPSILON && extents.y > EPSILON
    }

    /// Overlap area, zero when not overlapping
    pub fn overlap_area(&self, other: &Aabb) -> f64 {
        let extents = self.overlap_extents(other);
        if extents.x > 0.0 && extents.y > 0.0 {
            extents.x * extents.y
        } else {
            0.0
        }
    }

    /// The four corners, counter-clockwise from the minimum corner
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// The four edges as lines, counter-clockwise
    pub fn sides(&self) -> [Line; 4] {
        let c = self.corners();
        [
            Line::between(c[0], c[1]),
            Line::between(c[1], c[2]),
            Line::between(c[2], c[3]),
            Line::between(c[3], c[0]),
        ]
    }

    /// Closest crossing of the boundary along `line`
    pub fn intersect_line(&self, line: &Line) -> Option<f64> {
        self.sides()
            .iter()
            .filter_map(|side| line.intersect(side))
            .min_by(f64::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_intersection_parameter() {
        let scan = Line::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let wall = Line::new(Vec2::new(0.5, -1.0), Vec2::new(0.0, 2.0));
        let t = scan.intersect(&wall).unwrap();
        assert_relative_eq!(t, 0.5, epsilon = 1e-12);
        assert_relative_eq!(scan.point(t), Vec2::new(0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_line_intersection_reports_callers_parameter() {
        let wall = Line::new(Vec2::new(0.5, -1.0), Vec2::new(0.0, 2.0));
        let scan = Line::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        assert_relative_eq!(wall.intersect(&scan).unwrap(), 0.5, epsilon = 1e-12);

        let short = Line::new(Vec2::new(0.0, 0.5), Vec2::new(2.0, 0.0));
        assert_relative_eq!(short.intersect(&wall).unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_and_out_of_range() {
        let a = Line::new(Vec2::zeros(), Vec2::new(1.0, 0.0));
        let b = Line::new(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert!(a.intersect(&b).is_none());

        let c = Line::new(Vec2::new(2.0, -1.0), Vec2::new(0.0, 2.0));
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn test_zero_ray_normalizes_to_unit_x() {
        let line = Line::new(Vec2::new(3.0, 3.0), Vec2::zeros());
        assert_eq!(line.ray, Vec2::new(1.0, 0.0));
        assert_relative_eq!(line.length(), 1.0);
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_center(Vec2::zeros(), Vec2::new(2.0, 2.0));
        let b = Aabb::from_center(Vec2::new(1.5, 0.5), Vec2::new(2.0, 2.0));
        assert!(a.overlaps(&b));
        assert_relative_eq!(a.overlap_area(&b), 0.5 * 1.5, epsilon = 1e-12);

        let far = Aabb::from_center(Vec2::new(5.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(!a.overlaps(&far));
        assert_eq!(a.overlap_area(&far), 0.0);
    }

    #[test]
    fn test_aabb_line() {
        let rect = Aabb::from_center(Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0));
        let line = Line::new(Vec2::zeros(), Vec2::new(4.0, 0.0));
        assert_relative_eq!(rect.intersect_line(&line).unwrap(), 0.25, epsilon = 1e-12);
    }
}

//! Uniform grid spatial index
//!
//! Space is divided into square tiles of `tile_size`. Every body is recorded
//! in each tile its bounding box touches (boundaries inclusive), and the grid
//! remembers that tile list per body so moves and deletes only touch the
//! buckets the body actually occupies.
//!
//! Raycasts walk the tiles along the segment with a DDA traversal and stop
//! as soon as the best hit lies before the next tile boundary.

use std::collections::{BTreeSet, HashMap};

use crate::core::config::GridConfig;
use crate::foundation::math::{constants::EPSILON, Vec2};
use crate::physics::collider_options::ColliderOptions;
use crate::physics::collision::{Aabb, Line, Profile, ProfileDelta};
use crate::physics::id::Id;
use crate::spatial::{Body, CandidateQueue};

/// Upper bound on the tiles a single box may be recorded in
pub const MAX_TILES_PER_BODY: i64 = 1 << 20;

/// Integer tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TileKey {
    /// Create a key
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a point
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_point(point: &Vec2, tile_size: f64) -> Self {
        Self::new(
            (point.x / tile_size).floor() as i32,
            (point.y / tile_size).floor() as i32,
        )
    }
}

/// Closest body crossed by a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    /// Body that was hit
    pub id: Id,
    /// Line parameter of the crossing in `[0, 1]`
    pub t: f64,
    /// World-space crossing point
    pub point: Vec2,
}

/// Tile-bucketed store of bodies
#[derive(Debug, Clone)]
pub struct Grid {
    tile_size: f64,
    buckets: HashMap<TileKey, BTreeSet<Id>>,
    occupancy: HashMap<Id, Vec<TileKey>>,
    bodies: HashMap<Id, Body>,
}

impl Grid {
    /// Create an empty grid. Callers validate the config first; a
    /// non-positive tile size falls back to 1.0.
    pub fn new(config: &GridConfig) -> Self {
        let tile_size = if config.tile_size > EPSILON {
            config.tile_size
        } else {
            log::warn!("Invalid tile size {}, using 1.0", config.tile_size);
            1.0
        };
        Self {
            tile_size,
            buckets: HashMap::new(),
            occupancy: HashMap::new(),
            bodies: HashMap::new(),
        }
    }

    /// Tile edge length
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Insert or move a body. Occupancy is recomputed from scratch, so
    /// teleports and resizes are handled the same way as small moves.
    pub fn upsert(&mut self, body: Body) {
        let id = body.id;
        let tiles = self.tiles_for(&body.profile.bounds());
        self.unlink(id);
        for tile in &tiles {
            self.buckets.entry(*tile).or_default().insert(id);
        }
        log::trace!("Grid upsert {} over {} tiles", id, tiles.len());
        self.occupancy.insert(id, tiles);
        self.bodies.insert(id, body);
    }

    /// Remove a body, returning it if it was present
    pub fn delete(&mut self, id: Id) -> Option<Body> {
        self.unlink(id);
        self.occupancy.remove(&id);
        self.bodies.remove(&id)
    }

    /// Whether a body is indexed
    pub fn has(&self, id: Id) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Stored body
    pub fn get(&self, id: Id) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Number of stored bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate stored bodies (unordered)
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    /// Tiles a body is recorded in
    pub fn tiles_of(&self, id: Id) -> Option<&[TileKey]> {
        self.occupancy.get(&id).map(Vec::as_slice)
    }

    /// Ids recorded in a tile
    pub fn bucket(&self, tile: TileKey) -> Option<&BTreeSet<Id>> {
        self.buckets.get(&tile)
    }

    /// Drain pending profile changes of every body, in id order. Only
    /// change tracking is touched, so occupancy stays valid.
    pub fn drain_deltas(&mut self) -> Vec<(Id, ProfileDelta)> {
        let mut deltas: Vec<(Id, ProfileDelta)> = self
            .bodies
            .iter_mut()
            .map(|(id, body)| (*id, body.profile.take_deltas()))
            .filter(|(_, delta)| !delta.is_empty())
            .collect();
        deltas.sort_by_key(|(id, _)| *id);
        deltas
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.occupancy.clear();
        self.bodies.clear();
    }

    /// Ids sharing at least one tile with a box, in id order
    pub fn query_nearby(&self, bounds: &Aabb) -> BTreeSet<Id> {
        self.tiles_for(bounds)
            .iter()
            .filter_map(|tile| self.buckets.get(tile))
            .flatten()
            .copied()
            .collect()
    }

    /// Bodies passing `options` whose shape overlaps `profile`, ordered by
    /// bounding-box overlap area
    pub fn query_colliders(&self, profile: &Profile, options: &ColliderOptions) -> CandidateQueue<'_> {
        let bounds = profile.bounds();
        let mut queue = CandidateQueue::new();
        for id in self.query_nearby(&bounds) {
            let Some(body) = self.bodies.get(&id) else {
                continue;
            };
            if !options.evaluate(body) {
                continue;
            }
            if profile.overlap(&body.profile).overlap {
                queue.push(body, bounds.overlap_area(&body.profile.bounds()));
            }
        }
        queue
    }

    /// Closest body passing `options` crossed by the segment
    /// `origin + ray * t`, `t` in `[0, 1]`
    pub fn query_line(&self, origin: Vec2, ray: Vec2, options: &ColliderOptions) -> Option<LineHit> {
        if !(origin.iter().all(|v| v.is_finite()) && ray.iter().all(|v| v.is_finite())) {
            return None;
        }
        let line = Line::new(origin, ray);
        let ray = line.ray;
        let size = self.tile_size;

        let mut tile = TileKey::from_point(&origin, size);
        let (step_x, mut t_max_x, t_delta_x) = dda_axis(origin.x, ray.x, tile.x, size);
        let (step_y, mut t_max_y, t_delta_y) = dda_axis(origin.y, ray.y, tile.y, size);

        let mut seen = BTreeSet::new();
        let mut best: Option<LineHit> = None;
        loop {
            if let Some(bucket) = self.buckets.get(&tile) {
                for id in bucket {
                    if !seen.insert(*id) {
                        continue;
                    }
                    let Some(body) = self.bodies.get(id) else {
                        continue;
                    };
                    if !options.evaluate(body) {
                        continue;
                    }
                    if let Some(t) = body.profile.intersects(&line).t() {
                        if best.map_or(true, |hit| t < hit.t) {
                            best = Some(LineHit {
                                id: *id,
                                t,
                                point: line.point(t),
                            });
                        }
                    }
                }
            }

            let next = t_max_x.min(t_max_y);
            if best.is_some_and(|hit| hit.t <= next) || next > 1.0 {
                break;
            }
            if t_max_x < t_max_y {
                tile.x += step_x;
                t_max_x += t_delta_x;
            } else {
                tile.y += step_y;
                t_max_y += t_delta_y;
            }
        }
        best
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn tiles_for(&self, bounds: &Aabb) -> Vec<TileKey> {
        if !(bounds.min.x.is_finite()
            && bounds.min.y.is_finite()
            && bounds.max.x.is_finite()
            && bounds.max.y.is_finite())
        {
            log::warn!("Skipping non-finite bounds {:?}", bounds);
            return Vec::new();
        }
        let low = TileKey::from_point(&bounds.min, self.tile_size);
        let high = TileKey::from_point(&bounds.max, self.tile_size);
        let columns = i64::from(high.x) - i64::from(low.x) + 1;
        let rows = i64::from(high.y) - i64::from(low.y) + 1;
        let count = columns.max(0).saturating_mul(rows.max(0));
        if count > MAX_TILES_PER_BODY {
            log::warn!("Skipping bounds spanning {} tiles: {:?}", count, bounds);
            return Vec::new();
        }

        let mut tiles = Vec::with_capacity(count as usize);
        for x in low.x..=high.x {
            for y in low.y..=high.y {
                tiles.push(TileKey::new(x, y));
            }
        }
        tiles
    }

    fn unlink(&mut self, id: Id) {
        let Some(tiles) = self.occupancy.get(&id) else {
            return;
        };
        for tile in tiles {
            if let Some(bucket) = self.buckets.get_mut(tile) {
                bucket.remove(&id);
                if bucket.is_empty() {
                    self.buckets.remove(tile);
                }
            }
        }
    }
}

/// Step direction, first boundary parameter and per-tile parameter step
/// along one axis
fn dda_axis(origin: f64, ray: f64, tile: i32, size: f64) -> (i32, f64, f64) {
    if ray > 0.0 {
        (1, ((f64::from(tile) + 1.0) * size - origin) / ray, size / ray)
    } else if ray < 0.0 {
        (-1, (f64::from(tile) * size - origin) / ray, -size / ray)
    } else {
        (0, f64::INFINITY, f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::id::{Attributes, Space};
    use approx::assert_relative_eq;

    fn grid() -> Grid {
        Grid::new(&GridConfig::new(1.0))
    }

    fn wall(n: u32, pos: Vec2, dim: Vec2) -> Body {
        Body::new(Id::new(Space::Wall, n), Profile::rect(pos, dim), Attributes::SOLID)
    }

    fn assert_consistent(grid: &Grid) {
        for body in grid.bodies() {
            let tiles = grid.tiles_of(body.id).unwrap();
            for tile in tiles {
                assert!(grid.bucket(*tile).unwrap().contains(&body.id));
            }
        }
        for (tile, ids) in &grid.buckets {
            for id in ids {
                assert!(grid.tiles_of(*id).unwrap().contains(tile));
            }
        }
    }

    #[test]
    fn test_upsert_records_inclusive_tiles() {
        let mut grid = grid();
        grid.upsert(wall(1, Vec2::new(1.0, 0.5), Vec2::new(1.0, 1.0)));
        // x spans [0.5, 1.5], y spans [0, 1] inclusive
        let tiles = grid.tiles_of(Id::new(Space::Wall, 1)).unwrap();
        assert_eq!(tiles.len(), 4);
        assert!(tiles.contains(&TileKey::new(0, 1)));
        assert_consistent(&grid);
    }

    #[test]
    fn test_teleport_and_delete() {
        let mut grid = grid();
        let id = Id::new(Space::Wall, 1);
        grid.upsert(wall(1, Vec2::new(0.5, 0.5), Vec2::new(0.5, 0.5)));
        grid.upsert(wall(1, Vec2::new(100.5, 100.5), Vec2::new(0.5, 0.5)));

        assert!(grid.bucket(TileKey::new(0, 0)).is_none());
        assert_eq!(grid.tiles_of(id).unwrap(), &[TileKey::new(100, 100)]);
        assert_consistent(&grid);

        assert!(grid.delete(id).is_some());
        assert!(!grid.has(id));
        assert!(grid.bucket(TileKey::new(100, 100)).is_none());
        assert!(grid.delete(id).is_none());
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut grid = grid();
        let body = wall(1, Vec2::new(2.3, -1.7), Vec2::new(2.0, 0.5));
        grid.upsert(body.clone());
        let before = grid.tiles_of(body.id).unwrap().to_vec();
        grid.upsert(body.clone());
        assert_eq!(grid.tiles_of(body.id).unwrap(), before.as_slice());
        assert_eq!(grid.len(), 1);
        assert_consistent(&grid);
    }

    #[test]
    fn test_query_nearby_unions_tiles() {
        let mut grid = grid();
        // spans tiles x 0..=2, y 0
        grid.upsert(wall(1, Vec2::new(1.5, 0.5), Vec2::new(2.5, 0.5)));
        grid.upsert(wall(2, Vec2::new(3.5, 0.5), Vec2::new(0.5, 0.5)));
        grid.upsert(wall(3, Vec2::new(0.5, 5.5), Vec2::new(0.5, 0.5)));

        // two tiles, the wide wall is in both but reported once
        let area = Aabb::new(Vec2::new(2.2, 0.2), Vec2::new(3.8, 0.8));
        let ids: Vec<Id> = grid.query_nearby(&area).into_iter().collect();
        assert_eq!(ids, vec![Id::new(Space::Wall, 1), Id::new(Space::Wall, 2)]);

        // a body's own bounds find the body itself
        let own = grid.get(Id::new(Space::Wall, 3)).unwrap().profile.bounds();
        assert!(grid.query_nearby(&own).contains(&Id::new(Space::Wall, 3)));

        // only empty buckets
        let empty = Aabb::new(Vec2::new(-10.0, -10.0), Vec2::new(-8.5, -8.5));
        assert!(grid.query_nearby(&empty).is_empty());
    }

    #[test]
    fn test_oversized_bounds_are_not_indexed() {
        let mut grid = grid();
        let id = Id::new(Space::Wall, 1);
        grid.upsert(wall(1, Vec2::zeros(), Vec2::new(1e12, 1e12)));
        assert!(grid.has(id));
        assert!(grid.tiles_of(id).unwrap().is_empty());
        assert!(grid.bucket(TileKey::new(0, 0)).is_none());

        let huge = Aabb::new(Vec2::new(-1e30, -1e30), Vec2::new(1e30, 1e30));
        assert!(grid.query_nearby(&huge).is_empty());
        assert_consistent(&grid);
    }

    #[test]
    fn test_query_colliders_filters_and_orders() {
        let mut grid = grid();
        grid.upsert(wall(1, Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)));
        grid.upsert(wall(2, Vec2::new(0.8, 0.0), Vec2::new(1.0, 1.0)));
        grid.upsert(wall(3, Vec2::new(5.0, 0.0), Vec2::new(1.0, 1.0)));
        grid.upsert(Body::new(
            Id::new(Space::Pickup, 1),
            Profile::rect(Vec2::zeros(), Vec2::new(1.0, 1.0)),
            Attributes::empty(),
        ));

        let query = Profile::rect(Vec2::new(0.2, 0.0), Vec2::new(1.0, 1.0));
        let options = ColliderOptions::new().with_spaces([Space::Wall], true);
        let queue = grid.query_colliders(&query, &options);
        assert_eq!(
            queue.ids(),
            vec![Id::new(Space::Wall, 1), Id::new(Space::Wall, 2)]
        );
    }

    #[test]
    fn test_raycast_matches_box_intersection() {
        let mut grid = grid();
        let target = wall(1, Vec2::new(4.5, 2.5), Vec2::new(1.0, 1.0));
        let expected = target.profile.bounds();
        grid.upsert(target);
        grid.upsert(wall(2, Vec2::new(8.5, 2.5), Vec2::new(1.0, 1.0)));

        let origin = Vec2::new(0.5, 0.5);
        let ray = Vec2::new(10.0, 4.0);
        let hit = grid
            .query_line(origin, ray, &ColliderOptions::all_spaces())
            .unwrap();
        let t = expected.intersect_line(&Line::new(origin, ray)).unwrap();
        assert_eq!(hit.id, Id::new(Space::Wall, 1));
        assert_relative_eq!(hit.t, t, epsilon = 1e-12);
        assert_relative_eq!(hit.point, origin + ray * t, epsilon = 1e-12);
    }

    #[test]
    fn test_raycast_negative_direction_and_miss() {
        let mut grid = grid();
        grid.upsert(wall(1, Vec2::new(-3.5, 0.5), Vec2::new(1.0, 1.0)));
        let options = ColliderOptions::all_spaces();

        let hit = grid.query_line(Vec2::new(0.5, 0.5), Vec2::new(-10.0, 0.0), &options).unwrap();
        assert_relative_eq!(hit.t, 0.35, epsilon = 1e-12);

        assert!(grid.query_line(Vec2::new(0.5, 0.5), Vec2::new(0.0, 10.0), &options).is_none());
        let excluded = options.with_ids([Id::new(Space::Wall, 1)], false);
        assert!(grid.query_line(Vec2::new(0.5, 0.5), Vec2::new(-10.0, 0.0), &excluded).is_none());
    }

    #[test]
    fn test_raycast_vertical_picks_nearest() {
        let mut grid = grid();
        // spans three columns; only the middle one is on the ray
        grid.upsert(wall(1, Vec2::new(0.5, 6.5), Vec2::new(3.0, 1.0)));
        grid.upsert(wall(2, Vec2::new(0.5, 3.5), Vec2::new(1.0, 1.0)));

        let hit = grid
            .query_line(Vec2::new(0.5, 0.5), Vec2::new(0.0, 10.0), &ColliderOptions::all_spaces())
            .unwrap();
        assert_eq!(hit.id, Id::new(Space::Wall, 2));
        assert_relative_eq!(hit.t, 0.25, epsilon = 1e-12);

        grid.delete(Id::new(Space::Wall, 2));
        let hit = grid
            .query_line(Vec2::new(0.5, 0.5), Vec2::new(0.0, 10.0), &ColliderOptions::all_spaces())
            .unwrap();
        assert_eq!(hit.id, Id::new(Space::Wall, 1));
        assert_relative_eq!(hit.t, 0.55, epsilon = 1e-12);
    }
}

//! Parry-backed query world for the controller's line-casts.
//!
//! Every static, actor and platform is one [`Body`]: a parry shape, a pose, a layer and
//! an optional owning actor. Bodies are stored in insertion order and a body's index is
//! the [`HitId`] reported by [`LineCast::line_cast`], so hosts can map hits back to
//! bodies and platforms can map hits back to passengers.
//!
//! Broad phase
//! - Each body caches its world-space AABB.
//! - A cast builds the AABB swept by the ray and scans the bodies linearly, skipping
//!   anything outside the mask or not overlapping the sweep.
//! - The narrow phase is parry's `cast_ray_and_get_normal` on the surviving shapes.
//!
//! Determinism
//! - Candidates are visited in insertion order and ties keep the earliest body.

use kinematic2d::{ActorId, CollisionMask, HitId, Layer, LineCast, PassengerLookup, Point2, RayHit, Vec2};
use rapier2d::{
    na::{self, Isometry2},
    parry::{
        bounding_volume::{Aabb, BoundingVolume},
        query::{Ray, RayCast},
        shape::SharedShape,
    },
};

use crate::{constants::MAX_CAST_DISTANCE, error::SimError};

#[inline]
fn to_point(p: Point2) -> na::Point2<f32> {
    na::Point2::new(p.x, p.y)
}

#[inline]
fn to_vector(v: Vec2) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.y)
}

/// What to insert into a [`QueryWorld`].
#[derive(Clone)]
pub struct BodyDef {
    pub shape: SharedShape,
    pub position: Point2,
    /// Radians, counter-clockwise.
    pub rotation: f32,
    pub layer: Layer,
    /// The actor this body belongs to, if any. Platforms carry owned bodies only.
    pub owner: Option<ActorId>,
}

#[derive(Clone)]
pub struct Body {
    shape: SharedShape,
    pose: Isometry2<f32>,
    layer: Layer,
    owner: Option<ActorId>,
    aabb: Aabb,
}

impl Body {
    fn new(def: BodyDef) -> Self {
        let pose = Isometry2::new(na::Vector2::new(def.position.x, def.position.y), def.rotation);
        let aabb = def.shape.compute_aabb(&pose);
        Self {
            shape: def.shape,
            pose,
            layer: def.layer,
            owner: def.owner,
            aabb,
        }
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        let t = self.pose.translation.vector;
        Point2::new(t.x, t.y)
    }

    #[inline]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    #[inline]
    pub fn owner(&self) -> Option<ActorId> {
        self.owner
    }

    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    fn set_center(&mut self, center: Point2) {
        self.pose.translation.vector = na::Vector2::new(center.x, center.y);
        self.aabb = self.shape.compute_aabb(&self.pose);
    }

    fn cast(&self, ray: &Ray, max_distance: f32) -> Option<(f32, Vec2)> {
        let hit = self
            .shape
            .cast_ray_and_get_normal(&self.pose, ray, max_distance, true)?;
        let mut normal = Vec2::new(hit.normal.x, hit.normal.y);
        // Segments and triangle edges report either side; face the ray.
        if normal.x * ray.dir.x + normal.y * ray.dir.y > 0.0 {
            normal = -normal;
        }
        Some((hit.time_of_impact, normal))
    }
}

/// Bodies the controller can line-cast against. Moving bodies are updated in place
/// with [`set_body_center`](Self::set_body_center).
#[derive(Clone, Default)]
pub struct QueryWorld {
    bodies: Vec<Body>,
}

impl QueryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: BodyDef) -> HitId {
        let id = HitId(self.bodies.len() as u32);
        self.bodies.push(Body::new(def));
        id
    }

    #[inline]
    pub fn body(&self, id: HitId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn set_body_center(&mut self, id: HitId, center: Point2) -> Result<(), SimError> {
        let body = self
            .bodies
            .get_mut(id.index())
            .ok_or(SimError::UnknownBody(id))?;
        body.set_center(center);
        Ok(())
    }

    /// AABB covering the ray from `origin` out to `length`.
    fn swept_aabb(origin: Point2, direction: Vec2, length: f32) -> Aabb {
        let end = origin + direction * length;
        Aabb::new(
            na::Point2::new(origin.x.min(end.x), origin.y.min(end.y)),
            na::Point2::new(origin.x.max(end.x), origin.y.max(end.y)),
        )
    }

    /// A view of this world in which `body` does not exist. Movers cast through it so
    /// their own shape never blocks them.
    #[inline]
    pub fn excluding(&self, body: HitId) -> Excluding<'_> {
        Excluding { world: self, skip: body }
    }

    fn cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
        skip: Option<HitId>,
    ) -> Option<RayHit> {
        let length = direction.norm();
        if length <= f32::EPSILON || max_distance < 0.0 || mask.is_empty() {
            return None;
        }
        let direction = direction / length;
        let max_distance = max_distance.min(MAX_CAST_DISTANCE);

        let swept = Self::swept_aabb(origin, direction, max_distance);
        let ray = Ray::new(to_point(origin), to_vector(direction));

        self.bodies
            .iter()
            .enumerate()
            .filter(|(i, body)| {
                skip != Some(HitId(*i as u32))
                    && mask.has(body.layer)
                    && body.aabb.intersects(&swept)
            })
            .filter_map(|(i, body)| {
                let (distance, normal) = body.cast(&ray, max_distance)?;
                Some(RayHit {
                    distance,
                    normal,
                    hit_id: HitId(i as u32),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl LineCast for QueryWorld {
    fn line_cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayHit> {
        self.cast(origin, direction, max_distance, mask, None)
    }
}

impl PassengerLookup for QueryWorld {
    fn passenger_for(&self, hit: HitId) -> Option<ActorId> {
        self.body(hit).and_then(Body::owner)
    }
}

/// See [`QueryWorld::excluding`].
#[derive(Clone, Copy)]
pub struct Excluding<'a> {
    world: &'a QueryWorld,
    skip: HitId,
}

impl LineCast for Excluding<'_> {
    fn line_cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayHit> {
        self.world
            .cast(origin, direction, max_distance, mask, Some(self.skip))
    }
}

impl PassengerLookup for Excluding<'_> {
    fn passenger_for(&self, hit: HitId) -> Option<ActorId> {
        if hit == self.skip {
            return None;
        }
        self.world.passenger_for(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain_box(world: &mut QueryWorld, center: (f32, f32), half: (f32, f32)) -> HitId {
        world.insert(BodyDef {
            shape: SharedShape::cuboid(half.0, half.1),
            position: Point2::new(center.0, center.1),
            rotation: 0.0,
            layer: Layer::Terrain,
            owner: None,
        })
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1.0e-4
    }

    #[test]
    fn nearest_hit_wins() {
        let mut world = QueryWorld::new();
        let far = terrain_box(&mut world, (5.0, 0.0), (0.5, 0.5));
        let near = terrain_box(&mut world, (2.0, 0.0), (0.5, 0.5));

        let hit = world
            .line_cast(Point2::origin(), Vec2::x(), 10.0, Layer::Terrain.into())
            .unwrap();
        assert_eq!(hit.hit_id, near);
        assert_ne!(hit.hit_id, far);
        assert!(close(hit.distance, 1.5));
        assert!(close(hit.normal.x, -1.0));
    }

    #[test]
    fn respects_length_and_mask() {
        let mut world = QueryWorld::new();
        terrain_box(&mut world, (2.0, 0.0), (0.5, 0.5));

        assert!(world
            .line_cast(Point2::origin(), Vec2::x(), 1.0, Layer::Terrain.into())
            .is_none());
        assert!(world
            .line_cast(Point2::origin(), Vec2::x(), 10.0, Layer::Platform.into())
            .is_none());
        assert!(world
            .line_cast(Point2::origin(), Vec2::x(), f32::INFINITY, Layer::Terrain.into())
            .is_some());
    }

    #[test]
    fn segment_normals_face_the_ray() {
        let mut world = QueryWorld::new();
        world.insert(BodyDef {
            shape: SharedShape::segment(na::Point2::new(-5.0, 0.0), na::Point2::new(5.0, 0.0)),
            position: Point2::origin(),
            rotation: 0.0,
            layer: Layer::Terrain,
            owner: None,
        });

        let from_above = world
            .line_cast(Point2::new(0.0, 1.0), -Vec2::y(), 5.0, Layer::Terrain.into())
            .unwrap();
        assert!(close(from_above.distance, 1.0));
        assert!(close(from_above.normal.y, 1.0));

        let from_below = world
            .line_cast(Point2::new(0.0, -1.0), Vec2::y(), 5.0, Layer::Terrain.into())
            .unwrap();
        assert!(close(from_below.normal.y, -1.0));
    }

    #[test]
    fn moved_bodies_are_found_at_their_new_place() {
        let mut world = QueryWorld::new();
        let id = terrain_box(&mut world, (2.0, 0.0), (0.5, 0.5));
        world.set_body_center(id, Point2::new(0.0, 3.0)).unwrap();

        assert!(world
            .line_cast(Point2::origin(), Vec2::x(), 10.0, Layer::Terrain.into())
            .is_none());
        let hit = world
            .line_cast(Point2::origin(), Vec2::y(), 10.0, Layer::Terrain.into())
            .unwrap();
        assert!(close(hit.distance, 2.5));
        assert_eq!(world.body(id).unwrap().center(), Point2::new(0.0, 3.0));

        assert!(matches!(
            world.set_body_center(HitId(9), Point2::origin()),
            Err(SimError::UnknownBody(HitId(9)))
        ));
    }

    #[test]
    fn owned_bodies_are_passengers() {
        let mut world = QueryWorld::new();
        let ground = terrain_box(&mut world, (0.0, -1.0), (5.0, 0.5));
        let player = world.insert(BodyDef {
            shape: SharedShape::cuboid(0.5, 0.5),
            position: Point2::new(0.0, 1.0),
            rotation: 0.0,
            layer: Layer::Player,
            owner: Some(ActorId(7)),
        });

        assert_eq!(world.passenger_for(player), Some(ActorId(7)));
        assert_eq!(world.passenger_for(ground), None);
        assert_eq!(world.passenger_for(HitId(42)), None);
    }

    #[test]
    fn rotated_cuboid_reports_a_slope() {
        let mut world = QueryWorld::new();
        world.insert(BodyDef {
            shape: SharedShape::cuboid(5.0, 0.5),
            position: Point2::origin(),
            rotation: 30f32.to_radians(),
            layer: Layer::Terrain,
            owner: None,
        });

        let hit = world
            .line_cast(Point2::new(0.0, 5.0), -Vec2::y(), 10.0, Layer::Terrain.into())
            .unwrap();
        assert!(close(kinematic2d::slope_angle(hit.normal), 30.0));
    }

    #[test]
    fn excluded_body_is_invisible_from_inside() {
        let mut world = QueryWorld::new();
        let floor = terrain_box(&mut world, (0.0, -0.5), (5.0, 0.5));
        let own = world.insert(BodyDef {
            shape: SharedShape::cuboid(0.5, 0.5),
            position: Point2::new(0.0, 3.0),
            rotation: 0.0,
            layer: Layer::Passenger,
            owner: Some(ActorId(0)),
        });
        let mask = CollisionMask::empty().with(Layer::Terrain).with(Layer::Passenger);
        let inside = Point2::new(0.0, 2.6);

        // A ray starting inside a solid shape stops at once.
        let blocked = world.line_cast(inside, -Vec2::y(), 10.0, mask).unwrap();
        assert_eq!(blocked.hit_id, own);
        assert_eq!(blocked.distance, 0.0);

        let view = world.excluding(own);
        let hit = view.line_cast(inside, -Vec2::y(), 10.0, mask).unwrap();
        assert_eq!(hit.hit_id, floor);
        assert!(close(hit.distance, 2.6));
        assert_eq!(view.passenger_for(own), None);
        assert_eq!(world.passenger_for(own), Some(ActorId(0)));
    }
}

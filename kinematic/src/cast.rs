//! The line-cast seam between the controller and whatever owns the geometry.

use crate::{
    layers::CollisionMask,
    types::{Point2, Vec2, up},
};

/// Stable integer identity of whatever a ray hit. Opaque to the controller,
/// used by platforms to index their passenger cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HitId(pub u32);

impl HitId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Nearest hit along a cast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit. Zero means the origin is inside geometry.
    pub distance: f32,
    /// Surface normal at the hit.
    pub normal: Vec2,
    pub hit_id: HitId,
}

/// Ray query against world geometry, supplied by the host.
///
/// Implementations must return the nearest hit within `max_distance` whose
/// layer intersects `mask`, or `None`. `direction` is a unit vector and
/// `max_distance` may be `f32::INFINITY`.
pub trait LineCast {
    fn line_cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayHit>;
}

impl<T: LineCast + ?Sized> LineCast for &T {
    fn line_cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayHit> {
        (**self).line_cast(origin, direction, max_distance, mask)
    }
}

/// Angle in degrees between a surface normal and world up.
///
/// 0 is flat ground, 90 a vertical wall.
#[inline]
pub fn slope_angle(normal: Vec2) -> f32 {
    let len = normal.norm();
    if len <= f32::EPSILON {
        return 0.0;
    }
    (normal.dot(&up()) / len).clamp(-1.0, 1.0).acos().to_degrees()
}

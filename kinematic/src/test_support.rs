//! Analytic line-segment world used by the unit tests.

use crate::{
    cast::{HitId, LineCast, RayHit},
    layers::{CollisionMask, Layer},
    platform::PassengerLookup,
    types::{ActorId, BoundingBox, Point2, Vec2},
};

struct Body {
    segments: Vec<(Point2, Point2)>,
    layer: Layer,
    owner: Option<ActorId>,
}

/// Bodies made of line segments. A body's index is its [`HitId`].
#[derive(Default)]
pub(crate) struct SegmentWorld {
    bodies: Vec<Body>,
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

impl SegmentWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(&mut self, a: (f32, f32), b: (f32, f32), layer: Layer) -> HitId {
        self.push(
            vec![(Point2::new(a.0, a.1), Point2::new(b.0, b.1))],
            layer,
            None,
        )
    }

    /// Outline of `bounds` as four segments.
    pub fn aabb(&mut self, bounds: BoundingBox, layer: Layer, owner: Option<ActorId>) -> HitId {
        let min = bounds.min();
        let max = bounds.max();
        let bl = Point2::new(min.x, min.y);
        let br = Point2::new(max.x, min.y);
        let tr = Point2::new(max.x, max.y);
        let tl = Point2::new(min.x, max.y);
        self.push(vec![(bl, br), (br, tr), (tr, tl), (tl, bl)], layer, owner)
    }

    /// A ramp rising from `start` at `degrees` for `length` units, in the +x
    /// direction when `rising_right`, otherwise falling to the right.
    pub fn ramp(&mut self, start: (f32, f32), degrees: f32, length: f32, rising_right: bool) -> HitId {
        let (s, c) = degrees.to_radians().sin_cos();
        let end = if rising_right {
            (start.0 + c * length, start.1 + s * length)
        } else {
            (start.0 + c * length, start.1 - s * length)
        };
        self.segment(start, end, Layer::Terrain)
    }

    fn push(&mut self, segments: Vec<(Point2, Point2)>, layer: Layer, owner: Option<ActorId>) -> HitId {
        self.bodies.push(Body {
            segments,
            layer,
            owner,
        });
        HitId((self.bodies.len() - 1) as u32)
    }
}

impl LineCast for SegmentWorld {
    fn line_cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for (index, body) in self.bodies.iter().enumerate() {
            if !mask.has(body.layer) {
                continue;
            }
            for &(a, b) in &body.segments {
                let edge = b - a;
                let denom = cross(direction, edge);
                if denom.abs() <= f32::EPSILON {
                    continue;
                }
                let to_a = a - origin;
                let t = cross(to_a, edge) / denom;
                let s = cross(to_a, direction) / denom;
                if !(0.0..=1.0).contains(&s) || t < 0.0 || t > max_distance {
                    continue;
                }
                if best.is_some_and(|hit| hit.distance <= t) {
                    continue;
                }

                let mut normal = Vec2::new(-edge.y, edge.x).normalize();
                if normal.dot(&direction) > 0.0 {
                    normal = -normal;
                }
                best = Some(RayHit {
                    distance: t,
                    normal,
                    hit_id: HitId(index as u32),
                });
            }
        }

        best
    }
}

impl PassengerLookup for SegmentWorld {
    fn passenger_for(&self, hit: HitId) -> Option<ActorId> {
        self.bodies.get(hit.index()).and_then(|body| body.owner)
    }
}

pub(crate) fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

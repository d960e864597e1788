/*!
Passenger detection for a moving platform.

Three sweeps run against the passenger mask, in this order, and the first
sweep to see a passenger wins:

- vertical: along the platform's vertical motion. Riders above a rising
  platform are lifted and carried sideways; things below a falling one are
  pushed down.
- horizontal: along the platform's horizontal motion, pushing whatever is in
  the way.
- top: a short upward cast from the top edge when the platform moves down or
  only sideways, catching riders the vertical sweep cannot see.

The first two sweeps move their passengers before the platform itself; riders
found by the top sweep move after it.
*/

use std::collections::BTreeSet;

use crate::{
    bounds::{BoundsSampler, RayOrigins},
    cast::{HitId, LineCast},
    layers::CollisionMask,
    platform::PassengerLookup,
    types::{ActorId, Vec2, sign, up},
};

/// Push a platform applies to one passenger this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassengerMovement {
    pub passenger: ActorId,
    pub push: Vec2,
    /// Force `below` on the passenger after its move.
    pub standing_on_platform: bool,
    /// Move before the platform translates, rather than after.
    pub move_before_platform: bool,
}

/// Arena from hit ids to passenger handles, filled on first contact.
///
/// Entries are never evicted. Hits that do not belong to a passenger are not
/// cached and are looked up again next time.
#[derive(Clone, Debug, Default)]
pub struct PassengerCache {
    slots: Vec<Option<ActorId>>,
}

impl PassengerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve<L: PassengerLookup + ?Sized>(&mut self, hit: HitId, lookup: &L) -> Option<ActorId> {
        let index = hit.index();
        if let Some(Some(actor)) = self.slots.get(index) {
            return Some(*actor);
        }

        let actor = lookup.passenger_for(hit)?;
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(actor);
        Some(actor)
    }

    /// Number of hit ids with a known passenger.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed context for one passenger search.
pub struct PassengerSweep<'a, C: ?Sized, L: ?Sized> {
    pub caster: &'a C,
    pub lookup: &'a L,
    pub sampler: &'a BoundsSampler,
    pub origins: &'a RayOrigins,
    pub mask: CollisionMask,
}

/// Passengers recorded so far in one search.
#[derive(Default)]
struct Found {
    seen: BTreeSet<ActorId>,
    movements: Vec<PassengerMovement>,
}

impl Found {
    fn record<L: PassengerLookup + ?Sized>(
        &mut self,
        cache: &mut PassengerCache,
        lookup: &L,
        hit: HitId,
        push: Vec2,
        standing_on_platform: bool,
        move_before_platform: bool,
    ) {
        let Some(passenger) = cache.resolve(hit, lookup) else {
            return;
        };
        if !self.seen.insert(passenger) {
            return;
        }

        log::debug!("passenger {passenger:?} push {push:?} before={move_before_platform}");
        self.movements.push(PassengerMovement {
            passenger,
            push,
            standing_on_platform,
            move_before_platform,
        });
    }
}

impl<C: LineCast + ?Sized, L: PassengerLookup + ?Sized> PassengerSweep<'_, C, L> {
    /// Passengers affected by a platform displacement of `velocity`, each at most once.
    pub fn run(&self, cache: &mut PassengerCache, velocity: Vec2) -> Vec<PassengerMovement> {
        let mut found = Found::default();
        let skin = self.sampler.skin();
        let dir_x = sign(velocity.x);
        let dir_y = sign(velocity.y);

        if velocity.y != 0.0 {
            let ray_length = velocity.y.abs() + skin;
            for i in 0..self.sampler.vertical_count() {
                let origin = self.sampler.vertical_ray_origin(self.origins, i, dir_y, 0.0);
                let Some(hit) = self.caster.line_cast(origin, up() * dir_y, ray_length, self.mask) else {
                    continue;
                };
                let push = Vec2::new(
                    if dir_y > 0.0 { velocity.x } else { 0.0 },
                    velocity.y - (hit.distance - skin).max(0.0) * dir_y,
                );
                found.record(cache, self.lookup, hit.hit_id, push, dir_y > 0.0, true);
            }
        }

        if velocity.x != 0.0 {
            let ray_length = velocity.x.abs() + skin;
            for i in 0..self.sampler.horizontal_count() {
                let origin = self.sampler.horizontal_ray_origin(self.origins, i, dir_x);
                let Some(hit) =
                    self.caster
                        .line_cast(origin, Vec2::new(dir_x, 0.0), ray_length, self.mask)
                else {
                    continue;
                };
                let push = Vec2::new(velocity.x - (hit.distance - skin).max(0.0) * dir_x, -skin);
                found.record(cache, self.lookup, hit.hit_id, push, false, true);
            }
        }

        if velocity.y < 0.0 || (velocity.y == 0.0 && velocity.x != 0.0) {
            let ray_length = 2.0 * skin;
            for i in 0..self.sampler.vertical_count() {
                let origin = self.sampler.vertical_ray_origin(self.origins, i, 1.0, 0.0);
                if let Some(hit) = self.caster.line_cast(origin, up(), ray_length, self.mask) {
                    found.record(cache, self.lookup, hit.hit_id, velocity, true, false);
                }
            }
        }

        found.movements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bounds::compute_origins,
        constants::SKIN_WIDTH,
        layers::Layer,
        test_support::{SegmentWorld, approx},
        types::{BoundingBox, Point2},
    };

    const RIDER: ActorId = ActorId(7);

    fn platform_box() -> BoundingBox {
        BoundingBox::new(Point2::new(0.0, 0.0), Vec2::new(1.0, 0.25))
    }

    fn sweep(world: &SegmentWorld, velocity: Vec2) -> Vec<PassengerMovement> {
        let bounds = platform_box();
        let sampler = BoundsSampler::new(&bounds, SKIN_WIDTH, 4, 4);
        let origins = compute_origins(&bounds, SKIN_WIDTH);
        let mut cache = PassengerCache::new();
        PassengerSweep {
            caster: world,
            lookup: world,
            sampler: &sampler,
            origins: &origins,
            mask: Layer::Player.into(),
        }
        .run(&mut cache, velocity)
    }

    /// Rider box resting exactly on the platform's top edge.
    fn rider_on_top(world: &mut SegmentWorld) {
        world.aabb(
            BoundingBox::new(Point2::new(0.0, 0.75), Vec2::new(0.5, 0.5)),
            Layer::Player,
            Some(RIDER),
        );
    }

    #[test]
    fn rising_platform_lifts_rider_first() {
        let mut world = SegmentWorld::new();
        rider_on_top(&mut world);

        let moves = sweep(&world, Vec2::new(0.2, 0.1));
        assert_eq!(moves.len(), 1);
        let m = moves[0];
        assert_eq!(m.passenger, RIDER);
        assert!(m.standing_on_platform);
        assert!(m.move_before_platform);
        assert!(approx(m.push.x, 0.2, 1.0e-6));
        assert!(approx(m.push.y, 0.1, 1.0e-5));
    }

    #[test]
    fn sinking_platform_carries_rider_after() {
        let mut world = SegmentWorld::new();
        rider_on_top(&mut world);

        let moves = sweep(&world, Vec2::new(0.0, -0.1));
        assert_eq!(moves.len(), 1);
        assert!(moves[0].standing_on_platform);
        assert!(!moves[0].move_before_platform);
        assert_eq!(moves[0].push, Vec2::new(0.0, -0.1));
    }

    #[test]
    fn side_push_closes_the_gap() {
        let mut world = SegmentWorld::new();
        // Rider 0.1 to the right of the platform.
        world.aabb(
            BoundingBox::new(Point2::new(1.6, 0.0), Vec2::new(0.5, 0.5)),
            Layer::Player,
            Some(RIDER),
        );

        let moves = sweep(&world, Vec2::new(0.3, 0.0));
        assert_eq!(moves.len(), 1);
        let m = moves[0];
        assert!(!m.standing_on_platform);
        assert!(m.move_before_platform);
        assert!(approx(m.push.x, 0.2, 1.0e-5));
        assert_eq!(m.push.y, -SKIN_WIDTH);
    }

    #[test]
    fn passenger_seen_by_two_sweeps_moves_once() {
        let mut world = SegmentWorld::new();
        // One actor with two colliders: one riding on top, one beside the platform.
        rider_on_top(&mut world);
        world.aabb(
            BoundingBox::new(Point2::new(1.6, 0.0), Vec2::new(0.5, 0.5)),
            Layer::Player,
            Some(RIDER),
        );

        let moves = sweep(&world, Vec2::new(0.3, 0.2));
        assert_eq!(moves.iter().filter(|m| m.passenger == RIDER).count(), 1);
        // The vertical sweep runs first and wins.
        assert!(moves[0].standing_on_platform);
    }

    #[test]
    fn non_passengers_are_ignored() {
        let mut world = SegmentWorld::new();
        world.aabb(
            BoundingBox::new(Point2::new(0.0, 0.75), Vec2::new(0.5, 0.5)),
            Layer::Player,
            None,
        );
        assert!(sweep(&world, Vec2::new(0.0, 0.1)).is_empty());
    }

    #[test]
    fn cache_fills_once_per_hit_id() {
        let mut world = SegmentWorld::new();
        world.segment((0.0, 0.0), (1.0, 0.0), Layer::Terrain);
        let rider = world.aabb(platform_box(), Layer::Player, Some(RIDER));

        let mut cache = PassengerCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.resolve(HitId(0), &world), None);
        assert_eq!(cache.resolve(rider, &world), Some(RIDER));
        assert_eq!(cache.resolve(rider, &world), Some(RIDER));
        assert_eq!(cache.len(), 1);
    }
}

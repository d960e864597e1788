use crate::{
    bounds::BoundsSampler,
    cast::{HitId, LineCast},
    config::PlatformConfig,
    constants::SKIN_WIDTH,
    error::SetupError,
    layers::CollisionMask,
    platform::{
        passengers::{PassengerCache, PassengerMovement, PassengerSweep},
        waypoints::WaypointPath,
    },
    types::{ActorId, BoundingBox, Point2, Vec2},
};

/// Maps a line-cast hit to the actor a platform may carry.
pub trait PassengerLookup {
    fn passenger_for(&self, hit: HitId) -> Option<ActorId>;
}

/// Applies a platform step to the host's actors.
pub trait PassengerCarrier {
    /// Move one passenger through its own resolver.
    fn carry_passenger(&mut self, movement: &PassengerMovement);

    /// The platform has translated by `displacement` and is now centred at `center`.
    fn platform_moved(&mut self, displacement: Vec2, center: Point2);
}

/// Everything a platform decided during [`PlatformMover::plan`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformStep {
    pub displacement: Vec2,
    pub passengers: Vec<PassengerMovement>,
}

impl PlatformStep {
    /// Passengers that move before the platform translates.
    pub fn before(&self) -> impl Iterator<Item = &PassengerMovement> {
        self.passengers.iter().filter(|m| m.move_before_platform)
    }

    /// Passengers that move after the platform translates.
    pub fn after(&self) -> impl Iterator<Item = &PassengerMovement> {
        self.passengers.iter().filter(|m| !m.move_before_platform)
    }
}

/// A kinematic platform following a waypoint path and carrying passengers.
///
/// A step is split in two so a host can plan every platform against the same
/// world before any passenger moves:
/// - [`plan`](Self::plan) advances the path and finds passengers,
/// - [`carry`](Self::carry) moves them in before/after order around the
///   platform's own translation.
#[derive(Clone, Debug)]
pub struct PlatformMover {
    bounds: BoundingBox,
    sampler: BoundsSampler,
    path: WaypointPath,
    passenger_mask: CollisionMask,
    cache: PassengerCache,
}

impl PlatformMover {
    pub fn builder() -> PlatformMoverBuilder {
        PlatformMoverBuilder::default()
    }

    pub fn plan<C, L>(&mut self, dt: f32, caster: &C, lookup: &L) -> PlatformStep
    where
        C: LineCast + ?Sized,
        L: PassengerLookup + ?Sized,
    {
        let origins = self.sampler.origins(&self.bounds);
        let displacement = self.path.step(dt, self.bounds.center);

        let passengers = PassengerSweep {
            caster,
            lookup,
            sampler: &self.sampler,
            origins: &origins,
            mask: self.passenger_mask,
        }
        .run(&mut self.cache, displacement);

        PlatformStep {
            displacement,
            passengers,
        }
    }

    pub fn carry<P: PassengerCarrier + ?Sized>(&mut self, step: &PlatformStep, carrier: &mut P) {
        for movement in step.before() {
            carrier.carry_passenger(movement);
        }

        self.bounds.translate(step.displacement);
        carrier.platform_moved(step.displacement, self.bounds.center);

        for movement in step.after() {
            carrier.carry_passenger(movement);
        }
    }

    /// `plan` followed by `carry`, for hosts with a single platform.
    pub fn step<C, L, P>(&mut self, dt: f32, caster: &C, lookup: &L, carrier: &mut P) -> PlatformStep
    where
        C: LineCast + ?Sized,
        L: PassengerLookup + ?Sized,
        P: PassengerCarrier + ?Sized,
    {
        let step = self.plan(dt, caster, lookup);
        self.carry(&step, carrier);
        step
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[inline]
    pub fn path(&self) -> &WaypointPath {
        &self.path
    }

    #[inline]
    pub fn passenger_mask(&self) -> CollisionMask {
        self.passenger_mask
    }

    #[inline]
    pub fn cache(&self) -> &PassengerCache {
        &self.cache
    }
}

/// Builder for [`PlatformMover`]. A bounding box and at least two waypoints are required.
#[derive(Clone, Debug, Default)]
pub struct PlatformMoverBuilder {
    bounds: Option<BoundingBox>,
    config: PlatformConfig,
}

impl PlatformMoverBuilder {
    pub fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn config(mut self, config: PlatformConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<PlatformMover, SetupError> {
        let bounds = self.bounds.ok_or(SetupError::MissingBounds)?;
        bounds.validate()?;
        let config = self.config.sanitized()?;

        Ok(PlatformMover {
            bounds,
            sampler: BoundsSampler::new(
                &bounds,
                SKIN_WIDTH,
                config.horizontal_ray_count,
                config.vertical_ray_count,
            ),
            path: WaypointPath::new(bounds.center, &config)?,
            passenger_mask: config.passenger_mask,
            cache: PassengerCache::new(),
        })
    }
}

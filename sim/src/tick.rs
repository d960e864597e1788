//! The simulation tick.
//!
//! One tick, in order:
//! 1. every platform plans its step against the world as it stood at the start of the tick,
//! 2. platforms carry their passengers and translate, one platform at a time in
//!    declaration order,
//! 3. every actor samples its script, runs its motor and moves through its resolver.
//!
//! World bodies follow their owners after every move, so later casts in the same tick
//! see earlier moves. A mover never sees its own body.

use kinematic2d::{
    ActorId, BoundingBox, CollisionResolver, CollisionState, HitId, PassengerCarrier,
    PassengerMovement, PlatformMover, PlatformStep, PlayerMotor, Point2, SetupError, Vec2,
};
use rapier2d::parry::shape::SharedShape;
use serde::Serialize;

use crate::{
    constants::MAX_DT_S,
    error::SimError,
    scene::{ActorDef, PlatformDef, SceneDef},
    script::InputScript,
    world::{BodyDef, QueryWorld},
};

pub struct SimActor {
    pub id: ActorId,
    pub name: String,
    body: HitId,
    resolver: CollisionResolver,
    motor: PlayerMotor,
    script: InputScript,
}

impl SimActor {
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        self.resolver.bounds()
    }

    #[inline]
    pub fn state(&self) -> &CollisionState {
        self.resolver.state()
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.motor.velocity()
    }
}

pub struct SimPlatform {
    pub name: String,
    body: HitId,
    mover: PlatformMover,
}

impl SimPlatform {
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        self.mover.bounds()
    }

    #[inline]
    pub fn mover(&self) -> &PlatformMover {
        &self.mover
    }
}

/// Where an actor ended up, for logs and the runner's JSON output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorReport {
    pub name: String,
    pub center: [f32; 2],
    pub velocity: [f32; 2],
    pub state: CollisionState,
}

pub struct Simulation {
    world: QueryWorld,
    actors: Vec<SimActor>,
    platforms: Vec<SimPlatform>,
    max_dt: f32,
    tick: u64,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::default()
    }

    /// Build the statics of `scene` into a fresh world and add its actors and platforms.
    pub fn from_scene(scene: &SceneDef) -> Result<Self, SimError> {
        let mut world = QueryWorld::new();
        for def in &scene.statics {
            world.insert(BodyDef {
                shape: def.shape.to_shared_shape(),
                position: def.position,
                rotation: def.rotation.to_radians(),
                layer: def.layer,
                owner: None,
            });
        }
        log::debug!("scene has {} statics", world.len());

        scene
            .actors
            .iter()
            .cloned()
            .fold(Self::builder().world(world), SimulationBuilder::actor)
            .platforms(scene.platforms.iter().cloned())
            .build()
    }

    /// Advance by `dt` seconds, clamped to `[0, max_dt]`.
    pub fn tick(&mut self, dt: f32) -> Result<(), SimError> {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.max_dt) } else { 0.0 };
        log::trace!("tick {} dt {dt}", self.tick);

        let world = &self.world;
        let steps: Vec<PlatformStep> = self
            .platforms
            .iter_mut()
            .map(|p| {
                let view = world.excluding(p.body);
                p.mover.plan(dt, &view, &view)
            })
            .collect();

        for (platform, step) in self.platforms.iter_mut().zip(&steps) {
            let mut carrier = WorldCarrier {
                world: &mut self.world,
                actors: &mut self.actors,
                platform_body: platform.body,
                error: None,
            };
            platform.mover.carry(step, &mut carrier);
            if let Some(err) = carrier.error {
                return Err(err);
            }
        }

        for actor in &mut self.actors {
            let input = actor.script.input_at(self.tick);
            let view = self.world.excluding(actor.body);
            let outcome = actor.motor.drive(&input, dt, &mut actor.resolver, &view);
            log::trace!("{} moved {:?}", actor.name, outcome.displacement);
            self.world
                .set_body_center(actor.body, actor.resolver.bounds().center)?;
        }

        self.tick += 1;
        Ok(())
    }

    /// Run `ticks` ticks of `dt` seconds each.
    pub fn run(&mut self, ticks: u64, dt: f32) -> Result<(), SimError> {
        for _ in 0..ticks {
            self.tick(dt)?;
        }
        Ok(())
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn world(&self) -> &QueryWorld {
        &self.world
    }

    #[inline]
    pub fn actors(&self) -> &[SimActor] {
        &self.actors
    }

    #[inline]
    pub fn platforms(&self) -> &[SimPlatform] {
        &self.platforms
    }

    pub fn actor(&self, name: &str) -> Option<&SimActor> {
        self.actors.iter().find(|a| a.name == name)
    }

    pub fn platform(&self, name: &str) -> Option<&SimPlatform> {
        self.platforms.iter().find(|p| p.name == name)
    }

    pub fn report(&self) -> Vec<ActorReport> {
        self.actors
            .iter()
            .map(|a| {
                let c = a.bounds().center;
                let v = a.velocity();
                ActorReport {
                    name: a.name.clone(),
                    center: [c.x, c.y],
                    velocity: [v.x, v.y],
                    state: *a.state(),
                }
            })
            .collect()
    }
}

/// Moves passengers through their own resolvers and keeps world bodies in sync.
struct WorldCarrier<'a> {
    world: &'a mut QueryWorld,
    actors: &'a mut [SimActor],
    platform_body: HitId,
    error: Option<SimError>,
}

impl WorldCarrier<'_> {
    fn sync(&mut self, body: HitId, center: Point2) {
        if let Err(err) = self.world.set_body_center(body, center) {
            self.error.get_or_insert(err);
        }
    }
}

impl PassengerCarrier for WorldCarrier<'_> {
    fn carry_passenger(&mut self, movement: &PassengerMovement) {
        let Some(actor) = self.actors.get_mut(movement.passenger.0 as usize) else {
            log::warn!("platform hit unknown passenger {:?}", movement.passenger);
            return;
        };
        let outcome = actor.resolver.move_by(
            &self.world.excluding(actor.body),
            movement.push,
            movement.standing_on_platform,
        );
        log::debug!(
            "{} carried {:?} (asked {:?})",
            actor.name,
            outcome.displacement,
            movement.push
        );
        let (body, center) = (actor.body, actor.resolver.bounds().center);
        self.sync(body, center);
    }

    fn platform_moved(&mut self, _displacement: Vec2, center: Point2) {
        self.sync(self.platform_body, center);
    }
}

/// Builder for [`Simulation`]. A world is required; statics go in it before building.
#[derive(Default)]
pub struct SimulationBuilder {
    world: Option<QueryWorld>,
    actors: Vec<ActorDef>,
    platforms: Vec<PlatformDef>,
    max_dt: Option<f32>,
}

impl SimulationBuilder {
    pub fn world(mut self, world: QueryWorld) -> Self {
        self.world = Some(world);
        self
    }

    pub fn actor(mut self, def: ActorDef) -> Self {
        self.actors.push(def);
        self
    }

    pub fn platform(mut self, def: PlatformDef) -> Self {
        self.platforms.push(def);
        self
    }

    pub fn platforms(mut self, defs: impl IntoIterator<Item = PlatformDef>) -> Self {
        self.platforms.extend(defs);
        self
    }

    pub fn max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = Some(max_dt);
        self
    }

    pub fn build(self) -> Result<Simulation, SimError> {
        let mut world = self.world.ok_or(SetupError::MissingLineCast)?;

        let mut actors = Vec::with_capacity(self.actors.len());
        for (i, def) in self.actors.into_iter().enumerate() {
            let id = ActorId(i as u32);
            let bounds = BoundingBox::new(def.center, def.half_extents);
            let resolver = CollisionResolver::builder()
                .bounds(bounds)
                .config(def.controller.clone())
                .build()
                .map_err(SimError::entity(&def.name))?;
            let motor = PlayerMotor::new(&def.motor).map_err(SimError::entity(&def.name))?;

            let body = world.insert(BodyDef {
                shape: SharedShape::cuboid(def.half_extents.x, def.half_extents.y),
                position: def.center,
                rotation: 0.0,
                layer: def.layer,
                owner: Some(id),
            });
            log::debug!("actor {} is {id:?}, body {body:?}", def.name);

            actors.push(SimActor {
                id,
                name: def.name,
                body,
                resolver,
                motor,
                script: InputScript::new(def.script),
            });
        }

        let mut platforms = Vec::with_capacity(self.platforms.len());
        for def in self.platforms {
            let mover = PlatformMover::builder()
                .bounds(BoundingBox::new(def.center, def.half_extents))
                .config(def.config.clone())
                .build()
                .map_err(SimError::entity(&def.name))?;

            let body = world.insert(BodyDef {
                shape: SharedShape::cuboid(def.half_extents.x, def.half_extents.y),
                position: def.center,
                rotation: 0.0,
                layer: def.layer,
                owner: None,
            });
            log::debug!("platform {} is body {body:?}", def.name);

            platforms.push(SimPlatform {
                name: def.name,
                body,
                mover,
            });
        }

        let max_dt = match self.max_dt {
            Some(dt) if dt.is_finite() && dt > 0.0 => dt,
            Some(dt) => {
                log::warn!("max_dt {dt} is not positive, using {MAX_DT_S}");
                MAX_DT_S
            }
            None => MAX_DT_S,
        };

        log::info!(
            "simulation ready: {} actors, {} platforms, {} bodies",
            actors.len(),
            platforms.len(),
            world.len()
        );

        Ok(Simulation {
            world,
            actors,
            platforms,
            max_dt,
            tick: 0,
        })
    }
}

//! Headless host for `kinematic2d`: a parry-backed query world, JSON scenes and a
//! tick loop that runs platforms and actors in a fixed order.

// Re-export the controller and Rapier so downstream users don't need to depend on them
// directly.
pub use kinematic2d;
pub use rapier2d;

pub mod constants;
pub mod error;
pub mod scene;
pub mod script;
pub mod tick;
pub mod world;

pub use error::SimError;
pub use scene::{ActorDef, PlatformDef, SceneDef, ShapeDef, StaticDef};
pub use script::{InputScript, ScriptStep};
pub use tick::{ActorReport, SimActor, SimPlatform, Simulation, SimulationBuilder};
pub use world::{Body, BodyDef, Excluding, QueryWorld};

pub mod bounds;
pub mod cast;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod layers;
pub mod motor;
pub mod platform;
pub mod types;

#[cfg(test)]
mod test_support;

pub use bounds::{BoundsSampler, RayOrigins, RaySpacing, compute_origins, compute_spacing};
pub use cast::{HitId, LineCast, RayHit, slope_angle};
pub use collision::{
    CollisionResolver, CollisionResolverBuilder, CollisionState, MoveOutcome, SlopeLimits,
    resolve_move,
};
pub use config::{ControllerConfig, MotorConfig, PlatformConfig};
pub use constants::SKIN_WIDTH;
pub use error::SetupError;
pub use layers::{CollisionMask, Layer, LayerBit, LayerMask};
pub use motor::{MotorInput, PlayerMotor, SmoothDamp};
pub use platform::{
    PassengerCache, PassengerCarrier, PassengerLookup, PassengerMovement, PlatformMover,
    PlatformMoverBuilder, PlatformStep, WaypointPath,
};
pub use types::{ActorId, BoundingBox, Point2, Vec2};

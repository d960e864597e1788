/*!
Moving platforms.

- waypoints:  the path a platform follows, with its own clock
- passengers: who is on or against the platform, and how far to push them
- mover:      `PlatformMover` and the host-facing lookup/carrier traits
*/

pub mod mover;
pub mod passengers;
pub mod waypoints;

pub use mover::{PassengerCarrier, PassengerLookup, PlatformMover, PlatformMoverBuilder, PlatformStep};
pub use passengers::{PassengerCache, PassengerMovement};
pub use waypoints::WaypointPath;

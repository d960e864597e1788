/*!
Collision root module.

Turns a requested per-frame displacement into one that does not penetrate the
world, using rays fanned out from the actor's box. The code is split for clarity:

- state:    per-actor collision flags carried between moves
- slope:    slope limits and the climb/descend projections
- resolver: the pure `resolve_move` pass and the stateful `CollisionResolver`
*/

pub mod resolver;
pub mod slope;
pub mod state;

pub use resolver::{CollisionResolver, CollisionResolverBuilder, MoveOutcome, resolve_move};
pub use slope::SlopeLimits;
pub use state::CollisionState;

/*!
Controller tolerances and design defaults.

Distances are world units, angles are degrees, time is seconds. Per-actor values
live in the config structs; these are the defaults they fall back to.
*/

/// Inward margin subtracted from every bounding box before rays are cast.
///
/// Rays start this far inside the box so an actor that is already touching a
/// surface can still detect it. Must stay strictly positive.
pub const SKIN_WIDTH: f32 = 0.015;

/// Minimum rays per axis (one per corner).
pub const MIN_RAY_COUNT: usize = 2;

/// Default rays per axis.
pub const DEFAULT_RAY_COUNT: usize = 4;

/// Steepest slope an actor walks up instead of treating it as a wall.
pub const DEFAULT_MAX_CLIMB_ANGLE: f32 = 80.0;

/// Steepest slope an actor follows down instead of falling off it.
pub const DEFAULT_MAX_DESCEND_ANGLE: f32 = 75.0;

/// Valid range for both slope limits.
pub const MIN_SLOPE_LIMIT: f32 = 1.0;
pub const MAX_SLOPE_LIMIT: f32 = 90.0;

/// Valid range for platform easing.
pub const MIN_EASE_AMOUNT: f32 = 0.0;
pub const MAX_EASE_AMOUNT: f32 = 2.0;

/// Practical small distance for comparisons.
pub const DIST_EPS: f32 = 1.0e-6;

/*!
Slope limits and the projections that put a horizontal move onto a ramp.

Both projections keep the travelled distance equal to `|x|`: the horizontal
component becomes `cos(angle)·|x|` and the vertical one `sin(angle)·|x|`.
*/

use crate::{
    constants::{DEFAULT_MAX_CLIMB_ANGLE, DEFAULT_MAX_DESCEND_ANGLE},
    types::{Vec2, sign},
};

/// Steepest walkable slopes, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopeLimits {
    pub max_climb_angle: f32,
    pub max_descend_angle: f32,
}

impl Default for SlopeLimits {
    fn default() -> Self {
        Self {
            max_climb_angle: DEFAULT_MAX_CLIMB_ANGLE,
            max_descend_angle: DEFAULT_MAX_DESCEND_ANGLE,
        }
    }
}

impl SlopeLimits {
    #[inline]
    pub fn can_climb(&self, angle: f32) -> bool {
        angle <= self.max_climb_angle
    }

    #[inline]
    pub fn can_descend(&self, angle: f32) -> bool {
        angle != 0.0 && angle <= self.max_descend_angle
    }
}

/// Project `v` up a ramp of `angle` degrees.
///
/// Returns `None` when the move already rises faster than the ramp (a jump),
/// in which case the move is left alone.
pub fn climb(v: Vec2, angle: f32) -> Option<Vec2> {
    let distance = v.x.abs();
    let (s, c) = angle.to_radians().sin_cos();
    let climb_y = s * distance;

    (v.y <= climb_y).then(|| Vec2::new(c * distance * sign(v.x), climb_y))
}

/// Project `v` down a ramp of `angle` degrees, keeping any extra fall in `y`.
pub fn descend(v: Vec2, angle: f32) -> Vec2 {
    let distance = v.x.abs();
    let (s, c) = angle.to_radians().sin_cos();
    Vec2::new(c * distance * sign(v.x), v.y - s * distance)
}

/// Whether a ramp `gap` below the actor is reached within a step of `|x|`.
#[inline]
pub fn reaches_ramp(gap: f32, angle: f32, x: f32) -> bool {
    gap <= angle.to_radians().tan() * x.abs()
}

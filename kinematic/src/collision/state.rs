use serde::Serialize;

use crate::types::Vec2;

/// What the last move touched.
///
/// Everything except `slope_angle_old`, `previous_displacement` and
/// `face_direction` is transient and cleared at the start of every move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CollisionState {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,

    pub climbing_slope: bool,
    pub descending_slope: bool,
    /// Degrees. Zero when no slope was involved.
    pub slope_angle: f32,
    /// `slope_angle` of the previous move, used to detect the start of a new ramp.
    pub slope_angle_old: f32,

    /// Displacement requested by the current move, before any correction.
    pub previous_displacement: Vec2,
    /// Sign of the last non-zero horizontal request, `1.0` or `-1.0`.
    pub face_direction: f32,
}

impl Default for CollisionState {
    fn default() -> Self {
        Self {
            above: false,
            below: false,
            left: false,
            right: false,
            climbing_slope: false,
            descending_slope: false,
            slope_angle: 0.0,
            slope_angle_old: 0.0,
            previous_displacement: Vec2::zeros(),
            face_direction: 1.0,
        }
    }
}

impl CollisionState {
    /// State at the start of a move that requests `requested`.
    pub fn reset_for(&self, requested: Vec2) -> Self {
        Self {
            slope_angle_old: self.slope_angle,
            previous_displacement: requested,
            face_direction: self.face_direction,
            ..Self::default()
        }
    }

    #[inline]
    pub fn grounded(&self) -> bool {
        self.below
    }

    /// Touching a wall on either side.
    #[inline]
    pub fn walled(&self) -> bool {
        self.left || self.right
    }

    /// `-1.0` for a wall on the left, `1.0` otherwise.
    #[inline]
    pub fn wall_direction(&self) -> f32 {
        if self.left { -1.0 } else { 1.0 }
    }
}

/*!
Math aliases and the plain data types exchanged between the sampler, the
resolver and the platform mover.

This module contains no algorithms.
*/

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{constants::SKIN_WIDTH, error::SetupError};

pub type Vec2 = na::Vector2<f32>;
pub type Point2 = na::Point2<f32>;

/// World "up". Slope angles are measured against it.
#[inline]
pub fn up() -> Vec2 {
    Vec2::new(0.0, 1.0)
}

/// Sign with `sign(0) == 1`, matching how face direction is chosen.
#[inline]
pub fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Host-side handle of an actor that a platform can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Axis-aligned box owned by an actor or platform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center: Point2,
    pub half_extents: Vec2,
}

impl BoundingBox {
    #[inline]
    pub fn new(center: Point2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn min(&self) -> Point2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Point2 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Shrink by `amount` on every side.
    #[inline]
    pub fn shrunk(&self, amount: f32) -> Self {
        Self {
            center: self.center,
            half_extents: self.half_extents.map(|h| (h - amount).max(0.0)),
        }
    }

    #[inline]
    pub fn translate(&mut self, displacement: Vec2) {
        self.center += displacement;
    }

    /// Reject boxes the rays cannot be placed inside.
    pub fn validate(&self) -> Result<(), SetupError> {
        let finite = self
            .center
            .coords
            .iter()
            .chain(self.half_extents.iter())
            .all(|v| v.is_finite());
        if !finite || self.half_extents.iter().any(|&h| h <= SKIN_WIDTH) {
            return Err(SetupError::DegenerateBounds {
                half_extents: [self.half_extents.x, self.half_extents.y],
            });
        }
        Ok(())
    }
}

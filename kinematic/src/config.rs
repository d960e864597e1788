/*!
Per-actor and per-platform configuration.

Every struct deserializes with `#[serde(default)]`, so a scene file only has
to spell out what differs from the defaults. Call `sanitized()` before use:
NaN and infinities are rejected, out-of-range values are clamped with a warning.
*/

use serde::{Deserialize, Serialize};

use crate::{
    bounds::clamp_ray_count,
    constants::{
        DEFAULT_MAX_CLIMB_ANGLE, DEFAULT_MAX_DESCEND_ANGLE, DEFAULT_RAY_COUNT, MAX_EASE_AMOUNT,
        MAX_SLOPE_LIMIT, MIN_EASE_AMOUNT, MIN_SLOPE_LIMIT,
    },
    error::{SetupError, ensure_finite},
    layers::{CollisionMask, Layer},
    types::Vec2,
};

fn clamp_logged(field: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{field} {value} is outside [{min}, {max}], clamping to {clamped}");
    }
    clamped
}

fn non_negative_logged(field: &str, value: f32) -> f32 {
    if value < 0.0 {
        log::warn!("{field} {value} is negative, clamping to 0");
        0.0
    } else {
        value
    }
}

/// Settings for an actor driven by a [`CollisionResolver`](crate::CollisionResolver).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub horizontal_ray_count: usize,
    pub vertical_ray_count: usize,
    /// Degrees.
    pub max_climb_angle: f32,
    /// Degrees.
    pub max_descend_angle: f32,
    /// What the actor treats as solid.
    pub collision_mask: CollisionMask,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            horizontal_ray_count: DEFAULT_RAY_COUNT,
            vertical_ray_count: DEFAULT_RAY_COUNT,
            max_climb_angle: DEFAULT_MAX_CLIMB_ANGLE,
            max_descend_angle: DEFAULT_MAX_DESCEND_ANGLE,
            collision_mask: CollisionMask::empty()
                .with(Layer::Terrain)
                .with(Layer::Platform),
        }
    }
}

impl ControllerConfig {
    pub fn sanitized(&self) -> Result<Self, SetupError> {
        let max_climb_angle = ensure_finite("max_climb_angle", self.max_climb_angle)?;
        let max_descend_angle = ensure_finite("max_descend_angle", self.max_descend_angle)?;

        Ok(Self {
            horizontal_ray_count: clamp_ray_count(self.horizontal_ray_count, "horizontal_ray_count"),
            vertical_ray_count: clamp_ray_count(self.vertical_ray_count, "vertical_ray_count"),
            max_climb_angle: clamp_logged(
                "max_climb_angle",
                max_climb_angle,
                MIN_SLOPE_LIMIT,
                MAX_SLOPE_LIMIT,
            ),
            max_descend_angle: clamp_logged(
                "max_descend_angle",
                max_descend_angle,
                MIN_SLOPE_LIMIT,
                MAX_SLOPE_LIMIT,
            ),
            collision_mask: self.collision_mask,
        })
    }
}

/// Settings for a [`PlatformMover`](crate::PlatformMover).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Units per second along the current leg.
    pub speed: f32,
    /// Wrap from the last waypoint to the first instead of reversing.
    pub cyclic: bool,
    pub eased_movement: bool,
    /// Easing exponent offset, in [0, 2]. 0 is a smoothstep-like curve.
    pub ease_amount: f32,
    /// Seconds to pause at each waypoint.
    pub wait_time: f32,
    /// Offsets from the platform's starting center.
    pub local_waypoints: Vec<Vec2>,
    pub horizontal_ray_count: usize,
    pub vertical_ray_count: usize,
    /// Accepted so actor and platform entries share one shape in scene files.
    /// Platforms move kinematically and never read it.
    pub collision_mask: CollisionMask,
    /// Layers the platform carries.
    pub passenger_mask: CollisionMask,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            cyclic: false,
            eased_movement: false,
            ease_amount: 0.0,
            wait_time: 0.0,
            local_waypoints: Vec::new(),
            horizontal_ray_count: DEFAULT_RAY_COUNT,
            vertical_ray_count: DEFAULT_RAY_COUNT,
            collision_mask: Layer::Terrain.into(),
            passenger_mask: CollisionMask::empty()
                .with(Layer::Player)
                .with(Layer::Passenger),
        }
    }
}

impl PlatformConfig {
    pub fn sanitized(&self) -> Result<Self, SetupError> {
        let speed = ensure_finite("speed", self.speed)?;
        let ease_amount = ensure_finite("ease_amount", self.ease_amount)?;
        let wait_time = ensure_finite("wait_time", self.wait_time)?;

        if self.local_waypoints.len() < 2 {
            return Err(SetupError::TooFewWaypoints(self.local_waypoints.len()));
        }
        for waypoint in &self.local_waypoints {
            ensure_finite("local_waypoints.x", waypoint.x)?;
            ensure_finite("local_waypoints.y", waypoint.y)?;
        }

        Ok(Self {
            speed: non_negative_logged("speed", speed),
            cyclic: self.cyclic,
            eased_movement: self.eased_movement,
            ease_amount: clamp_logged("ease_amount", ease_amount, MIN_EASE_AMOUNT, MAX_EASE_AMOUNT),
            wait_time: non_negative_logged("wait_time", wait_time),
            local_waypoints: self.local_waypoints.clone(),
            horizontal_ray_count: clamp_ray_count(self.horizontal_ray_count, "horizontal_ray_count"),
            vertical_ray_count: clamp_ray_count(self.vertical_ray_count, "vertical_ray_count"),
            collision_mask: self.collision_mask,
            passenger_mask: self.passenger_mask,
        })
    }
}

/// Settings for a [`PlayerMotor`](crate::PlayerMotor).
///
/// Wall jump vectors are `(away_from_wall_speed, upward_speed)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    pub max_jump_height: f32,
    pub min_jump_height: f32,
    pub time_to_jump_apex: f32,
    pub move_speed: f32,
    pub acceleration_time_grounded: f32,
    pub acceleration_time_airborne: f32,
    pub wall_slide_speed_max: f32,
    pub wall_stick_time: f32,
    pub wall_jump_climb: Vec2,
    pub wall_jump_off: Vec2,
    pub wall_leap: Vec2,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            max_jump_height: 4.0,
            min_jump_height: 1.0,
            time_to_jump_apex: 0.4,
            move_speed: 6.0,
            acceleration_time_grounded: 0.1,
            acceleration_time_airborne: 0.2,
            wall_slide_speed_max: 3.0,
            wall_stick_time: 0.25,
            wall_jump_climb: Vec2::new(7.5, 16.0),
            wall_jump_off: Vec2::new(8.5, 7.0),
            wall_leap: Vec2::new(18.0, 17.0),
        }
    }
}

impl MotorConfig {
    pub fn sanitized(&self) -> Result<Self, SetupError> {
        let mut out = self.clone();
        for (field, value) in [
            ("max_jump_height", self.max_jump_height),
            ("min_jump_height", self.min_jump_height),
            ("time_to_jump_apex", self.time_to_jump_apex),
            ("move_speed", self.move_speed),
            ("acceleration_time_grounded", self.acceleration_time_grounded),
            ("acceleration_time_airborne", self.acceleration_time_airborne),
            ("wall_slide_speed_max", self.wall_slide_speed_max),
            ("wall_stick_time", self.wall_stick_time),
            ("wall_jump_climb.x", self.wall_jump_climb.x),
            ("wall_jump_climb.y", self.wall_jump_climb.y),
            ("wall_jump_off.x", self.wall_jump_off.x),
            ("wall_jump_off.y", self.wall_jump_off.y),
            ("wall_leap.x", self.wall_leap.x),
            ("wall_leap.y", self.wall_leap.y),
        ] {
            ensure_finite(field, value)?;
        }

        // The apex time divides the gravity term.
        if out.time_to_jump_apex <= 0.0 {
            log::warn!(
                "time_to_jump_apex {} must be positive, using default",
                out.time_to_jump_apex
            );
            out.time_to_jump_apex = Self::default().time_to_jump_apex;
        }
        out.max_jump_height = non_negative_logged("max_jump_height", out.max_jump_height);
        out.min_jump_height = clamp_logged("min_jump_height", out.min_jump_height, 0.0, out.max_jump_height);
        out.move_speed = non_negative_logged("move_speed", out.move_speed);
        out.acceleration_time_grounded =
            non_negative_logged("acceleration_time_grounded", out.acceleration_time_grounded);
        out.acceleration_time_airborne =
            non_negative_logged("acceleration_time_airborne", out.acceleration_time_airborne);
        out.wall_slide_speed_max = non_negative_logged("wall_slide_speed_max", out.wall_slide_speed_max);
        out.wall_stick_time = non_negative_logged("wall_stick_time", out.wall_stick_time);
        Ok(out)
    }
}

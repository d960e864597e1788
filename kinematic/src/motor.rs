/*!
Platformer actor motor.

Turns an already-sampled input into a per-tick displacement for a
[`CollisionResolver`], and keeps the actor's velocity between ticks:

- gravity and jump velocities derived from jump heights and time to apex,
- horizontal speed smoothed with a critically damped spring,
- wall slide with a short stick time before the actor lets go,
- three wall jumps picked from the input direction,
- variable jump height by cutting the upward speed when jump is released.
*/

use serde::{Deserialize, Serialize};

use crate::{
    cast::LineCast,
    collision::{CollisionResolver, CollisionState, MoveOutcome},
    config::MotorConfig,
    error::SetupError,
    types::{Vec2, sign},
};

/// Input for one tick. Sampling the device is the host's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorInput {
    /// Movement axis, each component in [-1, 1].
    pub axis: Vec2,
    /// Jump went down this tick.
    pub jump_pressed: bool,
    /// Jump went up this tick.
    pub jump_released: bool,
}

impl MotorInput {
    /// Horizontal intent as -1, 0 or 1.
    #[inline]
    fn direction_x(&self) -> f32 {
        if self.axis.x == 0.0 { 0.0 } else { sign(self.axis.x) }
    }
}

/// Critically damped spring toward a moving target.
///
/// Uses the usual cubic approximation of `exp(-omega·dt)` and never overshoots
/// the target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothDamp {
    pub velocity: f32,
}

impl SmoothDamp {
    pub fn step(&mut self, current: f32, target: f32, smooth_time: f32, dt: f32) -> f32 {
        if dt <= 0.0 {
            return current;
        }

        let smooth_time = smooth_time.max(1.0e-4);
        let omega = 2.0 / smooth_time;
        let x = omega * dt;
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = current - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut output = target + (change + temp) * decay;

        if (target - current > 0.0) == (output > target) {
            output = target;
            self.velocity = 0.0;
        }
        output
    }
}

#[derive(Clone, Debug)]
pub struct PlayerMotor {
    config: MotorConfig,
    gravity: f32,
    max_jump_velocity: f32,
    min_jump_velocity: f32,
    velocity: Vec2,
    smoothing_x: SmoothDamp,
    time_to_wall_release: f32,
    wall_sliding: bool,
}

impl PlayerMotor {
    pub fn new(config: &MotorConfig) -> Result<Self, SetupError> {
        let config = config.sanitized()?;
        let apex = config.time_to_jump_apex;
        let gravity = -(2.0 * config.max_jump_height) / (apex * apex);
        let max_jump_velocity = gravity.abs() * apex;
        let min_jump_velocity = (2.0 * gravity.abs() * config.min_jump_height).sqrt();
        log::debug!("gravity {gravity:.3}, jump velocity {min_jump_velocity:.3}..{max_jump_velocity:.3}");

        Ok(Self {
            config,
            gravity,
            max_jump_velocity,
            min_jump_velocity,
            velocity: Vec2::zeros(),
            smoothing_x: SmoothDamp::default(),
            time_to_wall_release: 0.0,
            wall_sliding: false,
        })
    }

    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    #[inline]
    pub fn max_jump_velocity(&self) -> f32 {
        self.max_jump_velocity
    }

    #[inline]
    pub fn min_jump_velocity(&self) -> f32 {
        self.min_jump_velocity
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn wall_sliding(&self) -> bool {
        self.wall_sliding
    }

    /// Update velocity from `input` and the state of the previous move, and
    /// return the displacement to request this tick.
    pub fn displacement(&mut self, input: &MotorInput, state: &CollisionState, dt: f32) -> Vec2 {
        let c = &self.config;
        let wall_dir_x = state.wall_direction();
        let input_x = input.direction_x();

        let target_x = input.axis.x.clamp(-1.0, 1.0) * c.move_speed;
        let accel_time = if state.below {
            c.acceleration_time_grounded
        } else {
            c.acceleration_time_airborne
        };
        self.velocity.x = self
            .smoothing_x
            .step(self.velocity.x, target_x, accel_time, dt);

        self.wall_sliding = false;
        if state.walled() && !state.below && self.velocity.y < 0.0 {
            self.wall_sliding = true;
            self.velocity.y = self.velocity.y.max(-c.wall_slide_speed_max);

            if self.time_to_wall_release > 0.0 {
                self.smoothing_x.velocity = 0.0;
                self.velocity.x = 0.0;

                if input_x != wall_dir_x && input_x != 0.0 {
                    self.time_to_wall_release -= dt;
                } else {
                    self.time_to_wall_release = c.wall_stick_time;
                }
            } else {
                self.time_to_wall_release = c.wall_stick_time;
            }
        }

        if input.jump_pressed {
            if self.wall_sliding {
                let jump = if input_x == wall_dir_x {
                    c.wall_jump_climb
                } else if input_x == 0.0 {
                    c.wall_jump_off
                } else {
                    c.wall_leap
                };
                self.velocity = Vec2::new(-wall_dir_x * jump.x, jump.y);
                log::debug!("wall jump {:?}", self.velocity);
            }
            if state.below {
                self.velocity.y = self.max_jump_velocity;
            }
        }

        if input.jump_released && self.velocity.y > self.min_jump_velocity {
            self.velocity.y = self.min_jump_velocity;
        }

        self.velocity.y += self.gravity * dt;
        self.velocity * dt
    }

    /// Stop vertical motion after a move that hit a floor or ceiling.
    pub fn after_move(&mut self, state: &CollisionState) {
        if state.above || state.below {
            self.velocity.y = 0.0;
        }
    }

    /// One full tick: compute the displacement, move `resolver`, settle velocity.
    pub fn drive<C: LineCast + ?Sized>(
        &mut self,
        input: &MotorInput,
        dt: f32,
        resolver: &mut CollisionResolver,
        caster: &C,
    ) -> MoveOutcome {
        let requested = self.displacement(input, resolver.state(), dt);
        let outcome = resolver.move_by(caster, requested, false);
        self.after_move(&outcome.state);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layers::Layer,
        test_support::{SegmentWorld, approx},
        types::{BoundingBox, Point2},
    };

    const DT: f32 = 1.0 / 60.0;

    fn motor() -> PlayerMotor {
        PlayerMotor::new(&MotorConfig::default()).unwrap()
    }

    fn grounded() -> CollisionState {
        CollisionState {
            below: true,
            ..Default::default()
        }
    }

    fn on_right_wall() -> CollisionState {
        CollisionState {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn jump_velocities_follow_heights() {
        let m = motor();
        assert!(approx(m.gravity(), -50.0, 1.0e-3));
        assert!(approx(m.max_jump_velocity(), 20.0, 1.0e-3));
        assert!(approx(m.min_jump_velocity(), 10.0, 1.0e-3));
    }

    #[test]
    fn jump_only_from_the_ground() {
        let mut m = motor();
        let jump = MotorInput {
            jump_pressed: true,
            ..Default::default()
        };

        m.displacement(&jump, &CollisionState::default(), DT);
        assert!(m.velocity().y < 0.0);

        let mut m = motor();
        m.displacement(&jump, &grounded(), DT);
        assert!(approx(m.velocity().y, 20.0 - 50.0 * DT, 1.0e-4));
    }

    #[test]
    fn releasing_jump_cuts_rise() {
        let mut m = motor();
        m.displacement(
            &MotorInput {
                jump_pressed: true,
                ..Default::default()
            },
            &grounded(),
            DT,
        );
        m.displacement(
            &MotorInput {
                jump_released: true,
                ..Default::default()
            },
            &CollisionState::default(),
            DT,
        );
        assert!(approx(m.velocity().y, 10.0 - 50.0 * DT, 1.0e-4));
    }

    #[test]
    fn wall_slide_caps_fall_speed() {
        let mut m = motor();
        m.velocity.y = -10.0;
        m.displacement(&MotorInput::default(), &on_right_wall(), DT);
        assert!(m.wall_sliding());
        assert!(approx(m.velocity().y, -3.0 - 50.0 * DT, 1.0e-4));
    }

    #[test]
    fn wall_jumps_depend_on_input() {
        let cases = [
            (1.0, Vec2::new(-7.5, 16.0)),
            (0.0, Vec2::new(-8.5, 7.0)),
            (-1.0, Vec2::new(-18.0, 17.0)),
        ];
        for (axis_x, expected) in cases {
            let mut m = motor();
            m.velocity.y = -1.0;
            m.displacement(
                &MotorInput {
                    axis: Vec2::new(axis_x, 0.0),
                    jump_pressed: true,
                    jump_released: false,
                },
                &on_right_wall(),
                DT,
            );
            assert!(approx(m.velocity().x, expected.x, 1.0e-4), "axis {axis_x}");
            assert!(approx(m.velocity().y, expected.y - 50.0 * DT, 1.0e-4), "axis {axis_x}");
        }
    }

    #[test]
    fn wall_stick_holds_before_release() {
        let mut m = motor();
        m.velocity.y = -1.0;
        let away = MotorInput {
            axis: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };

        // First sliding tick arms the timer, then the actor sticks.
        m.displacement(&away, &on_right_wall(), DT);
        m.displacement(&away, &on_right_wall(), DT);
        assert_eq!(m.velocity().x, 0.0);
        assert!(m.time_to_wall_release < 0.25);
    }

    #[test]
    fn smooth_damp_approaches_without_overshoot() {
        let mut s = SmoothDamp::default();
        let mut x = 0.0;
        for _ in 0..120 {
            x = s.step(x, 6.0, 0.1, DT);
            assert!(x <= 6.0);
        }
        assert!(approx(x, 6.0, 1.0e-2));
        assert_eq!(s.step(x, 6.0, 0.1, 0.0), x);
    }

    #[test]
    fn landing_stops_the_fall() {
        let mut world = SegmentWorld::new();
        world.segment((-50.0, 0.0), (50.0, 0.0), Layer::Terrain);
        let mut resolver = CollisionResolver::builder()
            .bounds(BoundingBox::new(Point2::new(0.0, 3.0), Vec2::new(0.5, 0.5)))
            .build()
            .unwrap();
        let mut m = motor();

        for _ in 0..120 {
            m.drive(&MotorInput::default(), DT, &mut resolver, &world);
        }
        assert!(resolver.state().below);
        assert!(approx(resolver.bounds().min().y, 0.0, 1.0e-4));
        assert_eq!(m.velocity().y, 0.0);
    }
}

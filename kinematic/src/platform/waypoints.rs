/*!
Waypoint traversal for a moving platform.

The path owns its clock; callers advance it with [`WaypointPath::step`] and no
global time is read. A leg runs from `waypoints[from_index]` to the next one,
progress is tracked as a fraction of the leg, and arriving at the end of a leg
pauses the path for `wait_time` seconds.

Non-cyclic paths ping-pong by reversing the waypoint list in place.
*/

use crate::{
    config::PlatformConfig,
    constants::DIST_EPS,
    error::SetupError,
    types::{Point2, Vec2},
};

/// `x^a / (x^a + (1 - x)^a)` with `a = ease_amount + 1`. Expects `x` in [0, 1].
#[inline]
pub fn ease(x: f32, ease_amount: f32) -> f32 {
    let a = ease_amount + 1.0;
    let head = x.powf(a);
    let tail = (1.0 - x).powf(a);
    head / (head + tail)
}

#[derive(Clone, Debug)]
pub struct WaypointPath {
    waypoints: Vec<Point2>,
    from_index: usize,
    percent: f32,
    next_move_time: f32,
    clock: f32,

    speed: f32,
    cyclic: bool,
    eased_movement: bool,
    ease_amount: f32,
    wait_time: f32,
}

impl WaypointPath {
    /// World waypoints are the config's local offsets added to `origin`.
    ///
    /// `config` is expected to be sanitized already.
    pub fn new(origin: Point2, config: &PlatformConfig) -> Result<Self, SetupError> {
        if config.local_waypoints.len() < 2 {
            return Err(SetupError::TooFewWaypoints(config.local_waypoints.len()));
        }

        Ok(Self {
            waypoints: config.local_waypoints.iter().map(|o| origin + *o).collect(),
            from_index: 0,
            percent: 0.0,
            next_move_time: 0.0,
            clock: 0.0,
            speed: config.speed,
            cyclic: config.cyclic,
            eased_movement: config.eased_movement,
            ease_amount: config.ease_amount,
            wait_time: config.wait_time,
        })
    }

    #[inline]
    pub fn waypoints(&self) -> &[Point2] {
        &self.waypoints
    }

    #[inline]
    pub fn from_index(&self) -> usize {
        self.from_index
    }

    #[inline]
    pub fn to_index(&self) -> usize {
        (self.from_index + 1) % self.waypoints.len()
    }

    /// Waypoint the current leg is heading to.
    #[inline]
    pub fn target(&self) -> Point2 {
        self.waypoints[self.to_index()]
    }

    #[inline]
    pub fn percent(&self) -> f32 {
        self.percent
    }

    #[inline]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// True while paused at a waypoint.
    #[inline]
    pub fn waiting(&self) -> bool {
        self.clock < self.next_move_time
    }

    /// Advance the clock by `dt` and return the displacement that takes a
    /// platform currently at `current` to its new position on the path.
    pub fn step(&mut self, dt: f32, current: Point2) -> Vec2 {
        let now = self.clock;
        self.clock += dt;

        if now < self.next_move_time {
            return Vec2::zeros();
        }

        let from = self.waypoints[self.from_index];
        let to = self.target();

        let leg = (to - from).norm();
        if leg <= DIST_EPS {
            self.percent = 1.0;
        } else {
            self.percent += dt * self.speed / leg;
        }
        self.percent = self.percent.clamp(0.0, 1.0);

        let t = if self.eased_movement {
            ease(self.percent, self.ease_amount)
        } else {
            self.percent
        };
        let new_pos = Point2::from(from.coords.lerp(&to.coords, t));

        if self.percent >= 1.0 {
            self.arrive();
        }

        new_pos - current
    }

    fn arrive(&mut self) {
        self.percent = 0.0;
        self.from_index += 1;

        if self.cyclic {
            self.from_index %= self.waypoints.len();
        } else if self.from_index >= self.waypoints.len() - 1 {
            self.from_index = 0;
            self.waypoints.reverse();
        }

        self.next_move_time = self.clock + self.wait_time;
        log::debug!(
            "platform reached waypoint, next leg to {:?} at t={:.3}",
            self.target(),
            self.next_move_time
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(waypoints: &[(f32, f32)]) -> PlatformConfig {
        PlatformConfig {
            local_waypoints: waypoints.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            ..Default::default()
        }
    }

    /// Step `path` from `pos`, returning the new position.
    fn advance(path: &mut WaypointPath, pos: &mut Point2, dt: f32) -> Vec2 {
        let d = path.step(dt, *pos);
        *pos += d;
        d
    }

    #[test]
    fn ease_is_symmetric_and_pinned() {
        for amount in [0.0, 1.0, 2.0] {
            assert_eq!(ease(0.0, amount), 0.0);
            assert_eq!(ease(1.0, amount), 1.0);
            assert!((ease(0.5, amount) - 0.5).abs() < 1.0e-6);
            assert!((ease(0.25, amount) + ease(0.75, amount) - 1.0).abs() < 1.0e-6);
        }
        // Larger amounts ease in harder.
        assert!(ease(0.25, 2.0) < ease(0.25, 0.0));
    }

    #[test]
    fn needs_two_waypoints() {
        let err = WaypointPath::new(Point2::origin(), &config(&[(0.0, 0.0)])).unwrap_err();
        assert_eq!(err, SetupError::TooFewWaypoints(1));
    }

    #[test]
    fn waits_at_waypoint_for_wait_time() {
        let mut cfg = config(&[(0.0, 0.0), (4.0, 0.0)]);
        cfg.speed = 2.0;
        cfg.wait_time = 1.0;
        let mut path = WaypointPath::new(Point2::origin(), &cfg).unwrap();
        let mut pos = Point2::origin();
        let dt = 0.25;

        // 4 units at 2 u/s is 2 s, i.e. 8 ticks.
        for _ in 0..8 {
            let d = advance(&mut path, &mut pos, dt);
            assert!((d.x - 0.5).abs() < 1.0e-5);
        }
        assert!((pos.x - 4.0).abs() < 1.0e-5);

        // One simulated second of exactly zero displacement.
        for _ in 0..4 {
            assert_eq!(advance(&mut path, &mut pos, dt), Vec2::zeros());
        }

        let d = advance(&mut path, &mut pos, dt);
        assert!((d.x + 0.5).abs() < 1.0e-5);
    }

    #[test]
    fn non_cyclic_path_ping_pongs() {
        let mut path = WaypointPath::new(Point2::origin(), &config(&[(0.0, 0.0), (1.0, 0.0)])).unwrap();
        let mut pos = Point2::origin();
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);

        assert_eq!(path.target(), b);
        advance(&mut path, &mut pos, 1.0);
        assert_eq!(path.target(), a);
        assert!((pos - b).norm() < 1.0e-6);

        advance(&mut path, &mut pos, 1.0);
        assert_eq!(path.target(), b);
        assert!((pos - a).norm() < 1.0e-6);
    }

    #[test]
    fn non_cyclic_three_stops_reverse_at_the_ends() {
        let mut path = WaypointPath::new(
            Point2::origin(),
            &config(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
        )
        .unwrap();
        let mut pos = Point2::origin();
        let mut visited = Vec::new();
        for _ in 0..4 {
            advance(&mut path, &mut pos, 1.0);
            visited.push(pos);
        }

        let expected = [(1.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)];
        for (p, (x, y)) in visited.iter().zip(expected) {
            assert!((*p - Point2::new(x, y)).norm() < 1.0e-5, "{p:?} != ({x}, {y})");
        }
    }

    #[test]
    fn cyclic_path_wraps_forward() {
        let mut cfg = config(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        cfg.cyclic = true;
        let mut path = WaypointPath::new(Point2::new(10.0, 0.0), &cfg).unwrap();
        let mut pos = Point2::new(10.0, 0.0);

        let mut targets = Vec::new();
        for _ in 0..4 {
            advance(&mut path, &mut pos, 2.0);
            targets.push(path.from_index());
        }
        assert_eq!(targets, vec![1, 2, 0, 1]);
        assert_eq!(path.waypoints()[0], Point2::new(10.0, 0.0));
    }

    #[test]
    fn eased_leg_never_overshoots() {
        let mut cfg = config(&[(0.0, 0.0), (1.0, 0.0)]);
        cfg.eased_movement = true;
        cfg.ease_amount = 2.0;
        let mut path = WaypointPath::new(Point2::origin(), &cfg).unwrap();
        let mut pos = Point2::origin();

        for _ in 0..3 {
            advance(&mut path, &mut pos, 0.4);
            assert!(pos.x <= 1.0 + 1.0e-6);
        }
    }

    #[test]
    fn zero_length_leg_arrives_immediately() {
        let mut path = WaypointPath::new(Point2::origin(), &config(&[(0.0, 0.0), (0.0, 0.0)])).unwrap();
        let d = path.step(0.1, Point2::origin());
        assert_eq!(d, Vec2::zeros());
        assert_eq!(path.percent(), 0.0);
    }
}

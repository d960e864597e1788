use crate::{
    bounds::{BoundsSampler, RayOrigins},
    cast::{LineCast, slope_angle},
    collision::{
        slope::{self, SlopeLimits},
        state::CollisionState,
    },
    config::ControllerConfig,
    constants::{DIST_EPS, SKIN_WIDTH},
    error::SetupError,
    layers::CollisionMask,
    types::{BoundingBox, Vec2, sign, up},
};

/// Result of a single [`CollisionResolver::move_by`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Displacement actually applied to the box.
    pub displacement: Vec2,
    pub state: CollisionState,
}

/// Resolve `requested` against the world and return the corrected
/// displacement together with the new collision state.
///
/// This is a pure function of its inputs: nothing is moved. The order of the
/// passes is fixed:
/// 1. reset transient flags (carrying `slope_angle` into `slope_angle_old`),
/// 2. update face direction,
/// 3. descend a ramp when moving down,
/// 4. horizontal pass (always cast, at least `2·skin` long),
/// 5. vertical pass when there is vertical motion left, followed by a look-ahead cast
///    for a change of ramp ahead while climbing.
pub fn resolve_move<C: LineCast + ?Sized>(
    caster: &C,
    sampler: &BoundsSampler,
    origins: &RayOrigins,
    limits: SlopeLimits,
    mask: CollisionMask,
    previous: &CollisionState,
    requested: Vec2,
) -> (Vec2, CollisionState) {
    let mut pass = Pass {
        caster,
        sampler,
        origins,
        limits,
        mask,
        skin: sampler.skin(),
        state: previous.reset_for(requested),
        v: requested,
    };

    if requested.x != 0.0 {
        pass.state.face_direction = sign(requested.x);
    }

    if pass.v.y < 0.0 {
        pass.descend_slope();
    }

    pass.horizontal_collisions();

    if pass.v.y != 0.0 {
        pass.vertical_collisions();
    }

    (pass.v, pass.state)
}

/// Working set for one [`resolve_move`] call.
struct Pass<'a, C: ?Sized> {
    caster: &'a C,
    sampler: &'a BoundsSampler,
    origins: &'a RayOrigins,
    limits: SlopeLimits,
    mask: CollisionMask,
    skin: f32,
    state: CollisionState,
    v: Vec2,
}

impl<C: LineCast + ?Sized> Pass<'_, C> {
    /// Cast straight down from the trailing bottom corner and, if a ramp
    /// falling away in the direction of travel is within reach, follow it.
    fn descend_slope(&mut self) {
        let dir_x = self.state.face_direction;
        let origin = if dir_x < 0.0 {
            self.origins.bottom_right
        } else {
            self.origins.bottom_left
        };

        let Some(hit) = self.caster.line_cast(origin, -up(), f32::INFINITY, self.mask) else {
            return;
        };

        let angle = slope_angle(hit.normal);
        if !self.limits.can_descend(angle) || sign(hit.normal.x) != dir_x {
            return;
        }
        if !slope::reaches_ramp(hit.distance - self.skin, angle, self.v.x) {
            return;
        }

        self.v = slope::descend(self.v, angle);
        self.state.slope_angle = angle;
        self.state.descending_slope = true;
        self.state.below = true;
        log::debug!("descending {angle:.1}° slope");
    }

    fn climb_slope(&mut self, angle: f32) {
        if let Some(v) = slope::climb(self.v, angle) {
            self.v = v;
            self.state.below = true;
            self.state.climbing_slope = true;
            self.state.slope_angle = angle;
        }
    }

    fn horizontal_collisions(&mut self) {
        let dir_x = self.state.face_direction;
        let mut ray_length = self.v.x.abs() + self.skin;

        // Keep probing for touching walls even when standing still.
        if self.v.x.abs() < self.skin {
            ray_length = 2.0 * self.skin;
        }

        for i in 0..self.sampler.horizontal_count() {
            let origin = self.sampler.horizontal_ray_origin(self.origins, i, dir_x);
            let Some(hit) =
                self.caster
                    .line_cast(origin, Vec2::new(dir_x, 0.0), ray_length, self.mask)
            else {
                continue;
            };

            // Origin is inside geometry.
            if hit.distance <= 0.0 {
                continue;
            }

            let angle = slope_angle(hit.normal);
            log::trace!("horizontal ray {i}: hit at {:.4}, {angle:.1}°", hit.distance);

            if i == 0 && self.limits.can_climb(angle) {
                if self.state.descending_slope {
                    self.state.descending_slope = false;
                    self.v = self.state.previous_displacement;
                }

                // Walk up to the foot of a new ramp before projecting onto it.
                let mut distance_to_slope_start = 0.0;
                if angle != self.state.slope_angle_old {
                    distance_to_slope_start = (hit.distance - self.skin).max(0.0);
                    self.v.x -= distance_to_slope_start * dir_x;
                }

                self.climb_slope(angle);
                self.v.x += distance_to_slope_start * dir_x;
            }

            if !self.state.climbing_slope || !self.limits.can_climb(angle) {
                self.v.x = (hit.distance - self.skin).max(0.0) * dir_x;
                ray_length = hit.distance;

                if self.state.climbing_slope {
                    self.v.y = self.state.slope_angle.to_radians().tan() * self.v.x.abs();
                }

                self.state.left = dir_x < 0.0;
                self.state.right = dir_x > 0.0;
            }
        }
    }

    fn vertical_collisions(&mut self) {
        let dir_y = sign(self.v.y);
        let mut ray_length = self.v.y.abs() + self.skin;

        for i in 0..self.sampler.vertical_count() {
            let origin = self
                .sampler
                .vertical_ray_origin(self.origins, i, dir_y, self.v.x);
            let Some(hit) =
                self.caster
                    .line_cast(origin, Vec2::new(0.0, dir_y), ray_length, self.mask)
            else {
                continue;
            };
            log::trace!("vertical ray {i}: hit at {:.4}", hit.distance);

            self.v.y = (hit.distance - self.skin).max(0.0) * dir_y;
            ray_length = hit.distance;

            if self.state.climbing_slope {
                let tan = self.state.slope_angle.to_radians().tan();
                if tan.abs() > DIST_EPS {
                    self.v.x = self.v.y / tan * sign(self.v.x);
                }
            }

            self.state.below = dir_y < 0.0;
            self.state.above = dir_y > 0.0;
        }

        if self.state.climbing_slope {
            self.recheck_slope_ahead();
        }
    }

    /// Look ahead from the raised position for a ramp of a different angle and
    /// stop at its foot.
    fn recheck_slope_ahead(&mut self) {
        let dir_x = sign(self.v.x);
        let ray_length = self.v.x.abs() + self.skin;
        let corner = if dir_x < 0.0 {
            self.origins.bottom_left
        } else {
            self.origins.bottom_right
        };
        let origin = corner + up() * self.v.y;

        let Some(hit) = self
            .caster
            .line_cast(origin, Vec2::new(dir_x, 0.0), ray_length, self.mask)
        else {
            return;
        };

        let angle = slope_angle(hit.normal);
        if angle != self.state.slope_angle {
            log::debug!(
                "slope changes from {:.1}° to {angle:.1}° ahead",
                self.state.slope_angle
            );
            self.v.x = (hit.distance - self.skin).max(0.0) * dir_x;
            self.state.slope_angle = angle;
        }
    }
}

/// An actor's box, its ray layout and its collision state.
///
/// [`move_by`](Self::move_by) is the only thing that moves the box.
#[derive(Clone, Debug)]
pub struct CollisionResolver {
    bounds: BoundingBox,
    sampler: BoundsSampler,
    limits: SlopeLimits,
    mask: CollisionMask,
    state: CollisionState,
}

impl CollisionResolver {
    pub fn builder() -> CollisionResolverBuilder {
        CollisionResolverBuilder::default()
    }

    /// Resolve `requested`, apply the result to the box and store the new state.
    ///
    /// `standing_on_platform` forces `below` after the move. Platforms set it
    /// for passengers they place on top of themselves, where the downward rays
    /// would otherwise miss.
    pub fn move_by<C: LineCast + ?Sized>(
        &mut self,
        caster: &C,
        requested: Vec2,
        standing_on_platform: bool,
    ) -> MoveOutcome {
        let origins = self.sampler.origins(&self.bounds);
        let (displacement, mut state) = resolve_move(
            caster,
            &self.sampler,
            &origins,
            self.limits,
            self.mask,
            &self.state,
            requested,
        );

        self.bounds.translate(displacement);
        if standing_on_platform {
            state.below = true;
        }
        self.state = state;

        MoveOutcome {
            displacement,
            state,
        }
    }

    #[inline]
    pub fn state(&self) -> &CollisionState {
        &self.state
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[inline]
    pub fn collision_mask(&self) -> CollisionMask {
        self.mask
    }

    #[inline]
    pub fn limits(&self) -> SlopeLimits {
        self.limits
    }

    pub fn set_ray_counts(&mut self, horizontal: usize, vertical: usize) {
        self.sampler
            .set_ray_counts(&self.bounds, horizontal, vertical);
    }
}

/// Builder for [`CollisionResolver`]. A bounding box is required.
#[derive(Clone, Debug, Default)]
pub struct CollisionResolverBuilder {
    bounds: Option<BoundingBox>,
    config: ControllerConfig,
    skin: Option<f32>,
}

impl CollisionResolverBuilder {
    pub fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the skin width. Only useful for tests and tuning.
    pub fn skin(mut self, skin: f32) -> Self {
        self.skin = Some(skin);
        self
    }

    pub fn build(self) -> Result<CollisionResolver, SetupError> {
        let bounds = self.bounds.ok_or(SetupError::MissingBounds)?;
        bounds.validate()?;
        let config = self.config.sanitized()?;
        let skin = self.skin.unwrap_or(SKIN_WIDTH);
        if !(skin.is_finite() && skin > 0.0) {
            return Err(SetupError::NonFinite {
                field: "skin",
                value: skin,
            });
        }

        Ok(CollisionResolver {
            bounds,
            sampler: BoundsSampler::new(
                &bounds,
                skin,
                config.horizontal_ray_count,
                config.vertical_ray_count,
            ),
            limits: SlopeLimits {
                max_climb_angle: config.max_climb_angle,
                max_descend_angle: config.max_descend_angle,
            },
            mask: config.collision_mask,
            state: CollisionState::default(),
        })
    }
}

/*!
Ray placement for an axis-aligned box.

The box is shrunk by the skin width so rays start just inside it; rays are
then fanned out from the corners:

- horizontal rays run bottom to top along the leading side,
- vertical rays run left to right along the leading side.

Origins are a derived value and are recomputed on every move. Spacing only
changes when the ray counts or the box size change, so the sampler caches it.
*/

use crate::{
    constants::MIN_RAY_COUNT,
    types::{BoundingBox, Point2, Vec2, up},
};

/// The four corners of the skin-shrunk box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RayOrigins {
    pub top_left: Point2,
    pub top_right: Point2,
    pub bottom_left: Point2,
    pub bottom_right: Point2,
}

/// Distance between neighbouring rays on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RaySpacing {
    /// Vertical gap between horizontal rays.
    pub horizontal: f32,
    /// Horizontal gap between vertical rays.
    pub vertical: f32,
}

/// Corners of `bounds` after shrinking it by `skin` on all sides.
pub fn compute_origins(bounds: &BoundingBox, skin: f32) -> RayOrigins {
    let inner = bounds.shrunk(skin);
    let min = inner.min();
    let max = inner.max();

    RayOrigins {
        top_left: Point2::new(min.x, max.y),
        top_right: Point2::new(max.x, max.y),
        bottom_left: Point2::new(min.x, min.y),
        bottom_right: Point2::new(max.x, min.y),
    }
}

/// Ray spacing for the given counts. Counts below 2 are treated as 2.
pub fn compute_spacing(
    bounds: &BoundingBox,
    skin: f32,
    horizontal_count: usize,
    vertical_count: usize,
) -> RaySpacing {
    let size = bounds.shrunk(skin).size();
    let h = horizontal_count.max(MIN_RAY_COUNT);
    let v = vertical_count.max(MIN_RAY_COUNT);

    RaySpacing {
        horizontal: size.y / (h - 1) as f32,
        vertical: size.x / (v - 1) as f32,
    }
}

/// Clamp a configured ray count to the supported minimum.
pub fn clamp_ray_count(count: usize, field: &str) -> usize {
    if count < MIN_RAY_COUNT {
        log::warn!("{field} {count} is below {MIN_RAY_COUNT}, clamping");
        MIN_RAY_COUNT
    } else {
        count
    }
}

/// Ray counts, skin, and the spacing cached for the last box size seen.
#[derive(Clone, Debug)]
pub struct BoundsSampler {
    skin: f32,
    horizontal_count: usize,
    vertical_count: usize,
    spacing: RaySpacing,
    cached_size: Vec2,
}

impl BoundsSampler {
    pub fn new(bounds: &BoundingBox, skin: f32, horizontal_count: usize, vertical_count: usize) -> Self {
        let horizontal_count = clamp_ray_count(horizontal_count, "horizontal_ray_count");
        let vertical_count = clamp_ray_count(vertical_count, "vertical_ray_count");

        Self {
            skin,
            horizontal_count,
            vertical_count,
            spacing: compute_spacing(bounds, skin, horizontal_count, vertical_count),
            cached_size: bounds.size(),
        }
    }

    #[inline]
    pub fn skin(&self) -> f32 {
        self.skin
    }

    #[inline]
    pub fn horizontal_count(&self) -> usize {
        self.horizontal_count
    }

    #[inline]
    pub fn vertical_count(&self) -> usize {
        self.vertical_count
    }

    #[inline]
    pub fn spacing(&self) -> RaySpacing {
        self.spacing
    }

    /// Change the ray counts and recompute spacing.
    pub fn set_ray_counts(&mut self, bounds: &BoundingBox, horizontal: usize, vertical: usize) {
        self.horizontal_count = clamp_ray_count(horizontal, "horizontal_ray_count");
        self.vertical_count = clamp_ray_count(vertical, "vertical_ray_count");
        self.recompute(bounds);
    }

    /// Recompute origins for this frame, refreshing spacing first if the box was resized.
    pub fn origins(&mut self, bounds: &BoundingBox) -> RayOrigins {
        if bounds.size() != self.cached_size {
            self.recompute(bounds);
        }
        compute_origins(bounds, self.skin)
    }

    fn recompute(&mut self, bounds: &BoundingBox) {
        self.spacing = compute_spacing(bounds, self.skin, self.horizontal_count, self.vertical_count);
        self.cached_size = bounds.size();
    }

    /// Origin of horizontal ray `i` on the side facing `direction_x`.
    #[inline]
    pub fn horizontal_ray_origin(&self, origins: &RayOrigins, index: usize, direction_x: f32) -> Point2 {
        let corner = if direction_x < 0.0 {
            origins.bottom_left
        } else {
            origins.bottom_right
        };
        corner + up() * (self.spacing.horizontal * index as f32)
    }

    /// Origin of vertical ray `i` on the side facing `direction_y`, shifted by `x_offset`.
    #[inline]
    pub fn vertical_ray_origin(
        &self,
        origins: &RayOrigins,
        index: usize,
        direction_y: f32,
        x_offset: f32,
    ) -> Point2 {
        let corner = if direction_y < 0.0 {
            origins.bottom_left
        } else {
            origins.top_left
        };
        corner + Vec2::new(self.spacing.vertical * index as f32 + x_offset, 0.0)
    }
}

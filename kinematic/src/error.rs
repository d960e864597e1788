use thiserror::Error;

/// Fatal setup failures. An actor or platform that hits one of these is not
/// created; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("no bounding box was supplied")]
    MissingBounds,

    #[error("no line-cast capability was supplied")]
    MissingLineCast,

    #[error("bounding box half extents {half_extents:?} must be finite and wider than the skin")]
    DegenerateBounds { half_extents: [f32; 2] },

    #[error("a platform needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
}

/// Reject NaN and infinities in config fields.
pub(crate) fn ensure_finite(field: &'static str, value: f32) -> Result<f32, SetupError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SetupError::NonFinite { field, value })
    }
}

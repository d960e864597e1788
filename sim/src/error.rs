use std::path::PathBuf;

use kinematic2d::{HitId, SetupError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("{name}: {source}")]
    Entity {
        name: String,
        #[source]
        source: SetupError,
    },

    #[error("{0}: shape must be finite with positive half extents")]
    InvalidShape(String),

    #[error("no body with id {0:?}")]
    UnknownBody(HitId),
}

impl SimError {
    pub(crate) fn entity(name: &str) -> impl FnOnce(SetupError) -> Self + '_ {
        move |source| Self::Entity {
            name: name.to_string(),
            source,
        }
    }
}

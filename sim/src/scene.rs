//! JSON scene files.
//!
//! A scene lists immutable statics, player-driven actors and moving platforms. Every
//! optional field falls back to the library defaults, so the smallest useful scene is
//! a floor and one actor:
//!
//! ```json
//! {
//!   "statics": [{ "shape": { "type": "cuboid", "half_extents": [10, 0.5] }, "position": [0, -0.5] }],
//!   "actors": [{ "name": "player", "center": [0, 2], "half_extents": [0.5, 0.5] }]
//! }
//! ```
//!
//! Conventions
//! - Units are world units, y up.
//! - Static rotation is in degrees, counter-clockwise.
//! - Platform waypoints are offsets from the platform's starting center.

use std::{fs, path::Path};

use kinematic2d::{ControllerConfig, Layer, MotorConfig, PlatformConfig, Point2, Vec2};
use rapier2d::{na, parry::shape::SharedShape};
use serde::{Deserialize, Serialize};

use crate::{error::SimError, script::ScriptStep};

fn origin() -> Point2 {
    Point2::origin()
}

fn terrain() -> Layer {
    Layer::Terrain
}

fn player() -> Layer {
    Layer::Player
}

fn platform() -> Layer {
    Layer::Platform
}

/// Supported static shapes, in the static's local frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDef {
    Cuboid { half_extents: Vec2 },
    Segment { a: Point2, b: Point2 },
    Triangle { a: Point2, b: Point2, c: Point2 },
}

impl ShapeDef {
    pub fn to_shared_shape(&self) -> SharedShape {
        let p = |p: &Point2| na::Point2::new(p.x, p.y);
        match self {
            ShapeDef::Cuboid { half_extents } => SharedShape::cuboid(half_extents.x, half_extents.y),
            ShapeDef::Segment { a, b } => SharedShape::segment(p(a), p(b)),
            ShapeDef::Triangle { a, b, c } => SharedShape::triangle(p(a), p(b), p(c)),
        }
    }

    fn validate(&self, name: &str) -> Result<(), SimError> {
        let finite = match self {
            ShapeDef::Cuboid { half_extents } => {
                half_extents.iter().all(|v| v.is_finite() && *v > 0.0)
            }
            ShapeDef::Segment { a, b } => a.iter().chain(b.iter()).all(|v| v.is_finite()),
            ShapeDef::Triangle { a, b, c } => {
                a.iter().chain(b.iter()).chain(c.iter()).all(|v| v.is_finite())
            }
        };
        if finite {
            Ok(())
        } else {
            Err(SimError::InvalidShape(name.to_string()))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticDef {
    pub shape: ShapeDef,
    #[serde(default = "origin")]
    pub position: Point2,
    /// Degrees.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "terrain")]
    pub layer: Layer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorDef {
    pub name: String,
    pub center: Point2,
    pub half_extents: Vec2,
    #[serde(default = "player")]
    pub layer: Layer,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub motor: MotorConfig,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub name: String,
    pub center: Point2,
    pub half_extents: Vec2,
    #[serde(default = "platform")]
    pub layer: Layer,
    #[serde(default)]
    pub config: PlatformConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    #[serde(default)]
    pub statics: Vec<StaticDef>,
    #[serde(default)]
    pub actors: Vec<ActorDef>,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
}

impl SceneDef {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded scene {}", path.display());
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), SimError> {
        for (i, s) in self.statics.iter().enumerate() {
            let name = format!("statics[{i}]");
            s.shape.validate(&name)?;
            if !s.position.iter().all(|v| v.is_finite()) || !s.rotation.is_finite() {
                return Err(SimError::InvalidShape(name));
            }
        }
        Ok(())
    }
}

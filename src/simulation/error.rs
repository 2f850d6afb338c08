//! Error types for scene loading and validation
//!
//! Every error here is a configuration error: the scene is rejected before the
//! first tick, so nothing is ever rendered from a partially-invalid scene.

use thiserror::Error;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while loading or building a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("body `{0}` has an orbit speed of zero")]
    ZeroOrbitSpeed(String),

    #[error("body `{name}` has eccentricity {value}, expected a value in [0, 1)")]
    EccentricityOutOfRange { name: String, value: f64 },

    #[error("black hole swallows `{0}`, which is not a configured body")]
    UnknownSwallowedBody(String),

    #[error("body name `{0}` is used more than once")]
    DuplicateBodyName(String),

    #[error("invalid color `{value}` for `{owner}`, expected #RRGGBB")]
    InvalidColor { owner: String, value: String },

    #[error("`{0}` must be a finite number")]
    NonFinite(String),

    #[error("`{0}` must be greater than zero")]
    NonPositive(String),

    #[error("`{0}` must not be negative")]
    Negative(String),

    #[error("`{0}` has a minimum larger than its maximum")]
    InvertedRange(String),

    #[error("scene has no bodies")]
    EmptyBodySet,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

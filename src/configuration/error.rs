//! Error types for loading and validating scenarios

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons a scenario is rejected before the first tick.
/// Nothing past construction returns these; runtime numerics are total.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("gravitational constant must be positive, got {0}")]
    NonPositiveGravity(f64),

    #[error("time step must be finite and non-zero, got {0}")]
    InvalidTimeStep(f64),

    #[error("time scale must be between 0 and {max}, got {value}")]
    InvalidTimeScale { value: f64, max: f64 },

    #[error("`{name}` asks for {points} trail points, at most {max} are allowed")]
    InvalidTrailLength { name: String, points: usize, max: usize },

    #[error("body `{name}` has invalid mass {mass}")]
    InvalidMass { name: String, mass: f64 },

    #[error("body `{name}` has invalid orbit radius {radius}")]
    InvalidOrbitRadius { name: String, radius: f64 },

    #[error("satellite `{name}` has non-finite orbit speed {speed}")]
    InvalidOrbitSpeed { name: String, speed: f64 },

    #[error("duplicate body name `{0}`")]
    DuplicateName(String),

    #[error("body names must not be empty")]
    EmptyName,
}

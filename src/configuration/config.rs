//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`ParametersConfig`]   – step size, physical constants, scaling, trail defaults
//! - [`CentralBodyConfig`]  – the dominant mass placed at rest at the origin
//! - [`BodyConfig`]         – one orbiting body, started on a circular orbit
//! - [`SatelliteConfig`]    – a kinematic moon attached to a body
//! - [`ScenarioConfig`]     – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   dt: 0.0001              # years per tick
//!   G: 39.478               # AU^3 / (M_sun yr^2)
//!   eps: 1.0e-6             # squared-distance force cutoff
//!   distance_scale: 5.0     # multiplier on every `a`
//!   max_trail_points: 16384
//!
//! central:
//!   name: Sun
//!   mass: 1.0
//!
//! bodies:
//!   - name: Earth
//!     mass: 3.0e-6
//!     a: 1.0                # orbit radius before scaling
//!     max_trail_points: 10000
//!     rotation_factor: 1.0
//!     axial_tilt: 23.44
//!     moons:
//!       - name: Moon
//!         mass: 7.35e-8
//!         orbit_radius: 0.15
//!         orbit_speed: 84.1
//!         max_trail_points: 1000
//! ```
//!
//! Only `name`, `mass` and `a` (or `orbit_radius`/`orbit_speed` for moons) are
//! required; everything else has a default. Validation happens when the
//! scenario is built, see `Scenario::build_scenario`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::{ConfigError, ConfigResult};
use crate::simulation::params::{DEFAULT_EPS, DEFAULT_MAX_TRAIL_POINTS, G_AU_MSUN_YEAR};

fn default_dt() -> f64 { 1e-4 }
fn default_g() -> f64 { G_AU_MSUN_YEAR }
fn default_eps() -> f64 { DEFAULT_EPS }
fn default_one() -> f64 { 1.0 }
fn default_trail() -> usize { DEFAULT_MAX_TRAIL_POINTS }

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(default = "default_dt")]
    pub dt: f64, // base time step per tick
    #[serde(default = "default_g")]
    pub G: f64, // gravitational constant
    #[serde(default = "default_eps")]
    pub eps: f64, // squared-distance cutoff below which pairs exert no force
    #[serde(default = "default_one")]
    pub distance_scale: f64, // multiplier applied to every configured `a`
    #[serde(default = "default_one")]
    pub time_scale: f64, // initial step multiplier
    #[serde(default = "default_trail")]
    pub max_trail_points: usize, // trail cap for bodies that do not set one
    #[serde(default)]
    pub prime_accelerations: bool, // compute `a` before the first tick instead of starting at zero
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            G: default_g(),
            eps: default_eps(),
            distance_scale: 1.0,
            time_scale: 1.0,
            max_trail_points: default_trail(),
            prime_accelerations: false,
        }
    }
}

/// Display hints, passed straight through to the renderer side
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PresentationConfig {
    #[serde(default)]
    pub rotation_factor: f64, // spin relative to Earth, negative = retrograde
    #[serde(default)]
    pub axial_tilt: f64, // degrees
    #[serde(default)]
    pub visual_radius: f64, // draw radius
    #[serde(default)]
    pub dwarf: bool, // dwarf planet
}

/// The dominant mass, always placed at the origin at rest
#[derive(Deserialize, Debug, Clone)]
pub struct CentralBodyConfig {
    pub name: String,
    pub mass: f64,
    pub max_trail_points: Option<usize>,
    #[serde(flatten)]
    pub presentation: PresentationConfig,
}

/// An orbiting body, started at `(a * distance_scale, 0, 0)` with circular speed along +y
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub mass: f64, // relative to the configured mass unit
    pub a: f64, // orbit radius before scaling
    pub max_trail_points: Option<usize>,
    #[serde(flatten)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub moons: Vec<SatelliteConfig>,
}

/// A kinematic moon
#[derive(Deserialize, Debug, Clone)]
pub struct SatelliteConfig {
    pub name: String,
    #[serde(default)]
    pub mass: f64, // informational only
    pub orbit_radius: f64, // distance from the parent, not scaled
    pub orbit_speed: f64, // rad per time unit
    pub max_trail_points: Option<usize>,
    #[serde(flatten)]
    pub presentation: PresentationConfig,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub parameters: ParametersConfig,
    pub central: CentralBodyConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

/// Read and parse a scenario file. Does not validate values.
pub fn load_scenario(path: impl AsRef<Path>) -> ConfigResult<ScenarioConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ScenarioConfig::from_yaml_str(&text)
}

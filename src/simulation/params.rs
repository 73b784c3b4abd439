//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - base step size `dt`,
//! - gravitational constant `G` and the force cutoff `eps`,
//! - distance scaling applied to configured orbit radii,
//! - default trail length and whether to prime accelerations at start

/// G in AU^3 / (solar mass * year^2), roughly (2π)^2
pub const G_AU_MSUN_YEAR: f64 = 39.478;

/// Squared distance below which a pair exerts no force
pub const DEFAULT_EPS: f64 = 1e-6;

/// Trail length used when a body does not set its own
pub const DEFAULT_MAX_TRAIL_POINTS: usize = 16384;

/// Largest trail a scenario may ask for
pub const MAX_TRAIL_POINTS: usize = 1 << 20;

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64, // base step size per tick
    pub G: f64, // gravitational constant
    pub eps: f64, // squared-distance cutoff
    pub distance_scale: f64, // multiplier on configured orbit radii
    pub max_trail_points: usize, // default trail cap
    pub prime_accelerations: bool, // seed `a` from initial positions before the first tick
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            dt: 1e-4,
            G: G_AU_MSUN_YEAR,
            eps: DEFAULT_EPS,
            distance_scale: 1.0,
            max_trail_points: DEFAULT_MAX_TRAIL_POINTS,
            prime_accelerations: false,
        }
    }
}

/// Speed of a circular orbit of radius `r` around `central_mass`: `sqrt(G M / r)`
#[allow(non_snake_case)]
pub fn circular_speed(G: f64, central_mass: f64, r: f64) -> f64 {
    (G * central_mass / r).sqrt()
}

//! Read-only views over a running system
//!
//! Per-body readouts for an info display, and whole-system conservation
//! probes (momentum, center of mass, energy) for monitoring drift.

use super::states::{BodyId, NVec3, System};

/// What an info panel shows for one dynamic body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyReadout {
    pub name: String,
    pub mass: f64,
    pub distance_from_central: f64, // 0 for the central body itself
    pub speed: f64,
}

pub fn readout(sys: &System, id: BodyId) -> Option<BodyReadout> {
    let b = sys.body(id)?;
    let distance_from_central = match sys.central() {
        Some(c) if id.0 != 0 => (b.x - c.x).norm(),
        _ => 0.0,
    };
    Some(BodyReadout {
        name: b.name.clone(),
        mass: b.m,
        distance_from_central,
        speed: b.v.norm(),
    })
}

pub fn readouts(sys: &System) -> Vec<BodyReadout> {
    (0..sys.bodies.len()).filter_map(|i| readout(sys, BodyId(i))).collect()
}

/// Sum of m v over the dynamic bodies
pub fn total_momentum(sys: &System) -> NVec3 {
    sys.bodies.iter().fold(NVec3::zeros(), |p, b| p + b.m * b.v)
}

/// Mass-weighted mean position of the dynamic bodies, `None` if total mass is zero
pub fn center_of_mass(sys: &System) -> Option<NVec3> {
    let total: f64 = sys.bodies.iter().map(|b| b.m).sum();
    if total == 0.0 {
        return None;
    }
    let weighted = sys.bodies.iter().fold(NVec3::zeros(), |c, b| c + b.m * b.x);
    Some(weighted / total)
}

/// Kinetic plus pairwise potential energy. Pairs closer than the force
/// cutoff contribute no potential, matching the force model.
#[allow(non_snake_case)]
pub fn total_energy(sys: &System, G: f64, eps: f64) -> f64 {
    let kinetic: f64 = sys.bodies.iter().map(|b| 0.5 * b.m * b.v.norm_squared()).sum();

    let mut potential = 0.0;
    let n = sys.bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (bi, bj) = (&sys.bodies[i], &sys.bodies[j]);
            let r2 = (bj.x - bi.x).norm_squared();
            if r2 < eps {
                continue;
            }
            potential -= G * bi.m * bj.m / r2.sqrt();
        }
    }
    kinetic + potential
}

/// True if any dynamic body or satellite has a NaN/inf position or velocity
pub fn has_non_finite(sys: &System) -> bool {
    let finite = |v: &NVec3| v.iter().all(|c| c.is_finite());
    sys.bodies.iter().any(|b| !finite(&b.x) || !finite(&b.v))
        || sys.satellites.iter().any(|s| !finite(&s.x))
}

//! Fixed-step time integrator for the dynamic bodies
//!
//! Velocity-Verlet with the acceleration carried across steps: each body's
//! stored `a` is the acceleration at its current position, so one step needs
//! only one new force evaluation

use super::states::{System, NVec3};
use super::forces::ForceSet;

/// Turn net forces on the current positions into accelerations, `out[i] = F_i / m_i`.
/// Massless bodies get zero.
pub fn compute_accelerations(sys: &System, forces: &ForceSet, out: &mut [NVec3]) {
    forces.accumulate_forces(&sys.bodies, out);
    for (b, a) in sys.bodies.iter().zip(out.iter_mut()) {
        if b.m == 0.0 {
            *a = NVec3::zeros();
        } else {
            *a /= b.m;
        }
    }
}

/// Store the acceleration of the current positions in every body, so the first
/// `verlet_integrator` call does not start from a zero `a_old`
pub fn prime_accelerations(sys: &mut System, forces: &ForceSet) {
    let mut a = vec![NVec3::zeros(); sys.bodies.len()];
    compute_accelerations(sys, forces, &mut a);
    for (b, a) in sys.bodies.iter_mut().zip(a) {
        b.a = a;
    }
}

/// Advance every dynamic body by one step `dt` using velocity-Verlet.
///
/// 1. `x += v dt + a_old dt^2 / 2` for every body
/// 2. forces on the new positions -> `a_new` (zero for massless bodies)
/// 3. `v += (a_old + a_new) dt / 2`
/// 4. `a = a_new`
///
/// Step 1 finishes for all bodies before any force is computed, so step 2
/// never sees a mix of old and new positions. `dt` is used as given, no
/// clamping or sub-stepping. Does not touch `sys.t`, satellites or trails.
pub fn verlet_integrator(sys: &mut System, forces: &ForceSet, dt: f64) {
    let n = sys.bodies.len();
    if n == 0 { // no bodies, return
        return;
    }

    let half_dt2 = 0.5 * dt * dt;
    let half_dt = 0.5 * dt;

    // Drift: x_n+1 = x_n + v_n dt + 1/2 a_n dt^2
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v + half_dt2 * b.a;
    }

    // a_n+1 from x_n+1
    let mut a_new = vec![NVec3::zeros(); n];
    compute_accelerations(sys, forces, &mut a_new);

    // Kick with the average: v_n+1 = v_n + 1/2 (a_n + a_n+1) dt, then carry a_n+1
    for (b, a) in sys.bodies.iter_mut().zip(a_new) {
        b.v += half_dt * (b.a + a);
        b.a = a;
    }
}

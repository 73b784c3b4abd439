//! Kinematic moons
//!
//! Satellites ride a fixed circle around their parent. They feel no
//! gravity and exert none, so they are moved here after the integrator has
//! finished with the parents for the tick.

use super::states::System;

/// Advance each satellite's angle by `orbit_speed * dt` and place it around
/// its parent's already-updated position
pub fn update_satellites(sys: &mut System, dt: f64) {
    for s in sys.satellites.iter_mut() {
        s.angle += s.orbit_speed * dt;
    }
    place_satellites(sys);
}

/// Recompute satellite world positions from the current parents without
/// advancing any angle
pub fn place_satellites(sys: &mut System) {
    let System { bodies, satellites, .. } = sys;
    for s in satellites.iter_mut() {
        // parents are checked on attach and the body list never shrinks
        if let Some(parent) = bodies.get(s.parent.0) {
            s.x = parent.x + s.offset();
        }
    }
}

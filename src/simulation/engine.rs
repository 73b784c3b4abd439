//! Per-tick driver and run controls
//!
//! `advance` is the single entry point that moves the whole system forward.
//! `Engine` holds the pause flag and time scale the caller toggles between
//! ticks.

use tracing::trace;

use super::forces::ForceSet;
use super::integrator::verlet_integrator;
use super::satellites::update_satellites;
use super::states::System;
use super::trail::record_trails;

/// Upper bound accepted by [`Engine::set_time_scale`]
pub const MAX_TIME_SCALE: f64 = 100.0;

/// Advance the whole system by `dt`.
///
/// Dynamic bodies first, then satellites around the moved parents, then one
/// trail sample per body, then the clock.
pub fn advance(sys: &mut System, forces: &ForceSet, dt: f64) {
    verlet_integrator(sys, forces, dt);
    update_satellites(sys, dt);
    record_trails(sys);
    sys.t += dt;
    trace!(t = sys.t, dt, "advanced system");
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub paused: bool, // true = ticks do nothing
    pub time_scale: f64, // multiplier on the base step
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            paused: false,
            time_scale: 1.0,
        }
    }
}

impl Engine {
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Set the step multiplier, clamped to `[0, MAX_TIME_SCALE]`. NaN is ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
    }

    /// Step to take this tick, `None` while paused
    pub fn effective_dt(&self, base_dt: f64) -> Option<f64> {
        if self.paused {
            None
        } else {
            Some(base_dt * self.time_scale)
        }
    }
}

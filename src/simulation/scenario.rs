//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario`, containing:
//! - run controls (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies and moons at t = 0)
//! - active force set (`ForceSet`)
//!
//! Configuration is validated here, once. A scenario that builds will not
//! produce errors later; bad numbers that slip past (or are poked in
//! directly) simply propagate through the physics as NaN/inf.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::configuration::config::{PresentationConfig, ScenarioConfig};
use crate::configuration::error::{ConfigError, ConfigResult};
use crate::simulation::engine::{advance, Engine, MAX_TIME_SCALE};
use crate::simulation::forces::{ForceSet, NewtonianGravity};
use crate::simulation::integrator::prime_accelerations;
use crate::simulation::params::{circular_speed, Parameters, MAX_TRAIL_POINTS};
use crate::simulation::satellites::place_satellites;
use crate::simulation::states::{BodyId, DynamicBody, KinematicSatellite, NVec3, Presentation, System};

/// Runtime bundle constructed from a [`ScenarioConfig`]: run controls,
/// parameters, current system state and the set of active force laws
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: ForceSet,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> ConfigResult<Self> {
        validate(&cfg)?;

        // Parameters (runtime) from ParametersConfig
        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt,
            G: p_cfg.G,
            eps: p_cfg.eps,
            distance_scale: p_cfg.distance_scale,
            max_trail_points: p_cfg.max_trail_points,
            prime_accelerations: p_cfg.prime_accelerations,
        };

        let mut engine = Engine::default();
        engine.set_time_scale(p_cfg.time_scale);

        // Central body at rest at the origin, index 0
        let central_mass = cfg.central.mass;
        let mut bodies = Vec::with_capacity(cfg.bodies.len() + 1);
        bodies.push(
            DynamicBody::new(
                cfg.central.name.clone(),
                central_mass,
                NVec3::zeros(),
                NVec3::zeros(),
                cfg.central.max_trail_points.unwrap_or(parameters.max_trail_points),
            )
            .with_presentation(presentation(&cfg.central.presentation)),
        );

        // Orbiting bodies on circular orbits: r along +x, v along +y
        let mut satellites = Vec::new();
        for bc in &cfg.bodies {
            let r = bc.a * parameters.distance_scale;
            let speed = circular_speed(parameters.G, central_mass, r);
            let id = BodyId(bodies.len());

            bodies.push(
                DynamicBody::new(
                    bc.name.clone(),
                    bc.mass,
                    NVec3::new(r, 0.0, 0.0),
                    NVec3::new(0.0, speed, 0.0),
                    bc.max_trail_points.unwrap_or(parameters.max_trail_points),
                )
                .with_presentation(presentation(&bc.presentation)),
            );
            debug!(name = %bc.name, r, speed, "placed body");

            for mc in &bc.moons {
                satellites.push(
                    KinematicSatellite::new(
                        mc.name.clone(),
                        mc.mass,
                        id,
                        mc.orbit_radius,
                        mc.orbit_speed,
                        mc.max_trail_points.unwrap_or(parameters.max_trail_points),
                    )
                    .with_presentation(presentation(&mc.presentation)),
                );
            }
        }

        let mut system = System::new(bodies);
        system.satellites = satellites;
        place_satellites(&mut system);

        // Forces: gravity is the only registered law
        let forces = ForceSet::new().with(NewtonianGravity {
            G: parameters.G,
            eps: parameters.eps,
        });

        if parameters.prime_accelerations {
            prime_accelerations(&mut system, &forces);
        }

        info!(
            bodies = system.bodies.len(),
            satellites = system.satellites.len(),
            dt = parameters.dt,
            G = parameters.G,
            "built scenario"
        );

        Ok(Self {
            engine,
            parameters,
            system,
            forces,
        })
    }

    /// Wrap an already-assembled system with direct gravity and default controls.
    /// Skips validation.
    pub fn from_system(system: System, parameters: Parameters) -> Self {
        let forces = ForceSet::new().with(NewtonianGravity {
            G: parameters.G,
            eps: parameters.eps,
        });
        Self {
            engine: Engine::default(),
            parameters,
            system,
            forces,
        }
    }

    /// Advance by an explicit `dt`, ignoring pause and time scale
    pub fn advance(&mut self, dt: f64) {
        advance(&mut self.system, &self.forces, dt);
    }

    /// One simulation tick at `dt * time_scale`. Returns `false` and leaves
    /// everything untouched, trails included, while paused.
    pub fn tick(&mut self) -> bool {
        match self.engine.effective_dt(self.parameters.dt) {
            Some(dt) => {
                self.advance(dt);
                true
            }
            None => false,
        }
    }

    /// Run `ticks` ticks, returning how many actually advanced
    pub fn run(&mut self, ticks: usize) -> usize {
        (0..ticks).filter(|_| self.tick()).count()
    }
}

fn presentation(cfg: &PresentationConfig) -> Presentation {
    Presentation {
        rotation_factor: cfg.rotation_factor,
        axial_tilt_deg: cfg.axial_tilt,
        visual_radius: cfg.visual_radius,
        dwarf: cfg.dwarf,
    }
}

fn finite(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteParameter { name, value })
    }
}

fn check_name<'a>(name: &'a str, seen: &mut HashSet<&'a str>) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::EmptyName);
    }
    if !seen.insert(name) {
        return Err(ConfigError::DuplicateName(name.to_owned()));
    }
    Ok(())
}

fn check_trail(name: &str, points: Option<usize>, default: usize) -> ConfigResult<()> {
    let points = points.unwrap_or(default);
    if points > MAX_TRAIL_POINTS {
        return Err(ConfigError::InvalidTrailLength {
            name: name.to_owned(),
            points,
            max: MAX_TRAIL_POINTS,
        });
    }
    Ok(())
}

fn check_mass(name: &str, mass: f64) -> ConfigResult<()> {
    if mass.is_finite() && mass >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidMass { name: name.to_owned(), mass })
    }
}

/// Reject configurations that would turn into NaN/inf on the first tick
fn validate(cfg: &ScenarioConfig) -> ConfigResult<()> {
    let p = &cfg.parameters;
    finite("G", p.G)?;
    finite("eps", p.eps)?;
    finite("distance_scale", p.distance_scale)?;
    finite("time_scale", p.time_scale)?;
    if p.G <= 0.0 {
        return Err(ConfigError::NonPositiveGravity(p.G));
    }
    if !p.dt.is_finite() || p.dt == 0.0 {
        return Err(ConfigError::InvalidTimeStep(p.dt));
    }
    if !(0.0..=MAX_TIME_SCALE).contains(&p.time_scale) {
        return Err(ConfigError::InvalidTimeScale { value: p.time_scale, max: MAX_TIME_SCALE });
    }
    check_trail("max_trail_points", None, p.max_trail_points)?;

    let mut seen = HashSet::new();
    check_name(&cfg.central.name, &mut seen)?;
    check_mass(&cfg.central.name, cfg.central.mass)?;
    check_trail(&cfg.central.name, cfg.central.max_trail_points, p.max_trail_points)?;

    for bc in &cfg.bodies {
        check_name(&bc.name, &mut seen)?;
        check_mass(&bc.name, bc.mass)?;
        check_trail(&bc.name, bc.max_trail_points, p.max_trail_points)?;
        let r = bc.a * p.distance_scale;
        if !(r.is_finite() && r > 0.0) {
            return Err(ConfigError::InvalidOrbitRadius { name: bc.name.clone(), radius: r });
        }

        for mc in &bc.moons {
            check_name(&mc.name, &mut seen)?;
            check_mass(&mc.name, mc.mass)?;
            check_trail(&mc.name, mc.max_trail_points, p.max_trail_points)?;
            if !(mc.orbit_radius.is_finite() && mc.orbit_radius >= 0.0) {
                return Err(ConfigError::InvalidOrbitRadius {
                    name: mc.name.clone(),
                    radius: mc.orbit_radius,
                });
            }
            if !mc.orbit_speed.is_finite() {
                return Err(ConfigError::InvalidOrbitSpeed {
                    name: mc.name.clone(),
                    speed: mc.orbit_speed,
                });
            }
        }
    }
    Ok(())
}

use std::time::Instant;

use tracing::info;

use crate::simulation::engine::advance;
use crate::simulation::forces::{ForceSet, NewtonianGravity};
use crate::simulation::params::Parameters;
use crate::simulation::states::{DynamicBody, KinematicSatellite, BodyId, NVec3, System};

/// One timing sample
#[derive(Debug, Clone, Copy)]
pub struct BenchRow {
    pub n: usize,
    pub ms: f64, // mean wall time per call
}

/// Helper to build a manual System of size `n`, one moon per body
fn make_system(n: usize, trail: usize) -> System {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );
        bodies.push(DynamicBody::new(format!("body-{i}"), 1.0, x, NVec3::zeros(), trail));
    }

    let mut sys = System::new(bodies);
    for i in 0..n {
        sys.attach_satellite(KinematicSatellite::new(format!("moon-{i}"), 0.0, BodyId(i), 0.1, 10.0, trail));
    }
    sys
}

fn make_params() -> Parameters {
    Parameters {
        dt: 1e-3,
        G: 1.0,
        max_trail_points: 1024,
        ..Parameters::default()
    }
}

fn gravity(p: &Parameters) -> ForceSet {
    ForceSet::new().with(NewtonianGravity {
        G: p.G,
        eps: p.eps,
    })
}

/// Time one direct force pass for each `n`
pub fn bench_gravity(ns: &[usize]) -> Vec<BenchRow> {
    let params = make_params();
    let forces = gravity(&params);
    let mut rows = Vec::with_capacity(ns.len());

    for &n in ns {
        let sys = make_system(n, 0);
        let mut out = vec![NVec3::zeros(); n];
        let reps = (4096 / n.max(1)).max(1);

        // Warm up
        forces.accumulate_forces(&sys.bodies, &mut out);

        let t0 = Instant::now();
        for _ in 0..reps {
            forces.accumulate_forces(&sys.bodies, &mut out);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / reps as f64;

        info!(n, ms, "force pass");
        rows.push(BenchRow { n, ms });
    }
    rows
}

/// Time a full tick (integrator, moons, trails) for each `n`
pub fn bench_advance(ns: &[usize], steps: usize) -> Vec<BenchRow> {
    let params = make_params();
    let forces = gravity(&params);
    let steps = steps.max(1);
    let mut rows = Vec::with_capacity(ns.len());

    for &n in ns {
        let mut sys = make_system(n, params.max_trail_points);

        // Warm-up
        advance(&mut sys, &forces, params.dt);

        let t0 = Instant::now();
        for _ in 0..steps {
            advance(&mut sys, &forces, params.dt);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        info!(n, ms, "tick");
        rows.push(BenchRow { n, ms });
    }
    rows
}

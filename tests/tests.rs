use std::f64::consts::PI;

use approx::assert_relative_eq;

use solsim::simulation::diagnostics::{center_of_mass, total_energy, total_momentum};
use solsim::simulation::forces::{pairwise_force, ForceSet, NewtonianGravity};
use solsim::simulation::integrator::{compute_accelerations, prime_accelerations, verlet_integrator};
use solsim::simulation::satellites::update_satellites;
use solsim::simulation::states::{BodyId, DynamicBody, KinematicSatellite, NVec3, System};
use solsim::simulation::trail::Trail;
use solsim::advance;

/// Build a simple 2-body System separated along x-axis
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    let b1 = DynamicBody::new("a", m1, NVec3::new(-dist / 2.0, 0.0, 0.0), NVec3::zeros(), 16);
    let b2 = DynamicBody::new("b", m2, NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros(), 16);
    System::new(vec![b1, b2])
}

/// A handful of bodies at scattered positions with unequal masses
pub fn scattered_system() -> System {
    let layout = [
        (1.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
        (0.3, [1.2, -0.4, 0.1], [0.1, 0.8, 0.0]),
        (0.05, [-0.7, 0.9, -0.3], [-0.5, -0.2, 0.1]),
        (2.5, [0.4, 1.7, 0.6], [0.0, -0.3, 0.2]),
        (0.01, [-1.5, -1.1, 0.8], [0.3, 0.0, -0.4]),
    ];
    let bodies = layout
        .iter()
        .enumerate()
        .map(|(i, (m, x, v))| {
            DynamicBody::new(format!("b{i}"), *m, NVec3::from(*x), NVec3::from(*v), 32)
        })
        .collect();
    System::new(bodies)
}

/// Direct gravity with the given constant and the default cutoff
pub fn gravity_set(g: f64) -> ForceSet {
    ForceSet::new().with(NewtonianGravity { G: g, eps: 1e-6 })
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law_two_bodies() {
    let sys = two_body_system(1.0, 2.0, 3.0);
    let forces = gravity_set(0.1);

    let f = forces.net_forces(&sys.bodies);

    // one evaluation applied as +f / -f, so the pair cancels exactly
    assert_eq!(f[0] + f[1], NVec3::zeros());
    assert!(f[0].norm() > 0.0);
}

#[test]
fn gravity_net_force_vanishes_for_many_bodies() {
    let sys = scattered_system();
    let forces = gravity_set(1.0);

    let f = forces.net_forces(&sys.bodies);
    let net: NVec3 = f.iter().sum();
    let scale: f64 = f.iter().map(|v| v.norm()).sum();

    assert!(net.norm() <= 1e-14 * scale, "Net force not zero: {:?}", net);
}

#[test]
fn gravity_pairwise_is_antisymmetric() {
    let sys = scattered_system();
    for i in 0..sys.bodies.len() {
        for j in 0..sys.bodies.len() {
            let f_ij = pairwise_force(&sys.bodies[i], &sys.bodies[j], 1.0, 1e-6);
            let f_ji = pairwise_force(&sys.bodies[j], &sys.bodies[i], 1.0, 1e-6);
            assert!((f_ij + f_ji).norm() <= 1e-15 * f_ij.norm().max(1e-300), "{i},{j}");
        }
    }
}

#[test]
fn gravity_points_toward_other_body() {
    let sys = two_body_system(2.0, 1.0, 1.0);
    let f = pairwise_force(&sys.bodies[0], &sys.bodies[1], 1.0, 1e-6);

    let dx = sys.bodies[1].x - sys.bodies[0].x;
    assert!(f.dot(&dx) > 0.0, "Force is not toward second body");
    assert_relative_eq!(f.cross(&dx).norm(), 0.0, epsilon = 1e-15);
}

#[test]
fn gravity_magnitude_is_newtonian() {
    let sys = two_body_system(2.0, 3.0, 5.0);
    let f = pairwise_force(&sys.bodies[0], &sys.bodies[1], 39.478, 1e-6);

    assert_relative_eq!(f.norm(), 39.478 * 3.0 * 5.0 / 4.0, max_relative = 1e-12);
}

#[test]
fn gravity_inverse_square_law() {
    let sys_r = two_body_system(1.0, 1.0, 1.0);
    let sys_2r = two_body_system(2.0, 1.0, 1.0);
    let forces = gravity_set(0.1);

    let f_r = forces.net_forces(&sys_r.bodies);
    let f_2r = forces.net_forces(&sys_2r.bodies);

    assert_relative_eq!(f_r[0].norm() / f_2r[0].norm(), 4.0, max_relative = 1e-12);
}

#[test]
fn gravity_cutoff_returns_zero_for_coincident_bodies() {
    let sys = two_body_system(1e-4, 1.0, 1.0); // r^2 = 1e-8 < eps
    let forces = gravity_set(1.0);

    let f = forces.net_forces(&sys.bodies);
    assert_eq!(f[0], NVec3::zeros());
    assert_eq!(f[1], NVec3::zeros());

    let exact_overlap = two_body_system(0.0, 1.0, 1.0);
    let f = forces.net_forces(&exact_overlap.bodies);
    assert!(f.iter().all(|v| *v == NVec3::zeros()));
}

#[test]
fn empty_force_set_yields_zero() {
    let sys = scattered_system();
    let forces = ForceSet::new();
    assert!(forces.is_empty());
    assert!(forces.net_forces(&sys.bodies).iter().all(|f| *f == NVec3::zeros()));
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn verlet_first_step_uses_zero_old_acceleration() {
    let mut sys = two_body_system(2.0, 1.0, 1.0);
    sys.bodies[0].v = NVec3::new(0.0, 0.5, 0.0);
    let forces = gravity_set(1.0);
    let dt = 0.01;

    verlet_integrator(&mut sys, &forces, dt);

    // a_old is zero, so the drift is purely v dt
    assert_eq!(sys.bodies[0].x, NVec3::new(-1.0, 0.5 * dt, 0.0));
    assert_eq!(sys.bodies[1].x, NVec3::new(1.0, 0.0, 0.0));

    // stored acceleration is force/mass at the new positions
    let mut expected = vec![NVec3::zeros(); 2];
    compute_accelerations(&sys, &forces, &mut expected);
    assert_eq!(sys.bodies[0].a, expected[0]);
    assert_eq!(sys.bodies[1].a, expected[1]);

    // velocity got half of the new acceleration
    assert_relative_eq!(sys.bodies[1].v.x, 0.5 * expected[1].x * dt, max_relative = 1e-12);
}

/// One step done by hand: all drifts, then forces on the drifted positions
fn reference_step(sys: &System, forces: &ForceSet, dt: f64) -> System {
    let mut next = sys.clone();
    for b in next.bodies.iter_mut() {
        b.x = b.x + b.v * dt + b.a * (0.5 * dt * dt);
    }
    let f = forces.net_forces(&next.bodies);
    for (b, f) in next.bodies.iter_mut().zip(f) {
        let a_new = if b.m == 0.0 { NVec3::zeros() } else { f / b.m };
        b.v += (b.a + a_new) * (0.5 * dt);
        b.a = a_new;
    }
    next
}

/// The buggy variant: each body drifts and immediately re-evaluates its force
fn one_at_a_time_step(sys: &System, forces: &ForceSet, dt: f64) -> System {
    let mut next = sys.clone();
    for i in 0..next.bodies.len() {
        let b = &mut next.bodies[i];
        b.x = b.x + b.v * dt + b.a * (0.5 * dt * dt);
        let f = forces.net_forces(&next.bodies)[i];
        let b = &mut next.bodies[i];
        let a_new = f / b.m;
        b.v += (b.a + a_new) * (0.5 * dt);
        b.a = a_new;
    }
    next
}

#[test]
fn verlet_drifts_every_body_before_computing_forces() {
    let mut sys = scattered_system();
    let forces = gravity_set(1.0);
    prime_accelerations(&mut sys, &forces);
    let dt = 0.05;

    let expected = reference_step(&sys, &forces, dt);
    let sequential = one_at_a_time_step(&sys, &forces, dt);
    verlet_integrator(&mut sys, &forces, dt);

    let mut max_gap = 0.0_f64;
    for ((b, e), s) in sys.bodies.iter().zip(&expected.bodies).zip(&sequential.bodies) {
        assert!((b.x - e.x).norm() < 1e-12, "{} position", b.name);
        assert!((b.v - e.v).norm() < 1e-12, "{} velocity", b.name);
        assert!((b.a - e.a).norm() < 1e-10, "{} acceleration", b.name);
        max_gap = max_gap.max((b.v - s.v).norm());
    }
    // the interleaved update is measurably different, so the check above has teeth
    assert!(max_gap > 1e-6, "sequential update indistinguishable: {max_gap}");
}

#[test]
fn verlet_zero_mass_body_moves_kinematically() {
    // mass 1 at the origin, massless probe at x = 1 moving along +y
    let sun = DynamicBody::new("heavy", 1.0, NVec3::zeros(), NVec3::zeros(), 4);
    let probe = DynamicBody::new("probe", 0.0, NVec3::new(1.0, 0.0, 0.0), NVec3::new(0.0, 1.0, 0.0), 4);
    let mut sys = System::new(vec![sun, probe]);
    let forces = gravity_set(1.0);

    advance(&mut sys, &forces, 0.01);

    let probe = &sys.bodies[1];
    assert_eq!(probe.x, NVec3::new(1.0, 0.01, 0.0));
    assert_eq!(probe.v, NVec3::new(0.0, 1.0, 0.0));
    assert_eq!(probe.a, NVec3::zeros());

    // F = G m1 m2 / r^2 vanishes with a massless partner, so the heavy body stays put
    let heavy = &sys.bodies[0];
    assert_eq!(heavy.x, NVec3::zeros());
    assert_eq!(heavy.v, NVec3::zeros());
    assert_eq!(heavy.a, NVec3::zeros());
}

#[test]
fn verlet_zero_mass_body_in_a_massive_pair_never_accelerates() {
    let mut sys = two_body_system(2.0, 1.0, 1.0);
    sys.bodies.push(DynamicBody::new("probe", 0.0, NVec3::new(0.0, 1.0, 0.0), NVec3::zeros(), 4));
    let forces = gravity_set(1.0);

    for _ in 0..50 {
        verlet_integrator(&mut sys, &forces, 0.01);
    }
    assert_eq!(sys.bodies[2].x, NVec3::new(0.0, 1.0, 0.0));
    assert_eq!(sys.bodies[2].a, NVec3::zeros());
    assert!(sys.bodies[0].a.norm() > 0.0);
}

#[test]
fn verlet_equal_masses_keep_center_of_mass_fixed() {
    let mut sys = two_body_system(1.0, 1.0, 1.0);
    let forces = gravity_set(1.0);
    let start = (sys.bodies[1].x - sys.bodies[0].x).norm();

    // free-fall time is pi/4, stop well before contact
    for _ in 0..500 {
        verlet_integrator(&mut sys, &forces, 1e-3);
        let com = center_of_mass(&sys).unwrap();
        assert!(com.norm() < 1e-12, "center of mass drifted to {:?}", com);
        assert!(total_momentum(&sys).norm() < 1e-12);
    }

    let now = (sys.bodies[1].x - sys.bodies[0].x).norm();
    assert!(now < start, "bodies did not approach: {now} >= {start}");
    assert!(sys.bodies[0].v.x > 0.0 && sys.bodies[1].v.x < 0.0);
}

#[test]
fn verlet_circular_orbit_closes_after_one_period() {
    let g: f64 = 1.0;
    let r = 1.0;
    let v = (g * 1.0 / r).sqrt();
    let central = DynamicBody::new("central", 1.0, NVec3::zeros(), NVec3::zeros(), 4);
    let orbiter = DynamicBody::new("orbiter", 1e-9, NVec3::new(r, 0.0, 0.0), NVec3::new(0.0, v, 0.0), 4);
    let mut sys = System::new(vec![central, orbiter]);
    let forces = gravity_set(g);

    let dt = 1e-3;
    let period = 2.0 * PI * (r * r * r / g).sqrt();
    let steps = (period / dt).round() as usize;
    let e0 = total_energy(&sys, g, 1e-6);

    for _ in 0..steps {
        verlet_integrator(&mut sys, &forces, dt);
        let radius = (sys.bodies[1].x - sys.bodies[0].x).norm();
        assert!((radius - r).abs() < 0.01 * r, "radius left the 1% band: {radius}");
    }

    let back = (sys.bodies[1].x - NVec3::new(r, 0.0, 0.0)).norm();
    assert!(back < 0.01, "orbit did not close, off by {back}");

    let e1 = total_energy(&sys, g, 1e-6);
    assert!(((e1 - e0) / e0).abs() < 1e-3);
}

#[test]
fn verlet_with_no_bodies_is_a_no_op() {
    let mut sys = System::default();
    verlet_integrator(&mut sys, &gravity_set(1.0), 0.1);
    assert!(sys.bodies.is_empty());
}

#[test]
fn verlet_negative_step_runs_backwards() {
    let mut sys = scattered_system();
    let forces = gravity_set(1.0);
    prime_accelerations(&mut sys, &forces);
    let start = sys.clone();

    for _ in 0..100 {
        verlet_integrator(&mut sys, &forces, 1e-3);
    }
    for _ in 0..100 {
        verlet_integrator(&mut sys, &forces, -1e-3);
    }

    for (b, s) in sys.bodies.iter().zip(&start.bodies) {
        assert!((b.x - s.x).norm() < 1e-9, "{} did not retrace", b.name);
    }
}

#[test]
fn verlet_propagates_non_finite_input() {
    let mut sys = two_body_system(1.0, 1.0, 1.0);
    sys.bodies[0].x.x = f64::NAN;
    verlet_integrator(&mut sys, &gravity_set(1.0), 0.01);
    assert!(sys.bodies[0].x.x.is_nan());
}

// ==================================================================================
// Satellite tests
// ==================================================================================

fn system_with_moon() -> System {
    let mut sys = two_body_system(2.0, 1.0, 1e-3);
    sys.bodies[1].v = NVec3::new(0.0, 0.7, 0.0);
    let moon = KinematicSatellite::new("moon", 1e-5, BodyId(1), 0.15, 8.0, 6);
    assert!(sys.attach_satellite(moon));
    sys
}

#[test]
fn satellite_is_placed_beside_its_parent_on_attach() {
    let mut sys = System::new(vec![DynamicBody::new("planet", 1.0, NVec3::new(3.0, 0.0, 0.0), NVec3::zeros(), 4)]);
    assert!(sys.attach_satellite(KinematicSatellite::new("moon", 0.0, BodyId(0), 0.5, 1.0, 4)));

    let s = &sys.satellites[0];
    assert_eq!(s.x, NVec3::new(3.5, 0.0, 0.0));
    assert_relative_eq!((s.x - sys.bodies[0].x).norm(), 0.5);
    assert!(s.trail.is_empty());
}

#[test]
fn satellite_keeps_its_radius_while_parent_moves() {
    let mut sys = system_with_moon();
    let forces = gravity_set(1.0);

    for _ in 0..300 {
        advance(&mut sys, &forces, 0.01);
        let s = &sys.satellites[0];
        let parent = &sys.bodies[s.parent.0];
        assert_relative_eq!((s.x - parent.x).norm(), 0.15, max_relative = 1e-12);
        assert_relative_eq!(s.x.y, parent.x.y, epsilon = 1e-15);
    }
}

#[test]
fn satellite_follows_the_updated_parent_in_the_same_tick() {
    let mut sys = system_with_moon();
    let forces = gravity_set(1.0);

    advance(&mut sys, &forces, 0.02);

    let s = &sys.satellites[0];
    assert_relative_eq!(s.angle, 8.0 * 0.02);
    let expected = sys.bodies[1].x + NVec3::new(0.15 * s.angle.cos(), 0.0, 0.15 * s.angle.sin());
    assert!((s.x - expected).norm() < 1e-15);
}

#[test]
fn satellite_exerts_and_feels_no_gravity() {
    let mut with_moon = system_with_moon();
    let mut without = system_with_moon();
    without.satellites.clear();
    let forces = gravity_set(1.0);

    for _ in 0..100 {
        advance(&mut with_moon, &forces, 0.01);
        advance(&mut without, &forces, 0.01);
    }
    for (a, b) in with_moon.bodies.iter().zip(&without.bodies) {
        assert_eq!(a.x, b.x);
        assert_eq!(a.v, b.v);
    }
}

#[test]
fn satellite_angle_runs_backwards_for_negative_speed() {
    let mut sys = system_with_moon();
    sys.satellites[0].orbit_speed = -3.0;
    for _ in 0..10 {
        update_satellites(&mut sys, 0.1);
    }
    assert_relative_eq!(sys.satellites[0].angle, -3.0, max_relative = 1e-12);
}

#[test]
fn satellite_needs_an_existing_parent() {
    let mut sys = two_body_system(1.0, 1.0, 1.0);
    let orphan = KinematicSatellite::new("orphan", 0.0, BodyId(7), 0.1, 1.0, 4);
    assert!(!sys.attach_satellite(orphan));
    assert!(sys.satellites.is_empty());

    let mut sys = system_with_moon();
    sys.attach_satellite(KinematicSatellite::new("inner", 0.0, BodyId(1), 0.05, 20.0, 4));
    let names: Vec<_> = sys.satellites_of(BodyId(1)).map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["moon", "inner"]);
    assert_eq!(sys.satellites_of(BodyId(0)).count(), 0);
}

// ==================================================================================
// Trail tests
// ==================================================================================

fn p(i: usize) -> NVec3 {
    NVec3::new(i as f64, 0.0, 0.0)
}

#[test]
fn trail_keeps_most_recent_samples_oldest_first() {
    let mut trail = Trail::new(5);
    for i in 0..12 {
        trail.push(p(i));
        assert_eq!(trail.len(), (i + 1).min(5));
    }

    assert!(trail.is_full());
    assert_eq!(trail.to_vec(), (7..12).map(p).collect::<Vec<_>>());
    assert_eq!(trail.oldest(), Some(&p(7)));
    assert_eq!(trail.latest(), Some(&p(11)));
}

#[test]
fn trail_under_capacity_is_in_insertion_order() {
    let mut trail = Trail::new(10);
    assert!(trail.is_empty());
    assert_eq!(trail.latest(), None);

    for i in 0..4 {
        trail.push(p(i));
    }
    assert_eq!(trail.to_vec(), (0..4).map(p).collect::<Vec<_>>());
    assert_eq!(trail.latest(), Some(&p(3)));
}

#[test]
fn trail_iteration_is_restartable_and_double_ended() {
    let mut trail = Trail::new(3);
    for i in 0..5 {
        trail.push(p(i));
    }

    let it = trail.iter();
    assert_eq!(it.len(), 3);
    let first: Vec<_> = it.clone().copied().collect();
    let second: Vec<_> = trail.iter().copied().collect();
    assert_eq!(first, second);

    let reversed: Vec<_> = trail.iter().rev().copied().collect();
    assert_eq!(reversed, vec![p(4), p(3), p(2)]);

    let mut it = trail.iter();
    it.next();
    assert_eq!(it.len(), 2);
}

#[test]
fn trail_with_zero_capacity_records_nothing() {
    let mut trail = Trail::new(0);
    trail.push(p(1));
    assert!(trail.is_empty());
    assert!(!trail.is_full());
    assert_eq!(trail.iter().count(), 0);
}

#[test]
fn trail_with_huge_capacity_allocates_lazily() {
    let mut trail = Trail::new(usize::MAX);
    assert_eq!(trail.capacity(), usize::MAX);
    assert!(trail.is_empty());

    trail.push(p(1));
    trail.push(p(2));
    assert_eq!(trail.to_vec(), [p(1), p(2)]);
    assert!(!trail.is_full());
}

#[test]
fn trail_clear_starts_over() {
    let mut trail = Trail::new(2);
    for i in 0..5 {
        trail.push(p(i));
    }
    trail.clear();
    trail.push(p(9));
    assert_eq!(trail.to_vec(), vec![p(9)]);
}

#[test]
fn trails_fill_to_cap_and_track_current_positions() {
    let mut sys = system_with_moon();
    let forces = gravity_set(1.0);
    let mut history: Vec<NVec3> = Vec::new();

    for _ in 0..40 {
        advance(&mut sys, &forces, 0.01);
        history.push(sys.bodies[1].x);
    }

    // bodies were built with cap 16, the moon with cap 6
    for b in &sys.bodies {
        assert_eq!(b.trail.len(), 16);
        assert_eq!(b.trail.latest(), Some(&b.x));
    }
    let moon = &sys.satellites[0];
    assert_eq!(moon.trail.len(), 6);
    assert_eq!(moon.trail.latest(), Some(&moon.x));

    // snapshots, not live references
    assert_eq!(sys.bodies[1].trail.to_vec(), history[history.len() - 16..].to_vec());
}

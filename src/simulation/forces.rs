//! Force contributors for the n-body engine
//!
//! Defines the `ForceLaw` trait, a `ForceSet` that sums any number of laws
//! into one net-force buffer, and direct Newtonian gravity with a hard
//! near-contact cutoff

use crate::simulation::states::{DynamicBody, NVec3};

/// Collection of force terms (gravity, drag, etc.)
/// Each term implements [`ForceLaw`] and their contributions are summed
/// into a single net force per body
pub struct ForceSet {
    terms: Vec<Box<dyn ForceLaw + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add a force term
    pub fn with(mut self, term: impl ForceLaw + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute net forces for all `bodies` at their current positions
    /// - `out[i]` is set to the sum of contributions on `bodies[i]` from all terms
    pub fn accumulate_forces(&self, bodies: &[DynamicBody], out: &mut [NVec3]) {
        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        for term in &self.terms {
            term.accumulate(bodies, out);
        }
    }

    /// Allocating form of [`ForceSet::accumulate_forces`]
    pub fn net_forces(&self, bodies: &[DynamicBody]) -> Vec<NVec3> {
        let mut out = vec![NVec3::zeros(); bodies.len()];
        self.accumulate_forces(bodies, &mut out);
        out
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Force source over the dynamic bodies.
/// Implementations add their contribution into `out[i]` for each body
pub trait ForceLaw {
    fn accumulate(&self, bodies: &[DynamicBody], out: &mut [NVec3]);
}

/// Gravitational force on `b1` exerted by `b2`.
///
/// `F = G m1 m2 / r^2` pointing from `b1` toward `b2`. When the squared
/// separation is below `eps` the pair is treated as coincident and the zero
/// vector comes back instead of a blown-up force.
#[allow(non_snake_case)]
pub fn pairwise_force(b1: &DynamicBody, b2: &DynamicBody, G: f64, eps: f64) -> NVec3 {
    let r = b2.x - b1.x;
    let r2 = r.norm_squared();
    if r2 < eps {
        return NVec3::zeros();
    }
    let magnitude = G * b1.m * b2.m / r2;
    r.normalize() * magnitude
}

/// Direct Newtonian gravity (all pairs, n^2 / 2 evaluations)
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub eps: f64, // squared-distance cutoff
}

impl ForceLaw for NewtonianGravity {
    fn accumulate(&self, bodies: &[DynamicBody], out: &mut [NVec3]) {
        let n = bodies.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            for j in (i + 1)..n {
                // One evaluation per pair, applied equal and opposite
                let f = pairwise_force(&bodies[i], &bodies[j], self.G, self.eps);
                out[i] += f;
                out[j] -= f;
            }
        }
    }
}

//! Force contributors for the layout engine
//!
//! Each contributor implements [`ForceTerm`] and adds its share into a per-body
//! force buffer; a [`ForceSet`] runs them in order. The standard layout set is
//! springs, repulsion (Barnes–Hut or exact) and drag.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::barnes_hut::{pairwise_force, Octree};
use crate::simulation::params::SimulationParams;
use crate::simulation::states::{Body, NVec3, Spring};

/// What a term may read while accumulating forces for one step
pub struct ForceContext<'a> {
    pub params: &'a SimulationParams,
    pub springs: &'a [Spring],
    pub step: u64, // index of the step being computed, seeds the spring jitter
}

/// A force source. Implementations add into `out[i]` for each body.
pub trait ForceTerm {
    fn accumulate(&mut self, ctx: &ForceContext<'_>, bodies: &[Body], out: &mut [NVec3]);
}

/// Ordered collection of force terms
pub struct ForceSet {
    terms: Vec<Box<dyn ForceTerm + Send>>,
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Springs, repulsion and drag, the terms a layout step needs
    pub fn layout(barnes_hut: bool) -> Self {
        let set = Self::new().with(SpringForce);
        let set = if barnes_hut {
            set.with(BarnesHutRepulsion::default())
        } else {
            set.with(DirectRepulsion)
        };
        set.with(Drag)
    }

    /// Add a term
    pub fn with(mut self, term: impl ForceTerm + Send + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Zero `out`, then let every term add its contribution
    pub fn accumulate_forces(&mut self, ctx: &ForceContext<'_>, bodies: &[Body], out: &mut [NVec3]) {
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        for term in &mut self.terms {
            term.accumulate(ctx, bodies, out);
        }
    }
}

/// Hooke springs along links: `stiffness * (distance - rest)` on the link axis.
/// Stretched links pull their ends together, compressed ones push them apart.
pub struct SpringForce;

impl ForceTerm for SpringForce {
    fn accumulate(&mut self, ctx: &ForceContext<'_>, bodies: &[Body], out: &mut [NVec3]) {
        let params = ctx.params;

        for (k, spring) in ctx.springs.iter().enumerate() {
            let r = bodies[spring.to].x - bodies[spring.from].x;
            let dist = r.norm();
            let rest = spring.length.unwrap_or(params.spring_length);

            // coincident ends: no axis to pull along, pick one deterministically
            let direction = if dist > 0.0 {
                r / dist
            } else {
                let seed = (k as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ ctx.step;
                jitter_direction(seed)
            };

            let f = params.spring_coeff * (dist - rest) * direction;
            out[spring.from] += f;
            out[spring.to] -= f;
        }
    }
}

/// Pairwise repulsion approximated through an octree rebuilt every call.
/// The tree is kept between calls so its arena allocation is reused.
#[derive(Default)]
pub struct BarnesHutRepulsion {
    tree: Octree,
}

impl ForceTerm for BarnesHutRepulsion {
    fn accumulate(&mut self, ctx: &ForceContext<'_>, bodies: &[Body], out: &mut [NVec3]) {
        self.tree.rebuild(bodies);
        for (i, f) in out.iter_mut().enumerate().take(bodies.len()) {
            *f += self.tree.repulsion_on(i, bodies, ctx.params.gravity, ctx.params.theta);
        }
    }
}

/// Exact O(n^2) repulsion, summed over each unordered pair once
pub struct DirectRepulsion;

impl ForceTerm for DirectRepulsion {
    fn accumulate(&mut self, ctx: &ForceContext<'_>, bodies: &[Body], out: &mut [NVec3]) {
        let n = bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let f = pairwise_force(bodies, i, j, ctx.params.gravity);
                // equal and opposite
                out[i] += f;
                out[j] -= f;
            }
        }
    }
}

/// Velocity drag: `force -= v * drag_coeff`
pub struct Drag;

impl ForceTerm for Drag {
    fn accumulate(&mut self, ctx: &ForceContext<'_>, bodies: &[Body], out: &mut [NVec3]) {
        for (b, f) in bodies.iter().zip(out.iter_mut()) {
            *f -= b.v * ctx.params.drag_coeff;
        }
    }
}

/// Exact repulsion on every body, used as the reference for the octree
pub fn exact_repulsion(bodies: &[Body], gravity: f64) -> Vec<NVec3> {
    let params = SimulationParams {
        gravity,
        ..SimulationParams::default()
    };
    let ctx = ForceContext {
        params: &params,
        springs: &[],
        step: 0,
    };
    let mut out = vec![NVec3::zeros(); bodies.len()];
    DirectRepulsion.accumulate(&ctx, bodies, &mut out);
    out
}

/// Unit vector derived from `seed` alone, uniform on the sphere
pub fn jitter_direction(seed: u64) -> NVec3 {
    let mut rng = StdRng::seed_from_u64(seed);
    let z = 1.0 - 2.0 * rng.gen::<f64>();
    let phi = std::f64::consts::TAU * rng.gen::<f64>();

    let ring = (1.0 - z * z).max(0.0).sqrt();
    NVec3::new(ring * phi.cos(), ring * phi.sin(), z)
}

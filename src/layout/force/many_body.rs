//! Pairwise many-body repulsion.
//!
//! Exact O(n²) evaluation with inverse-linear decay: the velocity delta a
//! node receives from another is `d · strength · α / |d|²`, so the force
//! magnitude falls off as `strength / distance` (the d3-force law). Each
//! unordered pair is visited once and both sides receive equal-magnitude,
//! opposite deltas, so Newton's third law holds exactly in floating point.

use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Body;
use crate::layout::force::{BoundForce, Force};

/// Many-body force over all nodes. Negative strength repels (the default).
pub struct ManyBodyForce {
    pub strength: f64,
}

impl ManyBodyForce {
    pub fn new() -> Self {
        Self { strength: -30.0 }
    }
}

impl Default for ManyBodyForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for ManyBodyForce {
    fn bind(&self, graph: &GraphStore) -> Result<Box<dyn BoundForce>, LayoutError> {
        Ok(Box::new(BoundManyBody {
            strength: vec![self.strength; graph.node_count()],
        }))
    }
}

pub(crate) struct BoundManyBody {
    strength: Vec<f64>,
}

impl BoundForce for BoundManyBody {
    fn apply(&self, bodies: &mut [Body], alpha: f64) {
        apply_pairwise(bodies, &self.strength, alpha);
    }
}

/// Shared by the global and grouped variants. `targets` selects which body
/// slots participate; `strength[i]` is the charge of slot `i`.
pub(crate) fn apply_pairwise_subset(
    bodies: &mut [Body],
    targets: &[usize],
    strength: &[f64],
    alpha: f64,
) {
    let n = targets.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (targets[i], targets[j]);
            let dx = bodies[b].x - bodies[a].x;
            let dy = bodies[b].y - bodies[a].y;
            let l = (dx * dx + dy * dy).max(1e-6);
            let wa = strength[b] * alpha / l;
            let wb = strength[a] * alpha / l;
            bodies[a].vx += dx * wa;
            bodies[a].vy += dy * wa;
            bodies[b].vx -= dx * wb;
            bodies[b].vy -= dy * wb;
        }
    }
}

fn apply_pairwise(bodies: &mut [Body], strength: &[f64], alpha: f64) {
    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = bodies[j].x - bodies[i].x;
            let dy = bodies[j].y - bodies[i].y;
            let l = (dx * dx + dy * dy).max(1e-6);
            let wi = strength[j] * alpha / l;
            let wj = strength[i] * alpha / l;
            bodies[i].vx += dx * wi;
            bodies[i].vy += dy * wi;
            bodies[j].vx -= dx * wj;
            bodies[j].vy -= dy * wj;
        }
    }
}

//! Spring attraction along graph edges.
//!
//! Each edge pulls its endpoints toward a target distance. The correction is
//! split between the two endpoints by a degree-based bias so that hubs move
//! less than leaves, and the displacement is computed against the lookahead
//! position `p + v` so links react to deltas accumulated earlier in the same
//! tick.

use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Body;
use crate::layout::force::{BoundForce, Force};

/// One resolved spring.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Spring {
    pub source: usize,
    pub target: usize,
    pub distance: f64,
    pub strength: f64,
    pub bias: f64,
}

/// Link force built from a snapshot of a graph's edge list.
///
/// The edge endpoints are recorded at construction time; if the simulation is
/// later started on a graph with fewer nodes, binding fails with
/// `InvalidReference`.
pub struct LinkForce {
    /// Target rest length for every edge.
    pub distance: f64,
    /// Optional uniform strength. `None` selects the default
    /// `1 / min(deg(u), deg(v))` per edge.
    pub strength: Option<f64>,
    edges: Vec<(usize, usize)>,
    degrees: Vec<usize>,
}

impl LinkForce {
    /// Snapshot the edges and degrees of `graph`.
    pub fn from_graph(graph: &GraphStore) -> Self {
        Self {
            distance: 30.0,
            strength: None,
            edges: graph.edges().collect(),
            degrees: (0..graph.node_count()).map(|u| graph.degree(u)).collect(),
        }
    }

    fn springs(&self) -> Vec<Spring> {
        self.edges
            .iter()
            .map(|&(u, v)| {
                let du = self.degrees[u] as f64;
                let dv = self.degrees[v] as f64;
                let strength = self
                    .strength
                    .unwrap_or_else(|| 1.0 / du.min(dv).max(1.0));
                Spring {
                    source: u,
                    target: v,
                    distance: self.distance,
                    strength,
                    bias: du / (du + dv),
                }
            })
            .collect()
    }
}

impl Force for LinkForce {
    fn bind(&self, graph: &GraphStore) -> Result<Box<dyn BoundForce>, LayoutError> {
        let n = graph.node_count();
        for &(u, v) in &self.edges {
            if u >= n || v >= n {
                return Err(LayoutError::InvalidReference(format!(
                    "link ({u}, {v}) references a node outside the graph ({n} nodes)"
                )));
            }
        }
        Ok(Box::new(BoundLink {
            springs: self.springs(),
        }))
    }
}

pub(crate) struct BoundLink {
    springs: Vec<Spring>,
}

impl BoundLink {
    pub(crate) fn new(springs: Vec<Spring>) -> Self {
        Self { springs }
    }
}

impl BoundForce for BoundLink {
    fn apply(&self, bodies: &mut [Body], alpha: f64) {
        for spring in &self.springs {
            let source = bodies[spring.source];
            let target = bodies[spring.target];
            let dx = (target.x + target.vx) - (source.x + source.vx);
            let dy = (target.y + target.vy) - (source.y + source.vy);
            let l = (dx * dx + dy * dy).sqrt().max(1e-6);
            let w = (l - spring.distance) / l * alpha * spring.strength;
            {
                let target = &mut bodies[spring.target];
                target.vx -= dx * w * spring.bias;
                target.vy -= dy * w * spring.bias;
            }
            {
                let source = &mut bodies[spring.source];
                source.vx += dx * w * (1.0 - spring.bias);
                source.vy += dy * w * (1.0 - spring.bias);
            }
        }
    }
}

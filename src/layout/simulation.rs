//! Time-stepped force integrator.
//!
//! The simulation owns an ordered list of forces and drives them over a graph
//! until the cooling schedule runs out. Termination is governed by an alpha
//! schedule rather than a displacement threshold: alpha decays geometrically
//! from `alpha_start` toward `alpha_target` and the loop stops once it drops
//! below `alpha_min`, which takes `iterations` ticks. The run is fully
//! deterministic: no RNG, single-threaded, forces applied in registration
//! order, so identical inputs produce bit-for-bit identical positions.

use log::debug;

use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Body;
use crate::layout::force::Force;

/// Lifecycle: forces are added while `Building`, `start` runs the integration
/// to completion and leaves the simulation `Done`. A finished simulation
/// cannot be started again; its forces hold graph-scoped snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Building,
    Done,
}

pub struct Simulation {
    forces: Vec<Box<dyn Force>>,
    state: State,
    pub alpha_start: f64,
    pub alpha_min: f64,
    pub alpha_target: f64,
    pub velocity_decay: f64,
    pub iterations: usize,
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            forces: Vec::new(),
            state: State::Building,
            alpha_start: 1.0,
            alpha_min: 0.001,
            alpha_target: 0.0,
            velocity_decay: 0.6,
            iterations: 300,
        }
    }

    /// Register a force. Forces are applied in registration order each tick.
    pub fn add(&mut self, force: Box<dyn Force>) {
        self.forces.push(force);
    }

    /// Number of registered forces.
    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    /// Run the integration to completion, mutating `graph` positions in
    /// place.
    ///
    /// Binds every force first (deferred `InvalidReference` validation), so a
    /// failed start leaves the graph untouched. Per tick: advance alpha,
    /// apply every force accumulating velocity deltas, then integrate with
    /// velocity decay and write positions back.
    pub fn start(&mut self, graph: &mut GraphStore) -> Result<(), LayoutError> {
        if self.state == State::Done {
            return Err(LayoutError::InvalidReference(
                "simulation already finished; create a new one and re-add forces".into(),
            ));
        }

        let bound = self
            .forces
            .iter()
            .map(|force| force.bind(graph))
            .collect::<Result<Vec<_>, _>>()?;

        let n = graph.node_count();
        let mut bodies: Vec<Body> = graph
            .positions_x()
            .iter()
            .zip(graph.positions_y())
            .map(|(&x, &y)| Body::new(x, y))
            .collect();

        let alpha_decay = 1.0 - self.alpha_min.powf(1.0 / self.iterations as f64);
        let mut alpha = self.alpha_start;
        let mut ticks = 0usize;
        while alpha >= self.alpha_min {
            alpha += (self.alpha_target - alpha) * alpha_decay;
            for force in &bound {
                force.apply(&mut bodies, alpha);
            }
            for body in bodies.iter_mut() {
                body.vx *= self.velocity_decay;
                body.x += body.vx;
                body.vy *= self.velocity_decay;
                body.y += body.vy;
            }
            ticks += 1;
        }

        for (i, body) in bodies.iter().enumerate() {
            graph.set_x(i, body.x)?;
            graph.set_y(i, body.y)?;
        }
        self.state = State::Done;
        debug!("simulation finished after {ticks} ticks over {n} nodes");
        Ok(())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::force::{CenterForce, LinkForce, ManyBodyForce};

    fn cycle_graph(n: usize) -> GraphStore {
        let mut graph = GraphStore::new();
        for _ in 0..n {
            graph.add_node();
        }
        for i in 0..n {
            graph.add_edge(i, (i + 1) % n).unwrap();
        }
        graph
    }

    fn default_simulation(graph: &GraphStore) -> Simulation {
        let mut simulation = Simulation::new();
        simulation.add(Box::new(ManyBodyForce::new()));
        simulation.add(Box::new(LinkForce::from_graph(graph)));
        simulation.add(Box::new(CenterForce::new()));
        simulation
    }

    #[test]
    fn test_four_cycle_converges_symmetric() {
        let mut graph = cycle_graph(4);
        let mut simulation = default_simulation(&graph);
        simulation.start(&mut graph).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);

        let cx = (0..4).map(|i| graph.x(i).unwrap()).sum::<f64>() / 4.0;
        let cy = (0..4).map(|i| graph.y(i).unwrap()).sum::<f64>() / 4.0;
        let radii: Vec<f64> = (0..4)
            .map(|i| {
                let dx = graph.x(i).unwrap() - cx;
                let dy = graph.y(i).unwrap() - cy;
                (dx * dx + dy * dy).sqrt()
            })
            .collect();
        let mean = radii.iter().sum::<f64>() / 4.0;
        assert!(mean > 1.0, "layout collapsed: mean radius {mean}");
        for r in &radii {
            assert!(
                (r - mean).abs() / mean < 0.25,
                "asymmetric layout: radii {radii:?}"
            );
        }
        // Centering force pins the centroid at the origin.
        assert!(cx.abs() < 1e-6 && cy.abs() < 1e-6);
    }

    #[test]
    fn test_deterministic_repeat_runs() {
        let mut first = cycle_graph(6);
        let mut second = cycle_graph(6);
        let mut sim_a = default_simulation(&first);
        let mut sim_b = default_simulation(&second);
        sim_a.start(&mut first).unwrap();
        sim_b.start(&mut second).unwrap();

        for i in 0..6 {
            assert_eq!(first.x(i).unwrap(), second.x(i).unwrap());
            assert_eq!(first.y(i).unwrap(), second.y(i).unwrap());
        }
    }

    #[test]
    fn test_not_reusable_after_start() {
        let mut graph = cycle_graph(3);
        let mut simulation = default_simulation(&graph);
        simulation.start(&mut graph).unwrap();
        assert!(matches!(
            simulation.start(&mut graph),
            Err(LayoutError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_failed_start_leaves_graph_untouched() {
        let big = cycle_graph(4);
        let mut small = cycle_graph(2);
        let before: Vec<(f64, f64)> = (0..2)
            .map(|i| (small.x(i).unwrap(), small.y(i).unwrap()))
            .collect();

        // Link force snapshotted from a larger graph: bind must fail and the
        // smaller graph must keep its positions.
        let mut simulation = Simulation::new();
        simulation.add(Box::new(LinkForce::from_graph(&big)));
        assert!(simulation.start(&mut small).is_err());
        for i in 0..2 {
            assert_eq!(small.x(i).unwrap(), before[i].0);
            assert_eq!(small.y(i).unwrap(), before[i].1);
        }
    }

    #[test]
    fn test_empty_graph_runs() {
        let mut graph = GraphStore::new();
        let mut simulation = Simulation::new();
        simulation.add(Box::new(CenterForce::new()));
        simulation.start(&mut graph).unwrap();
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_velocity_decay_converges() {
        // Two repelling nodes must come to rest at a finite distance.
        let mut graph = GraphStore::new();
        graph.add_node();
        graph.add_node();
        let mut simulation = Simulation::new();
        simulation.add(Box::new(ManyBodyForce::new()));
        simulation.start(&mut graph).unwrap();
        for i in 0..2 {
            assert!(graph.x(i).unwrap().is_finite());
            assert!(graph.y(i).unwrap().is_finite());
        }
        let dx = graph.x(1).unwrap() - graph.x(0).unwrap();
        let dy = graph.y(1).unwrap() - graph.y(0).unwrap();
        let dist = (dx * dx + dy * dy).sqrt();
        assert!(dist > 1.0 && dist < 1e4, "distance {dist}");
    }
}

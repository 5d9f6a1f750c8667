//! Force-directed grouping.
//!
//! Collapses each cluster to a single meta-node, connects meta-nodes wherever
//! an inter-cluster edge exists in the underlying graph, and runs a miniature
//! simulation over the meta-graph. The converged meta-node positions become
//! group centers; group sizes come from the weight share of the canvas area.

use std::collections::BTreeSet;

use super::{Group, check_arguments};
use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Simulation;
use crate::layout::force::{CenterForce, LinkForce, ManyBodyForce};

pub struct ForceDirectedGrouping {
    /// Rest length of the meta-edges.
    pub link_length: f64,
    pub many_body_force_strength: f64,
    pub link_force_strength: f64,
    /// Zero disables the centering force.
    pub center_force_strength: f64,
    assignments: Vec<usize>,
}

impl ForceDirectedGrouping {
    /// `assignments[node]` is the cluster the node belongs to.
    pub fn new(assignments: Vec<usize>) -> Self {
        Self {
            link_length: 30.0,
            many_body_force_strength: -30.0,
            link_force_strength: 0.5,
            center_force_strength: 1.0,
            assignments,
        }
    }

    /// One meta-node per weight, one meta-edge per connected cluster pair.
    fn aggregate(&self, graph: &GraphStore, clusters: usize) -> Result<GraphStore, LayoutError> {
        let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
        for (u, v) in graph.edges() {
            let (cu, cv) = (self.assignments[u], self.assignments[v]);
            if cu != cv {
                pairs.insert((cu.min(cv), cu.max(cv)));
            }
        }
        let mut meta = GraphStore::new();
        for _ in 0..clusters {
            meta.add_node();
        }
        for (cu, cv) in pairs {
            meta.add_edge(cu, cv)?;
        }
        Ok(meta)
    }

    /// Lay out one square group per weight, centered at the converged
    /// meta-node positions.
    pub fn call(
        &self,
        graph: &GraphStore,
        width: f64,
        height: f64,
        weights: &[f64],
    ) -> Result<Vec<Group>, LayoutError> {
        check_arguments(width, height, weights)?;
        if self.assignments.len() != graph.node_count() {
            return Err(LayoutError::InvalidReference(format!(
                "assignment covers {} nodes but the graph has {}",
                self.assignments.len(),
                graph.node_count()
            )));
        }
        for (node, &cluster) in self.assignments.iter().enumerate() {
            if cluster >= weights.len() {
                return Err(LayoutError::InvalidArgument(format!(
                    "node {node} is assigned to cluster {cluster} but only {} weights were given",
                    weights.len()
                )));
            }
        }

        let mut meta = self.aggregate(graph, weights.len())?;
        let mut simulation = Simulation::new();
        let mut many_body = ManyBodyForce::new();
        many_body.strength = self.many_body_force_strength;
        simulation.add(Box::new(many_body));
        let mut link = LinkForce::from_graph(&meta);
        link.distance = self.link_length;
        link.strength = Some(self.link_force_strength);
        simulation.add(Box::new(link));
        if self.center_force_strength != 0.0 {
            simulation.add(Box::new(CenterForce::new()));
        }
        simulation.start(&mut meta)?;

        let total: f64 = weights.iter().sum();
        let groups = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let side = (w / total * width * height).sqrt();
                // i < meta.node_count() by construction.
                let x = meta.x(i).unwrap_or(0.0);
                let y = meta.y(i).unwrap_or(0.0);
                Group::new(x, y, side, side)
            })
            .collect();
        Ok(groups)
    }
}

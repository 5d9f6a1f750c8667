//! Many-body repulsion restricted to clusters of a partition.
//!
//! Same law as the global many-body force, but pairs are only formed within
//! each cluster, so separate clusters do not repel each other.

use std::collections::BTreeMap;

use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Body;
use crate::layout::force::many_body::apply_pairwise_subset;
use crate::layout::force::{BoundForce, Force, check_assignments, group_indices};

/// Per-cluster many-body force. `assignments[node]` is the cluster id.
pub struct GroupManyBodyForce {
    pub strength: f64,
    assignments: Vec<usize>,
}

impl GroupManyBodyForce {
    pub fn new(assignments: Vec<usize>) -> Self {
        Self {
            strength: -30.0,
            assignments,
        }
    }
}

impl Force for GroupManyBodyForce {
    fn bind(&self, graph: &GraphStore) -> Result<Box<dyn BoundForce>, LayoutError> {
        check_assignments(&self.assignments, graph)?;
        Ok(Box::new(BoundGroupManyBody {
            groups: group_indices(&self.assignments),
            strength: vec![self.strength; graph.node_count()],
        }))
    }
}

struct BoundGroupManyBody {
    groups: BTreeMap<usize, Vec<usize>>,
    strength: Vec<f64>,
}

impl BoundForce for BoundGroupManyBody {
    fn apply(&self, bodies: &mut [Body], alpha: f64) {
        for members in self.groups.values() {
            apply_pairwise_subset(bodies, members, &self.strength, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repulsion_stays_within_cluster() {
        let mut graph = GraphStore::new();
        for _ in 0..4 {
            graph.add_node();
        }
        // Nodes 0,1 in cluster 0; nodes 2,3 in cluster 1.
        let force = GroupManyBodyForce::new(vec![0, 0, 1, 1]);
        let bound = force.bind(&graph).unwrap();

        let mut bodies = vec![
            Body::new(0.0, 0.0),
            Body::new(10.0, 0.0),
            Body::new(0.0, 100.0),
            Body::new(0.0, 100.0), // coincident with node 2, different cluster than 0/1
        ];
        bound.apply(&mut bodies, 1.0);

        // Within-cluster pair repels along x.
        assert!(bodies[0].vx < 0.0);
        assert!(bodies[1].vx > 0.0);
        // Cluster 0 receives nothing from cluster 1 despite proximity in y.
        assert_eq!(bodies[0].vy, 0.0);
        assert_eq!(bodies[1].vy, 0.0);
    }

    #[test]
    fn test_partition_length_validated_at_bind() {
        let mut graph = GraphStore::new();
        graph.add_node();
        graph.add_node();
        let force = GroupManyBodyForce::new(vec![0]);
        assert!(matches!(
            force.bind(&graph),
            Err(LayoutError::InvalidReference(_))
        ));
    }
}

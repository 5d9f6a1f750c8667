//! Per-cluster centering.
//!
//! Like the global centering force, but each cluster's centroid is pinned to
//! its own supplied target, typically the center of a precomputed group
//! rectangle.

use std::collections::BTreeMap;

use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Body;
use crate::layout::force::{BoundForce, Force, check_assignments, group_indices};

/// Moves each cluster's centroid to `(centers_x[c], centers_y[c])`.
pub struct GroupCenterForce {
    assignments: Vec<usize>,
    centers_x: Vec<f64>,
    centers_y: Vec<f64>,
}

impl GroupCenterForce {
    pub fn new(assignments: Vec<usize>, centers_x: Vec<f64>, centers_y: Vec<f64>) -> Self {
        Self {
            assignments,
            centers_x,
            centers_y,
        }
    }
}

impl Force for GroupCenterForce {
    fn bind(&self, graph: &GraphStore) -> Result<Box<dyn BoundForce>, LayoutError> {
        check_assignments(&self.assignments, graph)?;
        let centers = self.centers_x.len().min(self.centers_y.len());
        for &cluster in &self.assignments {
            if cluster >= centers {
                return Err(LayoutError::InvalidReference(format!(
                    "cluster {cluster} has no supplied center ({centers} centers)"
                )));
            }
        }
        Ok(Box::new(BoundGroupCenter {
            groups: group_indices(&self.assignments),
            centers_x: self.centers_x.clone(),
            centers_y: self.centers_y.clone(),
        }))
    }
}

struct BoundGroupCenter {
    groups: BTreeMap<usize, Vec<usize>>,
    centers_x: Vec<f64>,
    centers_y: Vec<f64>,
}

impl BoundForce for BoundGroupCenter {
    fn apply(&self, bodies: &mut [Body], _alpha: f64) {
        for (&cluster, members) in &self.groups {
            let n = members.len() as f64;
            let mut cx = 0.0;
            let mut cy = 0.0;
            for &a in members {
                cx += bodies[a].x;
                cy += bodies[a].y;
            }
            cx = cx / n - self.centers_x[cluster];
            cy = cy / n - self.centers_y[cluster];
            for &a in members {
                bodies[a].x -= cx;
                bodies[a].y -= cy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_cluster_centered_on_its_target() {
        let mut graph = GraphStore::new();
        for _ in 0..4 {
            graph.add_node();
        }
        let force = GroupCenterForce::new(
            vec![0, 0, 1, 1],
            vec![-100.0, 100.0],
            vec![0.0, 50.0],
        );
        let bound = force.bind(&graph).unwrap();

        let mut bodies = vec![
            Body::new(0.0, 0.0),
            Body::new(10.0, 0.0),
            Body::new(0.0, 0.0),
            Body::new(0.0, 10.0),
        ];
        bound.apply(&mut bodies, 1.0);

        assert_eq!((bodies[0].x + bodies[1].x) / 2.0, -100.0);
        assert_eq!((bodies[0].y + bodies[1].y) / 2.0, 0.0);
        assert_eq!((bodies[2].x + bodies[3].x) / 2.0, 100.0);
        assert_eq!((bodies[2].y + bodies[3].y) / 2.0, 50.0);
    }

    #[test]
    fn test_missing_center_rejected() {
        let mut graph = GraphStore::new();
        graph.add_node();
        graph.add_node();
        let force = GroupCenterForce::new(vec![0, 1], vec![0.0], vec![0.0]);
        assert!(matches!(
            force.bind(&graph),
            Err(LayoutError::InvalidReference(_))
        ));
    }
}

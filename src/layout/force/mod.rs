//! Force contributors for the simulation tick loop.
//!
//! Each force is built in two phases. Construction records configuration and,
//! for link-style forces, a snapshot of the indices they act on. Binding
//! happens when the simulation starts: the force checks its recorded indices
//! against the graph it is about to run on (this is where `InvalidReference`
//! surfaces) and resolves per-node parameters into a [`BoundForce`] that the
//! tick loop applies in registration order.

mod center;
mod group_center;
mod group_link;
mod group_many_body;
mod link;
mod many_body;

pub use center::CenterForce;
pub use group_center::GroupCenterForce;
pub use group_link::GroupLinkForce;
pub use group_many_body::GroupManyBodyForce;
pub use link::LinkForce;
pub use many_body::ManyBodyForce;

use std::collections::BTreeMap;

use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Body;

/// A registered force, not yet tied to a concrete graph.
pub trait Force {
    /// Validate against the graph the simulation will run on and resolve
    /// per-node/per-edge parameters.
    fn bind(&self, graph: &GraphStore) -> Result<Box<dyn BoundForce>, LayoutError>;
}

/// A force resolved against a graph snapshot; applied once per tick.
pub trait BoundForce {
    /// Accumulate velocity deltas (or adjust positions, for centering
    /// forces) for one tick at the given alpha.
    fn apply(&self, bodies: &mut [Body], alpha: f64);
}

/// Group member lists keyed by cluster id, in ascending cluster order.
///
/// The ordered map keeps force application deterministic across runs.
pub(crate) fn group_indices(assignments: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (node, &cluster) in assignments.iter().enumerate() {
        groups.entry(cluster).or_default().push(node);
    }
    groups
}

/// Shared validation for grouped forces: the recorded partition must cover
/// exactly the nodes of the graph presented at start time.
pub(crate) fn check_assignments(
    assignments: &[usize],
    graph: &GraphStore,
) -> Result<(), LayoutError> {
    if assignments.len() != graph.node_count() {
        return Err(LayoutError::InvalidReference(format!(
            "partition covers {} nodes but the graph has {}",
            assignments.len(),
            graph.node_count()
        )));
    }
    Ok(())
}

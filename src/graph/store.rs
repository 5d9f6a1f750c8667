//! GraphStore - Core graph container.
//!
//! The GraphStore keeps the topology in a petgraph `Graph` and maintains SoA
//! (Structure of Arrays) buffers for node positions. Node and edge indices
//! are insertion-ordered and stable: there are no removal operations, so the
//! index returned by `add_node`/`add_edge` identifies that node or edge for
//! the lifetime of the store.

use petgraph::Undirected;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use std::f64::consts::PI;

use crate::error::LayoutError;

/// Deterministic default placement for the i-th node: a phyllotaxis spiral
/// (`r = 10·√i`, golden-angle increments). Guarantees distinct positions
/// without any RNG, so repeated runs start from identical state.
fn spiral_position(i: usize) -> (f64, f64) {
    let i = i as f64;
    let r = 10.0 * i.sqrt();
    let theta = PI * (3.0 - 5.0_f64.sqrt()) * i;
    (r * theta.cos(), r * theta.sin())
}

/// The core graph container.
///
/// This struct manages:
/// - Graph topology via petgraph (undirected; self-loops and multi-edges allowed)
/// - Position buffers in SoA layout, one `f64` pair per node
pub struct GraphStore {
    graph: Graph<(), (), Undirected>,

    /// X positions (SoA layout).
    pos_x: Vec<f64>,

    /// Y positions (SoA layout).
    pos_y: Vec<f64>,
}

impl GraphStore {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: Graph::new_undirected(),
            pos_x: Vec::new(),
            pos_y: Vec::new(),
        }
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: Graph::with_capacity(node_capacity, edge_capacity),
            pos_x: Vec::with_capacity(node_capacity),
            pos_y: Vec::with_capacity(node_capacity),
        }
    }

    /// Add a node at its deterministic default position.
    ///
    /// Returns the node index; indices are 0-based and strictly increasing.
    pub fn add_node(&mut self) -> usize {
        let index = self.graph.add_node(()).index();
        let (x, y) = spiral_position(index);
        self.pos_x.push(x);
        self.pos_y.push(y);
        index
    }

    /// Add an edge between two existing nodes.
    ///
    /// Returns the edge index in insertion order. Fails with `InvalidIndex`
    /// when either endpoint is out of range, leaving the graph unchanged.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<usize, LayoutError> {
        let n = self.node_count();
        LayoutError::check_index(u, n)?;
        LayoutError::check_index(v, n)?;
        let index = self
            .graph
            .add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
        Ok(index.index())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// A node's X position.
    pub fn x(&self, i: usize) -> Result<f64, LayoutError> {
        LayoutError::check_index(i, self.pos_x.len())?;
        Ok(self.pos_x[i])
    }

    /// A node's Y position.
    pub fn y(&self, i: usize) -> Result<f64, LayoutError> {
        LayoutError::check_index(i, self.pos_y.len())?;
        Ok(self.pos_y[i])
    }

    /// Overwrite a node's X position.
    pub fn set_x(&mut self, i: usize, value: f64) -> Result<(), LayoutError> {
        LayoutError::check_index(i, self.pos_x.len())?;
        self.pos_x[i] = value;
        Ok(())
    }

    /// Overwrite a node's Y position.
    pub fn set_y(&mut self, i: usize, value: f64) -> Result<(), LayoutError> {
        LayoutError::check_index(i, self.pos_y.len())?;
        self.pos_y[i] = value;
        Ok(())
    }

    /// Endpoints of the e-th edge, in insertion order.
    pub fn edge_endpoints(&self, e: usize) -> Result<(usize, usize), LayoutError> {
        LayoutError::check_index(e, self.edge_count())?;
        let (u, v) = self
            .graph
            .edge_endpoints(EdgeIndex::new(e))
            .expect("edge index checked above");
        Ok((u.index(), v.index()))
    }

    /// Iterate `(source, target)` pairs in edge-insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.edge_indices().map(|e| {
            let (u, v) = self.graph.edge_endpoints(e).expect("edge exists");
            (u.index(), v.index())
        })
    }

    /// Number of edges incident to node `u` (self-loops count once).
    pub fn degree(&self, u: usize) -> usize {
        self.graph.edges(NodeIndex::new(u)).count()
    }

    /// X positions slice (for zero-copy export).
    pub fn positions_x(&self) -> &[f64] {
        &self.pos_x
    }

    /// Y positions slice (for zero-copy export).
    pub fn positions_y(&self) -> &[f64] {
        &self.pos_y
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_indices_increase() {
        let mut graph = GraphStore::new();
        assert_eq!(graph.add_node(), 0);
        assert_eq!(graph.add_node(), 1);
        assert_eq!(graph.add_node(), 2);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_default_positions_distinct_and_deterministic() {
        let mut a = GraphStore::new();
        let mut b = GraphStore::new();
        for _ in 0..10 {
            a.add_node();
            b.add_node();
        }
        for i in 0..10 {
            assert_eq!(a.x(i).unwrap(), b.x(i).unwrap());
            assert_eq!(a.y(i).unwrap(), b.y(i).unwrap());
        }
        // First node sits at the origin, the rest spiral outward.
        assert_eq!(a.x(0).unwrap(), 0.0);
        for i in 1..10 {
            let r = (a.x(i).unwrap().powi(2) + a.y(i).unwrap().powi(2)).sqrt();
            assert!(r > 1.0);
        }
    }

    #[test]
    fn test_add_edge() {
        let mut graph = GraphStore::new();
        let a = graph.add_node();
        let b = graph.add_node();
        assert_eq!(graph.add_edge(a, b).unwrap(), 0);
        assert_eq!(graph.add_edge(b, a).unwrap(), 1);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_endpoints(0).unwrap(), (a, b));
    }

    #[test]
    fn test_add_edge_invalid_index_leaves_graph_unchanged() {
        let mut graph = GraphStore::new();
        graph.add_node();
        graph.add_node();
        graph.add_edge(0, 1).unwrap();

        let err = graph.add_edge(0, 2).unwrap_err();
        assert_eq!(err, LayoutError::InvalidIndex { index: 2, len: 2 });
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_loop_and_multi_edge() {
        let mut graph = GraphStore::new();
        let a = graph.add_node();
        let b = graph.add_node();
        assert_eq!(graph.add_edge(a, a).unwrap(), 0);
        assert_eq!(graph.add_edge(a, b).unwrap(), 1);
        assert_eq!(graph.add_edge(a, b).unwrap(), 2);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_position_accessors_bound_checked() {
        let mut graph = GraphStore::new();
        graph.add_node();
        graph.set_x(0, 5.0).unwrap();
        graph.set_y(0, -3.0).unwrap();
        assert_eq!(graph.x(0).unwrap(), 5.0);
        assert_eq!(graph.y(0).unwrap(), -3.0);
        assert!(graph.x(1).is_err());
        assert!(graph.set_y(1, 0.0).is_err());
    }

    #[test]
    fn test_degree_counts_incident_edges() {
        let mut graph = GraphStore::new();
        let a = graph.add_node();
        let b = graph.add_node();
        let c = graph.add_node();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(a, c).unwrap();
        assert_eq!(graph.degree(a), 2);
        assert_eq!(graph.degree(b), 1);
    }
}

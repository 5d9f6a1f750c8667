//! Edge bundling.
//!
//! Post-layout processing that routes geometrically compatible edges along
//! shared paths, turning each straight edge into a curved polyline. The
//! algorithm is force-directed edge bundling (FDEB, Holten & van Wijk 2009):
//! edges are subdivided into waypoints which attract both their neighbors on
//! the same edge (spring term) and corresponding waypoints of compatible
//! edges (electrostatic term).

mod fdeb;

use serde::Serialize;

use crate::graph::GraphStore;

/// An immutable 2D coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The bundled path of one edge: points from the source endpoint to the
/// target endpoint inclusive.
#[derive(Clone, Debug, Serialize)]
pub struct Line {
    pub source: usize,
    pub target: usize,
    pub points: Vec<Point>,
}

/// Force-directed edge bundling configuration.
///
/// `s0`/`s_step` govern the waypoint movement step size per cycle and its
/// decay; `i0`/`i_step` govern the inner iteration count per cycle and its
/// decay. Edge pairs whose compatibility falls below
/// `minimum_edge_compatibility` exert no force on each other.
pub struct EdgeBundling {
    pub cycles: usize,
    pub s0: f64,
    pub i0: usize,
    pub s_step: f64,
    pub i_step: f64,
    pub minimum_edge_compatibility: f64,
}

impl EdgeBundling {
    pub fn new() -> Self {
        Self {
            cycles: 6,
            s0: 0.1,
            i0: 90,
            s_step: 0.5,
            i_step: 2.0 / 3.0,
            minimum_edge_compatibility: 0.6,
        }
    }

    /// Bundle every edge of `graph` at its current node positions.
    ///
    /// Pure function of the configuration and the graph: the graph is
    /// borrowed immutably and repeated calls return identical results. One
    /// line per edge, in edge-insertion order; with `cycles == 0` each line
    /// is the unmodified 2-point endpoint segment.
    pub fn call(&self, graph: &GraphStore) -> Vec<Line> {
        fdeb::bundle(graph, self)
    }
}

impl Default for EdgeBundling {
    fn default() -> Self {
        Self::new()
    }
}

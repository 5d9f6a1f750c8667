//! Skein Graph - WASM Module
//!
//! A 2D graph layout engine compiled to WebAssembly: a force-directed
//! simulation over an append-only graph, force-directed edge bundling of the
//! laid-out edges, and cluster grouping (treemap, radial, force-directed).
//! The JavaScript-friendly API is exposed via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Graph container using petgraph plus SoA position buffers
//! - `layout`: Force contributors and the time-stepped simulation
//! - `bundling`: Force-directed edge bundling (FDEB)
//! - `grouping`: Treemap, radial and force-directed group layouts

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

pub mod bundling;
pub mod error;
pub mod graph;
pub mod grouping;
pub mod layout;

use bundling::{EdgeBundling as CoreEdgeBundling, Line as CoreLine, Point as CorePoint};
use error::LayoutError;
use graph::GraphStore;
use grouping::{
    ForceDirectedGrouping as CoreForceDirectedGrouping, Group as CoreGroup,
    RadialGrouping as CoreRadialGrouping, TreemapGrouping as CoreTreemapGrouping,
};
use layout::Simulation as CoreSimulation;
use layout::force::{
    CenterForce, GroupCenterForce, GroupLinkForce, GroupManyBodyForce, LinkForce, ManyBodyForce,
};

/// Initialize the WASM module: panic reporting and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_assignments(groups: &[u32]) -> Vec<usize> {
    groups.iter().map(|&g| g as usize).collect()
}

// =============================================================================
// Graph
// =============================================================================

/// The graph handle exposed to JavaScript.
///
/// Wraps the internal [`GraphStore`]; node and edge indices are 0-based and
/// stable for the lifetime of the graph.
#[wasm_bindgen]
pub struct Graph {
    store: GraphStore,
}

#[wasm_bindgen]
impl Graph {
    /// Create a new empty graph.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            store: GraphStore::new(),
        }
    }

    /// Create a graph with pre-allocated capacity.
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            store: GraphStore::with_capacity(node_capacity, edge_capacity),
        }
    }

    /// Add a node at its deterministic default position.
    ///
    /// Returns the node index.
    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&mut self) -> usize {
        self.store.add_node()
    }

    /// Add an edge between two existing nodes.
    ///
    /// Returns the edge index. Throws when either endpoint is out of range.
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<usize, JsError> {
        Ok(self.store.add_edge(source, target)?)
    }

    /// Get the number of nodes in the graph.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Get the number of edges in the graph.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Get a node's X position.
    #[wasm_bindgen(js_name = getX)]
    pub fn get_x(&self, node: usize) -> Result<f64, JsError> {
        Ok(self.store.x(node)?)
    }

    /// Get a node's Y position.
    #[wasm_bindgen(js_name = getY)]
    pub fn get_y(&self, node: usize) -> Result<f64, JsError> {
        Ok(self.store.y(node)?)
    }

    /// Set a node's X position.
    #[wasm_bindgen(js_name = setX)]
    pub fn set_x(&mut self, node: usize, value: f64) -> Result<(), JsError> {
        Ok(self.store.set_x(node, value)?)
    }

    /// Set a node's Y position.
    #[wasm_bindgen(js_name = setY)]
    pub fn set_y(&mut self, node: usize, value: f64) -> Result<(), JsError> {
        Ok(self.store.set_y(node, value)?)
    }

    /// Endpoints of an edge as `[source, target]`.
    #[wasm_bindgen(js_name = edgeEndpoints)]
    pub fn edge_endpoints(&self, edge: usize) -> Result<Vec<usize>, JsError> {
        let (u, v) = self.store.edge_endpoints(edge)?;
        Ok(vec![u, v])
    }

    /// Get a zero-copy view of X positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately, do not store.
    #[wasm_bindgen(js_name = positionsXView)]
    pub fn positions_x_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.store.positions_x()) }
    }

    /// Get a zero-copy view of Y positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately, do not store.
    #[wasm_bindgen(js_name = positionsYView)]
    pub fn positions_y_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.store.positions_y()) }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Force simulation handle.
///
/// Forces are registered first, then `start` runs the whole simulation to
/// completion on the given graph. A finished simulation cannot be restarted.
#[wasm_bindgen]
pub struct Simulation {
    inner: CoreSimulation,
}

#[wasm_bindgen]
impl Simulation {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CoreSimulation::new(),
        }
    }

    /// Register a many-body force over all nodes.
    #[wasm_bindgen(js_name = addManyBodyForce)]
    pub fn add_many_body_force(&mut self, strength: Option<f64>) {
        let mut force = ManyBodyForce::new();
        if let Some(strength) = strength {
            force.strength = strength;
        }
        self.inner.add(Box::new(force));
    }

    /// Register a spring force along the current edges of `graph`.
    ///
    /// The edge list is snapshotted now and re-validated when the simulation
    /// starts.
    #[wasm_bindgen(js_name = addLinkForce)]
    pub fn add_link_force(&mut self, graph: &Graph, distance: Option<f64>, strength: Option<f64>) {
        let mut force = LinkForce::from_graph(&graph.store);
        if let Some(distance) = distance {
            force.distance = distance;
        }
        force.strength = strength;
        self.inner.add(Box::new(force));
    }

    /// Register a centering force at `(x, y)` (default origin).
    #[wasm_bindgen(js_name = addCenterForce)]
    pub fn add_center_force(&mut self, x: Option<f64>, y: Option<f64>) {
        let mut force = CenterForce::new();
        force.x = x.unwrap_or(0.0);
        force.y = y.unwrap_or(0.0);
        self.inner.add(Box::new(force));
    }

    /// Register a many-body force restricted to each cluster of `groups`.
    #[wasm_bindgen(js_name = addGroupManyBodyForce)]
    pub fn add_group_many_body_force(&mut self, groups: &[u32], strength: Option<f64>) {
        let mut force = GroupManyBodyForce::new(to_assignments(groups));
        if let Some(strength) = strength {
            force.strength = strength;
        }
        self.inner.add(Box::new(force));
    }

    /// Register a spring force with per-cluster strengths: `intra_group`
    /// within a cluster, `inter_group` across clusters.
    #[wasm_bindgen(js_name = addGroupLinkForce)]
    pub fn add_group_link_force(
        &mut self,
        graph: &Graph,
        groups: &[u32],
        intra_group: Option<f64>,
        inter_group: Option<f64>,
    ) {
        let mut force = GroupLinkForce::from_graph(&graph.store, to_assignments(groups));
        if let Some(intra_group) = intra_group {
            force.intra_group = intra_group;
        }
        if let Some(inter_group) = inter_group {
            force.inter_group = inter_group;
        }
        self.inner.add(Box::new(force));
    }

    /// Register a per-cluster centering force toward the supplied centers.
    #[wasm_bindgen(js_name = addGroupCenterForce)]
    pub fn add_group_center_force(
        &mut self,
        groups: &[u32],
        centers_x: &[f64],
        centers_y: &[f64],
    ) {
        self.inner.add(Box::new(GroupCenterForce::new(
            to_assignments(groups),
            centers_x.to_vec(),
            centers_y.to_vec(),
        )));
    }

    /// Number of registered forces.
    #[wasm_bindgen(js_name = forceCount)]
    pub fn force_count(&self) -> usize {
        self.inner.force_count()
    }

    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[wasm_bindgen(setter)]
    pub fn set_iterations(&mut self, value: usize) {
        self.inner.iterations = value;
    }

    #[wasm_bindgen(getter, js_name = alphaMin)]
    pub fn alpha_min(&self) -> f64 {
        self.inner.alpha_min
    }

    #[wasm_bindgen(setter, js_name = alphaMin)]
    pub fn set_alpha_min(&mut self, value: f64) {
        self.inner.alpha_min = value;
    }

    #[wasm_bindgen(getter, js_name = velocityDecay)]
    pub fn velocity_decay(&self) -> f64 {
        self.inner.velocity_decay
    }

    #[wasm_bindgen(setter, js_name = velocityDecay)]
    pub fn set_velocity_decay(&mut self, value: f64) {
        self.inner.velocity_decay = value;
    }

    /// Run the simulation to completion, updating `graph` positions in place.
    pub fn start(&mut self, graph: &mut Graph) -> Result<(), JsError> {
        Ok(self.inner.start(&mut graph.store)?)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Edge Bundling
// =============================================================================

/// Edge bundling handle (FDEB).
#[wasm_bindgen]
pub struct EdgeBundling {
    inner: CoreEdgeBundling,
}

#[wasm_bindgen]
impl EdgeBundling {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CoreEdgeBundling::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> usize {
        self.inner.cycles
    }

    #[wasm_bindgen(setter)]
    pub fn set_cycles(&mut self, value: usize) {
        self.inner.cycles = value;
    }

    #[wasm_bindgen(getter)]
    pub fn s0(&self) -> f64 {
        self.inner.s0
    }

    #[wasm_bindgen(setter)]
    pub fn set_s0(&mut self, value: f64) {
        self.inner.s0 = value;
    }

    #[wasm_bindgen(getter)]
    pub fn i0(&self) -> usize {
        self.inner.i0
    }

    #[wasm_bindgen(setter)]
    pub fn set_i0(&mut self, value: usize) {
        self.inner.i0 = value;
    }

    #[wasm_bindgen(getter, js_name = sStep)]
    pub fn s_step(&self) -> f64 {
        self.inner.s_step
    }

    #[wasm_bindgen(setter, js_name = sStep)]
    pub fn set_s_step(&mut self, value: f64) {
        self.inner.s_step = value;
    }

    #[wasm_bindgen(getter, js_name = iStep)]
    pub fn i_step(&self) -> f64 {
        self.inner.i_step
    }

    #[wasm_bindgen(setter, js_name = iStep)]
    pub fn set_i_step(&mut self, value: f64) {
        self.inner.i_step = value;
    }

    #[wasm_bindgen(getter, js_name = minimumEdgeCompatibility)]
    pub fn minimum_edge_compatibility(&self) -> f64 {
        self.inner.minimum_edge_compatibility
    }

    #[wasm_bindgen(setter, js_name = minimumEdgeCompatibility)]
    pub fn set_minimum_edge_compatibility(&mut self, value: f64) {
        self.inner.minimum_edge_compatibility = value;
    }

    /// Bundle every edge of `graph` at its current node positions.
    ///
    /// Stateless: repeated calls with the same graph return identical lines.
    pub fn call(&self, graph: &Graph) -> LineCollection {
        LineCollection {
            lines: self.inner.call(&graph.store),
        }
    }
}

impl Default for EdgeBundling {
    fn default() -> Self {
        Self::new()
    }
}

/// Bundled lines, one per edge in edge-insertion order.
#[wasm_bindgen]
pub struct LineCollection {
    lines: Vec<CoreLine>,
}

#[wasm_bindgen]
impl LineCollection {
    /// Number of lines.
    pub fn length(&self) -> usize {
        self.lines.len()
    }

    /// The i-th line.
    pub fn at(&self, index: usize) -> Result<Line, JsError> {
        LayoutError::check_index(index, self.lines.len())?;
        Ok(Line {
            inner: self.lines[index].clone(),
        })
    }

    /// Export all lines as a JS value: `[{source, target, points: [{x, y}]}]`.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.lines)?)
    }
}

/// The bundled path of one edge.
#[wasm_bindgen]
pub struct Line {
    inner: CoreLine,
}

#[wasm_bindgen]
impl Line {
    #[wasm_bindgen(getter)]
    pub fn source(&self) -> usize {
        self.inner.source
    }

    #[wasm_bindgen(getter)]
    pub fn target(&self) -> usize {
        self.inner.target
    }

    /// Number of points on the line, endpoints included.
    pub fn length(&self) -> usize {
        self.inner.points.len()
    }

    /// The j-th point, from source to target.
    pub fn at(&self, index: usize) -> Result<Point, JsError> {
        LayoutError::check_index(index, self.inner.points.len())?;
        let p = self.inner.points[index];
        Ok(Point { inner: p })
    }
}

/// An immutable 2D coordinate.
#[wasm_bindgen]
pub struct Point {
    inner: CorePoint,
}

#[wasm_bindgen]
impl Point {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// An axis-aligned group rectangle. `x`/`y` is the rectangle center with the
/// canvas centered at the origin.
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct Group {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[wasm_bindgen]
impl Group {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<CoreGroup> for Group {
    fn from(g: CoreGroup) -> Self {
        Self {
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
        }
    }
}

impl From<Group> for CoreGroup {
    fn from(g: Group) -> Self {
        CoreGroup::new(g.x, g.y, g.width, g.height)
    }
}

/// Group rectangles, one per cluster in cluster-index order.
#[wasm_bindgen]
pub struct GroupCollection {
    groups: Vec<CoreGroup>,
}

#[wasm_bindgen]
impl GroupCollection {
    /// Number of groups.
    pub fn length(&self) -> usize {
        self.groups.len()
    }

    /// The i-th group.
    pub fn at(&self, index: usize) -> Result<Group, JsError> {
        LayoutError::check_index(index, self.groups.len())?;
        Ok(self.groups[index].into())
    }

    /// Overwrite the i-th group.
    pub fn set(&mut self, index: usize, group: &Group) -> Result<(), JsError> {
        LayoutError::check_index(index, self.groups.len())?;
        self.groups[index] = (*group).into();
        Ok(())
    }

    /// Export all groups as a JS value: `[{x, y, width, height}]`.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.groups)?)
    }

    /// Cluster center X coordinates, for feeding a group center force.
    #[wasm_bindgen(js_name = centersX)]
    pub fn centers_x(&self) -> Vec<f64> {
        self.groups.iter().map(|g| g.x).collect()
    }

    /// Cluster center Y coordinates, for feeding a group center force.
    #[wasm_bindgen(js_name = centersY)]
    pub fn centers_y(&self) -> Vec<f64> {
        self.groups.iter().map(|g| g.y).collect()
    }
}

/// Squarified treemap grouping handle.
#[wasm_bindgen]
pub struct TreemapGrouping {
    inner: CoreTreemapGrouping,
}

#[wasm_bindgen]
impl TreemapGrouping {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CoreTreemapGrouping::new(),
        }
    }

    /// Tile the `width × height` canvas by `weights`, one tile per cluster.
    pub fn call(
        &self,
        width: f64,
        height: f64,
        weights: &[f64],
    ) -> Result<GroupCollection, JsError> {
        Ok(GroupCollection {
            groups: self.inner.call(width, height, weights)?,
        })
    }
}

impl Default for TreemapGrouping {
    fn default() -> Self {
        Self::new()
    }
}

/// Radial grouping handle.
#[wasm_bindgen]
pub struct RadialGrouping {
    inner: CoreRadialGrouping,
}

#[wasm_bindgen]
impl RadialGrouping {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CoreRadialGrouping::new(),
        }
    }

    /// Arrange one circle per cluster on a ring inside the canvas.
    pub fn call(
        &self,
        width: f64,
        height: f64,
        weights: &[f64],
    ) -> Result<GroupCollection, JsError> {
        Ok(GroupCollection {
            groups: self.inner.call(width, height, weights)?,
        })
    }
}

impl Default for RadialGrouping {
    fn default() -> Self {
        Self::new()
    }
}

/// Force-directed grouping handle.
#[wasm_bindgen]
pub struct ForceDirectedGrouping {
    inner: CoreForceDirectedGrouping,
}

#[wasm_bindgen]
impl ForceDirectedGrouping {
    /// `groups[node]` is the cluster the node belongs to.
    #[wasm_bindgen(constructor)]
    pub fn new(groups: &[u32]) -> Self {
        Self {
            inner: CoreForceDirectedGrouping::new(to_assignments(groups)),
        }
    }

    #[wasm_bindgen(getter, js_name = linkLength)]
    pub fn link_length(&self) -> f64 {
        self.inner.link_length
    }

    #[wasm_bindgen(setter, js_name = linkLength)]
    pub fn set_link_length(&mut self, value: f64) {
        self.inner.link_length = value;
    }

    #[wasm_bindgen(getter, js_name = manyBodyForceStrength)]
    pub fn many_body_force_strength(&self) -> f64 {
        self.inner.many_body_force_strength
    }

    #[wasm_bindgen(setter, js_name = manyBodyForceStrength)]
    pub fn set_many_body_force_strength(&mut self, value: f64) {
        self.inner.many_body_force_strength = value;
    }

    #[wasm_bindgen(getter, js_name = linkForceStrength)]
    pub fn link_force_strength(&self) -> f64 {
        self.inner.link_force_strength
    }

    #[wasm_bindgen(setter, js_name = linkForceStrength)]
    pub fn set_link_force_strength(&mut self, value: f64) {
        self.inner.link_force_strength = value;
    }

    #[wasm_bindgen(getter, js_name = centerForceStrength)]
    pub fn center_force_strength(&self) -> f64 {
        self.inner.center_force_strength
    }

    #[wasm_bindgen(setter, js_name = centerForceStrength)]
    pub fn set_center_force_strength(&mut self, value: f64) {
        self.inner.center_force_strength = value;
    }

    /// Lay out one square group per cluster at the converged positions of the
    /// aggregated cluster graph.
    pub fn call(
        &self,
        graph: &Graph,
        width: f64,
        height: f64,
        weights: &[f64],
    ) -> Result<GroupCollection, JsError> {
        Ok(GroupCollection {
            groups: self.inner.call(&graph.store, width, height, weights)?,
        })
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Full pipeline over the core types: build a graph, run the simulation,
    /// bundle the edges, then group the nodes.
    #[test]
    fn test_layout_bundle_group_pipeline() {
        let mut store = GraphStore::new();
        for _ in 0..6 {
            store.add_node();
        }
        for &(u, v) in &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (0, 3)] {
            store.add_edge(u, v).unwrap();
        }

        let mut simulation = CoreSimulation::new();
        simulation.add(Box::new(ManyBodyForce::new()));
        simulation.add(Box::new(LinkForce::from_graph(&store)));
        simulation.add(Box::new(CenterForce::new()));
        simulation.start(&mut store).unwrap();

        for i in 0..6 {
            assert!(store.x(i).unwrap().is_finite());
            assert!(store.y(i).unwrap().is_finite());
        }

        let lines = CoreEdgeBundling::new().call(&store);
        assert_eq!(lines.len(), 7);
        for line in &lines {
            let first = line.points[0];
            let last = line.points[line.points.len() - 1];
            assert_eq!(first.x, store.x(line.source).unwrap());
            assert_eq!(first.y, store.y(line.source).unwrap());
            assert_eq!(last.x, store.x(line.target).unwrap());
            assert_eq!(last.y, store.y(line.target).unwrap());
        }

        let assignments = vec![0usize, 0, 0, 1, 1, 1];
        let grouping = CoreForceDirectedGrouping::new(assignments);
        let groups = grouping.call(&store, 400.0, 300.0, &[1.0, 1.0]).unwrap();
        assert_eq!(groups.len(), 2);
        for group in &groups {
            assert!(group.x.is_finite() && group.y.is_finite());
            assert!((group.width * group.height - 60000.0).abs() < 1e-6);
        }
    }

    /// The group collection helpers feed straight into a group center force.
    #[test]
    fn test_groups_drive_group_center_force() {
        let mut store = GraphStore::new();
        for _ in 0..4 {
            store.add_node();
        }
        store.add_edge(0, 1).unwrap();
        store.add_edge(2, 3).unwrap();

        let groups = CoreTreemapGrouping::new()
            .call(200.0, 100.0, &[1.0, 1.0])
            .unwrap();
        let centers_x: Vec<f64> = groups.iter().map(|g| g.x).collect();
        let centers_y: Vec<f64> = groups.iter().map(|g| g.y).collect();

        let assignments = vec![0usize, 0, 1, 1];
        let mut simulation = CoreSimulation::new();
        simulation.add(Box::new(GroupManyBodyForce::new(assignments.clone())));
        simulation.add(Box::new(GroupCenterForce::new(
            assignments,
            centers_x.clone(),
            centers_y.clone(),
        )));
        simulation.start(&mut store).unwrap();

        // Each cluster centroid lands on its group center.
        let cx0 = (store.x(0).unwrap() + store.x(1).unwrap()) / 2.0;
        let cy0 = (store.y(0).unwrap() + store.y(1).unwrap()) / 2.0;
        assert!((cx0 - centers_x[0]).abs() < 1e-6);
        assert!((cy0 - centers_y[0]).abs() < 1e-6);
        let cx1 = (store.x(2).unwrap() + store.x(3).unwrap()) / 2.0;
        assert!((cx1 - centers_x[1]).abs() < 1e-6);
    }
}

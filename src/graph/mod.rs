//! Graph data structures and operations.
//!
//! This module provides the core graph container using petgraph for the
//! topology, with Structure of Arrays (SoA) buffers for node positions to
//! enable cache-friendly access and zero-copy export to JavaScript.

mod store;

pub use store::GraphStore;

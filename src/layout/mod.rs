//! Force-directed layout.
//!
//! This module provides the time-stepped force simulation that drives node
//! positions. Forces are registered on a [`simulation::Simulation`] and the
//! whole system runs to completion on the CPU, mutating the graph in place.

pub mod force;
pub mod simulation;

pub use simulation::Simulation;

/// Per-node transient state during a simulation run.
///
/// Velocities live only for the duration of `start`; the graph itself stores
/// positions only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Body {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        }
    }
}

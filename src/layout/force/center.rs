//! Centering force.
//!
//! Translates the whole point cloud every tick so that its centroid sits at
//! the configured center. This is a rigid correction rather than a velocity
//! contribution, which keeps the layout anchored without fighting the other
//! forces.

use crate::error::LayoutError;
use crate::graph::GraphStore;
use crate::layout::Body;
use crate::layout::force::{BoundForce, Force};

/// Pulls the layout centroid to `(x, y)` (default origin).
pub struct CenterForce {
    pub x: f64,
    pub y: f64,
}

impl CenterForce {
    pub fn new() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Default for CenterForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for CenterForce {
    fn bind(&self, _graph: &GraphStore) -> Result<Box<dyn BoundForce>, LayoutError> {
        Ok(Box::new(BoundCenter {
            x: self.x,
            y: self.y,
        }))
    }
}

struct BoundCenter {
    x: f64,
    y: f64,
}

impl BoundForce for BoundCenter {
    fn apply(&self, bodies: &mut [Body], _alpha: f64) {
        if bodies.is_empty() {
            return;
        }
        let n = bodies.len() as f64;
        let cx = bodies.iter().map(|b| b.x).sum::<f64>() / n - self.x;
        let cy = bodies.iter().map(|b| b.y).sum::<f64>() / n - self.y;
        for body in bodies.iter_mut() {
            body.x -= cx;
            body.y -= cy;
        }
    }
}

//! Spatial grouping of node clusters.
//!
//! Each grouping variant turns a weight per cluster into one rectangle per
//! cluster inside a `width × height` canvas centered on the origin. The
//! variants share the [`Group`] type but nothing else: treemap tiles the
//! canvas exactly, radial arranges area-proportional circles on a ring, and
//! force-directed runs a miniature simulation over cluster centroids.

mod force_directed;
mod radial;
mod treemap;

pub use force_directed::ForceDirectedGrouping;
pub use radial::RadialGrouping;
pub use treemap::TreemapGrouping;

use serde::Serialize;

use crate::error::LayoutError;

/// An axis-aligned rectangle. `x`/`y` is the rectangle center, with the
/// canvas centered at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Group {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Group {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Shared argument validation: positive finite canvas, non-empty partition,
/// positive finite weights.
pub(crate) fn check_arguments(
    width: f64,
    height: f64,
    weights: &[f64],
) -> Result<(), LayoutError> {
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(LayoutError::InvalidArgument(format!(
            "dimensions must be positive and finite, got {width} x {height}"
        )));
    }
    if weights.is_empty() {
        return Err(LayoutError::InvalidArgument("empty partition".into()));
    }
    for (i, &w) in weights.iter().enumerate() {
        if !(w.is_finite() && w > 0.0) {
            return Err(LayoutError::InvalidArgument(format!(
                "weight {i} must be positive and finite, got {w}"
            )));
        }
    }
    Ok(())
}

//! Radial grouping.
//!
//! Clusters become circles (reported as their bounding squares) with areas
//! proportional to weight within the canvas area budget, spaced at equal
//! angles on a single ring. The ring radius is chosen from the largest
//! circle so that adjacent circles cannot overlap.

use std::f64::consts::PI;

use super::{Group, check_arguments};
use crate::error::LayoutError;

pub struct RadialGrouping;

impl RadialGrouping {
    pub fn new() -> Self {
        Self
    }

    /// Arrange one circle per weight on a ring, in input order, starting at
    /// angle 0.
    pub fn call(
        &self,
        width: f64,
        height: f64,
        weights: &[f64],
    ) -> Result<Vec<Group>, LayoutError> {
        check_arguments(width, height, weights)?;

        let n = weights.len() as f64;
        let total: f64 = weights.iter().sum();
        let max = weights.iter().fold(f64::NEG_INFINITY, |m, &w| w.max(m));
        // A lone cluster sits at the center; sin(pi/n) would be ~0 there.
        let ring_r = if weights.len() == 1 {
            0.0
        } else {
            (width * height * max / total / PI).sqrt() / (PI / n).sin()
        };

        let d_theta = 2.0 * PI / n;
        let mut theta: f64 = 0.0;
        let groups = weights
            .iter()
            .map(|&w| {
                let r = (width * height * w / total / PI).sqrt();
                let group = Group::new(ring_r * theta.cos(), ring_r * theta.sin(), 2.0 * r, 2.0 * r);
                theta += d_theta;
                group
            })
            .collect();
        Ok(groups)
    }
}

impl Default for RadialGrouping {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cluster_centered() {
        let groups = RadialGrouping::new().call(100.0, 100.0, &[3.0]).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].x, 0.0);
        assert_eq!(groups[0].y, 0.0);
        // Full area budget: pi * r^2 = width * height.
        let r = groups[0].width / 2.0;
        assert!((PI * r * r - 10000.0).abs() < 1e-6);
    }

    #[test]
    fn test_areas_proportional_to_weight() {
        let weights = [1.0, 2.0, 4.0, 8.0];
        let groups = RadialGrouping::new().call(200.0, 100.0, &weights).unwrap();
        let area = |g: &Group| PI * (g.width / 2.0) * (g.width / 2.0);
        let total_weight: f64 = weights.iter().sum();
        for (g, &w) in groups.iter().zip(&weights) {
            assert!((area(g) - w / total_weight * 20000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ring_placement_no_adjacent_overlap() {
        let weights = [5.0, 1.0, 1.0, 5.0, 1.0, 2.0];
        let groups = RadialGrouping::new().call(300.0, 300.0, &weights).unwrap();
        // All on the same ring.
        let ring: Vec<f64> = groups
            .iter()
            .map(|g| (g.x * g.x + g.y * g.y).sqrt())
            .collect();
        for r in &ring {
            assert!((r - ring[0]).abs() < 1e-6);
        }
        // Circle distance between neighbors at least the sum of their radii.
        let m = groups.len();
        for i in 0..m {
            let a = &groups[i];
            let b = &groups[(i + 1) % m];
            let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
            assert!(dist + 1e-9 >= a.width / 2.0 + b.width / 2.0);
        }
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let grouping = RadialGrouping::new();
        assert!(matches!(
            grouping.call(100.0, -5.0, &[1.0]),
            Err(LayoutError::InvalidArgument(_))
        ));
        assert!(matches!(
            grouping.call(100.0, 100.0, &[]),
            Err(LayoutError::InvalidArgument(_))
        ));
    }
}

//! Squarified treemap grouping.
//!
//! Weights are normalized so their sum equals the canvas area, then laid out
//! with the squarified treemap algorithm (Bruls, Huizing & van Wijk): rows
//! are grown greedily along the shorter canvas side while the worst aspect
//! ratio in the row improves. The resulting tiles partition the canvas
//! exactly.

use std::cmp::Ordering;

use super::{Group, check_arguments};
use crate::error::LayoutError;

#[derive(Clone, Copy, Debug)]
struct Tile {
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
}

#[derive(Clone, Copy)]
enum Direction {
    Vertical,
    Horizontal,
}

/// Would adding `item` to the current row improve its worst aspect ratio?
fn improves(row: &[f64], side: f64, item: f64) -> bool {
    let r_max = row[0];
    let r_min0 = row[row.len() - 1];
    let r_min1 = item;
    let s0: f64 = row.iter().sum();
    let s1 = s0 + item;
    let side2 = side * side;
    let v0 = s0 * s0 / side2;
    let v1 = s1 * s1 / side2;
    (r_max / v1).max(v1 / r_min1) < (r_max / v0).max(v0 / r_min0)
}

fn flush_row(
    result: &mut Vec<Tile>,
    row: &[f64],
    direction: Direction,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
) -> f64 {
    let s: f64 = row.iter().sum();
    let d = match direction {
        Direction::Vertical => s / w,
        Direction::Horizontal => s / h,
    };
    let mut offset = 0.0;
    for &z in row {
        let inc = z / d;
        result.push(match direction {
            Direction::Vertical => Tile {
                x: x + offset,
                y,
                dx: inc,
                dy: d,
            },
            Direction::Horizontal => Tile {
                x,
                y: y + offset,
                dx: d,
                dy: inc,
            },
        });
        offset += inc;
    }
    d
}

/// Tile `values` (whose sum must equal `width * height`) into the
/// `width × height` rectangle, in the given order.
fn squarify(width: f64, height: f64, values: &[f64]) -> Vec<Tile> {
    let mut result = Vec::with_capacity(values.len());
    let mut w = width;
    let mut h = height;
    let mut x = 0.0;
    let mut y = 0.0;
    let mut row: Vec<f64> = Vec::new();
    let mut direction = if w > h {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    for &value in values {
        let side = match direction {
            Direction::Vertical => w,
            Direction::Horizontal => h,
        };
        if row.is_empty() || improves(&row, side, value) {
            row.push(value);
            continue;
        }
        let d = flush_row(&mut result, &row, direction, x, y, w, h);
        row.clear();
        row.push(value);
        match direction {
            Direction::Vertical => {
                y += d;
                h -= d;
            }
            Direction::Horizontal => {
                x += d;
                w -= d;
            }
        }
        direction = if w > h {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
    }
    if !row.is_empty() {
        flush_row(&mut result, &row, direction, x, y, w, h);
    }
    result
}

fn normalize(values: &mut [f64], total_area: f64) {
    let total: f64 = values.iter().sum();
    for value in values.iter_mut() {
        *value = *value * total_area / total;
    }
}

/// Squarified treemap over a weight partition.
pub struct TreemapGrouping;

impl TreemapGrouping {
    pub fn new() -> Self {
        Self
    }

    /// Tile the `width × height` canvas by `weights`.
    ///
    /// Returns one group per weight, in input order; internally the tiles
    /// are laid out largest-first for squareness and mapped back.
    pub fn call(
        &self,
        width: f64,
        height: f64,
        weights: &[f64],
    ) -> Result<Vec<Group>, LayoutError> {
        check_arguments(width, height, weights)?;

        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| {
            weights[b]
                .partial_cmp(&weights[a])
                .unwrap_or(Ordering::Equal)
        });
        let mut values: Vec<f64> = order.iter().map(|&i| weights[i]).collect();
        normalize(&mut values, width * height);

        let mut groups = vec![Group::default(); weights.len()];
        for (tile, &i) in squarify(width, height, &values).iter().zip(&order) {
            groups[i] = Group::new(
                tile.x + tile.dx / 2.0 - width / 2.0,
                tile.y + tile.dy / 2.0 - height / 2.0,
                tile.dx,
                tile.dy,
            );
        }
        Ok(groups)
    }
}

impl Default for TreemapGrouping {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlap(a: &Group, b: &Group) -> bool {
        let eps = 1e-9;
        (a.x - b.x).abs() * 2.0 + eps < a.width + b.width
            && (a.y - b.y).abs() * 2.0 + eps < a.height + b.height
    }

    fn assert_tiling(width: f64, height: f64, groups: &[Group]) {
        let area: f64 = groups.iter().map(|g| g.width * g.height).sum();
        assert!(
            (area - width * height).abs() < 1e-6 * width * height,
            "area {area} != {}",
            width * height
        );
        for i in 0..groups.len() {
            for j in (i + 1)..groups.len() {
                assert!(
                    !overlap(&groups[i], &groups[j]),
                    "groups {i} and {j} overlap: {:?} {:?}",
                    groups[i],
                    groups[j]
                );
            }
        }
    }

    #[test]
    fn test_single_group_fills_canvas() {
        let groups = TreemapGrouping::new().call(200.0, 100.0, &[7.0]).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].width, 200.0);
        assert_eq!(groups[0].height, 100.0);
        assert_eq!(groups[0].x, 0.0);
        assert_eq!(groups[0].y, 0.0);
    }

    #[test]
    fn test_classic_example_tiles_exactly() {
        let weights = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let groups = TreemapGrouping::new().call(600.0, 400.0, &weights).unwrap();
        assert_eq!(groups.len(), weights.len());
        assert_tiling(600.0, 400.0, &groups);
    }

    #[test]
    fn test_unsorted_weights_keep_input_order() {
        // Areas must be proportional to the weight at the same input index.
        let weights = [1.0, 10.0, 5.0];
        let groups = TreemapGrouping::new().call(160.0, 100.0, &weights).unwrap();
        let total: f64 = weights.iter().sum();
        for (g, &w) in groups.iter().zip(&weights) {
            let area = g.width * g.height;
            assert!((area - w / total * 16000.0).abs() < 1e-6);
        }
        assert_tiling(160.0, 100.0, &groups);
    }

    #[test]
    fn test_many_equal_weights() {
        let weights = vec![1.0; 17];
        let groups = TreemapGrouping::new().call(500.0, 300.0, &weights).unwrap();
        assert_tiling(500.0, 300.0, &groups);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let grouping = TreemapGrouping::new();
        assert!(matches!(
            grouping.call(0.0, 100.0, &[1.0]),
            Err(LayoutError::InvalidArgument(_))
        ));
        assert!(matches!(
            grouping.call(100.0, 100.0, &[]),
            Err(LayoutError::InvalidArgument(_))
        ));
        assert!(matches!(
            grouping.call(100.0, 100.0, &[1.0, -1.0]),
            Err(LayoutError::InvalidArgument(_))
        ));
    }
}

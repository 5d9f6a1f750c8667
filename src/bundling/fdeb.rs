//! FDEB core: compatibility measure, subdivision schedule and the waypoint
//! relaxation loop.

use std::f64::consts::PI;

use log::debug;

use super::{EdgeBundling, Line, Point};
use crate::graph::GraphStore;

/// A waypoint with the velocity accumulated during one inner iteration.
#[derive(Clone, Copy, Debug, Default)]
struct Waypoint {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

impl Waypoint {
    fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        }
    }
}

/// One edge under bundling: its endpoints and the ids of its interior
/// waypoints (indices into a pool shared by all edges).
struct Segment {
    source: usize,
    target: usize,
    waypoint_ids: Vec<usize>,
}

/// A compatible edge pair. `theta` decides whether waypoints are matched in
/// forward or reverse order.
struct CompatiblePair {
    p: usize,
    q: usize,
    compatibility: f64,
    theta: f64,
}

fn distance(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> f64 {
    let dx = p2x - p1x;
    let dy = p2y - p1y;
    (dx * dx + dy * dy).sqrt().max(1e-6)
}

fn angle(p1: Point, p2: Point, q1: Point, q2: Point) -> f64 {
    let p_norm = distance(p1.x, p1.y, p2.x, p2.y);
    let q_norm = distance(q1.x, q1.y, q2.x, q2.y);
    let pq = (p2.x - p1.x) * (q2.x - q1.x) + (p2.y - p1.y) * (q2.y - q1.y);
    (pq / p_norm / q_norm).clamp(-1.0, 1.0).acos()
}

/// Classic FDEB compatibility: the product of the angle, scale, position and
/// visibility terms, each in [0, 1].
fn compatibility(p1: Point, p2: Point, q1: Point, q2: Point) -> f64 {
    let p_norm = distance(p1.x, p1.y, p2.x, p2.y);
    let q_norm = distance(q1.x, q1.y, q2.x, q2.y);
    let l_avg = (p_norm + q_norm) / 2.0;
    let pmx = (p1.x + p2.x) / 2.0;
    let pmy = (p1.y + p2.y) / 2.0;
    let qmx = (q1.x + q2.x) / 2.0;
    let qmy = (q1.y + q2.y) / 2.0;
    let c_angle = {
        let pq = (p2.x - p1.x) * (q2.x - q1.x) + (p2.y - p1.y) * (q2.y - q1.y);
        (pq / p_norm / q_norm).clamp(-1.0, 1.0).abs()
    };
    let c_scale = 2.0 / (l_avg / p_norm.min(q_norm) + p_norm.max(q_norm) / l_avg);
    let c_position = {
        let mid_dist = distance(pmx, pmy, qmx, qmy);
        l_avg / (l_avg + mid_dist)
    };
    let c_visibility = visibility(p1, p2, q1, q2, p_norm, pmx, pmy)
        .min(visibility(q1, q2, p1, p2, q_norm, qmx, qmy));
    c_angle * c_scale * c_position * c_visibility
}

/// How much of segment q is "visible" when projected onto segment p.
fn visibility(p1: Point, p2: Point, q1: Point, q2: Point, p_norm: f64, pmx: f64, pmy: f64) -> f64 {
    let i0r = ((p1.y - q1.y) * (p1.y - p2.y) - (p1.x - q1.x) * (p2.x - p1.x)) / p_norm / p_norm;
    let i0x = p1.x + i0r * (p2.x - p1.x);
    let i0y = p1.y + i0r * (p2.y - p1.y);
    let i1r = ((p1.y - q2.y) * (p1.y - p2.y) - (p1.x - q2.x) * (p2.x - p1.x)) / p_norm / p_norm;
    let i1x = p1.x + i1r * (p2.x - p1.x);
    let i1y = p1.y + i1r * (p2.y - p1.y);
    let imx = (i0x + i1x) / 2.0;
    let imy = (i0y + i1y) / 2.0;
    (1.0 - 2.0 * distance(pmx, pmy, imx, imy) / distance(i0x, i0y, i1x, i1y)).max(0.0)
}

/// Neighbor springs along each edge: every waypoint is pulled toward its two
/// neighbors (endpoints included), normalized by the waypoint count and the
/// endpoint distance.
fn apply_spring_force(
    waypoints: &mut [Waypoint],
    segments: &[Segment],
    endpoints: &[Point],
    num_p: usize,
    k: f64,
) {
    for segment in segments {
        let d = distance(
            endpoints[segment.source].x,
            endpoints[segment.source].y,
            endpoints[segment.target].x,
            endpoints[segment.target].y,
        );
        let kp = k / num_p as f64 / d;
        let n = segment.waypoint_ids.len();
        for i in 0..n {
            let (p0x, p0y) = if i == 0 {
                let p = endpoints[segment.source];
                (p.x, p.y)
            } else {
                let w = waypoints[segment.waypoint_ids[i - 1]];
                (w.x, w.y)
            };
            let (p2x, p2y) = if i == n - 1 {
                let p = endpoints[segment.target];
                (p.x, p.y)
            } else {
                let w = waypoints[segment.waypoint_ids[i + 1]];
                (w.x, w.y)
            };
            let p1 = &mut waypoints[segment.waypoint_ids[i]];
            p1.vx += kp * (p0x - p1.x + p2x - p1.x);
            p1.vy += kp * (p0y - p1.y + p2y - p1.y);
        }
    }
}

/// Attraction between corresponding waypoints of compatible edge pairs,
/// weighted by the pair's compatibility and the inverse distance.
fn apply_electrostatic_force(
    waypoints: &mut [Waypoint],
    segments: &[Segment],
    pairs: &[CompatiblePair],
    num_p: usize,
) {
    for pair in pairs {
        let segment_p = &segments[pair.p];
        let segment_q = &segments[pair.q];
        for i in 0..num_p {
            let j = if pair.theta < PI / 2.0 {
                i
            } else {
                num_p - i - 1
            };
            let pi = waypoints[segment_p.waypoint_ids[i]];
            let qi = waypoints[segment_q.waypoint_ids[j]];
            let dx = qi.x - pi.x;
            let dy = qi.y - pi.y;
            if dx.abs() > 1e-6 || dy.abs() > 1e-6 {
                let w = pair.compatibility / (dx * dx + dy * dy).sqrt();
                {
                    let qi = &mut waypoints[segment_q.waypoint_ids[j]];
                    qi.vx -= dx * w;
                    qi.vy -= dy * w;
                }
                {
                    let pi = &mut waypoints[segment_p.waypoint_ids[i]];
                    pi.vx += dx * w;
                    pi.vy += dy * w;
                }
            }
        }
    }
}

/// Precompute the compatible pairs among the straight endpoint segments.
fn compatible_pairs(
    segments: &[Segment],
    endpoints: &[Point],
    minimum: f64,
) -> Vec<CompatiblePair> {
    let mut pairs = Vec::new();
    let m = segments.len();
    for p in 0..m {
        let sp = &segments[p];
        for q in (p + 1)..m {
            let sq = &segments[q];
            let c = compatibility(
                endpoints[sp.source],
                endpoints[sp.target],
                endpoints[sq.source],
                endpoints[sq.target],
            );
            if c >= minimum {
                let theta = angle(
                    endpoints[sp.source],
                    endpoints[sp.target],
                    endpoints[sq.source],
                    endpoints[sq.target],
                );
                pairs.push(CompatiblePair {
                    p,
                    q,
                    compatibility: c,
                    theta,
                });
            }
        }
    }
    pairs
}

pub(super) fn bundle(graph: &GraphStore, options: &EdgeBundling) -> Vec<Line> {
    let endpoints: Vec<Point> = graph
        .positions_x()
        .iter()
        .zip(graph.positions_y())
        .map(|(&x, &y)| Point::new(x, y))
        .collect();
    let mut segments: Vec<Segment> = graph
        .edges()
        .map(|(u, v)| Segment {
            source: u,
            target: v,
            waypoint_ids: Vec::new(),
        })
        .collect();
    let mut waypoints: Vec<Waypoint> = Vec::new();

    let pairs = compatible_pairs(&segments, &endpoints, options.minimum_edge_compatibility);
    debug!(
        "bundling {} edges, {} compatible pairs",
        segments.len(),
        pairs.len()
    );

    let mut step = options.s0;
    let mut num_iter = options.i0;
    for cycle in 0..options.cycles {
        // Subdivide: before cycle c every segment has 2^c - 1 waypoints;
        // insert one new midpoint into each gap.
        let dp = 2usize.pow(cycle as u32);
        for segment in segments.iter_mut() {
            for j in 0..dp {
                let p0 = if j == 0 {
                    endpoints[segment.source]
                } else {
                    let w = waypoints[segment.waypoint_ids[j * 2 - 1]];
                    Point::new(w.x, w.y)
                };
                let p1 = if j == dp - 1 {
                    endpoints[segment.target]
                } else {
                    let w = waypoints[segment.waypoint_ids[j * 2]];
                    Point::new(w.x, w.y)
                };
                waypoints.push(Waypoint::new((p0.x + p1.x) / 2.0, (p0.y + p1.y) / 2.0));
                segment.waypoint_ids.insert(j * 2, waypoints.len() - 1);
            }
        }

        let num_p = dp * 2 - 1;
        for _ in 0..num_iter {
            for point in waypoints.iter_mut() {
                point.vx = 0.0;
                point.vy = 0.0;
            }
            apply_spring_force(&mut waypoints, &segments, &endpoints, num_p, 0.1);
            apply_electrostatic_force(&mut waypoints, &segments, &pairs, num_p);
            for point in waypoints.iter_mut() {
                point.x += step * point.vx;
                point.y += step * point.vy;
            }
        }

        step *= options.s_step;
        num_iter = (num_iter as f64 * options.i_step) as usize;
    }

    segments
        .iter()
        .map(|segment| {
            let mut points: Vec<Point> = Vec::with_capacity(segment.waypoint_ids.len() + 2);
            points.push(endpoints[segment.source]);
            points.extend(
                segment
                    .waypoint_ids
                    .iter()
                    .map(|&id| Point::new(waypoints[id].x, waypoints[id].y)),
            );
            points.push(endpoints[segment.target]);
            Line {
                source: segment.source,
                target: segment.target,
                points,
            }
        })
        .collect()
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Collision and collinearity resolution for the geographic layout.
//!
//! Two bounded relaxation loops run over the projected positions:
//! - pairwise separation pushes overlapping nodes apart (circle + label footprint)
//! - collinearity correction nudges the middle node of near-straight or folded consecutive triples
//!
//! A final separation run repairs overlaps introduced by the nudges. Every adjustment is clamped to
//! the surface padding. Non-convergence is reported, not raised: heavily colocated inputs can keep
//! overlapping after the budget is spent.

use rand::rngs::StdRng;
use rand::Rng;

use super::node::NodePosition;
use super::surface::{Point, Surface};
use crate::model::DistanceMatrix;

const EPS: f64 = 1e-9;
/// Shortfall below the required separation that still counts as separated.
const SEPARATION_SLACK: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    pub separation_passes: usize,
    pub collinear_passes: usize,
    /// Pairs closer than this on the ground get extra on-screen spacing.
    pub proximity_km: f64,
    pub proximity_factor: f64,
    /// Extra clearance added to every required separation, in pixels.
    pub label_gap: f64,
    /// Angles below this, or within this of 180°, count as collinear.
    pub min_angle_deg: f64,
    pub min_nudge: f64,
    /// Half-width of the random offset applied to exactly coincident nodes.
    pub jitter: f64,
    pub seed: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            separation_passes: 25,
            collinear_passes: 6,
            proximity_km: 1000.0,
            proximity_factor: 1.6,
            label_gap: 8.0,
            min_angle_deg: 45.0,
            min_nudge: 10.0,
            jitter: 0.5,
            seed: 0x0070_7572,
        }
    }
}

/// Outcome of one resolver run; `*_converged == false` means the pass budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveReport {
    pub separation_passes: usize,
    pub separation_converged: bool,
    pub collinear_passes: usize,
    pub collinear_converged: bool,
    pub settle_passes: usize,
    pub settle_converged: bool,
}

impl ResolveReport {
    pub fn converged(&self) -> bool {
        self.separation_converged && self.collinear_converged && self.settle_converged
    }
}

/// Required centre-to-centre distance between nodes `i` and `j`.
pub fn min_separation(
    nodes: &[NodePosition],
    distances: &DistanceMatrix,
    config: &ResolverConfig,
    i: usize,
    j: usize,
) -> f64 {
    let (a, b) = (&nodes[i], &nodes[j]);
    let base =
        a.node_radius + b.node_radius + a.label_width.max(b.label_width) / 2.0 + config.label_gap;
    if distances.get(i, j) < config.proximity_km {
        base * config.proximity_factor
    } else {
        base
    }
}

pub fn resolve(
    nodes: &mut [NodePosition],
    distances: &DistanceMatrix,
    surface: &Surface,
    config: &ResolverConfig,
    rng: &mut StdRng,
) -> ResolveReport {
    debug_assert_eq!(nodes.len(), distances.size());

    let (separation_passes, separation_converged) =
        separate(nodes, distances, surface, config, rng);
    let (collinear_passes, collinear_converged) = straighten(nodes, distances, surface, config);
    let (settle_passes, settle_converged) = separate(nodes, distances, surface, config, rng);

    let report = ResolveReport {
        separation_passes,
        separation_converged,
        collinear_passes,
        collinear_converged,
        settle_passes,
        settle_converged,
    };
    if report.converged() {
        log::debug!("resolver converged for {} nodes: {report:?}", nodes.len());
    } else {
        log::warn!("resolver budget exhausted for {} nodes: {report:?}", nodes.len());
    }
    report
}

fn separate(
    nodes: &mut [NodePosition],
    distances: &DistanceMatrix,
    surface: &Surface,
    config: &ResolverConfig,
    rng: &mut StdRng,
) -> (usize, bool) {
    for pass in 1..=config.separation_passes {
        if !separation_pass(nodes, distances, surface, config, rng) {
            return (pass, true);
        }
    }
    (config.separation_passes, false)
}

/// One sweep over every pair. Returns `true` while some pair was found closer than required,
/// including pairs the padding keeps from moving apart.
fn separation_pass(
    nodes: &mut [NodePosition],
    distances: &DistanceMatrix,
    surface: &Surface,
    config: &ResolverConfig,
    rng: &mut StdRng,
) -> bool {
    let mut crowded = false;

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let required = min_separation(nodes, distances, config, i, j);
            let a = nodes[i].point();
            let mut b = nodes[j].point();

            let mut dist = a.distance(b);
            if dist >= required - SEPARATION_SLACK {
                continue;
            }
            crowded = true;

            if dist < EPS {
                b = Point::new(
                    b.x + rng.random_range(-config.jitter..=config.jitter),
                    b.y + rng.random_range(-config.jitter..=config.jitter),
                );
                dist = a.distance(b);
            }
            let (ux, uy) = if dist < EPS {
                (1.0, 0.0)
            } else {
                ((b.x - a.x) / dist, (b.y - a.y) / dist)
            };

            let push = (required - dist) / 2.0;
            let next_a = surface.clamp(Point::new(a.x - ux * push, a.y - uy * push));
            let next_b = surface.clamp(Point::new(b.x + ux * push, b.y + uy * push));

            nodes[i].set_point(next_a);
            nodes[j].set_point(next_b);
        }
    }

    crowded
}

fn straighten(
    nodes: &mut [NodePosition],
    distances: &DistanceMatrix,
    surface: &Surface,
    config: &ResolverConfig,
) -> (usize, bool) {
    if nodes.len() < 3 {
        return (0, true);
    }
    for pass in 1..=config.collinear_passes {
        if !collinear_pass(nodes, distances, surface, config) {
            return (pass, true);
        }
    }
    (config.collinear_passes, false)
}

/// Angle at `vertex` between the rays towards `a` and `b`, in degrees.
pub(crate) fn vertex_angle_deg(a: Point, vertex: Point, b: Point) -> Option<f64> {
    let (v1x, v1y) = (a.x - vertex.x, a.y - vertex.y);
    let (v2x, v2y) = (b.x - vertex.x, b.y - vertex.y);
    let len1 = v1x.hypot(v1y);
    let len2 = v2x.hypot(v2y);
    if len1 < EPS || len2 < EPS {
        return None;
    }
    let cos = ((v1x * v2x + v1y * v2y) / (len1 * len2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

fn collinear_pass(
    nodes: &mut [NodePosition],
    distances: &DistanceMatrix,
    surface: &Surface,
    config: &ResolverConfig,
) -> bool {
    let mut corrected = false;

    for j in 1..nodes.len() - 1 {
        let (i, k) = (j - 1, j + 1);
        let (pi, pj, pk) = (nodes[i].point(), nodes[j].point(), nodes[k].point());

        let Some(angle) = vertex_angle_deg(pi, pj, pk) else {
            continue;
        };
        if angle >= config.min_angle_deg && angle <= 180.0 - config.min_angle_deg {
            continue;
        }

        let len = pi.distance(pj);
        let (dx, dy) = ((pj.x - pi.x) / len, (pj.y - pi.y) / len);
        let sign = if j % 2 == 0 { 1.0 } else { -1.0 };

        let sizes = (nodes[i].node_radius + nodes[j].node_radius + nodes[k].node_radius) / 2.0;
        let mut nudge = sizes.max(config.min_nudge);
        if distances.get(i, j) < config.proximity_km || distances.get(j, k) < config.proximity_km {
            nudge *= config.proximity_factor;
        }

        let next = surface.clamp(Point::new(pj.x - dy * sign * nudge, pj.y + dx * sign * nudge));
        if next != pj {
            nodes[j].set_point(next);
            corrected = true;
        }
    }

    corrected
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{
        min_separation, resolve, straighten, vertex_angle_deg, ResolveReport, ResolverConfig,
    };
    use crate::layout::metrics::{estimate_nodes, HeuristicMetrics};
    use crate::layout::node::NodePosition;
    use crate::layout::projector::{project, ProjectorConfig};
    use crate::layout::surface::{Point, Surface};
    use crate::model::{Route, Waypoint};

    const TOLERANCE: f64 = 1e-6;

    fn run(route: &Route, surface: &Surface) -> (Vec<NodePosition>, ResolveReport) {
        let config = ResolverConfig::default();
        let points = project(route.waypoints(), surface, &ProjectorConfig::default());
        let mut nodes = estimate_nodes(route.waypoints(), &points, &HeuristicMetrics);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let report = resolve(&mut nodes, &route.distance_matrix(), surface, &config, &mut rng);
        (nodes, report)
    }

    fn capitals() -> Route {
        Route::new(vec![
            Waypoint::new(48.8566, 2.3522, "Paris"),
            Waypoint::new(50.8503, 4.3517, "Brussels"),
            Waypoint::new(52.3676, 4.9041, "Amsterdam"),
            Waypoint::new(52.5200, 13.4050, "Berlin"),
            Waypoint::new(48.2082, 16.3738, "Vienna"),
            Waypoint::new(47.4979, 19.0402, "Budapest"),
        ])
        .expect("route")
    }

    #[test]
    fn abc_nodes_stay_apart_and_in_bounds() {
        let route = Route::new(vec![
            Waypoint::new(0.0, 0.0, "A"),
            Waypoint::new(0.0, 10.0, "B"),
            Waypoint::new(10.0, 10.0, "C"),
        ])
        .expect("route");
        let surface = Surface::default();
        let (nodes, report) = run(&route, &surface);

        assert!(report.converged(), "{report:?}");
        for (i, a) in nodes.iter().enumerate() {
            assert!(surface.contains(a.point()));
            for b in &nodes[i + 1..] {
                assert!(a.point().distance(b.point()) >= a.node_radius() + b.node_radius());
            }
        }
    }

    #[test]
    fn separation_invariant_holds_for_a_regional_route() {
        let route = capitals();
        let surface = Surface::default();
        let (nodes, report) = run(&route, &surface);
        assert!(report.settle_converged, "{report:?}");

        let distances = route.distance_matrix();
        let config = ResolverConfig::default();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let required = min_separation(&nodes, &distances, &config, i, j);
                let actual = nodes[i].point().distance(nodes[j].point());
                assert!(actual >= required - TOLERANCE, "{i}-{j}: {actual} < {required}");
            }
        }
    }

    #[test]
    fn close_pairs_need_more_room() {
        let route = capitals();
        let points = project(route.waypoints(), &Surface::default(), &ProjectorConfig::default());
        let nodes = estimate_nodes(route.waypoints(), &points, &HeuristicMetrics);
        let distances = route.distance_matrix();
        let config = ResolverConfig::default();

        // Paris–Brussels is ~264 km, Paris–Budapest ~1245 km.
        let near = min_separation(&nodes, &distances, &config, 0, 1);
        let base = nodes[0].node_radius()
            + nodes[1].node_radius()
            + nodes[0].label_width().max(nodes[1].label_width()) / 2.0
            + config.label_gap;
        assert!((near - base * config.proximity_factor).abs() < 1e-9);

        let far = min_separation(&nodes, &distances, &config, 0, 5);
        let base = nodes[0].node_radius()
            + nodes[5].node_radius()
            + nodes[0].label_width().max(nodes[5].label_width()) / 2.0
            + config.label_gap;
        assert!((far - base).abs() < 1e-9);
    }

    #[test]
    fn straight_route_is_bent_at_the_middle() {
        let route = Route::new(vec![
            Waypoint::new(0.0, 0.0, "W"),
            Waypoint::new(0.0, 20.0, "M"),
            Waypoint::new(0.0, 40.0, "E"),
        ])
        .expect("route");
        let (nodes, report) = run(&route, &Surface::default());

        let angle = vertex_angle_deg(nodes[0].point(), nodes[1].point(), nodes[2].point())
            .expect("angle");
        assert!(report.collinear_converged, "{report:?}");
        assert!(angle <= 135.0 + TOLERANCE, "angle {angle}");
    }

    #[test]
    fn folded_back_route_is_opened_at_the_vertex() {
        // Every leg is over 1000 km, so the nudge is never scaled up.
        let route = Route::new(vec![
            Waypoint::new(0.0, 0.0, "S"),
            Waypoint::new(0.0, 20.0, "T"),
            Waypoint::new(0.0, 10.0, "U"),
        ])
        .expect("route");
        let surface = Surface::default();
        let config = ResolverConfig::default();
        let points = [Point::new(100.0, 300.0), Point::new(700.0, 300.0), Point::new(640.0, 300.0)];
        let mut nodes = estimate_nodes(route.waypoints(), &points, &HeuristicMetrics);
        assert_eq!(vertex_angle_deg(points[0], points[1], points[2]), Some(0.0));

        let (passes, converged) = straighten(&mut nodes, &route.distance_matrix(), &surface, &config);

        let after = vertex_angle_deg(nodes[0].point(), nodes[1].point(), nodes[2].point())
            .expect("angle");
        assert!(converged, "stopped after {passes} passes");
        assert!(after >= config.min_angle_deg, "angle {after}");
        assert_eq!(nodes[0].point(), points[0]);
        assert_eq!(nodes[2].point(), points[2]);
        assert_eq!(nodes[1].x(), 700.0);
        assert!(nodes[1].y() < 300.0, "odd vertices are pushed the negative way");
    }

    #[test]
    fn blocked_separation_is_not_reported_as_converged() {
        let route = Route::new(vec![
            Waypoint::new(0.0, 0.0, "Lisbon"),
            Waypoint::new(0.0, 1.0, "Porto"),
        ])
        .expect("route");
        // 20x20 px inside the padding; two full-size nodes cannot fit apart.
        let surface = Surface::new(100.0, 100.0, 40.0).expect("surface");
        let (nodes, report) = run(&route, &surface);

        assert!(!report.separation_converged, "{report:?}");
        assert!(!report.converged());
        assert_eq!(report.separation_passes, ResolverConfig::default().separation_passes);
        assert!(nodes.iter().all(|n| surface.contains(n.point())));
    }

    #[test]
    fn colocated_points_terminate_inside_the_surface() {
        let waypoints = (0..60).map(|_| Waypoint::new(41.9, 12.5, "Rome")).collect::<Vec<_>>();
        let route = Route::new(waypoints).expect("route");
        let surface = Surface::default();
        let (nodes, report) = run(&route, &surface);

        let config = ResolverConfig::default();
        assert!(report.separation_passes <= config.separation_passes);
        assert!(report.collinear_passes <= config.collinear_passes);
        assert!(report.settle_passes <= config.separation_passes);
        assert_eq!(nodes.len(), 60);
        assert!(nodes.iter().all(|n| surface.contains(n.point())));
    }

    #[test]
    fn same_seed_same_layout() {
        let waypoints = (0..8).map(|_| Waypoint::new(1.0, 1.0, "")).collect::<Vec<_>>();
        let route = Route::new(waypoints).expect("route");
        let (a, _) = run(&route, &Surface::default());
        let (b, _) = run(&route, &Surface::default());
        assert_eq!(a, b);
    }

    #[test]
    fn vertex_angle_covers_right_straight_and_degenerate() {
        let o = Point::new(0.0, 0.0);
        let angle = vertex_angle_deg(Point::new(1.0, 0.0), o, Point::new(0.0, 1.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
        let angle = vertex_angle_deg(Point::new(-1.0, 0.0), o, Point::new(1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
        assert_eq!(vertex_angle_deg(o, o, Point::new(1.0, 0.0)), None);
    }
}

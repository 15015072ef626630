// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{format_km, RenderMode};
use crate::layout::{LabelSide, LayoutState, NodePosition, Point};
use crate::model::Route;
use crate::playback::PlaybackController;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    pub render_mode: String,
    pub layout_mode: String,
    pub width: f64,
    pub height: f64,
    pub pad: f64,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub marker: Option<ScenePoint>,
    pub total_km: f64,
    pub reported_total_km: Option<f64>,
    /// Kilometres traveled so far; absent for the static view.
    pub traveled_km: Option<f64>,
    pub playback: Option<ScenePlayback>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneNode {
    pub index: usize,
    /// 1-based number drawn inside the circle.
    pub number: usize,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub font_size: f64,
    pub label_x: f64,
    pub label_y: f64,
    pub label_width: f64,
    pub label_height: f64,
    pub label_above: bool,
    pub visited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneEdge {
    pub from: usize,
    pub to: usize,
    pub start: ScenePoint,
    /// Drawn end of the line; short of the next node while the leg is in flight.
    pub end: ScenePoint,
    pub distance_km: f64,
    pub shown_km: f64,
    pub label: String,
    pub label_at: ScenePoint,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for ScenePoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenePlayback {
    pub phase: String,
    pub current_index: usize,
    pub speed_multiplier: f64,
    pub progress: f64,
    pub is_uniform_layout_active: bool,
}

pub fn build_scene(
    route: &Route,
    layout: &LayoutState,
    playback: &PlaybackController,
    mode: RenderMode,
) -> Scene {
    match mode {
        RenderMode::Progressive => progressive_scene(route, layout, playback),
        RenderMode::Static => static_scene(route, layout),
    }
}

/// Only the revealed prefix of the route, the completed legs, the leg in flight and the marker.
pub fn progressive_scene(
    route: &Route,
    layout: &LayoutState,
    playback: &PlaybackController,
) -> Scene {
    let current = playback.current_index();
    let nodes = layout
        .nodes()
        .iter()
        .enumerate()
        .take(playback.revealed())
        .map(|(index, node)| scene_node(index, node, index <= current))
        .collect();

    let mut edges = Vec::new();
    for edge in route.edges().iter().take(current) {
        if let Some(scene_edge) = full_edge(layout, edge.from(), edge.distance_km()) {
            edges.push(scene_edge);
        }
    }
    let marker = playback.marker_position(layout);
    if let (Some(from), Some(end)) = (playback.active_segment(), marker) {
        if let (Some(edge), Some(start)) = (route.edge(from), layout.point(from)) {
            let shown_km = edge.distance_km() * playback.progress();
            edges.push(SceneEdge {
                from,
                to: edge.to(),
                start: start.into(),
                end: end.into(),
                distance_km: edge.distance_km(),
                shown_km,
                label: format_km(shown_km),
                label_at: start.lerp(end, 0.5).into(),
                complete: false,
            });
        }
    }

    let state = playback.state(layout);
    Scene {
        render_mode: RenderMode::Progressive.as_str().to_owned(),
        playback: Some(ScenePlayback {
            phase: playback.phase().as_str().to_owned(),
            current_index: state.current_index,
            speed_multiplier: state.speed_multiplier,
            progress: playback.progress(),
            is_uniform_layout_active: state.is_uniform_layout_active,
        }),
        traveled_km: Some(playback.traveled_km(route)),
        marker: marker.map(ScenePoint::from),
        nodes,
        edges,
        ..frame(route, layout)
    }
}

/// Every node and leg at once, without a marker.
pub fn static_scene(route: &Route, layout: &LayoutState) -> Scene {
    let nodes =
        layout.nodes().iter().enumerate().map(|(index, node)| scene_node(index, node, false)).collect();
    let edges = route
        .edges()
        .iter()
        .filter_map(|edge| full_edge(layout, edge.from(), edge.distance_km()))
        .collect();
    Scene { nodes, edges, ..frame(route, layout) }
}

fn frame(route: &Route, layout: &LayoutState) -> Scene {
    let surface = layout.surface();
    Scene {
        render_mode: RenderMode::Static.as_str().to_owned(),
        layout_mode: layout.mode().as_str().to_owned(),
        width: surface.width(),
        height: surface.height(),
        pad: surface.pad(),
        nodes: Vec::new(),
        edges: Vec::new(),
        marker: None,
        total_km: route.total_km(),
        reported_total_km: route.reported_total_km(),
        traveled_km: None,
        playback: None,
    }
}

fn scene_node(index: usize, node: &NodePosition, visited: bool) -> SceneNode {
    SceneNode {
        index,
        number: index + 1,
        label: node.label().to_string(),
        x: node.x(),
        y: node.y(),
        radius: node.node_radius(),
        font_size: node.font_size(),
        label_x: node.label_x(),
        label_y: node.y() + node.label_offset_y(),
        label_width: node.label_width(),
        label_height: node.label_height(),
        label_above: node.label_side() == LabelSide::Above,
        visited,
    }
}

fn full_edge(layout: &LayoutState, from: usize, distance_km: f64) -> Option<SceneEdge> {
    let start = layout.point(from)?;
    let end = layout.point(from + 1)?;
    Some(SceneEdge {
        from,
        to: from + 1,
        start: start.into(),
        end: end.into(),
        distance_km,
        shown_km: distance_km,
        label: format_km(distance_km),
        label_at: start.lerp(end, 0.5).into(),
        complete: true,
    })
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{build_scene, Scene};
    use crate::layout::{HeuristicMetrics, LayoutMode, LayoutOptions, LayoutState, Surface};
    use crate::model::{Route, Waypoint};
    use crate::playback::PlaybackController;
    use crate::render::{scene_schema, RenderMode};

    #[fixture]
    fn abc() -> (Route, LayoutState) {
        let route = Route::new(vec![
            Waypoint::new(0.0, 0.0, "A"),
            Waypoint::new(0.0, 10.0, "B"),
            Waypoint::new(10.0, 10.0, "C"),
        ])
        .expect("route");
        let layout = LayoutState::compute(
            &route,
            Surface::default(),
            LayoutMode::Geographic,
            LayoutOptions::default(),
            &HeuristicMetrics,
        );
        (route, layout)
    }

    fn progressive(route: &Route, layout: &LayoutState, playback: &PlaybackController) -> Scene {
        build_scene(route, layout, playback, RenderMode::Progressive)
    }

    #[rstest]
    fn idle_scene_shows_only_the_start(abc: (Route, LayoutState)) {
        let (route, layout) = abc;
        let playback = PlaybackController::new(&route);
        let scene = progressive(&route, &layout, &playback);

        assert_eq!(scene.nodes.len(), 1);
        assert!(scene.edges.is_empty());
        assert_eq!(scene.nodes[0].label, "A");
        assert_eq!(scene.nodes[0].number, 1);
        let marker = scene.marker.expect("marker");
        assert_eq!((marker.x, marker.y), (layout.nodes()[0].x(), layout.nodes()[0].y()));
        assert_eq!(scene.traveled_km, Some(0.0));
    }

    #[rstest]
    fn leg_in_flight_shows_partial_distance(abc: (Route, LayoutState)) {
        let (route, layout) = abc;
        let mut playback = PlaybackController::new(&route);
        playback.play();
        playback.advance(200.0, &layout);

        let scene = progressive(&route, &layout, &playback);
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.edges.len(), 1);

        let edge = &scene.edges[0];
        assert!(!edge.complete);
        assert!(edge.shown_km > 0.0 && edge.shown_km < edge.distance_km);
        assert!((edge.shown_km - edge.distance_km * playback.progress()).abs() < 1e-9);
        assert_eq!(Some(edge.end), scene.marker);
    }

    #[rstest]
    fn finished_scene_labels_both_legs(abc: (Route, LayoutState)) {
        let (route, layout) = abc;
        let mut playback = PlaybackController::new(&route);
        playback.play();
        playback.advance(60_000.0, &layout);

        let scene = progressive(&route, &layout, &playback);
        assert_eq!(scene.nodes.len(), 3);
        assert!(scene.nodes.iter().all(|n| n.visited));
        let labels = scene.edges.iter().map(|e| e.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["1111.9 km", "1111.9 km"]);
        assert!(scene.edges.iter().all(|e| e.complete));
        assert_eq!(scene.playback.expect("playback").phase, "finished");
    }

    #[rstest]
    fn static_scene_draws_everything_without_marker(abc: (Route, LayoutState)) {
        let (route, layout) = abc;
        let playback = PlaybackController::new(&route);
        let scene = build_scene(&route, &layout, &playback, RenderMode::Static);

        assert_eq!(scene.render_mode, "static");
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.edges.len(), 2);
        assert!(scene.marker.is_none());
        assert!(scene.playback.is_none());
        assert!(scene.traveled_km.is_none());
    }

    #[rstest]
    fn scene_serializes_and_has_a_schema(abc: (Route, LayoutState)) {
        let (route, layout) = abc;
        let playback = PlaybackController::new(&route);
        let scene = progressive(&route, &layout, &playback);

        let json = serde_json::to_value(&scene).expect("json");
        assert_eq!(json["layout_mode"], "geographic");
        assert_eq!(json["nodes"][0]["label"], "A");
        let back: Scene = serde_json::from_value(json).expect("decode");
        assert_eq!(back.nodes.len(), scene.nodes.len());
        assert_eq!(back.marker.is_some(), scene.marker.is_some());

        let schema = serde_json::to_value(scene_schema()).expect("schema json");
        assert!(schema["properties"]["nodes"].is_object());
        assert!(schema["properties"]["marker"].is_object());
    }
}

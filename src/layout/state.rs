// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::metrics::{estimate_nodes, place_labels, TextMetrics};
use super::node::NodePosition;
use super::projector::{project, ProjectorConfig};
use super::resolver::{resolve, ResolveReport, ResolverConfig};
use super::surface::{Point, Surface};
use super::uniform::{simulate, UniformConfig, UniformReport};
use crate::model::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    #[default]
    Geographic,
    Uniform,
}

impl LayoutMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Geographic => Self::Uniform,
            Self::Uniform => Self::Geographic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Geographic => "geographic",
            Self::Uniform => "uniform",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOptions {
    pub projector: ProjectorConfig,
    pub resolver: ResolverConfig,
    pub uniform: UniformConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutReport {
    Geographic(ResolveReport),
    Uniform(UniformReport),
}

/// How a recompute was triggered. A fresh load settles uniform layouts at the shorter initial
/// link distance; a mode toggle uses the regular one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Load,
    Toggle,
}

/// The single owner of every node position for one route.
///
/// Positions are always recomputed wholesale: a mode change or a resize throws the old nodes
/// away and rebuilds them from the route.
#[derive(Debug, Clone)]
pub struct LayoutState {
    mode: LayoutMode,
    surface: Surface,
    options: LayoutOptions,
    nodes: Vec<NodePosition>,
    report: LayoutReport,
    revision: u64,
}

impl LayoutState {
    pub fn compute(
        route: &Route,
        surface: Surface,
        mode: LayoutMode,
        options: LayoutOptions,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let (nodes, report) = build(route, &surface, mode, &options, metrics, Trigger::Load);
        Self { mode, surface, options, nodes, report, revision: 0 }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn is_uniform(&self) -> bool {
        self.mode == LayoutMode::Uniform
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn nodes(&self) -> &[NodePosition] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&NodePosition> {
        self.nodes.get(index)
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.nodes.get(index).map(NodePosition::point)
    }

    pub fn report(&self) -> &LayoutReport {
        &self.report
    }

    /// Bumped on every recompute or drag; consumers use it to notice stale caches.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Pixel length of the leg starting at `from` in the current layout.
    pub fn edge_pixels(&self, from: usize) -> Option<f64> {
        let a = self.point(from)?;
        let b = self.point(from + 1)?;
        Some(a.distance(b))
    }

    /// Switches mode and recomputes. Returns `false` when `mode` is already active.
    pub fn set_mode(&mut self, route: &Route, mode: LayoutMode, metrics: &dyn TextMetrics) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.recompute(route, metrics, Trigger::Toggle);
        true
    }

    pub fn toggle_mode(&mut self, route: &Route, metrics: &dyn TextMetrics) -> LayoutMode {
        let next = self.mode.toggled();
        self.set_mode(route, next, metrics);
        next
    }

    /// Adopts a new surface and rebuilds the layout as on a fresh load.
    pub fn resize(&mut self, route: &Route, surface: Surface, metrics: &dyn TextMetrics) {
        self.surface = surface;
        self.recompute(route, metrics, Trigger::Load);
    }

    /// Moves one node, clamped to the drawable interior. Returns `false` for an unknown index
    /// or a non-finite target.
    pub fn drag_node(&mut self, index: usize, target: Point) -> bool {
        if !target.x.is_finite() || !target.y.is_finite() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        node.set_point(self.surface.clamp(target));
        place_labels(&mut self.nodes[index..=index], &self.surface);
        self.revision += 1;
        true
    }

    fn recompute(&mut self, route: &Route, metrics: &dyn TextMetrics, trigger: Trigger) {
        let (nodes, report) =
            build(route, &self.surface, self.mode, &self.options, metrics, trigger);
        self.nodes = nodes;
        self.report = report;
        self.revision += 1;
    }
}

fn build(
    route: &Route,
    surface: &Surface,
    mode: LayoutMode,
    options: &LayoutOptions,
    metrics: &dyn TextMetrics,
    trigger: Trigger,
) -> (Vec<NodePosition>, LayoutReport) {
    let points = project(route.waypoints(), surface, &options.projector);
    let mut nodes = estimate_nodes(route.waypoints(), &points, metrics);
    let mut rng = StdRng::seed_from_u64(options.resolver.seed);

    let report = match mode {
        LayoutMode::Geographic => {
            let distances = route.distance_matrix();
            LayoutReport::Geographic(resolve(
                &mut nodes,
                &distances,
                surface,
                &options.resolver,
                &mut rng,
            ))
        }
        LayoutMode::Uniform => {
            let distance = match trigger {
                Trigger::Load => options.uniform.initial_link_distance,
                Trigger::Toggle => options.uniform.link_distance,
            };
            LayoutReport::Uniform(simulate(&mut nodes, surface, &options.uniform, distance, &mut rng))
        }
    };
    place_labels(&mut nodes, surface);

    log::info!(
        "computed {} layout for {} nodes on {}x{} (pad {}): {report:?}",
        mode.as_str(),
        nodes.len(),
        surface.width(),
        surface.height(),
        surface.pad()
    );
    (nodes, report)
}

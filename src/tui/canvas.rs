// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mapping between terminal cells and layout pixels, and the route canvas widget.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::Block;

use super::theme::TuiTheme;
use crate::layout::{CellMetrics, LayoutState, Point, Surface, SurfaceError};
use crate::render::Scene;

/// Nominal size of one terminal cell in layout pixels.
pub(crate) const CELL_WIDTH_PX: f64 = 8.0;
pub(crate) const CELL_HEIGHT_PX: f64 = 16.0;

const MARKER_RADIUS_PX: f64 = 6.0;

pub(crate) fn cell_metrics() -> CellMetrics {
    CellMetrics { cell_width: CELL_WIDTH_PX, cell_height: CELL_HEIGHT_PX }
}

pub(crate) fn surface_for(area: Rect, pad: f64) -> Result<Surface, SurfaceError> {
    let width = f64::from(area.width) * CELL_WIDTH_PX;
    let height = f64::from(area.height) * CELL_HEIGHT_PX;
    Surface::new(width, height, pad)
}

/// Centre of the cell at `(column, row)` in layout pixels, if the cell lies inside `area`.
pub(crate) fn cell_to_point(area: Rect, column: u16, row: u16) -> Option<Point> {
    let inside = column >= area.x
        && row >= area.y
        && column < area.x.saturating_add(area.width)
        && row < area.y.saturating_add(area.height);
    if !inside {
        return None;
    }
    Some(Point::new(
        (f64::from(column - area.x) + 0.5) * CELL_WIDTH_PX,
        (f64::from(row - area.y) + 0.5) * CELL_HEIGHT_PX,
    ))
}

/// Closest node whose circle (grown by one cell) contains `point`.
pub(crate) fn hit_test(layout: &LayoutState, point: Point) -> Option<usize> {
    layout
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| (index, node.point().distance(point), node.node_radius()))
        .filter(|(_, distance, radius)| *distance <= radius + CELL_HEIGHT_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _, _)| index)
}

pub(crate) fn route_canvas<'a>(
    scene: &'a Scene,
    theme: &'a TuiTheme,
    block: Block<'a>,
) -> Canvas<'a, impl Fn(&mut Context<'_>) + 'a> {
    let height = scene.height;
    let flip = move |y: f64| height - y;

    Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(theme.base_style().bg.unwrap_or_default())
        .x_bounds([0.0, scene.width])
        .y_bounds([0.0, scene.height])
        .paint(move |ctx| {
            for edge in &scene.edges {
                ctx.draw(&CanvasLine {
                    x1: edge.start.x,
                    y1: flip(edge.start.y),
                    x2: edge.end.x,
                    y2: flip(edge.end.y),
                    color: theme.edge_color(edge.complete),
                });
            }
            for node in &scene.nodes {
                ctx.draw(&Circle {
                    x: node.x,
                    y: flip(node.y),
                    radius: node.radius,
                    color: theme.node_color(node.visited),
                });
            }
            if let Some(marker) = scene.marker {
                ctx.draw(&Circle {
                    x: marker.x,
                    y: flip(marker.y),
                    radius: MARKER_RADIUS_PX,
                    color: theme.marker_color(),
                });
            }

            ctx.layer();
            for edge in &scene.edges {
                print_centered(
                    ctx,
                    edge.label_at.x,
                    flip(edge.label_at.y),
                    &edge.label,
                    theme.distance_style(edge.complete),
                );
            }
            for node in &scene.nodes {
                print_centered(
                    ctx,
                    node.x,
                    flip(node.y),
                    &node.number.to_string(),
                    theme.number_style(node.visited),
                );
                print_centered(
                    ctx,
                    node.label_x,
                    flip(node.label_y),
                    &node.label,
                    theme.label_style(),
                );
            }
            if let Some(marker) = scene.marker {
                let style = theme.base_style().fg(theme.marker_color());
                ctx.print(marker.x, flip(marker.y), Span::styled("●", style));
            }
        })
}

fn print_centered(ctx: &mut Context<'_>, x: f64, y: f64, text: &str, style: Style) {
    let half = crate::layout::metrics::char_count(text) as f64 * CELL_WIDTH_PX / 2.0;
    ctx.print(x - half, y, Span::styled(text.to_owned(), style));
}

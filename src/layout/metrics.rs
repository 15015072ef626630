// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Label text, glyph sizing and label footprint measurement.
//!
//! Measurement goes through the [`TextMetrics`] capability so front-ends can plug in real text
//! shaping. When a backend cannot measure a string the character-count heuristic is used instead.

use smol_str::SmolStr;

use super::node::{LabelSide, NodePosition};
use super::surface::{Point, Surface};
use crate::model::Waypoint;

pub const MAX_LABEL_CHARS: usize = 60;

const CHAR_WIDTH_EM: f64 = 0.6;
const LINE_HEIGHT_EM: f64 = 1.2;
const LABEL_GAP: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

pub trait TextMetrics {
    /// Rendered footprint of `text` at `font_size`, or `None` when the backend cannot tell.
    fn measure(&self, text: &str, font_size: f64) -> Option<TextExtent>;
}

/// Proportional-font estimate from the character count.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMetrics;

impl TextMetrics for HeuristicMetrics {
    fn measure(&self, text: &str, font_size: f64) -> Option<TextExtent> {
        Some(heuristic_extent(text, font_size))
    }
}

/// Monospaced grid where every character occupies one fixed-size cell, as in a terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl TextMetrics for CellMetrics {
    fn measure(&self, text: &str, _font_size: f64) -> Option<TextExtent> {
        if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return None;
        }
        Some(TextExtent { width: char_count(text) as f64 * self.cell_width, height: self.cell_height })
    }
}

pub fn heuristic_extent(text: &str, font_size: f64) -> TextExtent {
    TextExtent {
        width: char_count(text) as f64 * font_size * CHAR_WIDTH_EM,
        height: font_size * LINE_HEIGHT_EM,
    }
}

/// Circle radius for a route of `count` nodes; dense routes get smaller glyphs.
pub fn node_radius_for(count: usize) -> f64 {
    let count = count.max(1) as f64;
    ((600.0 / count).round() + 6.0).clamp(8.0, 24.0)
}

pub fn font_size_for(radius: f64) -> f64 {
    (radius * 0.9).round().clamp(10.0, 20.0)
}

/// Display label: the trimmed name, or the 1-based index for unnamed stops.
pub fn display_label(index: usize, name: &str) -> SmolStr {
    let name = name.trim();
    if name.is_empty() {
        return SmolStr::new((index + 1).to_string());
    }
    truncate_label(name, MAX_LABEL_CHARS)
}

/// Character count; one terminal cell per character for the labels drawn here.
pub(crate) fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Keeps at most `max_chars` characters, ending in `…` when anything was cut.
fn truncate_label(name: &str, max_chars: usize) -> SmolStr {
    let mut chars = name.chars();
    let head = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_none() {
        return SmolStr::new(head);
    }
    let mut kept = head.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    kept.push('…');
    SmolStr::new(kept)
}

fn measure_or_estimate(metrics: &dyn TextMetrics, text: &str, font_size: f64) -> TextExtent {
    match metrics.measure(text, font_size) {
        Some(extent) if extent.width.is_finite() && extent.height.is_finite() => extent,
        _ => {
            log::warn!("text measurement unavailable for {text:?}; using character estimate");
            heuristic_extent(text, font_size)
        }
    }
}

/// Builds one [`NodePosition`] per waypoint at the given initial positions.
///
/// Label placement is a separate step ([`place_labels`]) because it depends on where the active
/// layout finally puts each node.
pub fn estimate_nodes(
    waypoints: &[Waypoint],
    positions: &[Point],
    metrics: &dyn TextMetrics,
) -> Vec<NodePosition> {
    let node_radius = node_radius_for(waypoints.len());
    let font_size = font_size_for(node_radius);

    waypoints
        .iter()
        .zip(positions)
        .enumerate()
        .map(|(index, (waypoint, point))| {
            let label = display_label(index, waypoint.name());
            let extent = measure_or_estimate(metrics, &label, font_size);
            NodePosition {
                x: point.x,
                y: point.y,
                label,
                font_size,
                node_radius,
                label_width: extent.width,
                label_height: extent.height,
                label_offset_y: 0.0,
                label_x: point.x,
                label_side: LabelSide::Below,
            }
        })
        .collect()
}

/// Chooses above/below and clamps the horizontal label centre so labels stay inside the padding.
pub fn place_labels(nodes: &mut [NodePosition], surface: &Surface) {
    for node in nodes {
        let reach = node.node_radius + LABEL_GAP + node.label_height / 2.0;
        if node.y + reach + node.label_height / 2.0 > surface.max_y() {
            node.label_side = LabelSide::Above;
            node.label_offset_y = -reach;
        } else {
            node.label_side = LabelSide::Below;
            node.label_offset_y = reach;
        }

        let half = node.label_width / 2.0;
        let (lo, hi) = (surface.min_x() + half, surface.max_x() - half);
        node.label_x = if lo <= hi { node.x.clamp(lo, hi) } else { surface.center().x };
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::surface::Point;

/// Where a node's name label sits relative to its circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelSide {
    #[default]
    Below,
    Above,
}

/// On-screen placement of one waypoint, keyed by its route index.
///
/// Created by the projector and label estimator, then mutated in place by whichever layout
/// algorithm is active. All coordinates are in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) label: SmolStr,
    pub(crate) font_size: f64,
    pub(crate) node_radius: f64,
    pub(crate) label_width: f64,
    pub(crate) label_height: f64,
    pub(crate) label_offset_y: f64,
    pub(crate) label_x: f64,
    pub(crate) label_side: LabelSide,
}

impl NodePosition {
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub(crate) fn set_point(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    pub fn label(&self) -> &SmolStr {
        &self.label
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn node_radius(&self) -> f64 {
        self.node_radius
    }

    pub fn label_width(&self) -> f64 {
        self.label_width
    }

    pub fn label_height(&self) -> f64 {
        self.label_height
    }

    /// Vertical offset from the node centre to the label's centre line.
    pub fn label_offset_y(&self) -> f64 {
        self.label_offset_y
    }

    /// Horizontal centre of the label after clamping to the padding.
    pub fn label_x(&self) -> f64 {
        self.label_x
    }

    pub fn label_side(&self) -> LabelSide {
        self.label_side
    }

    /// Radius used by collision checks: the circle plus half the label footprint.
    pub fn collision_radius(&self) -> f64 {
        self.node_radius + self.label_width / 2.0
    }
}

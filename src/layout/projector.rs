// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Geographic projection onto the drawing surface.
//!
//! Offsets from the bounding-box centre are compressed with a power law before linear scaling so a
//! route spanning continents does not flatten its dense clusters. The mapping is monotonic per axis
//! but deliberately not distance preserving.

use super::surface::{Point, Surface};
use crate::model::Waypoint;

const DEGENERATE_SPAN: f64 = 1e-6;
const DEGENERATE_EXPAND: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectorConfig {
    /// Exponent applied to `|offset|`; values below 1 compress long spans.
    pub compression: f64,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self { compression: 0.6 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let extent = Self { min, max };
        if extent.span() < DEGENERATE_SPAN {
            Self { min: min - DEGENERATE_EXPAND, max: max + DEGENERATE_EXPAND }
        } else {
            extent
        }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }

    fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// `domain -> range` linear interpolation; the range may be inverted.
#[derive(Debug, Clone, Copy)]
struct LinearScale {
    domain: Extent,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    fn apply(&self, v: f64) -> f64 {
        let t = (v - self.domain.min) / self.domain.span();
        self.r0 + (self.r1 - self.r0) * t
    }
}

fn compress(value: f64, center: f64, k: f64) -> f64 {
    let delta = value - center;
    delta.signum() * delta.abs().powf(k) + center
}

/// Projects waypoints to surface positions, index-aligned with the input.
pub fn project(waypoints: &[Waypoint], surface: &Surface, config: &ProjectorConfig) -> Vec<Point> {
    if waypoints.is_empty() {
        return Vec::new();
    }

    let k = config.compression;
    let lng_center = Extent::of(waypoints.iter().map(Waypoint::longitude)).center();
    let lat_center = Extent::of(waypoints.iter().map(Waypoint::latitude)).center();

    let compressed = waypoints
        .iter()
        .map(|w| (compress(w.longitude(), lng_center, k), compress(w.latitude(), lat_center, k)))
        .collect::<Vec<_>>();

    let x_scale = LinearScale {
        domain: Extent::of(compressed.iter().map(|(lng, _)| *lng)),
        r0: surface.min_x(),
        r1: surface.max_x(),
    };
    // North is up: larger latitudes map to smaller y.
    let y_scale = LinearScale {
        domain: Extent::of(compressed.iter().map(|(_, lat)| *lat)),
        r0: surface.max_y(),
        r1: surface.min_y(),
    };

    compressed
        .into_iter()
        .map(|(lng, lat)| Point::new(x_scale.apply(lng), y_scale.apply(lat)))
        .collect()
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use tourline::model::{Route, Waypoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// A short city tour.
    Small,
    /// A regional tour with mixed leg lengths.
    Medium,
    /// Many stops packed into a few kilometres; stresses the resolver.
    DenseCluster,
    /// A long continental route.
    Continental,
}

impl Case {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::DenseCluster => "dense_cluster",
            Self::Continental => "continental",
        }
    }

    pub const fn all() -> [Case; 4] {
        [Self::Small, Self::Medium, Self::DenseCluster, Self::Continental]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourParams {
    pub stops: usize,
    pub origin: (f64, f64),
    /// Angular extent in degrees of the spiral the stops are placed on.
    pub spread_deg: f64,
    pub name_len: usize,
}

pub fn fixture(case: Case) -> Route {
    match case {
        Case::Small => {
            tour(TourParams { stops: 8, origin: (48.85, 2.35), spread_deg: 2.0, name_len: 8 })
        }
        Case::Medium => {
            tour(TourParams { stops: 40, origin: (50.0, 10.0), spread_deg: 8.0, name_len: 14 })
        }
        Case::DenseCluster => {
            tour(TourParams { stops: 60, origin: (41.9, 12.5), spread_deg: 0.05, name_len: 10 })
        }
        Case::Continental => {
            tour(TourParams { stops: 120, origin: (45.0, 15.0), spread_deg: 30.0, name_len: 24 })
        }
    }
}

/// Stops on an outward spiral around `origin`, with a deterministic wobble so consecutive legs
/// are not all the same length.
pub fn tour(params: TourParams) -> Route {
    let mut waypoints = Vec::with_capacity(params.stops.max(1));
    for idx in 0..params.stops.max(1) {
        let t = idx as f64 / params.stops.max(1) as f64;
        let wobble = ((idx * 7919) % 13) as f64 / 13.0 - 0.5;
        let radius = params.spread_deg * (0.1 + 0.9 * t) * (1.0 + 0.2 * wobble);
        let angle = idx as f64 * 2.399_963;
        let lat = (params.origin.0 + radius * angle.sin()).clamp(-89.0, 89.0);
        let lng = (params.origin.1 + radius * angle.cos()).clamp(-179.0, 179.0);
        waypoints.push(Waypoint::new(lat, lng, stop_name(idx, params.name_len)));
    }
    Route::new(waypoints).expect("non-empty tour")
}

fn stop_name(idx: usize, target_len: usize) -> String {
    let mut name = format!("Stop {idx:03}");
    let fill = ['a', 'e', 'i', 'o', 'u'];
    let mut k = idx;
    while name.len() < target_len {
        name.push(fill[k % fill.len()]);
        k = k / 3 + 1;
    }
    name
}

/// JSON optimizer payload for the same tour, to benchmark decoding.
pub fn payload(route: &Route) -> String {
    let stops = route
        .waypoints()
        .iter()
        .map(|w| {
            serde_json::json!({ "location": w.name(), "lat": w.latitude(), "lng": w.longitude() })
        })
        .collect::<Vec<_>>();
    let names = route.waypoints().iter().map(|w| w.name()).collect::<Vec<_>>();
    serde_json::json!({
        "success": true,
        "route": names,
        "total_distance": (route.total_km() * 100.0).round() / 100.0,
        "route_with_coords": stops,
    })
    .to_string()
}

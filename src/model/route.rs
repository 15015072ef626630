// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rayon::prelude::*;

use super::geo::{haversine_km, LatLng};

/// One geographic stop of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    latitude: f64,
    longitude: f64,
    name: String,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self { latitude, longitude, name: name.into() }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// A directed leg between consecutive waypoints `from -> from + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    from: usize,
    distance_km: f64,
}

impl Edge {
    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.from + 1
    }

    /// Great-circle length of the leg; independent of any on-screen geometry.
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    Empty,
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "route has no waypoints"),
        }
    }
}

impl std::error::Error for RouteError {}

/// An ordered, non-empty open path of waypoints.
///
/// Index 0 is the start. Edge count is always `len() - 1`; no closing edge is implied even when the
/// last waypoint repeats the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
    edges: Vec<Edge>,
    reported_total_km: Option<f64>,
}

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, RouteError> {
        if waypoints.is_empty() {
            return Err(RouteError::Empty);
        }

        let edges = waypoints
            .windows(2)
            .enumerate()
            .map(|(from, pair)| Edge {
                from,
                distance_km: haversine_km(pair[0].lat_lng(), pair[1].lat_lng()),
            })
            .collect();

        Ok(Self { waypoints, edges, reported_total_km: None })
    }

    pub fn with_reported_total_km(mut self, km: Option<f64>) -> Self {
        self.reported_total_km = km.filter(|km| km.is_finite() && *km >= 0.0);
        self
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, from: usize) -> Option<&Edge> {
        self.edges.get(from)
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Sum of the great-circle length of every leg.
    pub fn total_km(&self) -> f64 {
        self.edges.iter().map(Edge::distance_km).sum()
    }

    /// Total distance as reported by the optimizer, when it sent one.
    pub fn reported_total_km(&self) -> Option<f64> {
        self.reported_total_km
    }

    pub fn distance_km(&self, a: usize, b: usize) -> Option<f64> {
        let a = self.waypoints.get(a)?;
        let b = self.waypoints.get(b)?;
        Some(haversine_km(a.lat_lng(), b.lat_lng()))
    }

    pub fn distance_matrix(&self) -> DistanceMatrix {
        DistanceMatrix::build(&self.waypoints)
    }
}

/// Dense symmetric matrix of pairwise great-circle distances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    km: Vec<f64>,
}

impl DistanceMatrix {
    pub fn build(waypoints: &[Waypoint]) -> Self {
        let size = waypoints.len();
        let km = (0..size * size)
            .into_par_iter()
            .map(|cell| {
                let (i, j) = (cell / size, cell % size);
                if i == j {
                    0.0
                } else {
                    haversine_km(waypoints[i].lat_lng(), waypoints[j].lat_lng())
                }
            })
            .collect();
        Self { size, km }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.km[i * self.size + j]
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, RouteError, Waypoint};

    fn abc() -> Route {
        Route::new(vec![
            Waypoint::new(0.0, 0.0, "A"),
            Waypoint::new(0.0, 10.0, "B"),
            Waypoint::new(10.0, 10.0, "C"),
        ])
        .expect("route")
    }

    #[test]
    fn empty_route_is_rejected() {
        assert_eq!(Route::new(Vec::new()), Err(RouteError::Empty));
    }

    #[test]
    fn edges_follow_consecutive_pairs() {
        let route = abc();
        assert_eq!(route.edges().len(), 2);
        assert_eq!((route.edges()[0].from(), route.edges()[0].to()), (0, 1));
        assert_eq!((route.edges()[1].from(), route.edges()[1].to()), (1, 2));
        assert!((route.edges()[0].distance_km() - 1111.95).abs() < 0.1);
        assert!((route.edges()[1].distance_km() - 1111.95).abs() < 0.1);
    }

    #[test]
    fn single_waypoint_route_has_no_edges() {
        let route = Route::new(vec![Waypoint::new(1.0, 2.0, "Solo")]).expect("route");
        assert!(route.edges().is_empty());
        assert_eq!(route.last_index(), 0);
        assert_eq!(route.total_km(), 0.0);
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let route = abc();
        let matrix = route.distance_matrix();
        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..3 {
                assert!((matrix.get(i, j) - matrix.get(j, i)).abs() < 1e-9);
            }
        }
        assert_eq!(Some(matrix.get(0, 2)), route.distance_km(0, 2));
    }

    #[test]
    fn reported_total_ignores_garbage() {
        let route = abc().with_reported_total_km(Some(f64::NAN));
        assert_eq!(route.reported_total_km(), None);
        let route = abc().with_reported_total_km(Some(2223.9));
        assert_eq!(route.reported_total_km(), Some(2223.9));
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Decoding of the route optimizer's response.
//!
//! The optimizer answers with either `route_with_coords` (`{location, lat, lng}` records) or
//! `coordinates` (`{lat, lng}` records, names in the parallel `route` array). Both spellings
//! `lat`/`latitude`, `lng`/`longitude` and `location`/`name` are accepted, coordinates may arrive
//! as numbers or numeric strings, and entries that cannot be read are dropped.

use serde::Deserialize;
use serde_json::Value;

use super::geo::LatLng;
use super::route::{Route, Waypoint};

#[derive(Debug)]
pub enum PayloadError {
    Json(serde_json::Error),
    /// The optimizer reported a failure (`{"error": "..."}`).
    Backend(String),
    NotAnObject,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "route payload is not valid JSON: {err}"),
            Self::Backend(message) => write!(f, "route optimizer reported an error: {message}"),
            Self::NotAnObject => write!(f, "route payload must be a JSON object or array"),
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Result of decoding a payload: either a drawable route or the terminal empty state.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteLoad {
    Ready(Route),
    Empty,
}

impl RouteLoad {
    pub fn into_route(self) -> Option<Route> {
        match self {
            Self::Ready(route) => Some(route),
            Self::Empty => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OptimizerResponse {
    error: Option<String>,
    // Kept loose so a malformed list is skipped instead of failing the whole response.
    route: Option<Value>,
    total_distance: Option<Value>,
    coordinates: Option<Value>,
    route_with_coords: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStop {
    lat: Option<Value>,
    latitude: Option<Value>,
    lng: Option<Value>,
    longitude: Option<Value>,
    location: Option<Value>,
    name: Option<Value>,
}

impl RawStop {
    fn lat_lng(&self) -> Option<LatLng> {
        let lat = self.lat.as_ref().or(self.latitude.as_ref()).and_then(number)?;
        let lng = self.lng.as_ref().or(self.longitude.as_ref()).and_then(number)?;
        let point = LatLng::new(lat, lng);
        point.is_valid().then_some(point)
    }

    fn label(&self) -> Option<String> {
        self.location.as_ref().or(self.name.as_ref()).and_then(text)
    }
}

pub fn parse_route_payload(source: &str) -> Result<RouteLoad, PayloadError> {
    let value: Value = serde_json::from_str(source)?;
    route_from_value(value)
}

pub fn route_from_value(value: Value) -> Result<RouteLoad, PayloadError> {
    match value {
        Value::Array(stops) => Ok(build(decode_stops(&stops, None), None)),
        Value::Object(_) => {
            let response: OptimizerResponse = serde_json::from_value(value)?;
            if let Some(message) = response.error {
                return Err(PayloadError::Backend(message));
            }

            let names = response.route.as_ref().and_then(Value::as_array).map(Vec::as_slice);
            let reported_total_km = response.total_distance.as_ref().and_then(number);

            let mut waypoints = response
                .route_with_coords
                .as_ref()
                .and_then(Value::as_array)
                .map(|stops| decode_stops(stops, None))
                .unwrap_or_default();
            if waypoints.is_empty() {
                waypoints = response
                    .coordinates
                    .as_ref()
                    .and_then(Value::as_array)
                    .map(|stops| decode_stops(stops, names))
                    .unwrap_or_default();
            }

            Ok(build(waypoints, reported_total_km))
        }
        _ => Err(PayloadError::NotAnObject),
    }
}

fn build(waypoints: Vec<Waypoint>, reported_total_km: Option<f64>) -> RouteLoad {
    match Route::new(waypoints) {
        Ok(route) => {
            let route = route.with_reported_total_km(reported_total_km);
            log::info!(
                "loaded route with {} waypoints ({:.1} km computed, {:?} km reported)",
                route.len(),
                route.total_km(),
                route.reported_total_km()
            );
            RouteLoad::Ready(route)
        }
        Err(_) => {
            log::info!("route payload contained no usable waypoints");
            RouteLoad::Empty
        }
    }
}

fn decode_stops(stops: &[Value], names: Option<&[Value]>) -> Vec<Waypoint> {
    let mut out = Vec::with_capacity(stops.len());
    for (idx, stop) in stops.iter().enumerate() {
        let Ok(raw) = RawStop::deserialize(stop) else {
            log::warn!("dropping route entry {idx}: not an object");
            continue;
        };
        let Some(point) = raw.lat_lng() else {
            log::warn!("dropping route entry {idx}: missing or invalid coordinates");
            continue;
        };

        let name = raw
            .label()
            .or_else(|| names.and_then(|names| names.get(idx)).and_then(text))
            .unwrap_or_default();
        out.push(Waypoint::new(point.lat, point.lng, name));
    }
    out
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_route_payload, PayloadError, RouteLoad};

    fn ready(source: &str) -> crate::model::Route {
        match parse_route_payload(source).expect("payload") {
            RouteLoad::Ready(route) => route,
            RouteLoad::Empty => panic!("expected a route from {source}"),
        }
    }

    #[test]
    fn route_with_coords_is_preferred() {
        let route = ready(
            r#"{
                "success": true,
                "route": ["Ignored", "Ignored"],
                "total_distance": 343.56,
                "coordinates": [{"lat": 1.0, "lng": 1.0}],
                "route_with_coords": [
                    {"location": "Paris, France", "lat": 48.8566, "lng": 2.3522},
                    {"location": "London, UK", "lat": 51.5074, "lng": -0.1278}
                ]
            }"#,
        );
        assert_eq!(route.len(), 2);
        assert_eq!(route.waypoints()[0].name(), "Paris, France");
        assert_eq!(route.waypoints()[1].name(), "London, UK");
        assert_eq!(route.reported_total_km(), Some(343.56));
    }

    #[test]
    fn coordinates_take_names_from_route_array() {
        let route = ready(
            r#"{
                "route": ["Cairo", "Giza"],
                "coordinates": [{"lat": 30.04, "lng": 31.23}, {"latitude": "29.98", "longitude": "31.13"}]
            }"#,
        );
        assert_eq!(route.len(), 2);
        assert_eq!(route.waypoints()[0].name(), "Cairo");
        assert_eq!(route.waypoints()[1].name(), "Giza");
        assert!((route.waypoints()[1].latitude() - 29.98).abs() < 1e-12);
    }

    #[rstest]
    #[case::missing_lng(r#"{"lat": 1.0, "name": "x"}"#)]
    #[case::text_lat(r#"{"lat": "north", "lng": 2.0}"#)]
    #[case::out_of_range(r#"{"lat": 91.0, "lng": 2.0}"#)]
    #[case::not_an_object("42")]
    #[case::null("null")]
    fn unreadable_entries_are_dropped(#[case] bad: &str) {
        let source = format!(
            r#"{{"route_with_coords": [{bad}, {{"location": "Kept", "lat": 5.0, "lng": 6.0}}]}}"#
        );
        let route = ready(&source);
        assert_eq!(route.len(), 1);
        assert_eq!(route.waypoints()[0].name(), "Kept");
    }

    #[rstest]
    #[case::string(r#""x""#)]
    #[case::object(r#"{"lat": 1.0}"#)]
    #[case::number("3")]
    fn non_list_route_with_coords_falls_back_to_coordinates(#[case] field: &str) {
        let source = format!(
            r#"{{"route_with_coords": {field}, "route": "Cairo",
                "coordinates": [{{"lat": 30.04, "lng": 31.23}}, {{"lat": 29.98, "lng": 31.13}}]}}"#
        );
        let route = ready(&source);
        assert_eq!(route.len(), 2);
        assert_eq!(route.waypoints()[0].name(), "");
        assert_eq!(route.waypoints()[1].name(), "");
    }

    #[test]
    fn top_level_array_is_accepted() {
        let route = ready(r#"[{"name": "A", "lat": 0, "lng": 0}, {"name": "B", "lat": 0, "lng": 1}]"#);
        assert_eq!(route.len(), 2);
    }

    #[test]
    fn nothing_usable_is_the_empty_state() {
        assert_eq!(parse_route_payload(r#"{"route_with_coords": []}"#).unwrap(), RouteLoad::Empty);
        assert_eq!(parse_route_payload("{}").unwrap(), RouteLoad::Empty);
        assert_eq!(
            parse_route_payload(r#"{"coordinates": [{"lat": null, "lng": 3}]}"#).unwrap(),
            RouteLoad::Empty
        );
    }

    #[test]
    fn backend_error_is_surfaced() {
        let err = parse_route_payload(r#"{"error": "Starting location is required"}"#).unwrap_err();
        assert!(matches!(err, PayloadError::Backend(ref msg) if msg == "Starting location is required"));
    }

    #[test]
    fn malformed_json_and_scalars_are_errors() {
        assert!(matches!(parse_route_payload("{"), Err(PayloadError::Json(_))));
        assert!(matches!(parse_route_payload("\"hello\""), Err(PayloadError::NotAnObject)));
    }
}

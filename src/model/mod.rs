// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Routes are ordered, non-empty waypoint sequences decoded from the optimizer payload, with
//! great-circle leg distances computed once at load time.

pub mod geo;
pub mod payload;
pub mod route;

pub use geo::{haversine_km, LatLng, EARTH_RADIUS_KM};
pub use payload::{parse_route_payload, route_from_value, PayloadError, RouteLoad};
pub use route::{DistanceMatrix, Edge, Route, RouteError, Waypoint};

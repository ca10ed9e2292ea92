use crate::models::{GeoPoint, Location, NearestLocation};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Parses a coordinate string, accepting a comma as decimal separator.
/// Non-finite results count as unparseable.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Haversine great-circle distance in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn round_distance_km(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}

/// Picks the location closest to `origin`, skipping every site without
/// finite coordinates. Ties keep the earlier catalogue entry. Returns
/// `None` when no location is eligible.
pub fn nearest(origin: GeoPoint, locations: &[Location]) -> Option<NearestLocation> {
    let mut best: Option<(f64, &Location)> = None;

    for location in locations {
        let Some(point) = location.geo_point() else {
            continue;
        };
        let distance = haversine_km(origin, point);

        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, location)),
        }
    }

    best.map(|(distance, location)| NearestLocation {
        location: location.clone(),
        distance_km: round_distance_km(distance),
    })
}

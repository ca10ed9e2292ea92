use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::services::geo::parse_coordinate;

/// A physical clinic site (sede). Coordinates arrive as optional strings
/// because the backend mixes numbers, dot-decimal and comma-decimal text;
/// `geo_point` is the only way to get usable numbers out of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "indirizzo")]
    pub address: Option<String>,
    #[serde(default, alias = "citta")]
    pub city: Option<String>,
    #[serde(default, alias = "latitudine", deserialize_with = "coordinate_field")]
    pub latitude: Option<String>,
    #[serde(default, alias = "longitudine", deserialize_with = "coordinate_field")]
    pub longitude: Option<String>,
}

impl Location {
    /// Parsed coordinates, or `None` when either value is missing or does
    /// not parse to a finite number. Such locations are silently excluded
    /// from distance computation.
    pub fn geo_point(&self) -> Option<GeoPoint> {
        let latitude = parse_coordinate(self.latitude.as_deref()?)?;
        let longitude = parse_coordinate(self.longitude.as_deref()?)?;
        Some(GeoPoint {
            latitude,
            longitude,
        })
    }
}

/// Accepts a coordinate sent as a JSON string or number; anything else
/// becomes `None`.
fn coordinate_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// The single nearest clinic with its great-circle distance, rounded to
/// one decimal kilometer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestLocation {
    pub location: Location,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordPositionRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearestQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named work site with a circular geofence around its center.
/// Owned by the administrative side; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Head Office")]
    pub name: String,
    #[schema(example = "1 Market St, San Francisco")]
    pub address: String,
    /// Geofence center, WGS-84 degrees
    #[schema(example = 37.7749)]
    pub latitude: f64,
    #[schema(example = -122.4194)]
    pub longitude: f64,
    /// Permitted check-in radius around the center, must be positive
    #[schema(example = 50.0)]
    pub radius_meters: f64,
}

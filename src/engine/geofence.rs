use crate::error::EngineError;
use crate::model::location::Location;
use crate::model::position::PositionSample;

/// Spherical-Earth radius, adequate at work-site scale.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceResult {
    pub within_radius: bool,
    pub distance_meters: f64,
}

/// Great-circle distance between two WGS-84 points via the haversine
/// formula. Behaves correctly across the antimeridian because the
/// longitude difference only enters through sin(dlon/2).
fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = (lat1.to_radians(), lon1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lon2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_METERS * c
}

/// Decides whether `position` falls inside the location's geofence.
/// Pure and deterministic; the boundary itself counts as inside.
pub fn evaluate(position: &PositionSample, location: &Location) -> Result<GeofenceResult, EngineError> {
    if !position.is_valid() {
        return Err(EngineError::InvalidCoordinates(
            position.latitude,
            position.longitude,
        ));
    }
    if !(-90.0..=90.0).contains(&location.latitude)
        || !(-180.0..=180.0).contains(&location.longitude)
    {
        return Err(EngineError::InvalidCoordinates(
            location.latitude,
            location.longitude,
        ));
    }
    if location.radius_meters <= 0.0 {
        return Err(EngineError::InvalidRadius(
            location.id,
            location.radius_meters,
        ));
    }

    let distance_meters = haversine_meters(
        position.latitude,
        position.longitude,
        location.latitude,
        location.longitude,
    );

    Ok(GeofenceResult {
        within_radius: distance_meters <= location.radius_meters,
        distance_meters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(lat: f64, lon: f64, radius: f64) -> Location {
        Location {
            id: 1,
            name: "HQ".into(),
            address: "somewhere".into(),
            latitude: lat,
            longitude: lon,
            radius_meters: radius,
        }
    }

    #[test]
    fn position_at_center_is_inside() {
        let loc = site(37.7749, -122.4194, 50.0);
        let res = evaluate(&PositionSample::new(37.7749, -122.4194), &loc).unwrap();
        assert!(res.distance_meters < 0.001);
        assert!(res.within_radius);
    }

    #[test]
    fn sixty_seven_meters_north_is_outside_fifty() {
        let loc = site(37.7749, -122.4194, 50.0);
        let res = evaluate(&PositionSample::new(37.7755, -122.4194), &loc).unwrap();
        assert!(res.distance_meters > 60.0 && res.distance_meters < 75.0);
        assert!(!res.within_radius);
    }

    #[test]
    fn boundary_is_inclusive() {
        // measure the real distance first, then set the fence to exactly
        // that distance so the <= comparison is exercised on the boundary
        let pos = PositionSample::new(0.0005, 0.0);
        let d = evaluate(&pos, &site(0.0, 0.0, 1000.0))
            .unwrap()
            .distance_meters;
        assert!(d > 50.0);

        let on_boundary = evaluate(&pos, &site(0.0, 0.0, d)).unwrap();
        assert!(on_boundary.within_radius);

        let epsilon_short = evaluate(&pos, &site(0.0, 0.0, d - 0.001)).unwrap();
        assert!(!epsilon_short.within_radius);
    }

    #[test]
    fn antimeridian_neighbours_are_close() {
        let loc = site(0.0, 179.9999, 200.0);
        let res = evaluate(&PositionSample::new(0.0, -179.9999), &loc).unwrap();
        // ~22m apart across the dateline, not half the planet
        assert!(res.distance_meters < 100.0, "got {}", res.distance_meters);
        assert!(res.within_radius);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let loc = site(37.0, -122.0, 50.0);
        assert!(matches!(
            evaluate(&PositionSample::new(91.0, 0.0), &loc),
            Err(EngineError::InvalidCoordinates(..))
        ));
        assert!(matches!(
            evaluate(&PositionSample::new(0.0, -181.0), &loc),
            Err(EngineError::InvalidCoordinates(..))
        ));
    }

    #[test]
    fn rejects_non_positive_radius() {
        let loc = site(37.0, -122.0, 0.0);
        assert!(matches!(
            evaluate(&PositionSample::new(37.0, -122.0), &loc),
            Err(EngineError::InvalidRadius(..))
        ));
    }
}

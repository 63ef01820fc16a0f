use actix_web::{HttpResponse, http::StatusCode};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Failure reported by the client's geolocation sensor. These originate
/// outside the engine and are surfaced verbatim, never retried here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, StrumDisplay, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

/// Everything the engine can refuse a request with. No variant implies a
/// partial state change: a failed submit leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum EngineError {
    #[display(
        fmt = "invalid coordinates: lat={} lon={} (lat must be in [-90,90], lon in [-180,180])",
        _0,
        _1
    )]
    InvalidCoordinates(f64, f64),

    #[display(fmt = "location {} has non-positive radius {}", _0, _1)]
    InvalidRadius(u64, f64),

    #[display(fmt = "location {} not found", _0)]
    LocationNotFound(u64),

    #[display(
        fmt = "position is {:.1}m from center, outside the {:.1}m radius",
        distance_meters,
        radius_meters
    )]
    GeofenceViolation {
        distance_meters: f64,
        radius_meters: f64,
    },

    #[display(fmt = "user {} already has an open session {}", user_id, session_id)]
    AlreadyOpen { user_id: u64, session_id: Uuid },

    #[display(fmt = "session {} is already closed", _0)]
    AlreadyClosed(Uuid),

    #[display(fmt = "user {} has no open session", _0)]
    NoOpenSession(u64),

    #[display(fmt = "session {} not found", _0)]
    SessionNotFound(Uuid),

    #[display(
        fmt = "check-out at {} precedes check-in at {}",
        check_out,
        check_in
    )]
    OutOfOrder {
        check_in: chrono::DateTime<chrono::Utc>,
        check_out: chrono::DateTime<chrono::Utc>,
    },

    #[display(fmt = "position sensor failed: {}", _0)]
    Sensor(SensorError),
}

impl EngineError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidCoordinates(..) => "invalid_coordinates",
            EngineError::InvalidRadius(..) => "invalid_radius",
            EngineError::LocationNotFound(..) => "location_not_found",
            EngineError::GeofenceViolation { .. } => "geofence_violation",
            EngineError::AlreadyOpen { .. } => "already_open",
            EngineError::AlreadyClosed(..) => "already_closed",
            EngineError::NoOpenSession(..) => "no_open_session",
            EngineError::SessionNotFound(..) => "session_not_found",
            EngineError::OutOfOrder { .. } => "out_of_order",
            EngineError::Sensor(SensorError::PermissionDenied) => "sensor_permission_denied",
            EngineError::Sensor(SensorError::PositionUnavailable) => "sensor_position_unavailable",
            EngineError::Sensor(SensorError::Timeout) => "sensor_timeout",
        }
    }
}

impl std::error::Error for EngineError {}

impl actix_web::ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::InvalidCoordinates(..) | EngineError::InvalidRadius(..) => {
                StatusCode::BAD_REQUEST
            }
            EngineError::LocationNotFound(..) | EngineError::SessionNotFound(..) => {
                StatusCode::NOT_FOUND
            }
            EngineError::GeofenceViolation { .. } => StatusCode::FORBIDDEN,
            EngineError::AlreadyOpen { .. }
            | EngineError::AlreadyClosed(..)
            | EngineError::NoOpenSession(..)
            | EngineError::OutOfOrder { .. } => StatusCode::CONFLICT,
            EngineError::Sensor(..) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        // Callers show the user how far off they are
        if let EngineError::GeofenceViolation {
            distance_meters,
            radius_meters,
        } = self
        {
            body["distance_meters"] = serde_json::json!(distance_meters);
            body["radius_meters"] = serde_json::json!(radius_meters);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

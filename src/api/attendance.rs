use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::engine::coordinator::{AttendanceAction, AttendanceCoordinator, SubmitRequest};
use crate::engine::store::SessionRange;
use crate::error::SensorError;
use crate::model::position::PositionSample;
use crate::model::session::AttendanceSession;

#[derive(Deserialize, ToSchema)]
pub struct SubmitBody {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 1)]
    pub location_id: u64,
    /// The acquired position fix; absent when the sensor failed
    pub position: Option<PositionSample>,
    /// Sensor failure reported by the client instead of a fix
    #[schema(example = "timeout")]
    pub sensor_error: Option<SensorError>,
    #[schema(example = "on-site client visit")]
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(example = "Checked in successfully")]
    pub message: String,
    pub session: AttendanceSession,
    #[schema(example = 3.2)]
    pub distance_meters: f64,
    /// Present on check-out only
    #[schema(example = 482)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worked_minutes: Option<i64>,
    #[schema(example = false)]
    pub overtime: bool,
}

#[derive(Serialize, ToSchema)]
pub struct OpenSessionResponse {
    /// The user's open session, or null when not checked in
    pub data: Option<AttendanceSession>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SessionFilter {
    /// Only sessions checked in at or after this instant
    #[param(example = "2026-01-01T00:00:00Z")]
    pub from: Option<DateTime<Utc>>,
    /// Only sessions checked in at or before this instant
    #[param(example = "2026-01-31T23:59:59Z")]
    pub to: Option<DateTime<Utc>>,
    #[param(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[param(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct SessionListResponse {
    pub data: Vec<AttendanceSession>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 42)]
    pub total: u64,
}

fn position_fix(body: &SubmitBody) -> Result<Result<PositionSample, SensorError>, HttpResponse> {
    match (body.position, body.sensor_error) {
        (Some(sample), _) => Ok(Ok(sample)),
        (None, Some(sensor)) => Ok(Err(sensor)),
        (None, None) => Err(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "either position or sensor_error is required"
        }))),
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body(
        content = SubmitBody,
        description = "Check-in payload with the acquired position fix",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Checked in successfully", body = SessionResponse),
        (status = 400, description = "Invalid coordinates or payload"),
        (status = 403, description = "Outside the location geofence", body = Object, example = json!({
            "error": "geofence_violation",
            "message": "position is 67.2m from center, outside the 50.0m radius",
            "distance_meters": 67.2,
            "radius_meters": 50.0
        })),
        (status = 404, description = "Location not found"),
        (status = 409, description = "User already has an open session"),
        (status = 422, description = "Position sensor failed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    coordinator: web::Data<AttendanceCoordinator>,
    payload: web::Json<SubmitBody>,
) -> actix_web::Result<impl Responder> {
    let fix = match position_fix(&payload) {
        Ok(fix) => fix,
        Err(resp) => return Ok(resp),
    };

    let outcome = coordinator.submit(SubmitRequest {
        user_id: payload.user_id,
        location_id: payload.location_id,
        fix,
        action: AttendanceAction::CheckIn,
        notes: payload.notes.clone(),
    })?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        message: "Checked in successfully".to_string(),
        distance_meters: outcome.distance_meters,
        worked_minutes: None,
        overtime: false,
        session: outcome.session,
    }))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body(
        content = SubmitBody,
        description = "Check-out payload; position is recorded but not geofence-gated",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Checked out successfully", body = SessionResponse),
        (status = 400, description = "Invalid coordinates or payload"),
        (status = 404, description = "Location not found"),
        (status = 409, description = "No open session for the user"),
        (status = 422, description = "Position sensor failed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    coordinator: web::Data<AttendanceCoordinator>,
    payload: web::Json<SubmitBody>,
) -> actix_web::Result<impl Responder> {
    let fix = match position_fix(&payload) {
        Ok(fix) => fix,
        Err(resp) => return Ok(resp),
    };

    let outcome = coordinator.submit(SubmitRequest {
        user_id: payload.user_id,
        location_id: payload.location_id,
        fix,
        action: AttendanceAction::CheckOut,
        notes: None,
    })?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        message: "Checked out successfully".to_string(),
        distance_meters: outcome.distance_meters,
        worked_minutes: outcome.worked_minutes,
        overtime: outcome.overtime,
        session: outcome.session,
    }))
}

/// Current open session, if any
#[utoipa::path(
    get,
    path = "/api/v1/attendance/open/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User to look up")
    ),
    responses(
        (status = 200, description = "Open session or null", body = OpenSessionResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn open_session(
    coordinator: web::Data<AttendanceCoordinator>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let data = coordinator.store().get_open_session(user_id);
    Ok(HttpResponse::Ok().json(OpenSessionResponse { data }))
}

/// Session history, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/attendance/sessions/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User whose history to list"),
        SessionFilter
    ),
    responses(
        (status = 200, description = "Paginated session history", body = SessionListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_sessions(
    coordinator: web::Data<AttendanceCoordinator>,
    path: web::Path<u64>,
    query: web::Query<SessionFilter>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let page = coordinator.store().list_sessions(
        user_id,
        SessionRange {
            from: query.from,
            to: query.to,
            page: query.page.unwrap_or(1),
            per_page: query.per_page.unwrap_or(10),
        },
    );

    Ok(HttpResponse::Ok().json(SessionListResponse {
        data: page.data,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

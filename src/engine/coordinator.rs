use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::directory::{LocationDirectory, ShiftRoster};
use crate::engine::geofence;
use crate::engine::notifier::ChangeNotifier;
use crate::engine::policy::StatusPolicy;
use crate::engine::store::SessionStore;
use crate::error::{EngineError, SensorError};
use crate::model::position::PositionSample;
use crate::model::session::AttendanceSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

/// One attendance request, position fix already acquired (or failed)
/// by the client's sensor before the engine is ever invoked.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub user_id: u64,
    pub location_id: u64,
    pub fix: Result<PositionSample, SensorError>,
    pub action: AttendanceAction,
    pub notes: Option<String>,
}

/// Committed result of a submit: the session snapshot plus the derived
/// figures the caller displays (distance, worked time, overtime flag).
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub session: AttendanceSession,
    pub distance_meters: f64,
    pub worked_minutes: Option<i64>,
    pub overtime: bool,
    pub seq: u64,
}

/// Orchestrates check-in/check-out: validates input, runs the geofence
/// and status policy, commits through the store, publishes the change.
///
/// Submits for the same user are serialized here so publish order always
/// matches commit order; the store's one-open-session guarantee does not
/// depend on this lock.
pub struct AttendanceCoordinator {
    locations: Arc<dyn LocationDirectory>,
    roster: Arc<dyn ShiftRoster>,
    store: Arc<SessionStore>,
    notifier: ChangeNotifier,
    policy: StatusPolicy,
    submit_locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl AttendanceCoordinator {
    pub fn new(
        locations: Arc<dyn LocationDirectory>,
        roster: Arc<dyn ShiftRoster>,
        store: Arc<SessionStore>,
        notifier: ChangeNotifier,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            locations,
            roster,
            store,
            notifier,
            policy,
            submit_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn user_lock(&self, user_id: u64) -> Arc<Mutex<()>> {
        let mut locks = self.submit_locks.lock().unwrap();
        Arc::clone(locks.entry(user_id).or_default())
    }

    pub fn submit(&self, request: SubmitRequest) -> Result<SubmitOutcome, EngineError> {
        self.submit_at(request, Utc::now())
    }

    /// Clock-injected variant; `submit` passes the wall clock.
    pub fn submit_at(
        &self,
        request: SubmitRequest,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, EngineError> {
        let position = request.fix.map_err(EngineError::Sensor)?;

        let location = self
            .locations
            .get_location(request.location_id)
            .ok_or(EngineError::LocationNotFound(request.location_id))?;

        let fence = geofence::evaluate(&position, &location)?;

        // Check-in proves presence at the start of a shift; check-out only
        // records departure time, so it is not geofence-gated.
        if request.action == AttendanceAction::CheckIn && !fence.within_radius {
            tracing::info!(
                user_id = request.user_id,
                location_id = location.id,
                distance_meters = fence.distance_meters,
                "check-in outside geofence rejected"
            );
            return Err(EngineError::GeofenceViolation {
                distance_meters: fence.distance_meters,
                radius_meters: location.radius_meters,
            });
        }

        let guard = self.user_lock(request.user_id);
        let _serialized = guard.lock().unwrap();

        let outcome = match request.action {
            AttendanceAction::CheckIn => {
                let shift = self.roster.shift_for(request.user_id, now.date_naive());
                let status = self.policy.decide_check_in_status(now, shift.as_ref());
                let session = self.store.open_session(
                    request.user_id,
                    location.id,
                    now,
                    position,
                    status,
                    request.notes,
                )?;
                tracing::info!(
                    user_id = request.user_id,
                    session_id = %session.id,
                    status = %session.status,
                    "checked in"
                );
                SubmitOutcome {
                    session,
                    distance_meters: fence.distance_meters,
                    worked_minutes: None,
                    overtime: false,
                    seq: 0,
                }
            }
            AttendanceAction::CheckOut => {
                let open = self
                    .store
                    .get_open_session(request.user_id)
                    .ok_or(EngineError::NoOpenSession(request.user_id))?;
                let session = self.store.close_session(open.id, now, Some(position))?;

                let shift = self
                    .roster
                    .shift_for(request.user_id, session.check_in_time.date_naive());
                let overtime =
                    self.policy
                        .is_overtime(session.check_in_time, now, shift.as_ref());
                let worked_minutes = session.duration_minutes();
                tracing::info!(
                    user_id = request.user_id,
                    session_id = %session.id,
                    worked_minutes,
                    overtime,
                    "checked out"
                );
                SubmitOutcome {
                    session,
                    distance_meters: fence.distance_meters,
                    worked_minutes,
                    overtime,
                    seq: 0,
                }
            }
        };

        // Still under the per-user guard: commit order equals publish order.
        let seq = self.notifier.publish(outcome.session.clone());
        Ok(SubmitOutcome { seq, ..outcome })
    }
}

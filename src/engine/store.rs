use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::position::PositionSample;
use crate::model::session::{AttendanceSession, AttendanceStatus};

/// Time bounds plus paging for history listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone)]
pub struct SessionPage {
    pub data: Vec<AttendanceSession>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

#[derive(Default)]
struct UserSessions {
    sessions: Vec<AttendanceSession>,
    open: Option<Uuid>,
}

/// Single source of truth for session state. The only mutable shared
/// resource in the engine; everything else is stateless.
///
/// Each user's sessions live behind their own mutex, so check-and-create
/// is atomic per user while unrelated users proceed in parallel. This is
/// the in-memory equivalent of a unique partial index on
/// (user_id) WHERE check_out_time IS NULL.
pub struct SessionStore {
    users: RwLock<HashMap<u64, Arc<Mutex<UserSessions>>>>,
    owners: RwLock<HashMap<Uuid, u64>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            owners: RwLock::new(HashMap::new()),
        }
    }

    fn slot(&self, user_id: u64) -> Arc<Mutex<UserSessions>> {
        if let Some(slot) = self.users.read().unwrap().get(&user_id) {
            return Arc::clone(slot);
        }
        let mut users = self.users.write().unwrap();
        Arc::clone(users.entry(user_id).or_default())
    }

    /// Creates a new open session for the user. Fails with `AlreadyOpen`
    /// if one exists; under concurrent calls for the same user exactly
    /// one caller wins and the loser sees the winner's session id.
    pub fn open_session(
        &self,
        user_id: u64,
        location_id: u64,
        check_in_time: DateTime<Utc>,
        position: PositionSample,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> Result<AttendanceSession, EngineError> {
        let slot = self.slot(user_id);
        let mut state = slot.lock().unwrap();

        if let Some(open_id) = state.open {
            return Err(EngineError::AlreadyOpen {
                user_id,
                session_id: open_id,
            });
        }

        let session = AttendanceSession {
            id: Uuid::new_v4(),
            user_id,
            location_id,
            check_in_time,
            check_in_position: position,
            check_out_time: None,
            check_out_position: None,
            status,
            notes,
        };

        state.open = Some(session.id);
        state.sessions.push(session.clone());
        self.owners.write().unwrap().insert(session.id, user_id);

        Ok(session)
    }

    /// Closes the session exactly once. `check_out_time` must not precede
    /// the recorded check-in; a closed session never reopens.
    pub fn close_session(
        &self,
        session_id: Uuid,
        check_out_time: DateTime<Utc>,
        position: Option<PositionSample>,
    ) -> Result<AttendanceSession, EngineError> {
        let user_id = *self
            .owners
            .read()
            .unwrap()
            .get(&session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;

        let slot = self.slot(user_id);
        let mut state = slot.lock().unwrap();

        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;

        if session.check_out_time.is_some() {
            return Err(EngineError::AlreadyClosed(session_id));
        }
        if check_out_time < session.check_in_time {
            return Err(EngineError::OutOfOrder {
                check_in: session.check_in_time,
                check_out: check_out_time,
            });
        }

        session.check_out_time = Some(check_out_time);
        session.check_out_position = position;
        let snapshot = session.clone();
        state.open = None;

        Ok(snapshot)
    }

    /// Queried fresh per operation; never cached by callers.
    pub fn get_open_session(&self, user_id: u64) -> Option<AttendanceSession> {
        let slot = self.slot(user_id);
        let state = slot.lock().unwrap();
        let open_id = state.open?;
        state.sessions.iter().find(|s| s.id == open_id).cloned()
    }

    /// Chronological history, most recent check-in first.
    pub fn list_sessions(&self, user_id: u64, range: SessionRange) -> SessionPage {
        let per_page = if range.per_page == 0 {
            10
        } else {
            range.per_page.min(100)
        };
        let page = range.page.max(1);

        let slot = self.slot(user_id);
        let state = slot.lock().unwrap();

        let matching: Vec<&AttendanceSession> = state
            .sessions
            .iter()
            .rev()
            .filter(|s| range.from.is_none_or(|from| s.check_in_time >= from))
            .filter(|s| range.to.is_none_or(|to| s.check_in_time <= to))
            .collect();

        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .cloned()
            .collect();

        SessionPage {
            data,
            page,
            per_page,
            total,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

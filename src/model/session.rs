use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::position::PositionSample;

/// Status assigned once at check-in under the lateness policy.
/// `Absent` is only ever written by the end-of-day sweep, which lives
/// outside this engine; real-time check-in never produces it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Overtime,
}

/// One attendance period for one user at one location.
///
/// Open means `check_out_time == None`; at most one open session may exist
/// per user at any instant, which the store enforces under concurrency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSession {
    pub id: Uuid,
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 1)]
    pub location_id: u64,
    #[schema(example = "2026-01-05T08:55:00Z", format = "date-time", value_type = String)]
    pub check_in_time: DateTime<Utc>,
    pub check_in_position: PositionSample,
    #[schema(example = "2026-01-05T17:02:00Z", format = "date-time", value_type = String)]
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_out_position: Option<PositionSample>,
    #[schema(example = "present")]
    pub status: AttendanceStatus,
    #[schema(example = "client visit in the morning")]
    pub notes: Option<String>,
}

impl AttendanceSession {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }

    /// Worked minutes for a closed session; `None` while still open.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.check_out_time
            .map(|out| (out - self.check_in_time).num_minutes())
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Scheduled start/end against which lateness and overtime are judged.
/// Owned by the roster collaborator; the engine receives it resolved
/// to concrete instants for the day in question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShiftWindow {
    #[schema(example = "2026-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub start: DateTime<Utc>,
    #[schema(example = "2026-01-05T17:00:00Z", format = "date-time", value_type = String)]
    pub end: DateTime<Utc>,
}

impl ShiftWindow {
    pub fn scheduled_duration(&self) -> Duration {
        self.end - self.start
    }
}

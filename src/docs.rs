use crate::api::attendance::{
    OpenSessionResponse, SessionFilter, SessionListResponse, SessionResponse, SubmitBody,
};
use crate::error::SensorError;
use crate::model::location::Location;
use crate::model::position::PositionSample;
use crate::model::session::{AttendanceSession, AttendanceStatus};
use crate::model::shift::ShiftWindow;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Session Engine API",
        version = "1.0.0",
        description = r#"
## Attendance Session Engine

Decision core for employee attendance tracking.

### 🔹 Key Features
- **Geofenced Check-in**
  - Great-circle distance against each work site's radius
- **Status Policy**
  - Present/late derived from the user's shift window, with a configurable grace period
- **One Open Session Per User**
  - Enforced atomically, even across concurrent devices
- **Live Change Feed**
  - Every committed check-in/check-out is broadcast to subscribers in commit order

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for history endpoints
- Failures carry a stable `error` code plus a human-readable `message`

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::open_session,
        crate::api::attendance::list_sessions
    ),
    components(
        schemas(
            SubmitBody,
            SessionResponse,
            OpenSessionResponse,
            SessionFilter,
            SessionListResponse,
            AttendanceSession,
            AttendanceStatus,
            PositionSample,
            Location,
            ShiftWindow,
            SensorError
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance session APIs"),
    )
)]
pub struct ApiDoc;

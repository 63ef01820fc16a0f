use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use crate::model::location::Location;
use crate::model::shift::ShiftWindow;

/// Read-only lookup of named work sites. The administrative side owns
/// the data; the engine only resolves ids.
pub trait LocationDirectory: Send + Sync {
    fn get_location(&self, id: u64) -> Option<Location>;
}

/// Resolves a user's scheduled shift for a given day. Owned by the
/// roster collaborator; `None` means unscheduled attendance.
pub trait ShiftRoster: Send + Sync {
    fn shift_for(&self, user_id: u64, date: NaiveDate) -> Option<ShiftWindow>;
}

#[derive(Debug, Deserialize)]
struct ShiftAssignment {
    user_id: u64,
    /// Daily shift start, e.g. "09:00:00" (UTC)
    start: NaiveTime,
    /// Daily shift end; an end at or before start rolls into the next day
    end: NaiveTime,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    locations: Vec<Location>,
    #[serde(default)]
    shifts: Vec<ShiftAssignment>,
}

/// In-memory directory seeded from a JSON file at startup. Stands in
/// for the admin/roster services this engine normally sits next to.
pub struct StaticDirectory {
    locations: HashMap<u64, Location>,
    shifts: HashMap<u64, (NaiveTime, NaiveTime)>,
}

impl StaticDirectory {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let seed: SeedFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        tracing::info!(
            locations = seed.locations.len(),
            shifts = seed.shifts.len(),
            "directory seeded"
        );

        Ok(Self {
            locations: seed.locations.into_iter().map(|l| (l.id, l)).collect(),
            shifts: seed
                .shifts
                .into_iter()
                .map(|s| (s.user_id, (s.start, s.end)))
                .collect(),
        })
    }

    pub fn with_locations(locations: Vec<Location>) -> Self {
        Self {
            locations: locations.into_iter().map(|l| (l.id, l)).collect(),
            shifts: HashMap::new(),
        }
    }

    pub fn assign_shift(&mut self, user_id: u64, start: NaiveTime, end: NaiveTime) {
        self.shifts.insert(user_id, (start, end));
    }
}

impl LocationDirectory for StaticDirectory {
    fn get_location(&self, id: u64) -> Option<Location> {
        self.locations.get(&id).cloned()
    }
}

impl ShiftRoster for StaticDirectory {
    fn shift_for(&self, user_id: u64, date: NaiveDate) -> Option<ShiftWindow> {
        let (start, end) = *self.shifts.get(&user_id)?;
        let start_dt = Utc.from_utc_datetime(&date.and_time(start));
        let end_date = if end <= start {
            date.succ_opt()?
        } else {
            date
        };
        let end_dt = Utc.from_utc_datetime(&end_date.and_time(end));
        Some(ShiftWindow {
            start: start_dt,
            end: end_dt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hq() -> Location {
        Location {
            id: 1,
            name: "HQ".into(),
            address: "1 Market St".into(),
            latitude: 37.7749,
            longitude: -122.4194,
            radius_meters: 50.0,
        }
    }

    #[test]
    fn resolves_known_locations_only() {
        let dir = StaticDirectory::with_locations(vec![hq()]);
        assert_eq!(dir.get_location(1).unwrap().name, "HQ");
        assert!(dir.get_location(99).is_none());
    }

    #[test]
    fn shift_window_lands_on_the_requested_day() {
        let mut dir = StaticDirectory::with_locations(vec![hq()]);
        dir.assign_shift(
            1000,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        );
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let window = dir.shift_for(1000, date).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 1, 5, 17, 0, 0).unwrap());
        assert!(dir.shift_for(2000, date).is_none());
    }

    #[test]
    fn overnight_shift_ends_next_day() {
        let mut dir = StaticDirectory::with_locations(vec![hq()]);
        dir.assign_shift(
            1000,
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        );
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let window = dir.shift_for(1000, date).unwrap();
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 1, 6, 6, 0, 0).unwrap());
        assert!(window.scheduled_duration() == chrono::Duration::hours(8));
    }

    #[test]
    fn seed_file_parses() {
        let dir = tempdir_seed(
            r#"{
                "locations": [
                    {"id": 1, "name": "HQ", "address": "1 Market St",
                     "latitude": 37.7749, "longitude": -122.4194, "radius_meters": 50.0}
                ],
                "shifts": [
                    {"user_id": 1000, "start": "09:00:00", "end": "17:00:00"}
                ]
            }"#,
        );
        assert!(dir.get_location(1).is_some());
        assert!(dir
            .shift_for(1000, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
            .is_some());
    }

    fn tempdir_seed(contents: &str) -> StaticDirectory {
        let path = std::env::temp_dir().join(format!("seed-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        let dir = StaticDirectory::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        dir
    }
}

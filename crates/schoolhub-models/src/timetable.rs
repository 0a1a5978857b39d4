//! Teacher timetable: seven daily slots across the school week.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const TIME_SLOTS: [&str; 7] = [
    "9:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "1:00 PM", "2:00 PM", "3:00 PM",
];

pub const WEEKDAYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimetableRow {
    pub time: String,
    #[serde(default)]
    pub monday: String,
    #[serde(default)]
    pub tuesday: String,
    #[serde(default)]
    pub wednesday: String,
    #[serde(default)]
    pub thursday: String,
    #[serde(default)]
    pub friday: String,
}

impl TimetableRow {
    pub fn empty(time: &str) -> Self {
        Self {
            time: time.to_string(),
            ..Default::default()
        }
    }

    /// Cells in Monday-Friday order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
        ]
    }
}

/// Persisted and exchanged as a bare JSON array of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(transparent)]
pub struct Timetable {
    #[validate(length(min = 1, max = 24, message = "Timetable needs between 1 and 24 rows"))]
    pub rows: Vec<TimetableRow>,
}

impl Default for Timetable {
    fn default() -> Self {
        Self {
            rows: TIME_SLOTS.iter().map(|t| TimetableRow::empty(t)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timetable_has_every_slot() {
        let timetable = Timetable::default();
        assert_eq!(timetable.rows.len(), 7);
        assert_eq!(timetable.rows[0].time, "9:00 AM");
        assert_eq!(timetable.rows[6].time, "3:00 PM");
        assert!(timetable.rows.iter().all(|r| r.cells().iter().all(|c| c.is_empty())));
    }

    #[test]
    fn test_timetable_serializes_as_list() {
        let json = serde_json::to_value(Timetable::default()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["time"], "9:00 AM");
    }
}

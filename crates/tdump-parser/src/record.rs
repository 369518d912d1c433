//! Parsed trajectory records.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Clock fields of a trajectory point exactly as written in the dump.
///
/// The year is the raw two-digit field; its century is not recorded in the
/// file and is never guessed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampComponents {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
}

impl TimestampComponents {
    /// Combine the two-digit year with a caller-supplied century start
    /// (e.g. `2000`). Returns `None` for impossible dates.
    pub fn to_datetime(&self, century: i32) -> Option<NaiveDateTime> {
        let year = i32::try_from(i64::from(century) + self.year).ok()?;
        NaiveDate::from_ymd_opt(
            year,
            u32::try_from(self.month).ok()?,
            u32::try_from(self.day).ok()?,
        )?
        .and_hms_opt(u32::try_from(self.hour).ok()?, 0, 0)
    }
}

/// One data line of a trajectory dump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub trajectory_id: i64,
    pub timestamp: TimestampComponents,
    /// Hours from trajectory start; negative for backward runs
    pub forecast_hour: i64,
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
    /// Meters, as emitted by the model
    pub height: f64,
}

impl TrajectoryPoint {
    /// `(latitude, longitude)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

//! HYSPLIT CONTROL file for a single-source trajectory run.
//!
//! The file is positional text:
//!
//! ```text
//! YY MM DD HH        start time
//! 1                  number of starting locations
//! LAT LON HEIGHT     starting location
//! DURATION           run duration (hours)
//! 0                  vertical motion option
//! f|b                direction
//! 1                  number of meteorological files
//! MET                meteorological file identifier
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{RunnerError, RunnerResult};

/// Trajectory direction in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Single-letter flag written to the CONTROL file.
    pub fn flag(self) -> char {
        match self {
            Direction::Forward => 'f',
            Direction::Backward => 'b',
        }
    }
}

impl FromStr for Direction {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f" | "forward" => Ok(Direction::Forward),
            "b" | "backward" => Ok(Direction::Backward),
            other => Err(RunnerError::InvalidControl(format!(
                "unknown direction '{}'",
                other
            ))),
        }
    }
}

/// Meteorological dataset the run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetType {
    Gfs,
    Nam,
    Rap,
}

impl MetType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetType::Gfs => "GFS",
            MetType::Nam => "NAM",
            MetType::Rap => "RAP",
        }
    }
}

impl fmt::Display for MetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetType {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GFS" => Ok(MetType::Gfs),
            "NAM" => Ok(MetType::Nam),
            "RAP" => Ok(MetType::Rap),
            other => Err(RunnerError::InvalidControl(format!(
                "unknown meteorological file type '{}'",
                other
            ))),
        }
    }
}

/// Clock fields of the first CONTROL line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTime {
    /// Two-digit year (`year % 100`)
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl StartTime {
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year().rem_euclid(100) as u32,
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
        }
    }
}

/// Parameters of one trajectory run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlFile {
    pub start: StartTime,
    pub latitude: f64,
    pub longitude: f64,
    /// Starting height (m)
    pub height: f64,
    /// Run duration (hours)
    pub duration_hours: u32,
    pub direction: Direction,
    pub met_type: MetType,
}

impl ControlFile {
    pub fn from_datetime(
        start: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        height: f64,
        duration_hours: u32,
        direction: Direction,
        met_type: MetType,
    ) -> Self {
        Self {
            start: StartTime::from_datetime(start),
            latitude,
            longitude,
            height,
            duration_hours,
            direction,
            met_type,
        }
    }

    /// Reject parameters the model cannot run with.
    pub fn validate(&self) -> RunnerResult<()> {
        let s = &self.start;
        if s.year > 99 || !(1..=12).contains(&s.month) || !(1..=31).contains(&s.day) || s.hour > 23
        {
            return Err(RunnerError::InvalidControl(format!(
                "start time {:02} {:02} {:02} {:02} is not a valid YY MM DD HH",
                s.year, s.month, s.day, s.hour
            )));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(RunnerError::InvalidControl(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(RunnerError::InvalidControl(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.height.is_finite() {
            return Err(RunnerError::InvalidControl(format!(
                "height {} is not finite",
                self.height
            )));
        }
        if self.duration_hours == 0 {
            return Err(RunnerError::InvalidControl(
                "duration must be at least one hour".to_string(),
            ));
        }
        Ok(())
    }

    /// CONTROL file text, newline terminated.
    pub fn render(&self) -> String {
        let s = &self.start;
        format!(
            "{:02} {:02} {:02} {:02}\n1\n{} {} {}\n{}\n0\n{}\n1\n{}\n",
            s.year,
            s.month,
            s.day,
            s.hour,
            self.latitude,
            self.longitude,
            self.height,
            self.duration_hours,
            self.direction.flag(),
            self.met_type,
        )
    }

    /// Write the rendered file to `path`.
    pub async fn write_to<P: AsRef<Path>>(&self, path: P) -> RunnerResult<()> {
        tokio::fs::write(path, self.render()).await?;
        Ok(())
    }
}

impl fmt::Display for ControlFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> ControlFile {
        let start = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        ControlFile::from_datetime(
            start,
            40.0,
            -75.0,
            500.0,
            24,
            Direction::Backward,
            MetType::Gfs,
        )
    }

    #[test]
    fn test_render_layout() {
        let text = sample().render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["24 03 07 06", "1", "40 -75 500", "24", "0", "b", "1", "GFS"]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_keeps_fractional_coordinates() {
        let mut control = sample();
        control.latitude = 40.25;
        control.longitude = -75.5;
        control.height = 10.5;
        assert!(control.render().contains("\n40.25 -75.5 10.5\n"));
    }

    #[test]
    fn test_year_is_two_digits() {
        let start = NaiveDate::from_ymd_opt(2005, 12, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let control = ControlFile::from_datetime(
            start,
            0.0,
            0.0,
            10.0,
            1,
            Direction::Forward,
            MetType::Nam,
        );
        assert!(control.render().starts_with("05 12 31 23\n"));
        assert!(control.render().contains("\nf\n"));
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let mut bad = sample();
        bad.latitude = 91.0;
        assert!(matches!(bad.validate(), Err(RunnerError::InvalidControl(_))));

        let mut bad = sample();
        bad.longitude = -180.5;
        assert!(bad.validate().is_err());

        let mut bad = sample();
        bad.duration_hours = 0;
        assert!(bad.validate().is_err());

        let mut bad = sample();
        bad.height = f64::NAN;
        assert!(bad.validate().is_err());

        let mut bad = sample();
        bad.start.month = 13;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_parse_direction_and_met_type() {
        assert_eq!("Backward".parse::<Direction>().unwrap(), Direction::Backward);
        assert_eq!("f".parse::<Direction>().unwrap(), Direction::Forward);
        assert!("sideways".parse::<Direction>().is_err());

        assert_eq!("rap".parse::<MetType>().unwrap(), MetType::Rap);
        assert_eq!(MetType::Nam.to_string(), "NAM");
        assert!("ECMWF".parse::<MetType>().is_err());
    }

    #[tokio::test]
    async fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CONTROL");
        sample().write_to(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), sample().render());
    }
}

//! Tabular (CSV) view of parsed records.

use std::io::Write;

use serde::Serialize;
use tdump_parser::TrajectoryPoint;

use crate::error::MapResult;

/// Column layout of the exported table.
#[derive(Debug, Serialize)]
struct Row {
    traj_num: i64,
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    forecast_hour: i64,
    lat: f64,
    lon: f64,
    height: f64,
}

impl From<&TrajectoryPoint> for Row {
    fn from(p: &TrajectoryPoint) -> Self {
        Self {
            traj_num: p.trajectory_id,
            year: p.timestamp.year,
            month: p.timestamp.month,
            day: p.timestamp.day,
            hour: p.timestamp.hour,
            forecast_hour: p.forecast_hour,
            lat: p.latitude,
            lon: p.longitude,
            height: p.height,
        }
    }
}

/// Write records as CSV with a header row, in the given order.
pub fn write_csv<W: Write>(points: &[TrajectoryPoint], writer: W) -> MapResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(Row::from(point))?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV as a string.
pub fn to_csv_string(points: &[TrajectoryPoint]) -> MapResult<String> {
    let mut buf = Vec::new();
    write_csv(points, &mut buf)?;
    // csv output of numbers and ASCII headers is always UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

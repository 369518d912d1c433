//! Positional decoding of trajectory dump text.
//!
//! All knowledge of the line layout lives in [`parse_line`] and the two
//! constants below. A dump is an 8-line header followed by data lines of
//! whitespace-separated tokens:
//!
//! ```text
//! traj_id year month day hour forecast_hour lat lon height [ignored...]
//! ```

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Field, TdumpError, TdumpResult};
use crate::record::{TimestampComponents, TrajectoryPoint};

/// Number of leading header lines, never interpreted as data.
pub const HEADER_LINES: usize = 8;

/// Minimum token count for a line to be a record.
pub const MIN_FIELDS: usize = 9;

/// Full result of parsing a dump, including skipped-line diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTdump {
    /// Records in file order
    pub points: Vec<TrajectoryPoint>,
    /// Header lines as read (may be fewer than eight for truncated input)
    pub header: Vec<String>,
    /// 1-based line numbers of data lines dropped for having too few tokens
    pub skipped_lines: Vec<usize>,
}

/// Decode a single data line.
///
/// `line_number` is 1-based and only used for error reporting. Returns
/// `Ok(None)` when the line has fewer than [`MIN_FIELDS`] tokens.
pub fn parse_line(line: &str, line_number: usize) -> TdumpResult<Option<TrajectoryPoint>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_FIELDS {
        return Ok(None);
    }

    let point = TrajectoryPoint {
        trajectory_id: decode(&tokens, Field::TrajectoryId, line_number)?,
        timestamp: TimestampComponents {
            year: decode(&tokens, Field::Year, line_number)?,
            month: decode(&tokens, Field::Month, line_number)?,
            day: decode(&tokens, Field::Day, line_number)?,
            hour: decode(&tokens, Field::Hour, line_number)?,
        },
        forecast_hour: decode(&tokens, Field::ForecastHour, line_number)?,
        latitude: decode(&tokens, Field::Latitude, line_number)?,
        longitude: decode(&tokens, Field::Longitude, line_number)?,
        height: decode(&tokens, Field::Height, line_number)?,
    };

    Ok(Some(point))
}

fn decode<T: FromStr>(tokens: &[&str], field: Field, line: usize) -> TdumpResult<T> {
    let token = field.token_index();
    let raw = tokens[token];
    raw.parse::<T>().map_err(|_| TdumpError::FieldDecode {
        line,
        token,
        field,
        value: raw.to_string(),
    })
}

/// Parse dump text, keeping header and skipped-line diagnostics.
pub fn parse_str_detailed(text: &str) -> TdumpResult<ParsedTdump> {
    let mut parsed = ParsedTdump::default();

    for (idx, line) in text.lines().enumerate() {
        let line_number = idx + 1;
        if idx < HEADER_LINES {
            parsed.header.push(line.to_string());
            continue;
        }
        match parse_line(line, line_number)? {
            Some(point) => parsed.points.push(point),
            None => parsed.skipped_lines.push(line_number),
        }
    }

    debug!(
        records = parsed.points.len(),
        skipped = parsed.skipped_lines.len(),
        "Parsed trajectory dump"
    );

    Ok(parsed)
}

/// Parse dump text into records in file order.
pub fn parse_str(text: &str) -> TdumpResult<Vec<TrajectoryPoint>> {
    parse_str_detailed(text).map(|parsed| parsed.points)
}

/// Parse UTF-8 encoded dump bytes, keeping diagnostics. Invalid UTF-8 is
/// [`TdumpError::InvalidEncoding`]; bytes are never replaced lossily.
pub fn parse_bytes_detailed(bytes: &[u8]) -> TdumpResult<ParsedTdump> {
    let text = std::str::from_utf8(bytes)?;
    parse_str_detailed(text)
}

/// Parse UTF-8 encoded dump bytes.
pub fn parse_bytes(bytes: &[u8]) -> TdumpResult<Vec<TrajectoryPoint>> {
    parse_bytes_detailed(bytes).map(|parsed| parsed.points)
}

/// Parse a dump from any reader. The stream is fully read before decoding.
pub fn parse_reader<R: Read>(mut reader: R) -> TdumpResult<Vec<TrajectoryPoint>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes(&buf)
}

/// Parse a dump file from disk.
pub fn parse_file<P: AsRef<Path>>(path: P) -> TdumpResult<Vec<TrajectoryPoint>> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}

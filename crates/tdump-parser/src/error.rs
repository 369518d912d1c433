//! Error types for trajectory dump parsing.

use std::fmt;

use thiserror::Error;

/// Result type for tdump parser operations.
pub type TdumpResult<T> = Result<T, TdumpError>;

/// Positional fields of a tdump data line, in token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TrajectoryId,
    Year,
    Month,
    Day,
    Hour,
    ForecastHour,
    Latitude,
    Longitude,
    Height,
}

impl Field {
    /// Token index of this field within a data line.
    pub fn token_index(self) -> usize {
        match self {
            Field::TrajectoryId => 0,
            Field::Year => 1,
            Field::Month => 2,
            Field::Day => 3,
            Field::Hour => 4,
            Field::ForecastHour => 5,
            Field::Latitude => 6,
            Field::Longitude => 7,
            Field::Height => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::TrajectoryId => "trajectory_id",
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::ForecastHour => "forecast_hour",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Height => "height",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error types for tdump parsing.
///
/// Short lines (fewer than nine tokens) are not errors; they are skipped.
#[derive(Error, Debug)]
pub enum TdumpError {
    /// A positional token could not be decoded to its numeric type.
    #[error("line {line}: cannot decode {field} from token {token} ({value:?})")]
    FieldDecode {
        /// 1-based line number in the original input, header included
        line: usize,
        /// 0-based token index within the line
        token: usize,
        field: Field,
        value: String,
    },

    /// Byte input was not valid UTF-8
    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// No records survived parsing, so there is nothing to render
    #[error("no trajectory records found; nothing to render")]
    EmptyInput,
}

impl TdumpError {
    /// Line number associated with the error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            TdumpError::FieldDecode { line, .. } => Some(*line),
            _ => None,
        }
    }
}

//! HYSPLIT trajectory dump (tdump) parser.
//!
//! This crate turns the text output of a HYSPLIT trajectory run into
//! structured records and groups them per trajectory for rendering.
//!
//! # Format
//!
//! A dump starts with a fixed 8-line header that is not interpreted. Each
//! later line holds whitespace-separated tokens whose first nine are
//! `traj_id year month day hour forecast_hour lat lon height`. Lines with
//! fewer tokens are skipped; a token that fails numeric decoding aborts the
//! whole parse.
//!
//! # Example
//!
//! ```rust
//! use tdump_parser::{group_for_render, parse_str};
//!
//! let text = "h\nh\nh\nh\nh\nh\nh\nh\n\
//!             1 24 01 01 00 0 40.0 -75.0 500.0\n\
//!             1 24 01 01 00 -1 40.1 -75.1 480.0\n";
//! let points = parse_str(text).unwrap();
//! let groups = group_for_render(points).unwrap();
//! let track = groups.get(1).unwrap();
//! assert_eq!(track.start().position(), (40.0, -75.0));
//! assert_eq!(track.end().position(), (40.1, -75.1));
//! ```

pub mod aggregate;
pub mod error;
pub mod parser;
pub mod record;

pub use aggregate::{group, group_for_render, GeoBounds, TrajectoryGroup, TrajectoryGroups};
pub use error::{Field, TdumpError, TdumpResult};
pub use parser::{
    parse_bytes, parse_bytes_detailed, parse_file, parse_line, parse_reader, parse_str, parse_str_detailed,
    ParsedTdump, HEADER_LINES, MIN_FIELDS,
};
pub use record::{TimestampComponents, TrajectoryPoint};

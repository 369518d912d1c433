//! Common test fixtures for trajectory dump tests.
//!
//! Each fixture is a complete dump: an 8-line header followed by data lines.

/// A header shaped like a real HYSPLIT dump header. Line 3 deliberately
/// carries nine numeric tokens so header-skipping is exercised.
pub const HEADER: &str = "     1     1
    NAM    24     1     1     0     0
 1 24 01 01 00 0 40.0 -75.0 500.0
     1 BACKWARD OMEGA
    24     1     1     0  40.000  -75.000   500.0
     1 PRESSURE
# generated for tests
# header line 8
";

/// Two points of one backward trajectory.
pub fn two_point_backward() -> String {
    format!(
        "{}{}",
        HEADER,
        "1 24 01 01 00 0 40.0 -75.0 500.0\n1 24 01 01 00 -1 40.1 -75.1 480.0\n"
    )
}

/// Three trajectories with interleaved lines.
pub fn interleaved_three() -> String {
    format!(
        "{}{}",
        HEADER,
        "\
1 24 01 01 00 0 40.0 -75.0 500.0
2 24 01 01 00 0 40.0 -75.0 1000.0
3 24 01 01 00 0 40.0 -75.0 1500.0
1 24 01 01 01 1 40.2 -74.8 520.0
2 24 01 01 01 1 40.3 -74.6 1010.0
3 24 01 01 01 1 40.4 -74.4 1490.0
1 24 01 01 02 2 40.4 -74.6 540.0
2 24 01 01 02 2 40.6 -74.2 1020.0
"
    )
}

/// Valid lines with a 5-token line and a blank line between them.
pub fn with_short_lines() -> String {
    format!(
        "{}{}",
        HEADER,
        "\
1 24 01 01 00 0 40.0 -75.0 500.0
1 24 01 01 01

1 24 01 01 02 2 40.4 -74.6 540.0
"
    )
}

/// A 9-token line whose latitude token is not numeric (data line 2, file line 10).
pub fn with_bad_latitude() -> String {
    format!(
        "{}{}",
        HEADER,
        "1 24 01 01 00 0 40.0 -75.0 500.0\n1 24 01 01 01 1 NaNx -74.8 520.0\n"
    )
}

/// Header only, no data.
pub fn header_only() -> String {
    HEADER.to_string()
}

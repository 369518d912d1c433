//! Presentation of parsed trajectories.
//!
//! Consumes [`tdump_parser::TrajectoryGroups`] and produces:
//! - a GeoJSON overlay (path plus start/end markers per trajectory),
//! - a standalone Leaflet HTML page embedding that overlay,
//! - a CSV table of the flat records.

pub mod error;
pub mod geojson;
pub mod html;
pub mod table;

pub use error::{MapError, MapResult};
pub use geojson::{
    overlay, trajectory_features, Feature, FeatureCollection, FeatureKind, FeatureProperties,
    Geometry, OverlayStyle,
};
pub use html::{escape_html, MapPage, DEFAULT_ZOOM, DRAW_OVERLAY_JS, LEAFLET_CSS, LEAFLET_JS};
pub use table::{to_csv_string, write_csv};

use tdump_parser::TrajectoryGroups;

/// Map center for a set of groups: the start of the first trajectory.
pub fn default_center(groups: &TrajectoryGroups) -> Option<(f64, f64)> {
    groups.iter().next().map(|g| g.start().position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdump_parser::{group, parse_str};
    use test_utils::fixtures;

    #[test]
    fn test_default_center_is_first_start() {
        let groups = group(parse_str(&fixtures::interleaved_three()).unwrap());
        assert_eq!(default_center(&groups), Some((40.0, -75.0)));
        assert_eq!(default_center(&TrajectoryGroups::default()), None);
    }
}

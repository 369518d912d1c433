//! GeoJSON overlay of grouped trajectories.
//!
//! Each trajectory becomes three features: a `LineString` path through its
//! points, a start marker and an end marker. Coordinates are GeoJSON order,
//! `[longitude, latitude]`.

use serde::{Deserialize, Serialize};
use tdump_parser::{TrajectoryGroup, TrajectoryGroups, TrajectoryPoint};

/// Colors and line weight used for the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub path_color: String,
    pub path_weight: f64,
    pub path_opacity: f64,
    pub start_color: String,
    pub end_color: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            path_color: "blue".to_string(),
            path_weight: 2.5,
            path_opacity: 0.8,
            start_color: "green".to_string(),
            end_color: "red".to_string(),
        }
    }
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Features of one kind, in collection order.
    pub fn features_of(&self, kind: FeatureKind) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |f| f.properties.kind == kind)
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub geometry: Geometry,

    pub properties: FeatureProperties,
}

impl Feature {
    pub fn point(lon: f64, lat: f64, properties: FeatureProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: Geometry::Point {
                coordinates: [lon, lat],
            },
            properties,
        }
    }

    pub fn line_string(coordinates: Vec<[f64; 2]>, properties: FeatureProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: Geometry::LineString { coordinates },
            properties,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// GeoJSON geometry types used by the overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        /// `[longitude, latitude]`
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
}

/// Role of a feature within a trajectory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Path,
    Start,
    End,
}

/// Properties read by the map page to style and label features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureProperties {
    pub trajectory_id: i64,
    pub kind: FeatureKind,
    pub color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_hour: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl FeatureProperties {
    fn new(trajectory_id: i64, kind: FeatureKind, color: &str) -> Self {
        Self {
            trajectory_id,
            kind,
            color: color.to_string(),
            tooltip: None,
            popup: None,
            weight: None,
            opacity: None,
            point_count: None,
            forecast_hour: None,
            height: None,
        }
    }
}

fn lon_lat(point: &TrajectoryPoint) -> [f64; 2] {
    [point.longitude, point.latitude]
}

fn marker(
    group: &TrajectoryGroup,
    point: &TrajectoryPoint,
    kind: FeatureKind,
    color: &str,
    popup: &str,
) -> Feature {
    let mut props = FeatureProperties::new(group.id(), kind, color);
    props.popup = Some(popup.to_string());
    props.forecast_hour = Some(point.forecast_hour);
    props.height = Some(point.height);

    let suffix = match kind {
        FeatureKind::Start => "start",
        FeatureKind::End => "end",
        FeatureKind::Path => "path",
    };
    Feature::point(point.longitude, point.latitude, props)
        .with_id(format!("trajectory-{}-{}", group.id(), suffix))
}

/// Path, start marker and end marker for one trajectory.
pub fn trajectory_features(group: &TrajectoryGroup, style: &OverlayStyle) -> [Feature; 3] {
    let mut props = FeatureProperties::new(group.id(), FeatureKind::Path, &style.path_color);
    props.tooltip = Some(format!("Trajectory {}", group.id()));
    props.weight = Some(style.path_weight);
    props.opacity = Some(style.path_opacity);
    props.point_count = Some(group.len());

    let coordinates = group.points().iter().map(lon_lat).collect();
    let path = Feature::line_string(coordinates, props)
        .with_id(format!("trajectory-{}-path", group.id()));

    [
        path,
        marker(group, group.start(), FeatureKind::Start, &style.start_color, "Start"),
        marker(group, group.end(), FeatureKind::End, &style.end_color, "End"),
    ]
}

/// Overlay for every trajectory, in group order.
pub fn overlay(groups: &TrajectoryGroups, style: &OverlayStyle) -> FeatureCollection {
    let mut fc = FeatureCollection::new();
    for group in groups {
        fc.features.extend(trajectory_features(group, style));
    }
    fc
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdump_parser::{group, parse_str};
    use test_utils::fixtures;

    #[test]
    fn test_feature_collection_new() {
        let fc = FeatureCollection::new();
        assert_eq!(fc.type_, "FeatureCollection");
        assert!(fc.features.is_empty());
    }

    #[test]
    fn test_overlay_has_three_features_per_trajectory() {
        let groups = group(parse_str(&fixtures::interleaved_three()).unwrap());
        let fc = overlay(&groups, &OverlayStyle::default());

        assert_eq!(fc.features.len(), 9);
        assert_eq!(fc.features_of(FeatureKind::Path).count(), 3);
        assert_eq!(fc.features_of(FeatureKind::Start).count(), 3);
        assert_eq!(fc.features_of(FeatureKind::End).count(), 3);

        let ids: Vec<i64> = fc
            .features_of(FeatureKind::Path)
            .map(|f| f.properties.trajectory_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_path_and_markers_use_lon_lat_order() {
        let groups = group(parse_str(&fixtures::two_point_backward()).unwrap());
        let fc = overlay(&groups, &OverlayStyle::default());

        match &fc.features[0].geometry {
            Geometry::LineString { coordinates } => {
                assert_eq!(coordinates, &vec![[-75.0, 40.0], [-75.1, 40.1]]);
            }
            other => panic!("Expected LineString geometry, got {:?}", other),
        }
        assert_eq!(
            fc.features[1].geometry,
            Geometry::Point {
                coordinates: [-75.0, 40.0]
            }
        );
        assert_eq!(
            fc.features[2].geometry,
            Geometry::Point {
                coordinates: [-75.1, 40.1]
            }
        );
    }

    #[test]
    fn test_default_style_applied() {
        let groups = group(parse_str(&fixtures::two_point_backward()).unwrap());
        let fc = overlay(&groups, &OverlayStyle::default());

        let path = &fc.features[0].properties;
        assert_eq!(path.color, "blue");
        assert_eq!(path.weight, Some(2.5));
        assert_eq!(path.opacity, Some(0.8));
        assert_eq!(path.tooltip.as_deref(), Some("Trajectory 1"));
        assert_eq!(path.point_count, Some(2));

        assert_eq!(fc.features[1].properties.color, "green");
        assert_eq!(fc.features[1].properties.popup.as_deref(), Some("Start"));
        assert_eq!(fc.features[2].properties.color, "red");
        assert_eq!(fc.features[2].properties.popup.as_deref(), Some("End"));
        assert_eq!(fc.features[2].properties.forecast_hour, Some(-1));
    }

    #[test]
    fn test_serializes_as_geojson() {
        let groups = group(parse_str(&fixtures::two_point_backward()).unwrap());
        let json = serde_json::to_value(overlay(&groups, &OverlayStyle::default())).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "LineString");
        assert_eq!(json["features"][1]["geometry"]["type"], "Point");
        assert_eq!(json["features"][1]["properties"]["kind"], "start");
        assert_eq!(json["features"][0]["id"], "trajectory-1-path");
        assert!(json["features"][1]["properties"].get("tooltip").is_none());
    }
}

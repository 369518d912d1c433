//! Dump text to map overlay: parse, group, build features.
//!
//! Shared by the command-line subcommands and both dashboards.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tdump_parser::{
    group_for_render, parse_bytes_detailed, parse_str_detailed, ParsedTdump, TdumpResult,
    TrajectoryGroups, TrajectoryPoint,
};
use tracing::info;
use trajectory_map::{default_center, overlay, write_csv, FeatureCollection, MapPage, OverlayStyle};

/// A parsed dump ready for display.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub points: Vec<TrajectoryPoint>,
    pub groups: TrajectoryGroups,
    /// 1-based line numbers of short data lines that were skipped
    pub skipped_lines: Vec<usize>,
    pub overlay: FeatureCollection,
}

impl Rendered {
    /// Parse and group dump text. Zero records is an error.
    pub fn from_text(text: &str, style: &OverlayStyle) -> TdumpResult<Self> {
        Self::from_parsed(parse_str_detailed(text)?, style)
    }

    /// Like [`Rendered::from_text`] for raw bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8], style: &OverlayStyle) -> TdumpResult<Self> {
        Self::from_parsed(parse_bytes_detailed(bytes)?, style)
    }

    fn from_parsed(parsed: ParsedTdump, style: &OverlayStyle) -> TdumpResult<Self> {
        let groups = group_for_render(parsed.points.iter().copied())?;
        let overlay = overlay(&groups, style);

        info!(
            trajectories = groups.len(),
            points = parsed.points.len(),
            skipped = parsed.skipped_lines.len(),
            "Rendered trajectory dump"
        );

        Ok(Self {
            points: parsed.points,
            groups,
            skipped_lines: parsed.skipped_lines,
            overlay,
        })
    }

    /// Start of the first trajectory.
    pub fn center(&self) -> (f64, f64) {
        default_center(&self.groups).unwrap_or((0.0, 0.0))
    }

    pub fn to_response(&self, center: (f64, f64), zoom: u8) -> RenderResponse {
        RenderResponse {
            trajectories: self.groups.len(),
            points: self.points.len(),
            skipped_lines: self.skipped_lines.clone(),
            center: [center.0, center.1],
            zoom,
            overlay: self.overlay.clone(),
            run: None,
        }
    }

    /// Write whichever outputs were requested.
    pub fn write_outputs(&self, outputs: &OutputPaths, page: &PageSettings) -> Result<()> {
        if let Some(path) = &outputs.html {
            let html = MapPage::new(page.title.clone(), page.center, &self.overlay)
                .with_zoom(page.zoom)
                .render()?;
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write map: {:?}", path))?;
            info!(path = ?path, "Wrote map page");
        }

        if let Some(path) = &outputs.geojson {
            let json = serde_json::to_string_pretty(&self.overlay)?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write GeoJSON: {:?}", path))?;
            info!(path = ?path, "Wrote GeoJSON overlay");
        }

        if let Some(path) = &outputs.csv {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create CSV: {:?}", path))?;
            write_csv(&self.points, file)
                .with_context(|| format!("Failed to write CSV: {:?}", path))?;
            info!(path = ?path, "Wrote trajectory table");
        }

        Ok(())
    }
}

/// Files written by the command-line subcommands.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub html: Option<PathBuf>,
    pub geojson: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

/// Title and initial view of a standalone map page.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub title: String,
    pub center: (f64, f64),
    pub zoom: u8,
}

/// Body returned by `POST /api/run` and `POST /api/tdump`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResponse {
    pub trajectories: usize,
    pub points: usize,
    pub skipped_lines: Vec<usize>,
    /// `[latitude, longitude]`, Leaflet order
    pub center: [f64; 2],
    pub zoom: u8,
    pub overlay: FeatureCollection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSummary>,
}

/// Details of the model invocation behind a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub elapsed_ms: u64,
    /// Control file exactly as written
    pub control: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdump_parser::TdumpError;
    use test_utils::fixtures;

    #[test]
    fn test_from_text() {
        let rendered =
            Rendered::from_text(&fixtures::interleaved_three(), &OverlayStyle::default()).unwrap();
        assert_eq!(rendered.groups.len(), 3);
        assert_eq!(rendered.points.len(), 8);
        assert_eq!(rendered.overlay.features.len(), 9);
        assert_eq!(rendered.center(), (40.0, -75.0));
    }

    #[test]
    fn test_skipped_lines_reported() {
        let rendered =
            Rendered::from_text(&fixtures::with_short_lines(), &OverlayStyle::default()).unwrap();
        assert_eq!(rendered.points.len(), 2);
        assert_eq!(rendered.skipped_lines, vec![10, 11]);
    }

    #[test]
    fn test_header_only_is_empty_input() {
        let err =
            Rendered::from_text(&fixtures::header_only(), &OverlayStyle::default()).unwrap_err();
        assert!(matches!(err, TdumpError::EmptyInput));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = Rendered::from_bytes(&[0xff, 0xfe, b'1'], &OverlayStyle::default()).unwrap_err();
        assert!(matches!(err, TdumpError::InvalidEncoding(_)));
    }

    #[test]
    fn test_from_bytes_matches_from_text() {
        let text = fixtures::with_short_lines();
        let rendered = Rendered::from_bytes(text.as_bytes(), &OverlayStyle::default()).unwrap();
        assert_eq!(rendered.points.len(), 2);
        assert_eq!(rendered.skipped_lines, vec![10, 11]);
        assert_eq!(rendered.center(), (40.0, -75.0));
    }

    #[test]
    fn test_response_shape() {
        let rendered =
            Rendered::from_text(&fixtures::two_point_backward(), &OverlayStyle::default()).unwrap();
        let json = serde_json::to_value(rendered.to_response((40.0, -75.0), 6)).unwrap();

        assert_eq!(json["trajectories"], 1);
        assert_eq!(json["points"], 2);
        assert_eq!(json["center"], serde_json::json!([40.0, -75.0]));
        assert_eq!(json["overlay"]["type"], "FeatureCollection");
        assert!(json.get("run").is_none());
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = OutputPaths {
            html: Some(dir.path().join("map.html")),
            geojson: Some(dir.path().join("overlay.geojson")),
            csv: Some(dir.path().join("points.csv")),
        };
        let page = PageSettings {
            title: "Trajectory Map".to_string(),
            center: (40.0, -75.0),
            zoom: 6,
        };

        let rendered =
            Rendered::from_text(&fixtures::two_point_backward(), &OverlayStyle::default()).unwrap();
        rendered.write_outputs(&outputs, &page).unwrap();

        let html = std::fs::read_to_string(dir.path().join("map.html")).unwrap();
        assert!(html.contains("Trajectory Map"));

        let geojson: FeatureCollection = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("overlay.geojson")).unwrap(),
        )
        .unwrap();
        assert_eq!(geojson.features.len(), 3);

        let csv = std::fs::read_to_string(dir.path().join("points.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_no_outputs_requested() {
        let rendered =
            Rendered::from_text(&fixtures::two_point_backward(), &OverlayStyle::default()).unwrap();
        let page = PageSettings {
            title: String::new(),
            center: (0.0, 0.0),
            zoom: 6,
        };
        rendered
            .write_outputs(&OutputPaths::default(), &page)
            .unwrap();
    }
}

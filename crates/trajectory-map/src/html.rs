//! Standalone Leaflet map page with an embedded trajectory overlay.

use crate::error::MapResult;
use crate::geojson::FeatureCollection;

/// Default zoom used when framing a run.
pub const DEFAULT_ZOOM: u8 = 6;

pub const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Script that draws an overlay produced by [`crate::overlay`] on a map
/// named `map`. Shared with the dashboards served by the viewer.
pub const DRAW_OVERLAY_JS: &str = r#"
function drawOverlay(map, layer, overlay) {
    layer.clearLayers();
    L.geoJSON(overlay, {
        style: function (f) {
            return { color: f.properties.color, weight: f.properties.weight, opacity: f.properties.opacity };
        },
        pointToLayer: function (f, latlng) {
            return L.circleMarker(latlng, { radius: 7, color: f.properties.color, fillColor: f.properties.color, fillOpacity: 0.9 });
        },
        onEachFeature: function (f, l) {
            if (f.properties.tooltip) { l.bindTooltip(f.properties.tooltip); }
            if (f.properties.popup) {
                l.bindPopup(f.properties.popup + " (trajectory " + f.properties.trajectory_id + ", " + f.properties.forecast_hour + " h, " + f.properties.height + " m)");
            }
        }
    }).addTo(layer);
}
"#;

/// A rendered map of one parse/run.
#[derive(Debug, Clone)]
pub struct MapPage<'a> {
    pub title: String,
    /// `(latitude, longitude)` the map opens on
    pub center: (f64, f64),
    pub zoom: u8,
    pub overlay: &'a FeatureCollection,
}

impl<'a> MapPage<'a> {
    pub fn new(title: impl Into<String>, center: (f64, f64), overlay: &'a FeatureCollection) -> Self {
        Self {
            title: title.into(),
            center,
            zoom: DEFAULT_ZOOM,
            overlay,
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Full HTML document.
    pub fn render(&self) -> MapResult<String> {
        let overlay_json = script_safe(&serde_json::to_string(self.overlay)?);
        let title = escape_html(&self.title);
        let (lat, lon) = self.center;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{css}">
    <script src="{js}"></script>
    <style>
        html, body {{ margin: 0; height: 100%; font-family: sans-serif; }}
        h1 {{ margin: 0; padding: 10px 20px; font-size: 1.3rem; background: #1a365d; color: white; }}
        #map {{ height: calc(100% - 48px); }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div id="map"></div>
    <script>
{draw}
        const map = L.map("map").setView([{lat}, {lon}], {zoom});
        L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
            maxZoom: 18,
            attribution: "&copy; OpenStreetMap contributors"
        }}).addTo(map);
        const layer = L.layerGroup().addTo(map);
        drawOverlay(map, layer, {overlay});
    </script>
</body>
</html>
"#,
            title = title,
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            draw = DRAW_OVERLAY_JS,
            lat = lat,
            lon = lon,
            zoom = self.zoom,
            overlay = overlay_json,
        ))
    }
}

/// Escape text for an HTML element body.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON is valid JavaScript, but `</script>` inside a string would end the
/// enclosing tag.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::{overlay, OverlayStyle};
    use tdump_parser::{group, parse_str};
    use test_utils::fixtures;

    #[test]
    fn test_render_embeds_overlay_and_view() {
        let groups = group(parse_str(&fixtures::two_point_backward()).unwrap());
        let fc = overlay(&groups, &OverlayStyle::default());
        let html = MapPage::new("Trajectory Map", (40.0, -75.0), &fc)
            .render()
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Trajectory Map</title>"));
        assert!(html.contains("setView([40, -75], 6)"));
        assert!(html.contains("\"FeatureCollection\""));
        assert!(html.contains("Trajectory 1"));
        assert!(html.contains("{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"));
    }

    #[test]
    fn test_custom_zoom() {
        let fc = FeatureCollection::new();
        let html = MapPage::new("x", (0.0, 0.0), &fc).with_zoom(3).render().unwrap();
        assert!(html.contains("setView([0, 0], 3)"));
    }

    #[test]
    fn test_title_is_escaped() {
        let fc = FeatureCollection::new();
        let html = MapPage::new("<b>run & more</b>", (0.0, 0.0), &fc)
            .render()
            .unwrap();
        assert!(html.contains("&lt;b&gt;run &amp; more&lt;/b&gt;"));
        assert!(!html.contains("<b>run"));
    }

    #[test]
    fn test_script_safe() {
        assert_eq!(script_safe(r#"{"a":"</script>"}"#), r#"{"a":"<\/script>"}"#);
    }
}

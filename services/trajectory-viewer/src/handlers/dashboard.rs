//! HTML dashboards: the model-run generator and the dump upload viewer.
//!
//! Both pages draw the overlay returned by the JSON API with the same
//! script used for standalone map pages.

use std::sync::Arc;

use axum::{extract::Extension, response::Html};
use trajectory_map::{DRAW_OVERLAY_JS, LEAFLET_CSS, LEAFLET_JS};

use crate::state::AppState;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>__TITLE__</title>
    <link rel="stylesheet" href="__LEAFLET_CSS__">
    <script src="__LEAFLET_JS__"></script>
    <style>
        * { box-sizing: border-box; }
        html, body { margin: 0; height: 100%; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; }
        header { display: flex; align-items: center; gap: 24px; padding: 10px 20px; background: #1a365d; color: white; }
        header h1 { margin: 0; font-size: 1.3rem; }
        header a { color: #cbd5e0; text-decoration: none; }
        header a.active { color: white; font-weight: 600; }
        main { display: flex; height: calc(100% - 48px); }
        aside { width: 300px; padding: 16px; overflow-y: auto; background: #f7fafc; border-right: 1px solid #e2e8f0; }
        aside label { display: block; margin-top: 10px; font-size: 0.85rem; color: #4a5568; }
        aside input, aside select { width: 100%; padding: 6px; margin-top: 2px; }
        aside button { width: 100%; margin-top: 16px; padding: 8px; background: #2b6cb0; color: white; border: 0; border-radius: 4px; cursor: pointer; }
        aside button:disabled { background: #a0aec0; cursor: wait; }
        #status { margin-top: 14px; font-size: 0.85rem; white-space: pre-wrap; }
        #status.error { color: #c53030; }
        #map { flex: 1; }
    </style>
</head>
<body>
    <header>
        <h1>HYSPLIT Trajectories</h1>
        <a href="/" class="__GENERATOR_CLASS__">Generate</a>
        <a href="/viewer" class="__VIEWER_CLASS__">View dump</a>
    </header>
    <main>
        <aside>
__PANEL__
            <div id="status"></div>
        </aside>
        <div id="map"></div>
    </main>
    <script>
__DRAW_OVERLAY__
        const map = L.map("map").setView([__LAT__, __LON__], __ZOOM__);
        L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
            maxZoom: 18,
            attribution: "&copy; OpenStreetMap contributors"
        }).addTo(map);
        const layer = L.layerGroup().addTo(map);
        const statusBox = document.getElementById("status");

        function setStatus(text, isError) {
            statusBox.textContent = text;
            statusBox.className = isError ? "error" : "";
        }

        async function showResult(resp) {
            const body = await resp.json().catch(() => null);
            if (!resp.ok) {
                const detail = body && body.detail ? body.detail : resp.statusText;
                setStatus("Error (" + resp.status + "): " + detail, true);
                return;
            }
            drawOverlay(map, layer, body.overlay);
            map.setView(body.center, body.zoom);
            let text = body.trajectories + " trajectories, " + body.points + " points";
            if (body.skipped_lines.length > 0) {
                text += "\nSkipped short lines: " + body.skipped_lines.join(", ");
            }
            if (body.run) {
                text += "\nRun " + body.run.run_id + " took " + (body.run.elapsed_ms / 1000).toFixed(1) + " s";
            }
            setStatus(text, false);
        }
__SCRIPT__
    </script>
</body>
</html>
"#;

const GENERATOR_PANEL: &str = r#"            <form id="run-form">
                <label>Start date <input type="date" name="date"></label>
                <label>Start hour (UTC) <input type="number" name="hour" min="0" max="23" placeholder="now"></label>
                <label>Latitude <input type="number" name="latitude" step="any" value="40.0" required></label>
                <label>Longitude <input type="number" name="longitude" step="any" value="-75.0" required></label>
                <label>Height (m AGL) <input type="number" name="height" step="any" value="500" required></label>
                <label>Duration (hours) <input type="number" name="duration_hours" min="1" value="24" required></label>
                <label>Direction
                    <select name="direction">
                        <option value="backward">Backward</option>
                        <option value="forward">Forward</option>
                    </select>
                </label>
                <label>Meteorology
                    <select name="met_type">
                        <option value="GFS">GFS</option>
                        <option value="NAM">NAM</option>
                        <option value="RAP">RAP</option>
                    </select>
                </label>
                <button type="submit">Run trajectory</button>
            </form>"#;

const GENERATOR_SCRIPT: &str = r#"
        const form = document.getElementById("run-form");
        form.addEventListener("submit", async (event) => {
            event.preventDefault();
            const data = new FormData(form);
            const hour = data.get("hour");
            const request = {
                date: data.get("date") || null,
                hour: hour === "" ? null : Number(hour),
                latitude: Number(data.get("latitude")),
                longitude: Number(data.get("longitude")),
                height: Number(data.get("height")),
                duration_hours: Number(data.get("duration_hours")),
                direction: data.get("direction"),
                met_type: data.get("met_type")
            };
            const button = form.querySelector("button");
            button.disabled = true;
            setStatus("Running model...", false);
            try {
                const resp = await fetch("/api/run", {
                    method: "POST",
                    headers: { "Content-Type": "application/json" },
                    body: JSON.stringify(request)
                });
                await showResult(resp);
            } catch (err) {
                setStatus("Request failed: " + err, true);
            } finally {
                button.disabled = false;
            }
        });
"#;

const VIEWER_PANEL: &str = r#"            <form id="upload-form">
                <label>Trajectory dump file <input type="file" name="tdump" required></label>
                <button type="submit">Show trajectories</button>
            </form>"#;

const VIEWER_SCRIPT: &str = r#"
        const form = document.getElementById("upload-form");
        form.addEventListener("submit", async (event) => {
            event.preventDefault();
            const file = form.querySelector("input[type=file]").files[0];
            if (!file) {
                setStatus("Choose a file first", true);
                return;
            }
            setStatus("Parsing " + file.name + "...", false);
            try {
                const resp = await fetch("/api/tdump", {
                    method: "POST",
                    headers: { "Content-Type": "text/plain" },
                    body: file
                });
                await showResult(resp);
            } catch (err) {
                setStatus("Request failed: " + err, true);
            }
        });
"#;

/// Which dashboard to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    Generator,
    Viewer,
}

/// Fill the shared page template for one dashboard.
pub fn render_dashboard(dashboard: Dashboard, center: (f64, f64), zoom: u8) -> String {
    let (title, panel, script, generator_class, viewer_class) = match dashboard {
        Dashboard::Generator => (
            "Trajectory Generator",
            GENERATOR_PANEL,
            GENERATOR_SCRIPT,
            "active",
            "",
        ),
        Dashboard::Viewer => (
            "Trajectory Viewer",
            VIEWER_PANEL,
            VIEWER_SCRIPT,
            "",
            "active",
        ),
    };

    PAGE_TEMPLATE
        .replace("__TITLE__", title)
        .replace("__LEAFLET_CSS__", LEAFLET_CSS)
        .replace("__LEAFLET_JS__", LEAFLET_JS)
        .replace("__GENERATOR_CLASS__", generator_class)
        .replace("__VIEWER_CLASS__", viewer_class)
        .replace("__PANEL__", panel)
        .replace("__DRAW_OVERLAY__", DRAW_OVERLAY_JS)
        .replace("__LAT__", &center.0.to_string())
        .replace("__LON__", &center.1.to_string())
        .replace("__ZOOM__", &zoom.to_string())
        .replace("__SCRIPT__", script)
}

/// GET / - Model-run generator
pub async fn generator_handler(Extension(state): Extension<Arc<AppState>>) -> Html<String> {
    Html(render_dashboard(
        Dashboard::Generator,
        (40.0, -75.0),
        state.config.map.zoom,
    ))
}

/// GET /viewer - Upload an existing dump
pub async fn viewer_handler() -> Html<String> {
    Html(render_dashboard(Dashboard::Viewer, (20.0, 0.0), 2))
}

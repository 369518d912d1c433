//! JSON API used by the dashboards.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use hysplit_runner::{ControlFile, Direction, MetType, RunnerError, RunnerResult};
use serde::{Deserialize, Serialize};
use tdump_parser::TdumpResult;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::pipeline::{Rendered, RenderResponse, RunSummary};
use crate::state::AppState;

/// Parameters of a model run. Omitted fields take the generator form's
/// defaults; a missing date or hour means "now" (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Meters above ground
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_duration")]
    pub duration_hours: u32,
    #[serde(default = "default_direction")]
    pub direction: Direction,
    #[serde(default = "default_met_type")]
    pub met_type: MetType,
}

fn default_latitude() -> f64 {
    40.0
}

fn default_longitude() -> f64 {
    -75.0
}

fn default_height() -> f64 {
    500.0
}

fn default_duration() -> u32 {
    24
}

fn default_direction() -> Direction {
    Direction::Backward
}

fn default_met_type() -> MetType {
    MetType::Gfs
}

impl RunRequest {
    /// Build the control file, filling a missing date or hour from `now`.
    pub fn to_control(&self, now: NaiveDateTime) -> RunnerResult<ControlFile> {
        let date = self.date.unwrap_or_else(|| now.date());
        let hour = self.hour.unwrap_or_else(|| now.hour());
        let start = date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| RunnerError::InvalidControl(format!("hour {} out of range", hour)))?;

        Ok(ControlFile::from_datetime(
            start,
            self.latitude,
            self.longitude,
            self.height,
            self.duration_hours,
            self.direction,
            self.met_type,
        ))
    }
}

fn track_parse(
    state: &AppState,
    source: &'static str,
    result: TdumpResult<Rendered>,
) -> Result<Rendered, ApiError> {
    match result {
        Ok(rendered) => {
            state.metrics.record_parse(source);
            Ok(rendered)
        }
        Err(e) => {
            state.metrics.record_parse_error(source);
            Err(e.into())
        }
    }
}

/// POST /api/run - Run the model and return its trajectories
#[instrument(skip_all, fields(run_id = tracing::field::Empty))]
pub async fn run_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<RenderResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let run_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("run_id", run_id.as_str());

    let control = request.to_control(Utc::now().naive_utc())?;
    info!(
        latitude = control.latitude,
        longitude = control.longitude,
        height = control.height,
        duration_hours = control.duration_hours,
        direction = ?control.direction,
        met_type = %control.met_type,
        "Model run requested"
    );

    let run = state.run_model(&control).await?;
    let rendered = track_parse(
        &state,
        "run",
        Rendered::from_bytes(&run.tdump, &state.config.map.style),
    )?;

    let mut response = rendered.to_response(
        (control.latitude, control.longitude),
        state.config.map.zoom,
    );
    response.run = Some(RunSummary {
        run_id,
        elapsed_ms: run.elapsed.as_millis() as u64,
        control: control.render(),
    });

    Ok(Json(response))
}

/// POST /api/tdump - Parse an uploaded trajectory dump
pub async fn tdump_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RenderResponse>, ApiError> {
    info!(bytes = body.len(), "Trajectory dump uploaded");

    let rendered = track_parse(
        &state,
        "upload",
        Rendered::from_bytes(&body, &state.config.map.style),
    )?;
    let response = rendered.to_response(rendered.center(), state.config.map.zoom);
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 34, 0)
            .unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let request: RunRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.latitude, 40.0);
        assert_eq!(request.longitude, -75.0);
        assert_eq!(request.height, 500.0);
        assert_eq!(request.duration_hours, 24);
        assert_eq!(request.direction, Direction::Backward);
        assert_eq!(request.met_type, MetType::Gfs);

        let control = request.to_control(noon()).unwrap();
        assert_eq!(control.render().lines().next(), Some("24 03 15 12"));
    }

    #[test]
    fn test_request_explicit_start() {
        let request: RunRequest = serde_json::from_str(
            r#"{"date": "2023-07-04", "hour": 6, "direction": "forward", "met_type": "NAM"}"#,
        )
        .unwrap();
        let control = request.to_control(noon()).unwrap();
        let text = control.render();
        assert!(text.starts_with("23 07 04 06\n"));
        assert!(text.contains("\n24\n"));
        assert!(text.ends_with("NAM\n"));
    }

    #[test]
    fn test_hour_out_of_range() {
        let request: RunRequest = serde_json::from_str(r#"{"hour": 24}"#).unwrap();
        let err = request.to_control(noon()).unwrap_err();
        assert!(err.is_invalid_input());
    }
}

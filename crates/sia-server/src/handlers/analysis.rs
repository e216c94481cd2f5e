//! Handlers that record external analyses into a session's context

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::sessions::session_not_found;
use crate::{AppError, AppState};
use sia_core::{
    CattleDetectionSection, Error, FinancialReport, FrameMetrics, MilkForecastSection,
    SimulationSection,
};

/// Request body for PUT /api/sessions/:id/milk-forecast
#[derive(Debug, Deserialize)]
pub struct MilkForecastRequest {
    /// Monthly production history (liters)
    pub history: Vec<f64>,
    /// Forecast values for the following months
    pub forecast: Vec<f64>,
}

/// One processed video frame
#[derive(Debug, Deserialize)]
pub struct FrameInput {
    pub frame: usize,
    pub inference_secs: f64,
    pub cows: usize,
}

/// Request body for PUT /api/sessions/:id/cattle-detection
#[derive(Debug, Deserialize)]
pub struct CattleDetectionRequest {
    pub filename: String,
    pub frames: Vec<FrameInput>,
}

fn invalid(err: Error) -> AppError {
    match err {
        Error::InvalidData(msg) => AppError::bad_request(&msg),
        other => other.into(),
    }
}

/// PUT /api/sessions/:id/simulation - Record a simulation and its ROI
pub async fn record_simulation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(section): Json<SimulationSection>,
) -> Result<Json<FinancialReport>, AppError> {
    if section.rainfall_mm < 0.0 {
        return Err(AppError::bad_request("rainfall_mm cannot be negative"));
    }
    if !section.predicted_yield.is_finite() {
        return Err(AppError::bad_request("predicted_yield must be a number"));
    }

    let report = state
        .sessions
        .update(&id, |session| {
            session.context.record_simulation(&state.engine, section)
        })
        .await
        .ok_or_else(session_not_found)?;

    Ok(Json(report))
}

/// PUT /api/sessions/:id/milk-forecast - Record a milk production forecast
pub async fn record_milk_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<MilkForecastRequest>,
) -> Result<Json<MilkForecastSection>, AppError> {
    let section = MilkForecastSection::from_series(&req.history, &req.forecast).map_err(invalid)?;

    state
        .sessions
        .update(&id, |session| {
            session.context.set_milk_forecast(section.clone())
        })
        .await
        .ok_or_else(session_not_found)?;

    info!(session_id = %id, months = section.forecast_months, "Recorded milk forecast");
    Ok(Json(section))
}

/// PUT /api/sessions/:id/cattle-detection - Record a cattle counting run
pub async fn record_cattle_detection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CattleDetectionRequest>,
) -> Result<Json<CattleDetectionSection>, AppError> {
    if let Some(bad) = req.frames.iter().find(|f| f.inference_secs < 0.0) {
        return Err(AppError::bad_request(&format!(
            "Frame {}: inference time cannot be negative",
            bad.frame
        )));
    }

    let frames: Vec<FrameMetrics> = req
        .frames
        .iter()
        .map(|f| FrameMetrics::new(f.frame, f.inference_secs, f.cows))
        .collect();
    let section = CattleDetectionSection::from_frames(&frames, &req.filename).map_err(invalid)?;

    state
        .sessions
        .update(&id, |session| {
            session.context.set_cattle_detection(section.clone())
        })
        .await
        .ok_or_else(session_not_found)?;

    info!(session_id = %id, frames = section.frames_processed, "Recorded cattle detection");
    Ok(Json(section))
}

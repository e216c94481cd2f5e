//! Stateless ROI calculation handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use sia_core::FinancialReport;

/// Request body for POST /api/roi
#[derive(Debug, Deserialize)]
pub struct RoiRequest {
    pub crop: String,
    /// Tons per hectare
    pub predicted_yield: f64,
    #[serde(default)]
    pub fertilizer_used: bool,
    #[serde(default)]
    pub irrigation_used: bool,
}

/// POST /api/roi - Score one prediction without touching any session
pub async fn calculate_roi(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RoiRequest>,
) -> Result<Json<FinancialReport>, AppError> {
    // Blank or unknown crops are priced at the default rate
    let crop = req.crop.trim();
    if !req.predicted_yield.is_finite() {
        return Err(AppError::bad_request("predicted_yield must be a number"));
    }

    Ok(Json(state.engine.compute(
        crop,
        req.predicted_yield,
        req.fertilizer_used,
        req.irrigation_used,
    )))
}

//! Handlers for demand prediction and prediction history.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ridecast_core::history::HistoryEntry;
use ridecast_core::request::{
    GeoPredictionRequest, PredictionRequest, RawGeoPredictionRequest, RawPredictionRequest,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::SuccessResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryBody {
    pub history: Vec<HistoryEntry>,
}

// ---------------------------------------------------------------------------
// POST /predict -- zone-variant prediction
// ---------------------------------------------------------------------------

/// Validate the request, run it through the pipeline, and return the
/// estimate with its narration and chart series.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawPredictionRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(raw) = payload?;
    let request = PredictionRequest::try_from(raw)?;

    let prediction = state.predictions.predict(&request).await?;
    tracing::info!(
        zone = %prediction.zone,
        prediction = prediction.prediction,
        hour = request.hour(),
        "Prediction served"
    );

    Ok(Json(SuccessResponse::new(prediction)))
}

// ---------------------------------------------------------------------------
// POST /predict/geo -- coordinate-based prediction
// ---------------------------------------------------------------------------

/// Geo-variant prediction; the returned `zone` is the classified demand level.
pub async fn predict_geo(
    State(state): State<AppState>,
    payload: Result<Json<RawGeoPredictionRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(raw) = payload?;
    let request = GeoPredictionRequest::try_from(raw)?;

    let prediction = state.predictions.predict_geo(&request).await?;
    tracing::info!(
        zone = %prediction.zone,
        prediction = prediction.prediction,
        latitude = request.latitude(),
        longitude = request.longitude(),
        "Geo prediction served"
    );

    Ok(Json(SuccessResponse::new(prediction)))
}

// ---------------------------------------------------------------------------
// GET /history -- recent predictions
// ---------------------------------------------------------------------------

/// Recent predictions, newest first.
pub async fn history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let history = state.predictions.history().await;
    Ok(Json(SuccessResponse::new(HistoryBody { history })))
}

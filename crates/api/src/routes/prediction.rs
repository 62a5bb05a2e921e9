use axum::routing::{get, post};
use axum::Router;

use crate::handlers::prediction;
use crate::state::AppState;

/// Prediction routes.
///
/// ```text
/// POST /predict           -> predict
/// POST /predict/geo       -> predict_geo
/// GET  /history           -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(prediction::predict))
        .route("/predict/geo", post(prediction::predict_geo))
        .route("/history", get(prediction::history))
}

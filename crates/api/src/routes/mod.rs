pub mod allocation;
pub mod health;
pub mod prediction;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /predict                 zone-variant prediction (POST)
/// /predict/geo             geo-variant prediction (POST)
/// /history                 recent predictions (GET)
///
/// /allocation              allocate over zone totals (POST)
/// /allocation/rides        aggregate ride rows, then allocate (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(prediction::router())
        .nest("/allocation", allocation::router())
}

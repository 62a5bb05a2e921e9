use axum::routing::post;
use axum::Router;

use crate::handlers::allocation;
use crate::state::AppState;

/// Allocation routes mounted at `/allocation`.
///
/// ```text
/// POST /                  -> allocate
/// POST /rides             -> allocate_rides
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(allocation::allocate))
        .route("/rides", post(allocation::allocate_rides))
}

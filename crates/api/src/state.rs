use std::sync::Arc;

use ridecast_core::pipeline::PredictionService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Prediction pipeline and the history store it owns.
    pub predictions: Arc<PredictionService>,
}

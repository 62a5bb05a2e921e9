#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ridecast_api::config::ServerConfig;
use ridecast_api::router::build_app_router;
use ridecast_api::state::AppState;
use ridecast_core::estimator::DemandEstimator;
use ridecast_core::features::FeatureLayout;
use ridecast_core::history::HistoryStore;
use ridecast_core::model::{LinearModel, NearestCentroid, StandardScaler};
use ridecast_core::pipeline::PredictionService;
use ridecast_core::zoning::{ClusterLabels, ZoneClassifier};

pub const TEST_ORIGIN: &str = "http://localhost:8000";

/// Build a test `ServerConfig` with safe defaults.
///
/// Artifact paths are unused; tests inject models directly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        history_capacity: 10,
        demand_model_path: "unused".into(),
        geo_demand_model_path: None,
        cluster_model_path: "unused".into(),
        zone_labels: ClusterLabels::default(),
        default_total_drivers: 300,
    }
}

fn linear(layout: FeatureLayout, intercept: f64, terms: &[(&str, f64)]) -> LinearModel {
    let names = layout.names();
    let coefficients = names
        .iter()
        .map(|name| {
            terms
                .iter()
                .find(|(n, _)| n == name)
                .map_or(0.0, |(_, c)| *c)
        })
        .collect();
    LinearModel {
        feature_names: names.iter().map(|s| s.to_string()).collect(),
        intercept,
        coefficients,
    }
}

/// Zone model: `10 + 2 * hour + 0.5 * lag_1`.
pub fn zone_estimator() -> DemandEstimator {
    let model = linear(FeatureLayout::Zone, 10.0, &[("hour", 2.0), ("lag_1", 0.5)]);
    DemandEstimator::new(Arc::new(model), FeatureLayout::Zone).unwrap()
}

/// Geo model: `10 + 10 * distance_km`.
pub fn geo_estimator() -> DemandEstimator {
    let model = linear(FeatureLayout::Geo, 10.0, &[("distance_km", 10.0)]);
    DemandEstimator::new(Arc::new(model), FeatureLayout::Geo).unwrap()
}

/// Coordinates are centred on (12.97, 77.59); clusters sit at demand 0, 40
/// and 80, so index 0 is Low, 1 Medium and 2 High.
pub fn classifier() -> ZoneClassifier {
    let scaler = StandardScaler {
        mean: vec![12.97, 77.59, 0.0],
        scale: vec![1.0, 1.0, 1.0],
    };
    let centroids = NearestCentroid {
        centroids: vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 40.0],
            vec![0.0, 0.0, 80.0],
        ],
    };
    ZoneClassifier::new(
        Arc::new(scaler),
        Arc::new(centroids),
        ClusterLabels::default(),
    )
}

fn build_app(geo: bool) -> Router {
    let config = test_config();
    let mut service = PredictionService::new(
        zone_estimator(),
        classifier(),
        HistoryStore::with_capacity(config.history_capacity),
    )
    .unwrap();
    if geo {
        service = service.with_geo_estimator(geo_estimator()).unwrap();
    }

    let state = AppState {
        config: Arc::new(config.clone()),
        predictions: Arc::new(service),
    };
    build_app_router(state, &config)
}

/// Build the full application router, with both model variants loaded.
///
/// Uses the production `build_app_router`, so tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_test_app() -> Router {
    build_app(true)
}

/// Same as [`build_test_app`] but without a geo model.
pub fn build_test_app_without_geo() -> Router {
    build_app(false)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

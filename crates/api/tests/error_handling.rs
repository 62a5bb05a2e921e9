//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use ridecast_api::error::AppError;
use ridecast_core::error::CoreError;
use ridecast_core::model::ModelError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("hour must be between 0 and 23".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "hour must be between 0 and 23");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Estimation maps to 400 and names the cause
// ---------------------------------------------------------------------------

#[tokio::test]
async fn estimation_error_returns_400() {
    let err = AppError::Core(CoreError::from(ModelError::ShapeMismatch {
        expected: 8,
        got: 7,
    }));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "ESTIMATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("expected 8"));
}

// ---------------------------------------------------------------------------
// Test: allocation input errors map to 422
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_zones_error_returns_422() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NoZones)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "NO_ZONES");
}

#[tokio::test]
async fn degenerate_zone_error_returns_422() {
    let err = AppError::Core(CoreError::DegenerateZone("zone 'a' appears more than once".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "DEGENERATE_ZONE");
    assert_eq!(json["error"], "zone 'a' appears more than once");
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotConfigured maps to 503
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_configured_error_returns_503() {
    let err = AppError::Core(CoreError::NotConfigured("geo demand model"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "NOT_CONFIGURED");
    assert_eq!(json["error"], "geo demand model is not configured");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: internal errors map to 500 and sanitize the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn core_internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("layout mismatch".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

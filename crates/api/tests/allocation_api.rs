//! HTTP-level integration tests for the `/allocation` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json};
use serde_json::json;

fn approx(value: &serde_json::Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 1e-6
}

// ---------------------------------------------------------------------------
// Test: POST /allocation splits drivers in proportion to demand
// ---------------------------------------------------------------------------

#[tokio::test]
async fn allocation_is_proportional_to_demand() {
    let body = json!({
        "total_drivers": 100,
        "zones": [
            { "zone_id": "A", "total_demand": 100.0 },
            { "zone_id": "B", "total_demand": 300.0 },
            { "zone_id": "C", "total_demand": 600.0 },
        ],
    });
    let response = post_json(build_test_app(), "/allocation", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let allocation = &json["allocation"];
    assert_eq!(allocation["total_drivers"], 100);

    let per_zone = allocation["per_zone"].as_array().unwrap();
    assert_eq!(per_zone.len(), 3);
    assert!(approx(&per_zone[0]["allocated_drivers"], 10.0));
    assert!(approx(&per_zone[1]["allocated_drivers"], 30.0));
    assert!(approx(&per_zone[2]["allocated_drivers"], 60.0));
    assert!(approx(&per_zone[0]["naive_wait_time"], 3.0));
    assert!(approx(&per_zone[0]["optimized_wait_time"], 10.0));

    // Under-demanded zones get a negative reduction, never clamped.
    assert!(per_zone[0]["wait_time_reduction_percent"].as_f64().unwrap() < 0.0);
    assert!(allocation["average_wait_time_reduction_percent"].as_f64().unwrap() < 0.0);
}

#[tokio::test]
async fn allocation_defaults_to_configured_driver_pool() {
    let body = json!({
        "zones": [
            { "zone_id": "north", "total_demand": 1.0 },
            { "zone_id": "south", "total_demand": 2.0 },
        ],
    });
    let json = body_json(post_json(build_test_app(), "/allocation", body).await).await;
    assert_eq!(json["allocation"]["total_drivers"], 300);

    let per_zone = json["allocation"]["per_zone"].as_array().unwrap();
    assert!(approx(&per_zone[0]["allocated_drivers"], 100.0));
    assert!(approx(&per_zone[1]["allocated_drivers"], 200.0));
}

#[tokio::test]
async fn zero_demand_zone_has_null_reduction() {
    let body = json!({
        "total_drivers": 30,
        "zones": [
            { "zone_id": "idle", "total_demand": 0.0 },
            { "zone_id": "busy", "total_demand": 50.0 },
            { "zone_id": "also_busy", "total_demand": 50.0 },
        ],
    });
    let json = body_json(post_json(build_test_app(), "/allocation", body).await).await;

    let idle = &json["allocation"]["per_zone"][0];
    assert_eq!(idle["zone_id"], "idle");
    assert_eq!(idle["allocated_drivers"], 0.0);
    assert!(idle["wait_time_reduction_percent"].is_null());
    assert_eq!(json["allocation"]["average_wait_time_reduction_percent"], 33.33);
}

// ---------------------------------------------------------------------------
// Test: POST /allocation/rides aggregates rows before allocating
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ride_rows_are_summed_per_zone() {
    let body = json!({
        "total_drivers": 40,
        "rides": [
            { "zone_id": "2", "demand": 10.0 },
            { "zone_id": "0", "demand": 5.0 },
            { "zone_id": "2", "demand": 20.0 },
            { "zone_id": "1", "demand": 5.0 },
        ],
    });
    let response = post_json(build_test_app(), "/allocation/rides", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["zones"],
        json!([
            { "zone_id": "0", "total_demand": 5.0 },
            { "zone_id": "1", "total_demand": 5.0 },
            { "zone_id": "2", "total_demand": 30.0 },
        ])
    );

    let per_zone = json["allocation"]["per_zone"].as_array().unwrap();
    assert!(approx(&per_zone[0]["allocated_drivers"], 5.0));
    assert!(approx(&per_zone[2]["allocated_drivers"], 30.0));
}

// ---------------------------------------------------------------------------
// Test: degenerate inputs are rejected without a partial result
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_zone_list_is_unprocessable() {
    let body = json!({ "total_drivers": 10, "zones": [] });
    let response = post_json(build_test_app(), "/allocation", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NO_ZONES");
    assert!(json.get("allocation").is_none());
}

#[tokio::test]
async fn no_ride_rows_is_unprocessable() {
    let body = json!({ "rides": [] });
    let response = post_json(build_test_app(), "/allocation/rides", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "NO_ZONES");
}

#[tokio::test]
async fn negative_demand_is_unprocessable() {
    let body = json!({
        "total_drivers": 10,
        "zones": [
            { "zone_id": "a", "total_demand": -5.0 },
            { "zone_id": "b", "total_demand": 5.0 },
        ],
    });
    let response = post_json(build_test_app(), "/allocation", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "DEGENERATE_ZONE");
}

#[tokio::test]
async fn all_zero_demand_is_unprocessable() {
    let body = json!({
        "total_drivers": 10,
        "zones": [{ "zone_id": "a", "total_demand": 0.0 }],
    });
    let response = post_json(build_test_app(), "/allocation", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn zero_drivers_is_validation_error() {
    let body = json!({
        "total_drivers": 0,
        "zones": [{ "zone_id": "a", "total_demand": 1.0 }],
    });
    let response = post_json(build_test_app(), "/allocation", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn negative_driver_count_is_bad_request() {
    let body = json!({
        "total_drivers": -3,
        "zones": [{ "zone_id": "a", "total_demand": 1.0 }],
    });
    let response = post_json(build_test_app(), "/allocation", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

//! Handlers for driver allocation.
//!
//! Allocation is stateless: each request carries its own demand figures and
//! gets a complete result or an error, never a partial allocation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ridecast_core::allocation::{
    aggregate_zone_demand, optimize, AllocationResult, RideDemand, ZoneAggregate,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::SuccessResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AllocationRequest {
    /// Falls back to the configured default pool.
    pub total_drivers: Option<u32>,
    pub zones: Vec<ZoneAggregate>,
}

#[derive(Debug, Deserialize)]
pub struct RideAllocationRequest {
    pub total_drivers: Option<u32>,
    pub rides: Vec<RideDemand>,
}

#[derive(Debug, Serialize)]
pub struct AllocationBody {
    pub allocation: AllocationResult,
}

#[derive(Debug, Serialize)]
pub struct RideAllocationBody {
    /// Per-zone totals the allocation was computed from.
    pub zones: Vec<ZoneAggregate>,
    pub allocation: AllocationResult,
}

// ---------------------------------------------------------------------------
// POST /allocation -- allocate over pre-aggregated zones
// ---------------------------------------------------------------------------

pub async fn allocate(
    State(state): State<AppState>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let total_drivers = body
        .total_drivers
        .unwrap_or(state.config.default_total_drivers);

    let allocation = optimize(&body.zones, total_drivers)?;
    tracing::info!(
        zones = allocation.per_zone.len(),
        total_drivers,
        average_reduction = allocation.average_wait_time_reduction_percent,
        "Allocation computed"
    );

    Ok(Json(SuccessResponse::new(AllocationBody { allocation })))
}

// ---------------------------------------------------------------------------
// POST /allocation/rides -- aggregate raw rows, then allocate
// ---------------------------------------------------------------------------

/// Sum ride-level demand per zone before allocating.
pub async fn allocate_rides(
    State(state): State<AppState>,
    payload: Result<Json<RideAllocationRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let total_drivers = body
        .total_drivers
        .unwrap_or(state.config.default_total_drivers);
    let rows = body.rides.len();

    let zones = aggregate_zone_demand(body.rides);
    let allocation = optimize(&zones, total_drivers)?;
    tracing::info!(
        rows,
        zones = zones.len(),
        total_drivers,
        "Ride-level allocation computed"
    );

    Ok(Json(SuccessResponse::new(RideAllocationBody {
        zones,
        allocation,
    })))
}

//! Demand-proportional driver allocation (batch, stateless).
//!
//! Drivers are split across zones in proportion to each zone's share of
//! total demand, and compared against a naive equal split. Wait time is
//! modelled as `demand / drivers`.
//!
//! Zones with zero demand get no drivers and no waiting riders: both wait
//! times are reported as 0 and their reduction percentage is `None`, which
//! also excludes them from the average.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::round2;

/// Driver pool used when a caller does not specify one.
pub const DEFAULT_TOTAL_DRIVERS: u32 = 300;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Aggregated demand for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAggregate {
    pub zone_id: String,
    pub total_demand: f64,
}

impl ZoneAggregate {
    pub fn new(zone_id: impl Into<String>, total_demand: f64) -> Self {
        Self {
            zone_id: zone_id.into(),
            total_demand,
        }
    }
}

/// A single demand observation prior to aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideDemand {
    pub zone_id: String,
    pub demand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneAllocation {
    pub zone_id: String,
    pub demand: f64,
    pub allocated_drivers: f64,
    pub naive_wait_time: f64,
    pub optimized_wait_time: f64,
    /// Negative for zones that receive fewer drivers than the equal split.
    pub wait_time_reduction_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub total_drivers: u32,
    /// Mean of the per-zone reductions, rounded to two decimals.
    pub average_wait_time_reduction_percent: f64,
    pub per_zone: Vec<ZoneAllocation>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Sum demand per zone, ordered by zone id.
pub fn aggregate_zone_demand<I>(rides: I) -> Vec<ZoneAggregate>
where
    I: IntoIterator<Item = RideDemand>,
{
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for ride in rides {
        *totals.entry(ride.zone_id).or_insert(0.0) += ride.demand;
    }
    totals
        .into_iter()
        .map(|(zone_id, total_demand)| ZoneAggregate {
            zone_id,
            total_demand,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

fn validate_zones(zones: &[ZoneAggregate], total_drivers: u32) -> Result<f64, CoreError> {
    if total_drivers == 0 {
        return Err(CoreError::Validation(
            "total_drivers must be greater than 0".into(),
        ));
    }
    if zones.is_empty() {
        return Err(CoreError::NoZones);
    }

    let mut seen = HashSet::with_capacity(zones.len());
    for zone in zones {
        if !zone.total_demand.is_finite() || zone.total_demand < 0.0 {
            return Err(CoreError::DegenerateZone(format!(
                "zone '{}' has invalid demand {}",
                zone.zone_id, zone.total_demand
            )));
        }
        if !seen.insert(zone.zone_id.as_str()) {
            return Err(CoreError::DegenerateZone(format!(
                "zone '{}' appears more than once",
                zone.zone_id
            )));
        }
    }

    let total_demand: f64 = zones.iter().map(|z| z.total_demand).sum();
    if total_demand <= 0.0 {
        return Err(CoreError::DegenerateZone(
            "total demand across zones is zero".into(),
        ));
    }
    if !total_demand.is_finite() {
        return Err(CoreError::DegenerateZone(
            "total demand across zones overflows".into(),
        ));
    }
    Ok(total_demand)
}

/// Allocate `total_drivers` across `zones` in proportion to demand.
///
/// Fails with [`CoreError::NoZones`] for an empty input and
/// [`CoreError::DegenerateZone`] for negative/non-finite demand, duplicate
/// zone ids, or a zero or overflowing total demand. Never returns a partial result.
pub fn optimize(zones: &[ZoneAggregate], total_drivers: u32) -> Result<AllocationResult, CoreError> {
    let total_demand = validate_zones(zones, total_drivers)?;
    let drivers = f64::from(total_drivers);
    let naive_drivers = drivers / zones.len() as f64;

    let per_zone: Vec<ZoneAllocation> = zones
        .iter()
        .map(|zone| {
            let demand = zone.total_demand;
            let allocated_drivers = drivers * (demand / total_demand);
            if demand == 0.0 {
                return ZoneAllocation {
                    zone_id: zone.zone_id.clone(),
                    demand,
                    allocated_drivers,
                    naive_wait_time: 0.0,
                    optimized_wait_time: 0.0,
                    wait_time_reduction_percent: None,
                };
            }

            let naive_wait_time = demand / naive_drivers;
            let optimized_wait_time = demand / allocated_drivers;
            let reduction = (naive_wait_time - optimized_wait_time) / naive_wait_time * 100.0;
            ZoneAllocation {
                zone_id: zone.zone_id.clone(),
                demand,
                allocated_drivers,
                naive_wait_time,
                optimized_wait_time,
                wait_time_reduction_percent: Some(reduction),
            }
        })
        .collect();

    let reductions: Vec<f64> = per_zone
        .iter()
        .filter_map(|z| z.wait_time_reduction_percent)
        .collect();
    // At least one zone has positive demand, so `reductions` is non-empty.
    let average = reductions.iter().sum::<f64>() / reductions.len() as f64;

    Ok(AllocationResult {
        total_drivers,
        average_wait_time_reduction_percent: round2(average),
        per_zone,
    })
}

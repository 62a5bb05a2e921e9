//! Ride demand estimation core.
//!
//! Pure domain logic for the prediction pipeline (feature encoding, lag
//! history, demand estimation, zone classification, narration) and the
//! batch driver-allocation optimizer. No HTTP, logging, or environment
//! access lives here; the API crate wires these pieces together.

pub mod allocation;
pub mod error;
pub mod estimator;
pub mod features;
pub mod history;
pub mod model;
pub mod narration;
pub mod pipeline;
pub mod request;
pub mod types;
pub mod zoning;

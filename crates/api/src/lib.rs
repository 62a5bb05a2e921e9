//! Ridecast API server library.
//!
//! Exposes configuration, state, error handling, artifact loading and routes
//! so integration tests and the binary entrypoint share them.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

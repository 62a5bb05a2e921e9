use std::path::PathBuf;

use ridecast_core::allocation::DEFAULT_TOTAL_DRIVERS;
use ridecast_core::history::DEFAULT_HISTORY_CAPACITY;
use ridecast_core::zoning::ClusterLabels;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Number of predictions kept in the history store (default: `10`).
    pub history_capacity: usize,
    /// Zone-variant demand regressor artifact.
    pub demand_model_path: PathBuf,
    /// Geo-variant demand regressor artifact. The geo endpoint is disabled
    /// when unset.
    pub geo_demand_model_path: Option<PathBuf>,
    /// Scaler + centroids artifact used by the zone classifier.
    pub cluster_model_path: PathBuf,
    /// Cluster index to zone label table.
    pub zone_labels: ClusterLabels,
    /// Driver pool used when an allocation request omits `total_drivers`.
    pub default_total_drivers: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                       |
    /// |-------------------------|-------------------------------|
    /// | `HOST`                  | `0.0.0.0`                     |
    /// | `PORT`                  | `8000`                        |
    /// | `CORS_ORIGINS`          | `http://localhost:8000`       |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                          |
    /// | `HISTORY_CAPACITY`      | `10`                          |
    /// | `DEMAND_MODEL_PATH`     | `models/demand_model.json`    |
    /// | `GEO_DEMAND_MODEL_PATH` | unset                         |
    /// | `CLUSTER_MODEL_PATH`    | `models/cluster_model.json`   |
    /// | `ZONE_LABELS`           | `2=high,1=medium`             |
    /// | `DEFAULT_TOTAL_DRIVERS` | `300`                         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let history_capacity: usize = std::env::var("HISTORY_CAPACITY")
            .map(|v| v.parse().expect("HISTORY_CAPACITY must be a valid usize"))
            .unwrap_or(DEFAULT_HISTORY_CAPACITY);
        assert!(history_capacity > 0, "HISTORY_CAPACITY must be at least 1");

        let demand_model_path = std::env::var("DEMAND_MODEL_PATH")
            .unwrap_or_else(|_| "models/demand_model.json".into())
            .into();

        let geo_demand_model_path = std::env::var("GEO_DEMAND_MODEL_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cluster_model_path = std::env::var("CLUSTER_MODEL_PATH")
            .unwrap_or_else(|_| "models/cluster_model.json".into())
            .into();

        let zone_labels = std::env::var("ZONE_LABELS")
            .map(|table| {
                ClusterLabels::parse(&table)
                    .unwrap_or_else(|e| panic!("ZONE_LABELS is invalid: {e}"))
            })
            .unwrap_or_default();

        let default_total_drivers: u32 = std::env::var("DEFAULT_TOTAL_DRIVERS")
            .map(|v| v.parse().expect("DEFAULT_TOTAL_DRIVERS must be a valid u32"))
            .unwrap_or(DEFAULT_TOTAL_DRIVERS);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            history_capacity,
            demand_model_path,
            geo_demand_model_path,
            cluster_model_path,
            zone_labels,
            default_total_drivers,
        }
    }
}

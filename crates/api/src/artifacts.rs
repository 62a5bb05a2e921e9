//! Start-up loading of the fitted model artifacts.
//!
//! Everything here runs once before the listener binds. Any missing or
//! inconsistent artifact aborts start-up with a descriptive error chain.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ridecast_core::estimator::DemandEstimator;
use ridecast_core::features::FeatureLayout;
use ridecast_core::history::HistoryStore;
use ridecast_core::model::{ClusterArtifact, DemandArtifact};
use ridecast_core::pipeline::PredictionService;
use ridecast_core::zoning::{ClusterLabels, ZoneClassifier};

use crate::config::ServerConfig;

/// Columns the clustering artifact must have been fit on, in order.
const CLUSTER_FEATURES: [&str; 3] = ["latitude", "longitude", "ride_demand"];

fn load_estimator(path: &Path, layout: FeatureLayout) -> Result<DemandEstimator> {
    let artifact = DemandArtifact::load(path)
        .with_context(|| format!("failed to load demand model at {}", path.display()))?;
    DemandEstimator::new(Arc::new(artifact), layout).with_context(|| {
        format!(
            "demand model at {} does not match the {layout:?} feature layout",
            path.display()
        )
    })
}

fn load_classifier(path: &Path, labels: ClusterLabels) -> Result<ZoneClassifier> {
    let artifact = ClusterArtifact::load(path)
        .with_context(|| format!("failed to load cluster model at {}", path.display()))?;

    if artifact.feature_names != CLUSTER_FEATURES {
        bail!(
            "cluster model at {} was fit on {:?}, expected {:?}",
            path.display(),
            artifact.feature_names,
            CLUSTER_FEATURES
        );
    }
    if let Some(max) = labels.max_index() {
        if max >= artifact.cluster_count() {
            bail!(
                "zone labels reference cluster {max} but the model has {} clusters",
                artifact.cluster_count()
            );
        }
    }

    let (scaler, centroids) = artifact.into_parts();
    Ok(ZoneClassifier::new(
        Arc::new(scaler),
        Arc::new(centroids),
        labels,
    ))
}

/// Build the prediction service from the artifacts named in `config`.
pub fn load_prediction_service(config: &ServerConfig) -> Result<PredictionService> {
    let estimator = load_estimator(&config.demand_model_path, FeatureLayout::Zone)?;
    tracing::info!(path = %config.demand_model_path.display(), "Loaded demand model");

    let classifier = load_classifier(&config.cluster_model_path, config.zone_labels.clone())?;
    tracing::info!(path = %config.cluster_model_path.display(), "Loaded cluster model");

    let mut service = PredictionService::new(
        estimator,
        classifier,
        HistoryStore::with_capacity(config.history_capacity),
    )?;

    match &config.geo_demand_model_path {
        Some(path) => {
            service = service.with_geo_estimator(load_estimator(path, FeatureLayout::Geo)?)?;
            tracing::info!(path = %path.display(), "Loaded geo demand model");
        }
        None => tracing::info!("No geo demand model configured, geo predictions disabled"),
    }

    Ok(service)
}

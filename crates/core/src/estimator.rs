//! Demand estimation over an injected regressor.

use std::sync::Arc;

use crate::error::CoreError;
use crate::features::{FeatureLayout, FeatureVector};
use crate::model::{DemandModel, ModelError};
use crate::types::round2;

/// Wraps a [`DemandModel`] fit for one [`FeatureLayout`].
#[derive(Clone)]
pub struct DemandEstimator {
    model: Arc<dyn DemandModel>,
    layout: FeatureLayout,
}

impl std::fmt::Debug for DemandEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemandEstimator")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl DemandEstimator {
    /// Bind a model to a layout.
    ///
    /// When the model records the columns it was fit with, they must match
    /// the layout exactly (same names, same order).
    pub fn new(model: Arc<dyn DemandModel>, layout: FeatureLayout) -> Result<Self, ModelError> {
        if let Some(names) = model.feature_names() {
            let expected = layout.names();
            if names.len() != expected.len() || names.iter().zip(expected).any(|(a, b)| a != b) {
                return Err(ModelError::InvalidArtifact(format!(
                    "model was fit on {names:?}, encoder produces {expected:?}"
                )));
            }
        }
        Ok(Self { model, layout })
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    /// Run the regressor and round the result to two decimals.
    ///
    /// Model failures surface as [`CoreError::Estimation`] and are never
    /// retried.
    pub fn estimate(&self, features: &FeatureVector) -> Result<f64, CoreError> {
        if features.layout() != self.layout {
            return Err(CoreError::Internal(format!(
                "estimator for {:?} layout received {:?} features",
                self.layout,
                features.layout()
            )));
        }

        let raw = self.model.predict(features.values())?;
        if !raw.is_finite() {
            return Err(ModelError::NonFinite.into());
        }
        Ok(round2(raw))
    }
}

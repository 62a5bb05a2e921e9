//! Per-request prediction pipeline.
//!
//! [`PredictionService`] owns the history store behind an async mutex. For
//! zone requests the lag lookup, the estimate, and the history insert run
//! inside one critical section, so `lag_1` always reflects the most recently
//! completed zone prediction even under concurrent requests. Geo predictions
//! share the history but never feed the zone lags.

use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::estimator::DemandEstimator;
use crate::features::{self, FeatureLayout};
use crate::history::{HistoryEntry, HistoryStore};
use crate::narration::{narrate, NarrationContext};
use crate::request::{GeoPredictionRequest, PredictionRequest};
use crate::types::{round2, InputSummary};
use crate::zoning::ZoneClassifier;

/// Floor applied to the illustrative hourly series.
pub const HOURLY_FLOOR: f64 = 5.0;
/// Maximum absolute jitter applied around the estimate per hour.
pub const HOURLY_JITTER: i32 = 8;

/// Everything returned to the caller for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub prediction: f64,
    pub zone: String,
    pub analysis: String,
    pub input_summary: InputSummary,
    pub hour_labels: Vec<u8>,
    pub hour_values: Vec<f64>,
}

/// Illustrative 24-hour series: the estimate jittered by up to
/// ±[`HOURLY_JITTER`], floored at [`HOURLY_FLOOR`].
pub fn hourly_profile<R: Rng + ?Sized>(prediction: f64, rng: &mut R) -> Vec<f64> {
    (0..24)
        .map(|_| {
            let jitter = f64::from(rng.random_range(-HOURLY_JITTER..=HOURLY_JITTER));
            round2((prediction + jitter).max(HOURLY_FLOOR))
        })
        .collect()
}

#[derive(Debug)]
pub struct PredictionService {
    history: Mutex<HistoryStore>,
    zone_estimator: DemandEstimator,
    geo_estimator: Option<DemandEstimator>,
    classifier: ZoneClassifier,
}

impl PredictionService {
    pub fn new(
        zone_estimator: DemandEstimator,
        classifier: ZoneClassifier,
        history: HistoryStore,
    ) -> Result<Self, CoreError> {
        if zone_estimator.layout() != FeatureLayout::Zone {
            return Err(CoreError::Internal(
                "zone estimator must use the zone feature layout".into(),
            ));
        }
        Ok(Self {
            history: Mutex::new(history),
            zone_estimator,
            geo_estimator: None,
            classifier,
        })
    }

    /// Enable the geo variant.
    pub fn with_geo_estimator(mut self, estimator: DemandEstimator) -> Result<Self, CoreError> {
        if estimator.layout() != FeatureLayout::Geo {
            return Err(CoreError::Internal(
                "geo estimator must use the geo feature layout".into(),
            ));
        }
        self.geo_estimator = Some(estimator);
        Ok(self)
    }

    pub fn supports_geo(&self) -> bool {
        self.geo_estimator.is_some()
    }

    /// Encode, estimate, narrate, and record a zone-variant request.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, CoreError> {
        let ctx = NarrationContext::from(request);
        let input_summary = request.input_summary();

        let prediction = {
            let mut history = self.history.lock().await;
            let features = features::encode(request, &history);
            let prediction = self.zone_estimator.estimate(&features)?;
            history.record(HistoryEntry::new(
                chrono::Utc::now(),
                prediction,
                ctx.area,
                input_summary.clone(),
            ));
            prediction
        };

        Ok(assemble(prediction, &ctx, input_summary))
    }

    /// Estimate a geo-variant request, label its zone, and record it.
    pub async fn predict_geo(
        &self,
        request: &GeoPredictionRequest,
    ) -> Result<Prediction, CoreError> {
        let estimator = self
            .geo_estimator
            .as_ref()
            .ok_or(CoreError::NotConfigured("geo demand model"))?;

        let features = features::encode_geo(request);
        let prediction = estimator.estimate(&features)?;
        let zone = self
            .classifier
            .classify(request.latitude(), request.longitude(), prediction)?;
        let ctx = NarrationContext::for_geo(request, zone);
        let input_summary = request.input_summary();

        self.history.lock().await.record(
            HistoryEntry::new(
                chrono::Utc::now(),
                prediction,
                zone.label(),
                input_summary.clone(),
            )
            .with_layout(FeatureLayout::Geo),
        );

        Ok(assemble(prediction, &ctx, input_summary))
    }

    /// Recorded predictions, newest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().await.snapshot()
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }
}

fn assemble(prediction: f64, ctx: &NarrationContext, input_summary: InputSummary) -> Prediction {
    Prediction {
        prediction,
        zone: ctx.area.to_string(),
        analysis: narrate(ctx, prediction),
        input_summary,
        hour_labels: (0..24).collect(),
        hour_values: hourly_profile(prediction, &mut rand::rng()),
    }
}

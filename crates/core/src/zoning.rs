//! Demand-zone classification from coordinates and estimated demand.
//!
//! The clustering model returns an unordered cluster index. Turning that
//! index into a label is a lookup in [`ClusterLabels`], which is tied to the
//! particular fitting run that produced the centroids and is configured
//! alongside the artifact.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{ClusterAssigner, FeatureScaler};

/// Categorical demand level of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneLabel {
    #[serde(rename = "Low Demand Zone")]
    Low,
    #[serde(rename = "Medium Demand Zone")]
    Medium,
    #[serde(rename = "High Demand Zone")]
    High,
}

impl ZoneLabel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Demand Zone",
            Self::Medium => "Medium Demand Zone",
            Self::High => "High Demand Zone",
        }
    }

    fn from_short_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cluster index mapping
// ---------------------------------------------------------------------------

/// Cluster index to label table. Indices without an entry map to
/// [`ZoneLabel::Low`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterLabels {
    mapping: BTreeMap<usize, ZoneLabel>,
}

impl Default for ClusterLabels {
    /// Index 2 is High, index 1 is Medium, everything else is Low.
    fn default() -> Self {
        Self {
            mapping: BTreeMap::from([(2, ZoneLabel::High), (1, ZoneLabel::Medium)]),
        }
    }
}

impl ClusterLabels {
    pub fn new(mapping: BTreeMap<usize, ZoneLabel>) -> Self {
        Self { mapping }
    }

    /// Parse a table such as `2=high,1=medium`.
    pub fn parse(table: &str) -> Result<Self, CoreError> {
        let mut mapping = BTreeMap::new();
        for pair in table.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (index, name) = pair.split_once('=').ok_or_else(|| {
                CoreError::Validation(format!("zone label entry '{pair}' must be index=label"))
            })?;
            let index: usize = index.trim().parse().map_err(|_| {
                CoreError::Validation(format!("zone label index '{index}' is not a number"))
            })?;
            let label = ZoneLabel::from_short_name(name).ok_or_else(|| {
                CoreError::Validation(format!(
                    "zone label '{name}' must be one of low, medium, high"
                ))
            })?;
            if mapping.insert(index, label).is_some() {
                return Err(CoreError::Validation(format!(
                    "cluster index {index} is mapped twice"
                )));
            }
        }
        Ok(Self { mapping })
    }

    pub fn label_for(&self, cluster: usize) -> ZoneLabel {
        self.mapping.get(&cluster).copied().unwrap_or(ZoneLabel::Low)
    }

    /// Highest cluster index referenced by the table.
    pub fn max_index(&self) -> Option<usize> {
        self.mapping.keys().next_back().copied()
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ZoneClassifier {
    scaler: Arc<dyn FeatureScaler>,
    assigner: Arc<dyn ClusterAssigner>,
    labels: ClusterLabels,
}

impl std::fmt::Debug for ZoneClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneClassifier")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl ZoneClassifier {
    pub fn new(
        scaler: Arc<dyn FeatureScaler>,
        assigner: Arc<dyn ClusterAssigner>,
        labels: ClusterLabels,
    ) -> Self {
        Self {
            scaler,
            assigner,
            labels,
        }
    }

    /// Scale `[latitude, longitude, demand]`, assign a cluster, and label it.
    pub fn classify(
        &self,
        latitude: f64,
        longitude: f64,
        demand: f64,
    ) -> Result<ZoneLabel, CoreError> {
        let scaled = self.scaler.transform(&[latitude, longitude, demand])?;
        let cluster = self.assigner.assign(&scaled)?;
        Ok(self.labels.label_for(cluster))
    }
}

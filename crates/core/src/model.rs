//! Model capability traits and the JSON artifacts that implement them.
//!
//! The pipeline only depends on [`DemandModel`], [`FeatureScaler`] and
//! [`ClusterAssigner`]. Concrete models are exported from the training run
//! as JSON, loaded once at start-up, and treated as immutable afterwards.
//! Tests substitute deterministic stubs.

use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("feature length mismatch: got {got}, expected {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("model produced a non-finite value")]
    NonFinite,

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A pre-fit regressor mapping one feature row to a demand value.
pub trait DemandModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Column names the model was fit with, when the artifact records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// A pre-fit transform applied before cluster assignment.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// A pre-fit clustering that maps a scaled row to a cluster index.
pub trait ClusterAssigner: Send + Sync {
    fn assign(&self, scaled: &[f64]) -> Result<usize, ModelError>;
}

fn check_width(expected: usize, got: usize) -> Result<(), ModelError> {
    if expected != got {
        return Err(ModelError::ShapeMismatch { expected, got });
    }
    Ok(())
}

fn check_finite(values: &[f64], what: &str) -> Result<(), ModelError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::InvalidArtifact(format!(
            "{what} contains a non-finite value"
        )));
    }
    Ok(())
}

fn read_artifact(path: &Path) -> Result<String, ModelError> {
    std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Demand artifacts
// ---------------------------------------------------------------------------

/// Serialized demand regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DemandArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl DemandArtifact {
    /// Parse and validate an artifact from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(text)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read, parse, and validate an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::from_json(&read_artifact(path.as_ref())?)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::TreeEnsemble(m) => m.validate(),
        }
    }
}

impl DemandModel for DemandArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        match self {
            Self::Linear(m) => m.predict(features),
            Self::TreeEnsemble(m) => m.predict(features),
        }
    }

    fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Linear(m) => m.feature_names(),
            Self::TreeEnsemble(m) => m.feature_names(),
        }
    }
}

/// `intercept + Σ coefficient · feature`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        check_finite(&self.coefficients, "coefficients")?;
        check_finite(&[self.intercept], "intercept")
    }
}

impl DemandModel for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_width(self.coefficients.len(), features.len())?;
        let value = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        Ok(value)
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }
}

/// One node of a regression tree, stored in a flat array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    /// Rows with `x[feature] < threshold` descend `left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Additive ensemble of regression trees: `base_score + Σ leaf(tree)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub feature_names: Vec<String>,
    pub base_score: f64,
    pub trees: Vec<Vec<TreeNode>>,
}

impl TreeEnsemble {
    fn validate(&self) -> Result<(), ModelError> {
        check_finite(&[self.base_score], "base_score")?;
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("ensemble has no trees".into()));
        }

        let width = self.feature_names.len();
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.is_empty() {
                return Err(ModelError::InvalidArtifact(format!("tree {t} is empty")));
            }
            for (i, node) in tree.iter().enumerate() {
                match *node {
                    TreeNode::Leaf { leaf } => check_finite(&[leaf], "leaf")?,
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        // Children must point forward so traversal always terminates.
                        let forward = |c: usize| c > i && c < tree.len();
                        if feature >= width || !forward(left) || !forward(right) {
                            return Err(ModelError::InvalidArtifact(format!(
                                "tree {t} node {i} has an invalid feature or child index"
                            )));
                        }
                        check_finite(&[threshold], "threshold")?;
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(tree: &[TreeNode], features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match tree[index] {
                TreeNode::Leaf { leaf } => return leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[feature] < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

impl DemandModel for TreeEnsemble {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_width(self.feature_names.len(), features.len())?;
        Ok(self.base_score
            + self
                .trees
                .iter()
                .map(|tree| Self::leaf_value(tree, features))
                .sum::<f64>())
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }
}

// ---------------------------------------------------------------------------
// Cluster artifacts
// ---------------------------------------------------------------------------

/// Standardization `(x - mean) / scale`. A zero scale is treated as 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.mean.len(), raw.len())?;
        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| {
                let s = if *s == 0.0 { 1.0 } else { *s };
                (x - m) / s
            })
            .collect())
    }
}

/// Assigns a row to the closest centroid by squared Euclidean distance.
/// Ties go to the lowest index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NearestCentroid {
    pub centroids: Vec<Vec<f64>>,
}

impl ClusterAssigner for NearestCentroid {
    fn assign(&self, scaled: &[f64]) -> Result<usize, ModelError> {
        let mut best: Option<(usize, f64)> = None;
        for (i, centroid) in self.centroids.iter().enumerate() {
            check_width(centroid.len(), scaled.len())?;
            let dist: f64 = centroid
                .iter()
                .zip(scaled)
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            if !dist.is_finite() {
                return Err(ModelError::NonFinite);
            }
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
            .ok_or_else(|| ModelError::InvalidArtifact("no centroids".into()))
    }
}

/// Serialized clustering boundary: a scaler plus fitted centroids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterArtifact {
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub centroids: NearestCentroid,
}

impl ClusterArtifact {
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(text)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::from_json(&read_artifact(path.as_ref())?)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let width = self.feature_names.len();
        if self.scaler.mean.len() != width || self.scaler.scale.len() != width {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler dimensions do not match {width} features"
            )));
        }
        check_finite(&self.scaler.mean, "scaler mean")?;
        check_finite(&self.scaler.scale, "scaler scale")?;
        if self.centroids.centroids.is_empty() {
            return Err(ModelError::InvalidArtifact("no centroids".into()));
        }
        for centroid in &self.centroids.centroids {
            if centroid.len() != width {
                return Err(ModelError::InvalidArtifact(format!(
                    "centroid has {} dimensions, expected {width}",
                    centroid.len()
                )));
            }
            check_finite(centroid, "centroid")?;
        }
        Ok(())
    }

    /// Number of fitted clusters.
    pub fn cluster_count(&self) -> usize {
        self.centroids.centroids.len()
    }

    pub fn into_parts(self) -> (StandardScaler, NearestCentroid) {
        (self.scaler, self.centroids)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

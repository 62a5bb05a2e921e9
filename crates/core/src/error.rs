use crate::model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Estimation failed: {source}")]
    Estimation {
        #[source]
        source: ModelError,
    },

    #[error("Allocation requires at least one zone")]
    NoZones,

    #[error("Degenerate zone input: {0}")]
    DegenerateZone(String),

    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ModelError> for CoreError {
    fn from(source: ModelError) -> Self {
        CoreError::Estimation { source }
    }
}

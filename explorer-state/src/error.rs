use shared_types::PlaceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("map source `{0}` does not exist")]
    SourceMissing(String),

    #[error("map rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },

    #[error("feature {0} is not part of the map data")]
    FeatureNotFound(PlaceId),
}

impl MapError {
    pub fn rejected(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            message: message.into(),
        }
    }
}

//! Error types for engine operations

use geofence_domain::{CatalogUnavailable, SinkUnavailable, StoreUnavailable};
use thiserror::Error;

/// Failure of a single evaluation
///
/// No geofence state is invented on failure: the caller sees the collaborator
/// that failed and nothing else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A collaborator failed during evaluation
    #[error("Evaluation failed for device {device_id}: {cause}")]
    EvaluationFailed {
        /// Device whose report was being evaluated
        device_id: String,
        /// Collaborator failure
        #[source]
        cause: EvaluationCause,
    },
}

impl EngineError {
    pub(crate) fn failed(device_id: &str, cause: impl Into<EvaluationCause>) -> Self {
        EngineError::EvaluationFailed {
            device_id: device_id.to_string(),
            cause: cause.into(),
        }
    }

    /// The underlying collaborator failure
    pub fn cause(&self) -> &EvaluationCause {
        match self {
            EngineError::EvaluationFailed { cause, .. } => cause,
        }
    }
}

/// Which collaborator failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationCause {
    /// Catalog read failed
    #[error(transparent)]
    Catalog(#[from] CatalogUnavailable),

    /// State read or write failed
    #[error(transparent)]
    Store(#[from] StoreUnavailable),

    /// Event publish failed
    #[error(transparent)]
    Sink(#[from] SinkUnavailable),
}

use thiserror::Error;

use crate::session::CycleState;

/// Top-level error type for the PetPal+ runtime.
///
/// Service failures are absorbed at the adapter boundary and only ever show
/// up in logs; `Busy` and `PreconditionViolation` are the variants callers
/// actually see.
#[derive(Debug, Error)]
pub enum PetPalError {
    #[error("service unavailable ({service}): {message}")]
    ServiceUnavailable { service: String, message: String },

    #[error("detection below confidence threshold {threshold}")]
    LowConfidenceDetection { threshold: f32 },

    #[error("no task template applies to mood '{0}'")]
    NoEligibleTask(String),

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("sidekick busy ({0}); trigger rejected")]
    Busy(CycleState),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PetPalError {
    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }
}

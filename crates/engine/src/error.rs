use fogbound_core::CoreError;
use fogbound_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Raised by the scene-lookup collaborator, never by the engine itself.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    #[error("fog record {id} still contended after {attempts} write attempts")]
    ConcurrentModification { id: String, attempts: u32 },

    #[error("invalid engine config: {0}")]
    Config(String),
}

impl EngineError {
    /// Every engine operation is idempotent, so these are safe to redo as a
    /// whole.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::ConcurrentModification { .. }
        )
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            other => Self::StoreUnavailable(StorageError::Core(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_invalid_argument_maps_through() {
        let err: EngineError = CoreError::InvalidArgument("width must be non-negative".into()).into();
        assert!(matches!(err, EngineError::InvalidArgument(ref m) if m.contains("width")));
        assert!(!err.is_retryable());
    }

    #[test]
    fn store_failures_are_retryable() {
        let err: EngineError = StorageError::NotFound("fog record".into()).into();
        assert!(err.is_retryable());
        let contended = EngineError::ConcurrentModification { id: "x".into(), attempts: 8 };
        assert!(contended.is_retryable());
    }
}

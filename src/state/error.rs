//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No store selected in state
    #[error("No store selected in state")]
    #[allow(dead_code)]
    StoreNotSet,

    /// No form is open
    #[error("No form is open")]
    #[allow(dead_code)]
    FormNotOpen,

    /// Entity not found in state
    #[error("Entity not found: {id}")]
    #[allow(dead_code)]
    EntityNotFound { id: String },

    /// Network event channel closed
    #[error("Network event channel closed")]
    #[allow(dead_code)]
    ChannelClosed,

    /// Generic state error
    #[error("State error: {0}")]
    #[allow(dead_code)]
    Other(String),
}

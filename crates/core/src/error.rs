/// Domain error taxonomy shared by every crate in the workspace.
///
/// Store implementations map their driver errors into these variants so
/// callers never have to inspect driver-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The backing store could not be reached. Callers treat this as a hard
    /// failure and never retry silently.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Duplicate submission or a store-level uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by any displayable value.
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

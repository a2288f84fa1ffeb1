#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a `NotFound` keyed by any displayable identifier.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

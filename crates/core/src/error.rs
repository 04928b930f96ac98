use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Malformed input: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::Validation(errors)
    }
}

/// Input that could not be read as a car object at all.
///
/// Kept apart from [`FieldErrors`]: this means the bytes are malformed,
/// not that a well-formed object broke a field rule.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

/// Failures reported by a [`crate::store::CarStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("car with id {0} does not exist")]
    NotFound(DbId),

    #[error("car id {0} is not a valid store id")]
    InvalidId(DbId),

    #[error("car id sequence exhausted")]
    IdExhausted,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

use crate::error::ValidationError;

/// Result of a validation check
pub type ValidationResult<T> = Result<T, ValidationError>;

use thiserror::Error;

use crate::error::CatalogError;

/// Upper bound for every free-text catalog field, in characters.
pub const MAX_TEXT_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be 1-{MAX_TEXT_LEN} characters")]
    TextLength { field: &'static str },

    #[error("size must be a positive number of megabytes")]
    NonPositiveSize,
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::InvalidInput(err.to_string())
    }
}

pub(crate) fn check_text(
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 || len > MAX_TEXT_LEN {
        return Err(ValidationError::TextLength { field });
    }
    Ok(())
}

pub(crate) fn check_size(size: f64) -> Result<(), ValidationError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(ValidationError::NonPositiveSize);
    }
    Ok(())
}

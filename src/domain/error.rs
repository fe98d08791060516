//! Validation errors raised while building entities
//!
//! Every builder in the domain layer reports through [`EntityError`]. A failed
//! `build()` never yields a partially valid entity.

use thiserror::Error;

/// Build-time validation failure for a single entity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// A required field was never set (or set to an empty value)
    #[error("{entity} is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A field was set but lies outside its declared domain
    #[error("{entity} has invalid {field}: {reason}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    /// A collection field holds the wrong number of entries
    #[error("{entity} has {found} {field}, expected {expected}")]
    WrongCount {
        entity: &'static str,
        field: &'static str,
        expected: String,
        found: usize,
    },
}

impl EntityError {
    pub fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    /// Create an out-of-domain error
    ///
    /// # Example
    /// ```ignore
    /// if generation == 0 {
    ///     return Err(EntityError::invalid("Generation", "generation", "must be greater than 0"));
    /// }
    /// ```
    pub fn invalid(entity: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            entity,
            field,
            reason: reason.into(),
        }
    }

    pub fn wrong_count(
        entity: &'static str,
        field: &'static str,
        expected: impl Into<String>,
        found: usize,
    ) -> Self {
        Self::WrongCount {
            entity,
            field,
            expected: expected.into(),
            found,
        }
    }

    /// Name of the field the failure refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidField { field, .. }
            | Self::WrongCount { field, .. } => field,
        }
    }
}

/// Returns the value when it is present and not blank
pub(crate) fn require_text<'a>(
    value: &'a Option<String>,
    entity: &'static str,
    field: &'static str,
) -> Result<&'a str, EntityError> {
    match value.as_deref() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(EntityError::missing(entity, field)),
    }
}

/// Returns the value when it is present
pub(crate) fn require<'a, T>(
    value: &'a Option<T>,
    entity: &'static str,
    field: &'static str,
) -> Result<&'a T, EntityError> {
    value.as_ref().ok_or(EntityError::missing(entity, field))
}

use std::fmt::Display;
use std::panic::Location;

use thiserror::Error;

use crate::forms::errors::FieldErrors;

/// Diagnostics of an unexpected failure, captured where it was raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code} at {file}:{line})")]
pub struct InternalError {
    pub message: String,
    /// Short error kind such as `database` or `storage`.
    pub code: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl InternalError {
    #[track_caller]
    pub fn new(code: &'static str, message: impl Display) -> Self {
        let location = Location::caller();
        Self {
            message: message.to_string(),
            code,
            file: location.file(),
            line: location.line(),
        }
    }
}

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Input failed validation; carries field-keyed messages.
    #[error("validation failed")]
    Validation(FieldErrors),
    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(InternalError),
}

impl ServiceError {
    #[track_caller]
    pub fn internal(code: &'static str, message: impl Display) -> Self {
        Self::Internal(InternalError::new(code, message))
    }

    /// Validation failure on a single field.
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_records_call_site() {
        let line = line!() + 1;
        let err = InternalError::new("database", "boom");

        assert_eq!(err.line, line);
        assert!(err.file.ends_with("errors.rs"));
        assert_eq!(err.code, "database");
        assert_eq!(err.message, "boom");
    }
}

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors returned by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The targeted row does not exist.
    #[error("record not found")]
    NotFound,
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Connection(#[from] diesel::r2d2::PoolError),
    /// A UNIQUE index rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(DieselError),
    /// A stored value violates a domain constraint.
    #[error("invalid stored value: {0}")]
    ValidationError(String),
}

impl RepositoryError {
    /// Short machine-readable kind, reported as the error code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Connection(_) => "connection",
            Self::UniqueViolation(_) => "unique_violation",
            Self::Database(_) => "database",
            Self::ValidationError(_) => "invalid_data",
        }
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

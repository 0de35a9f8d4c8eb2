//! Error types for VMAPP.

use thiserror::Error;

use crate::auth::PasswordError;

/// Common error type for VMAPP.
#[derive(Error, Debug)]
pub enum VmappError {
    /// Database error.
    ///
    /// Generic storage failure that is not a constraint violation.
    #[error("database error: {0}")]
    Database(String),

    /// Constraint violation reported by the storage engine.
    ///
    /// Raised for duplicate unique keys and dangling foreign keys. The
    /// message is the storage engine's own text.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Field validation failed before any write was attempted.
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Password hashing or verification error.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl VmappError {
    /// Returns true if this error came from a storage constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, VmappError::Constraint(_))
    }

    /// Returns true if this error is a pre-write validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, VmappError::Validation(_))
    }

    /// Names of the fields that failed validation, sorted.
    ///
    /// Empty for every other error kind.
    pub fn invalid_fields(&self) -> Vec<String> {
        match self {
            VmappError::Validation(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .into_keys()
                    .map(|field| field.to_string())
                    .collect();
                fields.sort_unstable();
                fields
            }
            _ => Vec::new(),
        }
    }
}

// Unique and foreign key violations are surfaced as-is, everything else is
// a generic database error.
impl From<sqlx::Error> for VmappError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                VmappError::Constraint(db_err.message().to_string())
            }
            _ => VmappError::Database(e.to_string()),
        }
    }
}

/// Result type alias for VMAPP operations.
pub type Result<T> = std::result::Result<T, VmappError>;

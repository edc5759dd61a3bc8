//! Error type shared by the operation implementations

use crate::store::StoreError;
use atlas_domain::InvocationError;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Which constraint a write violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    ForeignKey,
    Unique,
    Other,
}

/// Errors raised inside an operation's unit of work
#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Business-level rejection decided by the operation itself
    #[error("{0}")]
    Rejected(InvocationError),
}

impl OperationError {
    /// The violated constraint, if this is a constraint failure
    pub fn constraint(&self) -> Option<Constraint> {
        let sqlite = match self {
            OperationError::Sqlite(e) => e,
            OperationError::Store(StoreError::Sqlite(e)) => e,
            _ => return None,
        };
        match sqlite {
            rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                Some(match err.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Constraint::ForeignKey,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Constraint::Unique,
                    _ => Constraint::Other,
                })
            }
            _ => None,
        }
    }

    /// Map to the wire error, prefixing driver failures with `context`.
    pub fn into_invocation_error(self, context: &str) -> InvocationError {
        match self {
            OperationError::Rejected(e) => e,
            OperationError::Store(e) if e.is_unavailable() => {
                InvocationError::store_unavailable(format!("{}: base de datos no disponible", context))
                    .with_details(e.to_string())
            }
            OperationError::Store(StoreError::Sqlite(e)) | OperationError::Sqlite(e)
                if is_busy(&e) =>
            {
                InvocationError::store_unavailable(format!("{}: base de datos ocupada", context))
                    .with_details(e.to_string())
            }
            other => InvocationError::operation_failed(context.to_string())
                .with_details(other.to_string()),
        }
    }
}

fn is_busy(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if matches!(err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

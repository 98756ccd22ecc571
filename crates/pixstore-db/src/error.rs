use pixstore_core::{AppError, Cancelled};
use sqlx::error::ErrorKind;

/// Failure of a metadata store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("constraint violation: {message}")]
    ConstraintViolation {
        message: String,
        constraint: Option<String>,
        #[source]
        source: sqlx::Error,
    },

    #[error("database connection failure")]
    ConnectionFailure(#[source] sqlx::Error),

    #[error("database error")]
    Other(#[source] sqlx::Error),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl StoreError {
    /// Connection-level failures may succeed when the whole call is retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::ConnectionFailure(_))
    }
}

enum Class {
    Constraint {
        message: String,
        constraint: Option<String>,
    },
    Connection,
    Other,
}

fn classify(err: &sqlx::Error) -> Class {
    match err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => Class::Constraint {
                message: db.message().to_string(),
                constraint: db.constraint().map(str::to_string),
            },
            _ => Class::Other,
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => Class::Connection,
        _ => Class::Other,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match classify(&err) {
            Class::Constraint {
                message,
                constraint,
            } => StoreError::ConstraintViolation {
                message,
                constraint,
                source: err,
            },
            Class::Connection => StoreError::ConnectionFailure(err),
            Class::Other => StoreError::Other(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Cancelled(c) => AppError::Cancelled(c),
            other => AppError::Store {
                message: other.to_string(),
                recoverable: other.is_recoverable(),
                source: other.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixstore_core::ErrorMetadata;

    #[test]
    fn test_pool_errors_are_connection_failures() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::ConnectionFailure(_)));
        assert!(err.is_recoverable());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            StoreError::from(sqlx::Error::Io(io)),
            StoreError::ConnectionFailure(_)
        ));
    }

    #[test]
    fn test_row_not_found_is_other() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Other(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_app_error_conversion() {
        let err: AppError = StoreError::from(sqlx::Error::PoolClosed).into();
        assert_eq!(err.error_code(), "STORE_ERROR");
        assert!(err.is_recoverable());
        assert!(err.detailed_message().contains("Caused by"));

        let err: AppError = StoreError::Cancelled(Cancelled).into();
        assert_eq!(err.error_code(), "CANCELLED");
    }
}

//! Error mapping shared by the Diesel repositories.

use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Map pool failures to [`StoreError::Connection`].
pub fn map_pool_error(error: PoolError) -> StoreError {
    StoreError::connection(map_pool_error_message(error))
}

/// Map Diesel failures to store errors, logging the operation for context.
///
/// A closed connection is reported as a connection failure so callers see
/// the same category as a failed checkout.
pub fn map_diesel_error(error: diesel::result::Error, operation: &str) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let message = error.to_string();
    debug!(%message, %operation, "diesel operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection(message)
        }
        _ => StoreError::query(format!("{operation}: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out waiting for connection"));
        assert_eq!(err, StoreError::connection("timed out waiting for connection"));
    }

    #[rstest]
    fn query_errors_name_the_operation() {
        let err = map_diesel_error(diesel::result::Error::NotFound, "order upsert");
        assert_eq!(err, StoreError::query("order upsert: Record not found"));
    }
}

//! Conversion of pool and Diesel failures into [`UserStoreError`].
//!
//! The cause is logged here; callers only ever see the generic backend
//! message.

use tracing::{debug, error, warn};

use crate::domain::ports::{StoreOperation, UserStoreError};

use super::pool::PoolError;

pub(super) fn map_pool_error(operation: StoreOperation, error: PoolError) -> UserStoreError {
    warn!(operation = %operation, error = %error, "database connection unavailable");
    UserStoreError::backend_failure()
}

pub(super) fn map_diesel_error(
    operation: StoreOperation,
    id: Option<&str>,
    error: diesel::result::Error,
) -> UserStoreError {
    use diesel::result::Error as DieselError;

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }
    error!(operation = %operation, id, error = %error, "user store query failed");
    UserStoreError::backend_failure()
}

//! Builders that turn settings into the storage adapter the handlers use.

use std::sync::Arc;

use tracing::info;

use user_registry::domain::ports::{StoreOperation, StorePermissions, UserListing, UserStore};
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::kv::{RedisPool, RedisPoolConfig, RedisPoolError, RedisUserStore};
use user_registry::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};
use user_registry::settings::{AppSettings, SettingsError};

/// Errors raised while preparing the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendSetupError {
    /// Connection settings could not form a URL.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The Redis client rejected its URL.
    #[error(transparent)]
    Redis(#[from] RedisPoolError),
}

/// Connection pool for whichever backend the settings select.
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL through Diesel.
    Relational(DbPool),
    /// One Redis hash per user.
    KeyValue(RedisPool),
}

impl StorageBackend {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Relational(_) => "postgres",
            Self::KeyValue(_) => "redis",
        }
    }
}

/// Pick the backend named by `settings` and build its pool.
///
/// Pools connect lazily, so this succeeds even when the server is down.
pub fn select_backend(settings: &AppSettings) -> Result<StorageBackend, BackendSetupError> {
    if settings.no_sql {
        let pool = RedisPool::new(RedisPoolConfig::new(settings.redis_url()?))?;
        Ok(StorageBackend::KeyValue(pool))
    } else {
        let pool = DbPool::new(PoolConfig::new(settings.database_url()?));
        Ok(StorageBackend::Relational(pool))
    }
}

/// Store plus the optional listing capability for one backend.
pub struct UserBackend {
    /// CRUD operations.
    pub store: Arc<dyn UserStore>,
    /// Present only when the backend can enumerate users.
    pub listing: Option<Arc<dyn UserListing>>,
}

impl UserBackend {
    /// Wrap `backend` in its adapter with the given operation flags.
    pub fn new(backend: StorageBackend, permissions: StorePermissions) -> Self {
        info!(
            backend = backend.label(),
            create = permissions.allows(StoreOperation::Create),
            read = permissions.allows(StoreOperation::Read),
            update = permissions.allows(StoreOperation::Update),
            delete = permissions.allows(StoreOperation::Delete),
            "storage backend selected"
        );
        match backend {
            StorageBackend::Relational(pool) => {
                let store = Arc::new(DieselUserStore::new(pool, permissions));
                Self {
                    store: store.clone(),
                    listing: Some(store),
                }
            }
            StorageBackend::KeyValue(pool) => Self {
                store: Arc::new(RedisUserStore::new(pool, permissions)),
                listing: None,
            },
        }
    }
}

/// Build handler state from the selected backend.
pub fn build_http_state(backend: UserBackend) -> HttpState {
    let state = HttpState::new(backend.store);
    match backend.listing {
        Some(listing) => state.with_listing(listing),
        None => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(no_sql: bool) -> AppSettings {
        AppSettings {
            db_user: None,
            db_password: None,
            db_host: None,
            db_port: None,
            db_name: None,
            redis_host: None,
            redis_port: None,
            host: None,
            port: None,
            no_sql,
            create: true,
            read: true,
            update: false,
            delete: false,
        }
    }

    #[rstest]
    #[case(false, "postgres")]
    #[case(true, "redis")]
    #[tokio::test]
    async fn no_sql_flag_selects_the_backend(#[case] no_sql: bool, #[case] label: &str) {
        let backend = select_backend(&settings(no_sql)).expect("backend builds");
        assert_eq!(backend.label(), label);
    }

    #[rstest]
    #[tokio::test]
    async fn only_the_relational_backend_lists() {
        let relational = UserBackend::new(
            select_backend(&settings(false)).expect("backend builds"),
            StorePermissions::all(),
        );
        assert!(build_http_state(relational).listing.is_some());

        let key_value = UserBackend::new(
            select_backend(&settings(true)).expect("backend builds"),
            StorePermissions::all(),
        );
        assert!(build_http_state(key_value).listing.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_hosts_fail_selection() {
        let mut bad = settings(true);
        bad.redis_host = Some("bad host".to_owned());
        assert!(matches!(
            select_backend(&bad),
            Err(BackendSetupError::Settings(_))
        ));
    }
}

//! Redis-backed [`UserStore`]: one hash per user.
//!
//! There is no secondary index over the hashes, so this adapter does not
//! implement [`crate::domain::ports::UserListing`].

use std::collections::HashMap;

use async_trait::async_trait;
use bb8_redis::redis::{self, aio::MultiplexedConnection, RedisError};
use tracing::{debug, error, warn};

use crate::domain::ports::{
    parse_lookup_id, StoreOperation, StorePermissions, UserStore, UserStoreError,
};
use crate::domain::{FullName, User, UserId};

use super::batch::HashBatch;
use super::pool::{RedisPool, RedisPoolError};
use super::record::{decode, encode, user_key};

/// Redis implementation of [`UserStore`].
#[derive(Clone)]
pub struct RedisUserStore {
    pool: RedisPool,
    permissions: StorePermissions,
}

fn pool_failure(operation: StoreOperation, err: RedisPoolError) -> UserStoreError {
    warn!(operation = %operation, error = %err, "redis connection unavailable");
    UserStoreError::backend_failure()
}

fn command_failure(operation: StoreOperation, id: &UserId, err: RedisError) -> UserStoreError {
    error!(operation = %operation, id = %id, error = %err, "redis command failed");
    UserStoreError::backend_failure()
}

async fn fetch(
    conn: &mut MultiplexedConnection,
    operation: StoreOperation,
    id: &UserId,
) -> Result<Option<User>, UserStoreError> {
    let fields: HashMap<String, String> = redis::cmd("HGETALL")
        .arg(user_key(id))
        .query_async(conn)
        .await
        .map_err(|err| command_failure(operation, id, err))?;
    decode(fields).map_err(|err| {
        error!(operation = %operation, id = %id, error = %err, "stored user hash is invalid");
        UserStoreError::backend_failure()
    })
}

fn write_batch(id: &UserId, name: &FullName) -> HashBatch {
    let raw_id = id.to_string();
    let encoded = encode(&raw_id, name);
    let fields: Vec<(&str, &str)> = encoded
        .iter()
        .map(|(field, value)| (*field, value.as_str()))
        .collect();
    let mut batch = HashBatch::new(user_key(id));
    batch.set_fields(&fields);
    batch
}

fn delete_batch(id: &UserId) -> HashBatch {
    let mut batch = HashBatch::new(user_key(id));
    batch.remove();
    batch
}

async fn apply(
    conn: &mut MultiplexedConnection,
    operation: StoreOperation,
    id: &UserId,
    batch: HashBatch,
) -> Result<(), UserStoreError> {
    debug!(operation = %operation, id = %id, commands = batch.len(), "executing redis batch");
    batch
        .execute(conn)
        .await
        .map_err(|err| command_failure(operation, id, err))
}

impl RedisUserStore {
    /// Create a store over `pool` with the given operation flags.
    pub fn new(pool: RedisPool, permissions: StorePermissions) -> Self {
        Self { pool, permissions }
    }

    /// Point lookup by id, without permission checks.
    ///
    /// # Errors
    ///
    /// Returns [`UserStoreError::Backend`] when Redis is unreachable or the
    /// stored hash is invalid.
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        const OP: StoreOperation = StoreOperation::Read;
        let mut conn = self.pool.get().await.map_err(|err| pool_failure(OP, err))?;
        fetch(&mut conn, OP, id).await
    }

    /// Gate `operation`, open its batch, then confirm the hash exists.
    ///
    /// The batch is discarded when the user is missing or the lookup fails.
    async fn open_for_existing(
        &self,
        operation: StoreOperation,
        raw_id: &str,
        build: impl FnOnce(&UserId) -> HashBatch,
    ) -> Result<(UserId, HashBatch), UserStoreError> {
        self.permissions.ensure(operation)?;
        let id = parse_lookup_id(raw_id)?;
        let batch = build(&id);
        match self.find_by_id(&id).await {
            Ok(Some(_)) => Ok((id, batch)),
            Ok(None) => {
                batch.discard();
                Err(UserStoreError::not_found(raw_id))
            }
            Err(err) => {
                batch.discard();
                Err(err)
            }
        }
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn create(&self, name: &FullName) -> Result<User, UserStoreError> {
        const OP: StoreOperation = StoreOperation::Create;
        self.permissions.ensure(OP)?;

        let mut conn = self.pool.get().await.map_err(|err| pool_failure(OP, err))?;
        let id = UserId::random();
        apply(&mut conn, OP, &id, write_batch(&id, name)).await?;

        fetch(&mut conn, OP, &id).await?.ok_or_else(|| {
            error!(id = %id, "created user missing on re-read");
            UserStoreError::backend_failure()
        })
    }

    async fn read(&self, id: &str) -> Result<User, UserStoreError> {
        self.permissions.ensure(StoreOperation::Read)?;
        let user_id = parse_lookup_id(id)?;
        self.find_by_id(&user_id)
            .await?
            .ok_or_else(|| UserStoreError::not_found(id))
    }

    async fn update(&self, id: &str, name: &FullName) -> Result<User, UserStoreError> {
        const OP: StoreOperation = StoreOperation::Update;
        let (user_id, batch) = self
            .open_for_existing(OP, id, |user_id| write_batch(user_id, name))
            .await?;

        let mut conn = self.pool.get().await.map_err(|err| pool_failure(OP, err))?;
        apply(&mut conn, OP, &user_id, batch).await?;

        // A concurrent delete between the write and the re-read surfaces here.
        fetch(&mut conn, OP, &user_id)
            .await?
            .ok_or_else(|| UserStoreError::not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<(), UserStoreError> {
        const OP: StoreOperation = StoreOperation::Delete;
        let (user_id, batch) = self.open_for_existing(OP, id, delete_batch).await?;

        let mut conn = self.pool.get().await.map_err(|err| pool_failure(OP, err))?;
        apply(&mut conn, OP, &user_id, batch).await?;
        debug!(id = %user_id, "user deleted");
        Ok(())
    }
}

//! PostgreSQL-backed [`UserStore`] using Diesel.
//!
//! Every operation checks out its own connection, so a failed call never
//! leaves state behind for the next one. Writes run inside a transaction and
//! are followed by a re-read, so responses reflect what was committed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, error};

use crate::domain::ports::{
    parse_lookup_id, StoreOperation, StorePermissions, UserListing, UserStore, UserStoreError,
};
use crate::domain::{FullName, User, UserId};

use super::models::{NewUserRow, UserNameChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;
use super::store_error_mapping::{map_diesel_error, map_pool_error};

/// Diesel implementation of [`UserStore`] and [`UserListing`].
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
    permissions: StorePermissions,
}

fn row_to_user(operation: StoreOperation, row: UserRow) -> Result<User, UserStoreError> {
    let id = row.id;
    User::try_from(row).map_err(|err| {
        error!(operation = %operation, id = %id, error = %err, "stored user row is invalid");
        UserStoreError::backend_failure()
    })
}

async fn select_user(
    conn: &mut AsyncPgConnection,
    id: &UserId,
) -> Result<Option<UserRow>, diesel::result::Error> {
    users::table
        .filter(users::id.eq(*id.as_uuid()))
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()
}

impl DieselUserStore {
    /// Create a store over `pool` with the given operation flags.
    pub fn new(pool: DbPool, permissions: StorePermissions) -> Self {
        Self { pool, permissions }
    }

    /// Point lookup by id, without permission checks.
    ///
    /// # Errors
    ///
    /// Returns [`UserStoreError::Backend`] when the database is unreachable or
    /// the stored row is invalid.
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        self.lookup(StoreOperation::Read, id).await
    }

    async fn lookup(
        &self,
        operation: StoreOperation,
        id: &UserId,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(operation, err))?;
        let raw_id = id.to_string();
        select_user(&mut conn, id)
            .await
            .map_err(|err| map_diesel_error(operation, Some(&raw_id), err))?
            .map(|row| row_to_user(operation, row))
            .transpose()
    }

    async fn require(&self, operation: StoreOperation, raw_id: &str) -> Result<UserId, UserStoreError> {
        self.permissions.ensure(operation)?;
        let id = parse_lookup_id(raw_id)?;
        match self.find_by_id(&id).await? {
            Some(_) => Ok(id),
            None => Err(UserStoreError::not_found(raw_id)),
        }
    }
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn create(&self, name: &FullName) -> Result<User, UserStoreError> {
        const OP: StoreOperation = StoreOperation::Create;
        self.permissions.ensure(OP)?;

        let id = UserId::random();
        let raw_id = id.to_string();
        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
        let row = NewUserRow::new(&id, name);
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(OP, Some(&raw_id), err))?;
        drop(conn);
        debug!(id = %id, "user created");

        self.lookup(OP, &id).await?.ok_or_else(|| {
            error!(id = %id, "created user missing on re-read");
            UserStoreError::backend_failure()
        })
    }

    async fn read(&self, id: &str) -> Result<User, UserStoreError> {
        const OP: StoreOperation = StoreOperation::Read;
        self.permissions.ensure(OP)?;
        let user_id = parse_lookup_id(id)?;
        self.find_by_id(&user_id)
            .await?
            .ok_or_else(|| UserStoreError::not_found(id))
    }

    async fn update(&self, id: &str, name: &FullName) -> Result<User, UserStoreError> {
        const OP: StoreOperation = StoreOperation::Update;
        let user_id = self.require(OP, id).await?;

        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
        let changes = UserNameChangeset::from(name);
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::update(users::table.filter(users::id.eq(*user_id.as_uuid())))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(OP, Some(id), err))?;
        drop(conn);

        // A concurrent delete between the write and the re-read surfaces here.
        self.lookup(OP, &user_id)
            .await?
            .ok_or_else(|| UserStoreError::not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<(), UserStoreError> {
        const OP: StoreOperation = StoreOperation::Delete;
        let user_id = self.require(OP, id).await?;

        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(users::table.filter(users::id.eq(*user_id.as_uuid())))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(OP, Some(id), err))?;
        debug!(id = %user_id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl UserListing for DieselUserStore {
    async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        const OP: StoreOperation = StoreOperation::Read;
        self.permissions.ensure(OP)?;

        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(OP, None, err))?;
        rows.into_iter().map(|row| row_to_user(OP, row)).collect()
    }
}

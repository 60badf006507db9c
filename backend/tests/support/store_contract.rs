//! Behaviour every `UserStore` adapter must share.
//!
//! Each scenario drives a store against a live backend and panics on the
//! first divergence.

use user_registry::domain::ports::{StoreOperation, UserStore, UserStoreError};
use user_registry::domain::{FullName, UserId};

fn full_name(surname: &str, name: &str, patronymic: &str) -> FullName {
    FullName::try_from_parts(surname, name, patronymic).expect("valid name")
}

pub fn ivanov() -> FullName {
    full_name("Ivanov", "Ivan", "Ivanovich")
}

pub fn petrov() -> FullName {
    full_name("Petrov", "Petr", "Petrovich")
}

/// Create then read back the same record.
pub async fn create_then_read(store: &dyn UserStore) {
    let created = store.create(&ivanov()).await.expect("create succeeds");
    assert_eq!(created.name(), &ivanov());

    let fetched = store
        .read(&created.id().to_string())
        .await
        .expect("read succeeds");
    assert_eq!(fetched, created);
}

/// Update replaces all three parts; a deleted record is gone.
pub async fn update_then_delete(store: &dyn UserStore) {
    let created = store.create(&ivanov()).await.expect("create succeeds");
    let id = created.id().to_string();

    let updated = store.update(&id, &petrov()).await.expect("update succeeds");
    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.name(), &petrov());
    assert_eq!(store.read(&id).await.expect("read succeeds"), updated);

    store.delete(&id).await.expect("delete succeeds");
    assert_eq!(store.read(&id).await, Err(UserStoreError::not_found(id.as_str())));
}

/// The second delete of the same id reports not found.
pub async fn double_delete(store: &dyn UserStore) {
    let created = store.create(&ivanov()).await.expect("create succeeds");
    let id = created.id().to_string();

    store.delete(&id).await.expect("first delete succeeds");
    assert_eq!(
        store.delete(&id).await,
        Err(UserStoreError::not_found(id.as_str()))
    );
}

/// Unknown and malformed ids are both not found; updates create nothing.
pub async fn unknown_ids(store: &dyn UserStore) {
    let missing = UserId::random().to_string();
    assert_eq!(
        store.read(&missing).await,
        Err(UserStoreError::not_found(missing.as_str()))
    );
    assert_eq!(
        store.update(&missing, &petrov()).await,
        Err(UserStoreError::not_found(missing.as_str()))
    );
    assert_eq!(
        store.read(&missing).await,
        Err(UserStoreError::not_found(missing.as_str()))
    );
    assert_eq!(
        store.read("not-a-uuid").await,
        Err(UserStoreError::not_found("not-a-uuid"))
    );
}

/// `writer` has every flag; `reader` has read disabled over the same backend.
pub async fn read_disabled(writer: &dyn UserStore, reader: &dyn UserStore) {
    let created = writer.create(&ivanov()).await.expect("create succeeds");
    assert_eq!(
        reader.read(&created.id().to_string()).await,
        Err(UserStoreError::permission_denied(StoreOperation::Read))
    );
}

/// `restricted` has update disabled; the stored record is left untouched.
pub async fn update_disabled(writer: &dyn UserStore, restricted: &dyn UserStore) {
    let created = writer.create(&ivanov()).await.expect("create succeeds");
    let id = created.id().to_string();

    assert_eq!(
        restricted.update(&id, &petrov()).await,
        Err(UserStoreError::permission_denied(StoreOperation::Update))
    );
    assert_eq!(writer.read(&id).await.expect("read succeeds"), created);
}

/// `restricted` has delete disabled; the stored record survives.
pub async fn delete_disabled(writer: &dyn UserStore, restricted: &dyn UserStore) {
    let created = writer.create(&ivanov()).await.expect("create succeeds");
    let id = created.id().to_string();

    assert_eq!(
        restricted.delete(&id).await,
        Err(UserStoreError::permission_denied(StoreOperation::Delete))
    );
    assert_eq!(writer.read(&id).await.expect("read succeeds"), created);
}

/// Ids are matched case-insensitively, since both spellings parse to one UUID.
pub async fn uppercase_ids(store: &dyn UserStore) {
    let created = store.create(&ivanov()).await.expect("create succeeds");
    let upper = created.id().to_string().to_uppercase();
    assert_eq!(store.read(&upper).await.expect("read succeeds"), created);
}

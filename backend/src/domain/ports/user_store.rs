//! Port abstraction for user storage adapters.
//!
//! Two adapters implement [`UserStore`]: a relational one and a key/value
//! one. Both gate every operation behind [`StorePermissions`] and report
//! failures through [`UserStoreError`], so handlers behave the same no matter
//! which backend is active. Enumerating users is a separate capability,
//! [`UserListing`], because not every backend can serve it without a full
//! key-space scan.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{FullName, User, UserId};

use super::define_port_error;

/// Message carried by [`UserStoreError::Backend`] when the cause is logged
/// rather than surfaced.
pub const BACKEND_FAILURE_MESSAGE: &str = "storage backend failure";

/// Operation names used for permission checks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Insert a new user.
    Create,
    /// Fetch one user, or list all of them.
    Read,
    /// Overwrite a user's name.
    Update,
    /// Remove a user.
    Delete,
}

impl StoreOperation {
    /// Lower-case operation name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// The operation is disabled for this deployment.
        PermissionDenied { operation: StoreOperation } => "{operation} operation is disabled",
        /// No user exists for the identifier.
        NotFound { id: String } => "user {id} not found",
        /// The backend could not be reached or returned unusable data.
        Backend { message: String } => "user store failure: {message}",
    }
}

impl UserStoreError {
    /// Backend failure with the generic message.
    pub fn backend_failure() -> Self {
        Self::backend(BACKEND_FAILURE_MESSAGE)
    }
}

/// Per-operation enable flags fixed when an adapter is constructed.
///
/// # Examples
/// ```
/// use user_registry::domain::ports::{StoreOperation, StorePermissions};
///
/// let permissions = StorePermissions::none().with(StoreOperation::Read, true);
/// assert!(permissions.allows(StoreOperation::Read));
/// assert!(!permissions.allows(StoreOperation::Delete));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StorePermissions {
    create: bool,
    read: bool,
    update: bool,
    delete: bool,
}

impl StorePermissions {
    /// Build permissions from the four flags.
    pub const fn new(create: bool, read: bool, update: bool, delete: bool) -> Self {
        Self {
            create,
            read,
            update,
            delete,
        }
    }

    /// Every operation enabled.
    pub const fn all() -> Self {
        Self::new(true, true, true, true)
    }

    /// Every operation disabled.
    pub const fn none() -> Self {
        Self::new(false, false, false, false)
    }

    /// Copy with a single flag changed.
    #[must_use]
    pub fn with(mut self, operation: StoreOperation, enabled: bool) -> Self {
        match operation {
            StoreOperation::Create => self.create = enabled,
            StoreOperation::Read => self.read = enabled,
            StoreOperation::Update => self.update = enabled,
            StoreOperation::Delete => self.delete = enabled,
        }
        self
    }

    /// Whether the operation is enabled.
    pub const fn allows(&self, operation: StoreOperation) -> bool {
        match operation {
            StoreOperation::Create => self.create,
            StoreOperation::Read => self.read,
            StoreOperation::Update => self.update,
            StoreOperation::Delete => self.delete,
        }
    }

    /// Fail with [`UserStoreError::PermissionDenied`] when the operation is
    /// disabled.
    pub fn ensure(&self, operation: StoreOperation) -> Result<(), UserStoreError> {
        if self.allows(operation) {
            Ok(())
        } else {
            Err(UserStoreError::permission_denied(operation))
        }
    }
}

/// Parse a raw lookup key into a [`UserId`].
///
/// A key that is not a UUID cannot name a stored user, so it is reported as
/// [`UserStoreError::NotFound`] rather than as a validation failure.
pub fn parse_lookup_id(raw: &str) -> Result<UserId, UserStoreError> {
    UserId::new(raw).map_err(|_| UserStoreError::not_found(raw))
}

/// Storage contract shared by every backend.
///
/// Identifiers arrive as the raw path segment. Implementations check the
/// permission flag first, then resolve the identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user under a freshly generated identifier.
    async fn create(&self, name: &FullName) -> Result<User, UserStoreError>;

    /// Fetch the user stored under `id`.
    async fn read(&self, id: &str) -> Result<User, UserStoreError>;

    /// Replace all three name parts of the user stored under `id`.
    async fn update(&self, id: &str, name: &FullName) -> Result<User, UserStoreError>;

    /// Remove the user stored under `id`.
    async fn delete(&self, id: &str) -> Result<(), UserStoreError>;
}

/// Optional capability: enumerate every stored user.
///
/// Gated by the read permission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserListing: Send + Sync {
    /// Return all stored users.
    async fn list(&self) -> Result<Vec<User>, UserStoreError>;
}

//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_store;

#[cfg(test)]
pub use user_store::{MockUserListing, MockUserStore};
pub use user_store::{
    parse_lookup_id, StoreOperation, StorePermissions, UserListing, UserStore, UserStoreError,
    BACKEND_FAILURE_MESSAGE,
};

//! PostgreSQL persistence adapter built on Diesel and `diesel-async`.

mod diesel_user_store;
mod models;
mod pool;
mod schema;
mod store_error_mapping;

pub use diesel_user_store::DieselUserStore;
pub use pool::{DbPool, PoolConfig, PoolError};

//! Outbound adapters implementing the storage port.
//!
//! - `persistence`: PostgreSQL through Diesel.
//! - `kv`: Redis hashes through `bb8-redis`.
//!
//! Adapters translate between domain types and backend representations and
//! hold no business logic beyond permission gating.

pub mod kv;
pub mod persistence;

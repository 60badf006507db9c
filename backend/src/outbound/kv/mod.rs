//! Redis key/value adapter: one hash per user, written through transactional
//! batches.

mod batch;
mod pool;
mod record;
mod redis_user_store;

pub use batch::HashBatch;
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError};
pub use redis_user_store::RedisUserStore;

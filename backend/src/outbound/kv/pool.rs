//! Shared Redis connection pool built on `bb8-redis`.
//!
//! Like the PostgreSQL pool it is built lazily and must be created inside a
//! Tokio runtime.

use std::time::Duration;

use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;

/// Errors raised by the Redis pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedisPoolError {
    /// The connection URL was rejected.
    #[error("failed to build redis pool: {message}")]
    Build {
        /// Parser failure.
        message: String,
    },
    /// No connection could be obtained within the checkout timeout.
    #[error("failed to get redis connection: {message}")]
    Checkout {
        /// Pool or connection failure.
        message: String,
    },
}

impl RedisPoolError {
    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }
}

/// Configuration for [`RedisPool`].
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    redis_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisPoolConfig {
    /// Defaults: 10 connections, 30 second checkout timeout.
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Get the Redis URL.
    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }
}

/// Lazily connected pool of multiplexed Redis connections.
#[derive(Clone)]
pub struct RedisPool {
    inner: Pool<RedisConnectionManager>,
}

impl RedisPool {
    /// Build the pool without connecting.
    ///
    /// # Errors
    ///
    /// Returns [`RedisPoolError::Build`] when the URL cannot be parsed.
    pub fn new(config: RedisPoolConfig) -> Result<Self, RedisPoolError> {
        let manager = RedisConnectionManager::new(config.redis_url.as_str())
            .map_err(|err| RedisPoolError::build(err.to_string()))?;
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(None)
            .connection_timeout(config.connection_timeout)
            .build_unchecked(manager);
        Ok(Self { inner })
    }

    /// Check out a connection; it returns to the pool when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RedisPoolError::Checkout`] when Redis is unreachable within
    /// the checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, RedisPoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| RedisPoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_defaults() {
        let config = RedisPoolConfig::new("redis://127.0.0.1:6379");
        assert_eq!(config.redis_url(), "redis://127.0.0.1:6379");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[rstest]
    fn rejects_unparseable_urls() {
        let result = RedisPool::new(RedisPoolConfig::new("definitely not a url"));
        assert!(matches!(result, Err(RedisPoolError::Build { .. })));
    }

    #[tokio::test]
    async fn building_does_not_connect() {
        let pool =
            RedisPool::new(RedisPoolConfig::new("redis://127.0.0.1:1")).expect("valid url");
        assert_eq!(pool.inner.state().connections, 0);
    }
}

//! Transactional command batches against a single hash key.
//!
//! A [`HashBatch`] queues commands locally and sends them wrapped in
//! `MULTI`/`EXEC`. Atomicity comes from the server-side transaction: either
//! every queued command is applied or none is. The batch is consumed by
//! exactly one of [`HashBatch::execute`] or [`HashBatch::discard`]; callers
//! discard an open batch when a precondition fails before it is sent.

use bb8_redis::redis::aio::MultiplexedConnection;
use bb8_redis::redis::{self, Pipeline, RedisResult};
use tracing::warn;

/// Queued writes for one Redis hash.
pub struct HashBatch {
    key: String,
    pipeline: Pipeline,
    queued: usize,
}

impl HashBatch {
    /// Start an empty transactional batch for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        let mut pipeline = redis::pipe();
        pipeline.atomic();
        Self {
            key: key.into(),
            pipeline,
            queued: 0,
        }
    }

    /// Key every queued command targets.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queued
    }

    /// Whether nothing has been queued yet.
    pub fn is_empty(&self) -> bool {
        self.queued == 0
    }

    /// Queue `HMSET key field value [field value ...]`.
    pub fn set_fields(&mut self, fields: &[(&str, &str)]) -> &mut Self {
        self.pipeline.hset_multiple(&self.key, fields).ignore();
        self.queued += 1;
        self
    }

    /// Queue `DEL key`.
    pub fn remove(&mut self) -> &mut Self {
        self.pipeline.del(&self.key).ignore();
        self.queued += 1;
        self
    }

    /// Send the batch as one `MULTI`/`EXEC` transaction.
    ///
    /// # Errors
    ///
    /// Returns the Redis error when the transaction could not be sent or was
    /// rejected. The server applies none of the queued commands in that case.
    pub async fn execute(self, conn: &mut MultiplexedConnection) -> RedisResult<()> {
        let outcome: RedisResult<()> = self.pipeline.query_async(conn).await;
        if let Err(err) = &outcome {
            warn!(key = %self.key, commands = self.queued, error = %err, "redis transaction not committed");
        }
        outcome
    }

    /// Drop every queued command without sending it. Returns how many were
    /// dropped.
    pub fn discard(mut self) -> usize {
        let dropped = self.queued;
        self.pipeline.clear();
        self.queued = 0;
        warn!(key = %self.key, dropped, "discarded redis batch");
        dropped
    }

    /// Queued commands rendered as UTF-8 argument lists, command name first.
    #[cfg(test)]
    pub(crate) fn rendered(&self) -> Vec<Vec<String>> {
        self.pipeline
            .cmd_iter()
            .map(|cmd| {
                cmd.args_iter()
                    .filter_map(|arg| match arg {
                        redis::Arg::Simple(bytes) => {
                            Some(String::from_utf8_lossy(bytes).into_owned())
                        }
                        redis::Arg::Cursor | _ => None,
                    })
                    .collect()
            })
            .collect()
    }
}

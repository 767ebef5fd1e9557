//! # Connection Capability Surface
//!
//! Purpose: Define the full command surface a wire driver must provide, plus
//! the batch-state inspectors and lifecycle hooks the client template
//! orchestrates.
//!
//! ## Design Principles
//! 1. **One Method per Command**: Lets decorating views intercept specific
//!    commands (lifecycle suppression) without parsing argument arrays.
//! 2. **Bytes In, Replies Out**: Keys, members, and payloads arrive already
//!    serialized; every data command returns a [`Reply`].
//! 3. **Batch State Lives Here**: Whether the connection is pipelined or
//!    queueing is the driver's state; who opened it is the caller's.
//! 4. **Exclusive Ownership**: A connection is driven by one unit of work at
//!    a time and returned to its factory exactly once per acquisition.

use crate::error::Result;
use crate::reply::Reply;
use crate::sort::SortParams;

/// A stateful handle to the store, implemented by a wire-protocol driver.
///
/// While a pipeline or transaction window is open, data commands are
/// expected to buffer and return [`Reply::Queued`]; the buffered replies are
/// delivered in issue order by [`Connection::close_pipeline`] or
/// [`Connection::exec`].
pub trait Connection: Send {
    // Key commands.
    fn del(&mut self, keys: &[Vec<u8>]) -> Result<Reply>;
    fn exists(&mut self, key: &[u8]) -> Result<Reply>;
    fn expire(&mut self, key: &[u8], seconds: u64) -> Result<Reply>;
    fn expire_at(&mut self, key: &[u8], unix_seconds: i64) -> Result<Reply>;
    fn ttl(&mut self, key: &[u8]) -> Result<Reply>;
    fn persist(&mut self, key: &[u8]) -> Result<Reply>;
    fn keys(&mut self, pattern: &[u8]) -> Result<Reply>;
    fn random_key(&mut self) -> Result<Reply>;
    fn rename(&mut self, old_key: &[u8], new_key: &[u8]) -> Result<Reply>;
    fn rename_nx(&mut self, old_key: &[u8], new_key: &[u8]) -> Result<Reply>;
    fn type_of(&mut self, key: &[u8]) -> Result<Reply>;

    // String value commands.
    fn get(&mut self, key: &[u8]) -> Result<Reply>;
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<Reply>;
    fn get_set(&mut self, key: &[u8], value: &[u8]) -> Result<Reply>;
    fn set_nx(&mut self, key: &[u8], value: &[u8]) -> Result<Reply>;
    fn mget(&mut self, keys: &[Vec<u8>]) -> Result<Reply>;
    fn incr_by(&mut self, key: &[u8], delta: i64) -> Result<Reply>;
    fn append(&mut self, key: &[u8], value: &[u8]) -> Result<Reply>;
    fn strlen(&mut self, key: &[u8]) -> Result<Reply>;

    // List commands.
    fn lpush(&mut self, key: &[u8], value: &[u8]) -> Result<Reply>;
    fn rpush(&mut self, key: &[u8], value: &[u8]) -> Result<Reply>;
    fn lpop(&mut self, key: &[u8]) -> Result<Reply>;
    fn rpop(&mut self, key: &[u8]) -> Result<Reply>;
    fn lrange(&mut self, key: &[u8], start: i64, stop: i64) -> Result<Reply>;
    fn ltrim(&mut self, key: &[u8], start: i64, stop: i64) -> Result<Reply>;
    fn llen(&mut self, key: &[u8]) -> Result<Reply>;
    fn lindex(&mut self, key: &[u8], index: i64) -> Result<Reply>;
    fn lset(&mut self, key: &[u8], index: i64, value: &[u8]) -> Result<Reply>;
    fn lrem(&mut self, key: &[u8], count: i64, value: &[u8]) -> Result<Reply>;

    // Set commands.
    fn sadd(&mut self, key: &[u8], member: &[u8]) -> Result<Reply>;
    fn srem(&mut self, key: &[u8], member: &[u8]) -> Result<Reply>;
    fn spop(&mut self, key: &[u8]) -> Result<Reply>;
    fn smembers(&mut self, key: &[u8]) -> Result<Reply>;
    fn sismember(&mut self, key: &[u8], member: &[u8]) -> Result<Reply>;
    fn scard(&mut self, key: &[u8]) -> Result<Reply>;
    fn smove(&mut self, source: &[u8], destination: &[u8], member: &[u8]) -> Result<Reply>;

    // Sorted-set commands.
    fn zadd(&mut self, key: &[u8], score: f64, member: &[u8]) -> Result<Reply>;
    fn zrem(&mut self, key: &[u8], member: &[u8]) -> Result<Reply>;
    fn zincr_by(&mut self, key: &[u8], delta: f64, member: &[u8]) -> Result<Reply>;
    fn zrank(&mut self, key: &[u8], member: &[u8]) -> Result<Reply>;
    fn zrevrank(&mut self, key: &[u8], member: &[u8]) -> Result<Reply>;
    fn zrange(&mut self, key: &[u8], start: i64, stop: i64) -> Result<Reply>;
    fn zrange_by_score(&mut self, key: &[u8], min: f64, max: f64) -> Result<Reply>;
    fn zscore(&mut self, key: &[u8], member: &[u8]) -> Result<Reply>;
    fn zcard(&mut self, key: &[u8]) -> Result<Reply>;

    // Hash commands.
    fn hset(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<Reply>;
    fn hset_nx(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<Reply>;
    fn hget(&mut self, key: &[u8], field: &[u8]) -> Result<Reply>;
    fn hmget(&mut self, key: &[u8], fields: &[Vec<u8>]) -> Result<Reply>;
    fn hdel(&mut self, key: &[u8], fields: &[Vec<u8>]) -> Result<Reply>;
    fn hexists(&mut self, key: &[u8], field: &[u8]) -> Result<Reply>;
    fn hkeys(&mut self, key: &[u8]) -> Result<Reply>;
    fn hvals(&mut self, key: &[u8]) -> Result<Reply>;
    fn hgetall(&mut self, key: &[u8]) -> Result<Reply>;
    fn hlen(&mut self, key: &[u8]) -> Result<Reply>;
    fn hincr_by(&mut self, key: &[u8], field: &[u8], delta: i64) -> Result<Reply>;

    // Messaging and sort.
    fn publish(&mut self, channel: &[u8], message: &[u8]) -> Result<Reply>;
    fn sort(&mut self, key: &[u8], params: &SortParams) -> Result<Reply>;
    fn sort_store(&mut self, key: &[u8], params: &SortParams, destination: &[u8]) -> Result<Reply>;

    // Transaction control.
    fn multi(&mut self) -> Result<()>;
    /// Applies the queued transaction. When no transaction is active this is
    /// a no-op returning an empty sequence.
    fn exec(&mut self) -> Result<Vec<Reply>>;
    fn discard(&mut self) -> Result<()>;
    fn watch(&mut self, keys: &[Vec<u8>]) -> Result<()>;
    fn unwatch(&mut self) -> Result<()>;
    /// True while a `MULTI` window is open on this connection.
    fn is_queueing(&self) -> bool;

    // Pipeline control.
    /// True while a pipeline window is open on this connection.
    fn is_pipelined(&self) -> bool;
    fn open_pipeline(&mut self) -> Result<()>;
    /// Closes the pipeline and returns the buffered replies in issue order.
    fn close_pipeline(&mut self) -> Result<Vec<Reply>>;

    // Lifecycle.
    fn close(&mut self) -> Result<()>;
}

/// Produces and reclaims connections. Implementations must be safe for
/// concurrent invocation; pooling is an implementation concern.
pub trait ConnectionFactory: Send + Sync {
    /// Obtains a connection. Failure here is fatal to the calling operation
    /// and is never retried by the template.
    fn get_connection(&self) -> Result<Box<dyn Connection>>;

    /// Returns a connection obtained from [`ConnectionFactory::get_connection`].
    /// Called exactly once per acquisition, on every exit path.
    fn release(&self, connection: Box<dyn Connection>);
}

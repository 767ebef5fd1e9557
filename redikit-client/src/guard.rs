//! Lifecycle-suppressing connection view.
//!
//! Units of work receive this wrapper unless the template is configured to
//! expose the raw connection. It forwards every command and silently drops
//! lifecycle-terminating calls, so a unit of work cannot tear down a
//! connection the template still has to release.

use redikit_core::{Connection, Reply, Result, SortParams};

/// Decorator over a borrowed connection that no-ops [`Connection::close`].
pub struct CloseSuppressing<'a> {
    inner: &'a mut dyn Connection,
}

impl<'a> CloseSuppressing<'a> {
    pub fn new(inner: &'a mut dyn Connection) -> Self {
        CloseSuppressing { inner }
    }
}

impl Connection for CloseSuppressing<'_> {
    fn del(&mut self, keys: &[Vec<u8>]) -> Result<Reply> {
        self.inner.del(keys)
    }
    fn exists(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.exists(key)
    }
    fn expire(&mut self, key: &[u8], seconds: u64) -> Result<Reply> {
        self.inner.expire(key, seconds)
    }
    fn expire_at(&mut self, key: &[u8], unix_seconds: i64) -> Result<Reply> {
        self.inner.expire_at(key, unix_seconds)
    }
    fn ttl(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.ttl(key)
    }
    fn persist(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.persist(key)
    }
    fn keys(&mut self, pattern: &[u8]) -> Result<Reply> {
        self.inner.keys(pattern)
    }
    fn random_key(&mut self) -> Result<Reply> {
        self.inner.random_key()
    }
    fn rename(&mut self, old_key: &[u8], new_key: &[u8]) -> Result<Reply> {
        self.inner.rename(old_key, new_key)
    }
    fn rename_nx(&mut self, old_key: &[u8], new_key: &[u8]) -> Result<Reply> {
        self.inner.rename_nx(old_key, new_key)
    }
    fn type_of(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.type_of(key)
    }
    fn get(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.get(key)
    }
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.set(key, value)
    }
    fn get_set(&mut self, key: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.get_set(key, value)
    }
    fn set_nx(&mut self, key: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.set_nx(key, value)
    }
    fn mget(&mut self, keys: &[Vec<u8>]) -> Result<Reply> {
        self.inner.mget(keys)
    }
    fn incr_by(&mut self, key: &[u8], delta: i64) -> Result<Reply> {
        self.inner.incr_by(key, delta)
    }
    fn append(&mut self, key: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.append(key, value)
    }
    fn strlen(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.strlen(key)
    }
    fn lpush(&mut self, key: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.lpush(key, value)
    }
    fn rpush(&mut self, key: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.rpush(key, value)
    }
    fn lpop(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.lpop(key)
    }
    fn rpop(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.rpop(key)
    }
    fn lrange(&mut self, key: &[u8], start: i64, stop: i64) -> Result<Reply> {
        self.inner.lrange(key, start, stop)
    }
    fn ltrim(&mut self, key: &[u8], start: i64, stop: i64) -> Result<Reply> {
        self.inner.ltrim(key, start, stop)
    }
    fn llen(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.llen(key)
    }
    fn lindex(&mut self, key: &[u8], index: i64) -> Result<Reply> {
        self.inner.lindex(key, index)
    }
    fn lset(&mut self, key: &[u8], index: i64, value: &[u8]) -> Result<Reply> {
        self.inner.lset(key, index, value)
    }
    fn lrem(&mut self, key: &[u8], count: i64, value: &[u8]) -> Result<Reply> {
        self.inner.lrem(key, count, value)
    }
    fn sadd(&mut self, key: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.sadd(key, member)
    }
    fn srem(&mut self, key: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.srem(key, member)
    }
    fn spop(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.spop(key)
    }
    fn smembers(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.smembers(key)
    }
    fn sismember(&mut self, key: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.sismember(key, member)
    }
    fn scard(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.scard(key)
    }
    fn smove(&mut self, source: &[u8], destination: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.smove(source, destination, member)
    }
    fn zadd(&mut self, key: &[u8], score: f64, member: &[u8]) -> Result<Reply> {
        self.inner.zadd(key, score, member)
    }
    fn zrem(&mut self, key: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.zrem(key, member)
    }
    fn zincr_by(&mut self, key: &[u8], delta: f64, member: &[u8]) -> Result<Reply> {
        self.inner.zincr_by(key, delta, member)
    }
    fn zrank(&mut self, key: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.zrank(key, member)
    }
    fn zrevrank(&mut self, key: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.zrevrank(key, member)
    }
    fn zrange(&mut self, key: &[u8], start: i64, stop: i64) -> Result<Reply> {
        self.inner.zrange(key, start, stop)
    }
    fn zrange_by_score(&mut self, key: &[u8], min: f64, max: f64) -> Result<Reply> {
        self.inner.zrange_by_score(key, min, max)
    }
    fn zscore(&mut self, key: &[u8], member: &[u8]) -> Result<Reply> {
        self.inner.zscore(key, member)
    }
    fn zcard(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.zcard(key)
    }
    fn hset(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.hset(key, field, value)
    }
    fn hset_nx(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<Reply> {
        self.inner.hset_nx(key, field, value)
    }
    fn hget(&mut self, key: &[u8], field: &[u8]) -> Result<Reply> {
        self.inner.hget(key, field)
    }
    fn hmget(&mut self, key: &[u8], fields: &[Vec<u8>]) -> Result<Reply> {
        self.inner.hmget(key, fields)
    }
    fn hdel(&mut self, key: &[u8], fields: &[Vec<u8>]) -> Result<Reply> {
        self.inner.hdel(key, fields)
    }
    fn hexists(&mut self, key: &[u8], field: &[u8]) -> Result<Reply> {
        self.inner.hexists(key, field)
    }
    fn hkeys(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.hkeys(key)
    }
    fn hvals(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.hvals(key)
    }
    fn hgetall(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.hgetall(key)
    }
    fn hlen(&mut self, key: &[u8]) -> Result<Reply> {
        self.inner.hlen(key)
    }
    fn hincr_by(&mut self, key: &[u8], field: &[u8], delta: i64) -> Result<Reply> {
        self.inner.hincr_by(key, field, delta)
    }
    fn publish(&mut self, channel: &[u8], message: &[u8]) -> Result<Reply> {
        self.inner.publish(channel, message)
    }
    fn sort(&mut self, key: &[u8], params: &SortParams) -> Result<Reply> {
        self.inner.sort(key, params)
    }
    fn sort_store(&mut self, key: &[u8], params: &SortParams, destination: &[u8]) -> Result<Reply> {
        self.inner.sort_store(key, params, destination)
    }
    fn multi(&mut self) -> Result<()> {
        self.inner.multi()
    }
    fn exec(&mut self) -> Result<Vec<Reply>> {
        self.inner.exec()
    }
    fn discard(&mut self) -> Result<()> {
        self.inner.discard()
    }
    fn watch(&mut self, keys: &[Vec<u8>]) -> Result<()> {
        self.inner.watch(keys)
    }
    fn unwatch(&mut self) -> Result<()> {
        self.inner.unwatch()
    }
    fn is_queueing(&self) -> bool {
        self.inner.is_queueing()
    }
    fn is_pipelined(&self) -> bool {
        self.inner.is_pipelined()
    }
    fn open_pipeline(&mut self) -> Result<()> {
        self.inner.open_pipeline()
    }
    fn close_pipeline(&mut self) -> Result<Vec<Reply>> {
        self.inner.close_pipeline()
    }

    // Suppressed: the template owns the connection lifecycle.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

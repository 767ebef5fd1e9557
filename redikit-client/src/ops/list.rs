//! Operations on list values.

use std::sync::Arc;

use redikit_core::{Connection, Result};

use crate::engine::BoundConn;
use crate::serializer::{decode_opt, decode_seq, SerializerSet};
use crate::template::TemplateCore;

pub struct ListOps<'a, K, V, F, W> {
    core: Arc<TemplateCore<K, V, F, W>>,
    bound: Option<&'a BoundConn>,
}

impl<'a, K, V, F, W> ListOps<'a, K, V, F, W> {
    pub(crate) fn new(core: Arc<TemplateCore<K, V, F, W>>, bound: Option<&'a BoundConn>) -> Self {
        ListOps { core, bound }
    }

    fn run<T>(&self, unit: impl FnOnce(&mut dyn Connection) -> Result<T>) -> Result<T> {
        self.core.run(self.bound, unit)
    }

    fn sers(&self) -> &SerializerSet<K, V, F, W> {
        &self.core.serializers
    }

    /// Prepends `value` and returns the list length after the push.
    pub fn push_front(&self, key: &K, value: &V) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        let length = self.run(|conn| conn.lpush(&raw_key, &raw_value))?.into_i64()?;
        Ok(length.max(0) as u64)
    }

    /// Appends `value` and returns the list length after the push.
    pub fn push_back(&self, key: &K, value: &V) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        let length = self.run(|conn| conn.rpush(&raw_key, &raw_value))?.into_i64()?;
        Ok(length.max(0) as u64)
    }

    pub fn pop_front(&self, key: &K) -> Result<Option<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.lpop(&raw_key))?;
        decode_opt(self.sers().value.as_ref(), reply)
    }

    pub fn pop_back(&self, key: &K) -> Result<Option<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.rpop(&raw_key))?;
        decode_opt(self.sers().value.as_ref(), reply)
    }

    /// Elements between `start` and `stop` inclusive; negative indices
    /// count from the tail.
    pub fn range(&self, key: &K, start: i64, stop: i64) -> Result<Vec<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.lrange(&raw_key, start, stop))?;
        decode_seq(self.sers().value.as_ref(), reply)
    }

    pub fn trim(&self, key: &K, start: i64, stop: i64) -> Result<()> {
        let raw_key = self.sers().raw_key(key)?;
        self.run(|conn| conn.ltrim(&raw_key, start, stop).map(|_| ()))
    }

    pub fn index(&self, key: &K, index: i64) -> Result<Option<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.lindex(&raw_key, index))?;
        decode_opt(self.sers().value.as_ref(), reply)
    }

    pub fn set(&self, key: &K, index: i64, value: &V) -> Result<()> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.lset(&raw_key, index, &raw_value).map(|_| ()))
    }

    /// Removes up to `count` occurrences of `value` (sign selects the scan
    /// direction, zero removes all) and returns how many were removed.
    pub fn remove(&self, key: &K, count: i64, value: &V) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        let removed = self.run(|conn| conn.lrem(&raw_key, count, &raw_value))?.into_i64()?;
        Ok(removed.max(0) as u64)
    }

    pub fn size(&self, key: &K) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let length = self.run(|conn| conn.llen(&raw_key))?.into_i64()?;
        Ok(length.max(0) as u64)
    }
}

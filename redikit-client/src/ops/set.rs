//! Operations on unordered set values.

use std::sync::Arc;

use redikit_core::{Connection, Result};

use crate::engine::BoundConn;
use crate::serializer::{decode_opt, decode_seq, SerializerSet};
use crate::template::TemplateCore;

pub struct SetOps<'a, K, V, F, W> {
    core: Arc<TemplateCore<K, V, F, W>>,
    bound: Option<&'a BoundConn>,
}

impl<'a, K, V, F, W> SetOps<'a, K, V, F, W> {
    pub(crate) fn new(core: Arc<TemplateCore<K, V, F, W>>, bound: Option<&'a BoundConn>) -> Self {
        SetOps { core, bound }
    }

    fn run<T>(&self, unit: impl FnOnce(&mut dyn Connection) -> Result<T>) -> Result<T> {
        self.core.run(self.bound, unit)
    }

    fn sers(&self) -> &SerializerSet<K, V, F, W> {
        &self.core.serializers
    }

    /// True when the member was newly added.
    pub fn add(&self, key: &K, value: &V) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.sadd(&raw_key, &raw_value))?.into_bool()
    }

    /// True when the member existed and was removed.
    pub fn remove(&self, key: &K, value: &V) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.srem(&raw_key, &raw_value))?.into_bool()
    }

    pub fn pop(&self, key: &K) -> Result<Option<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.spop(&raw_key))?;
        decode_opt(self.sers().value.as_ref(), reply)
    }

    pub fn members(&self, key: &K) -> Result<Vec<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.smembers(&raw_key))?;
        decode_seq(self.sers().value.as_ref(), reply)
    }

    pub fn is_member(&self, key: &K, value: &V) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.sismember(&raw_key, &raw_value))?.into_bool()
    }

    /// Moves `value` between sets atomically; false when it was not a
    /// member of `source`.
    pub fn move_member(&self, source: &K, destination: &K, value: &V) -> Result<bool> {
        let raw_source = self.sers().raw_key(source)?;
        let raw_destination = self.sers().raw_key(destination)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.smove(&raw_source, &raw_destination, &raw_value))?.into_bool()
    }

    pub fn size(&self, key: &K) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let cardinality = self.run(|conn| conn.scard(&raw_key))?.into_i64()?;
        Ok(cardinality.max(0) as u64)
    }
}

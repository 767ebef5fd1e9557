//! Operations on plain string values.

use std::sync::Arc;

use redikit_core::{Connection, Result};

use crate::engine::BoundConn;
use crate::serializer::{decode_opt, decode_opt_seq, SerializerSet};
use crate::template::TemplateCore;

pub struct ValueOps<'a, K, V, F, W> {
    core: Arc<TemplateCore<K, V, F, W>>,
    bound: Option<&'a BoundConn>,
}

impl<'a, K, V, F, W> ValueOps<'a, K, V, F, W> {
    pub(crate) fn new(core: Arc<TemplateCore<K, V, F, W>>, bound: Option<&'a BoundConn>) -> Self {
        ValueOps { core, bound }
    }

    fn run<T>(&self, unit: impl FnOnce(&mut dyn Connection) -> Result<T>) -> Result<T> {
        self.core.run(self.bound, unit)
    }

    fn sers(&self) -> &SerializerSet<K, V, F, W> {
        &self.core.serializers
    }

    pub fn set(&self, key: &K, value: &V) -> Result<()> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.set(&raw_key, &raw_value).map(|_| ()))
    }

    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.get(&raw_key))?;
        decode_opt(self.sers().value.as_ref(), reply)
    }

    /// Stores `value` and returns the previous value, if any.
    pub fn get_and_set(&self, key: &K, value: &V) -> Result<Option<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        let reply = self.run(|conn| conn.get_set(&raw_key, &raw_value))?;
        decode_opt(self.sers().value.as_ref(), reply)
    }

    /// Stores `value` only when the key does not exist yet.
    pub fn set_if_absent(&self, key: &K, value: &V) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.set_nx(&raw_key, &raw_value))?.into_bool()
    }

    /// Fetches several keys at once; a missing key yields `None` at its
    /// position.
    pub fn multi_get(&self, keys: &[K]) -> Result<Vec<Option<V>>> {
        let raw_keys = self.sers().raw_keys(keys)?;
        let reply = self.run(|conn| conn.mget(&raw_keys))?;
        decode_opt_seq(self.sers().value.as_ref(), reply)
    }

    /// Adds `delta` to the integer stored at `key` and returns the new
    /// value. The stored representation bypasses the value serializer.
    pub fn increment(&self, key: &K, delta: i64) -> Result<i64> {
        let raw_key = self.sers().raw_key(key)?;
        self.run(|conn| conn.incr_by(&raw_key, delta))?.into_i64()
    }

    /// Appends raw text through the string serializer and returns the new
    /// payload length.
    pub fn append(&self, key: &K, text: &str) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_text = self.sers().raw_string(text)?;
        let length = self.run(|conn| conn.append(&raw_key, &raw_text))?.into_i64()?;
        Ok(length.max(0) as u64)
    }

    /// Byte length of the stored payload; zero for a missing key.
    pub fn size(&self, key: &K) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let length = self.run(|conn| conn.strlen(&raw_key))?.into_i64()?;
        Ok(length.max(0) as u64)
    }
}

//! Operations on hash (field-to-value map) values.
//!
//! Fields and values use the dedicated hash-field and hash-value serializer
//! roles, not the key and value roles.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use redikit_core::{Connection, Error, Result};

use crate::engine::BoundConn;
use crate::serializer::{decode_opt, decode_opt_seq, decode_seq, SerializerSet};
use crate::template::TemplateCore;

pub struct HashOps<'a, K, V, F, W> {
    core: Arc<TemplateCore<K, V, F, W>>,
    bound: Option<&'a BoundConn>,
}

impl<'a, K, V, F, W> HashOps<'a, K, V, F, W> {
    pub(crate) fn new(core: Arc<TemplateCore<K, V, F, W>>, bound: Option<&'a BoundConn>) -> Self {
        HashOps { core, bound }
    }

    fn run<T>(&self, unit: impl FnOnce(&mut dyn Connection) -> Result<T>) -> Result<T> {
        self.core.run(self.bound, unit)
    }

    fn sers(&self) -> &SerializerSet<K, V, F, W> {
        &self.core.serializers
    }

    fn raw_fields(&self, fields: &[F]) -> Result<Vec<Vec<u8>>> {
        fields.iter().map(|field| self.sers().raw_hash_field(field)).collect()
    }

    pub fn put(&self, key: &K, field: &F, value: &W) -> Result<()> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_field = self.sers().raw_hash_field(field)?;
        let raw_value = self.sers().raw_hash_value(value)?;
        self.run(|conn| conn.hset(&raw_key, &raw_field, &raw_value).map(|_| ()))
    }

    /// Stores the entry only when the field is not present yet.
    pub fn put_if_absent(&self, key: &K, field: &F, value: &W) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_field = self.sers().raw_hash_field(field)?;
        let raw_value = self.sers().raw_hash_value(value)?;
        self.run(|conn| conn.hset_nx(&raw_key, &raw_field, &raw_value))?.into_bool()
    }

    pub fn get(&self, key: &K, field: &F) -> Result<Option<W>> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_field = self.sers().raw_hash_field(field)?;
        let reply = self.run(|conn| conn.hget(&raw_key, &raw_field))?;
        decode_opt(self.sers().hash_value.as_ref(), reply)
    }

    /// Fetches several fields at once; a missing field yields `None` at its
    /// position.
    pub fn multi_get(&self, key: &K, fields: &[F]) -> Result<Vec<Option<W>>> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_fields = self.raw_fields(fields)?;
        let reply = self.run(|conn| conn.hmget(&raw_key, &raw_fields))?;
        decode_opt_seq(self.sers().hash_value.as_ref(), reply)
    }

    /// Removes the given fields and returns how many existed.
    pub fn delete(&self, key: &K, fields: &[F]) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_fields = self.raw_fields(fields)?;
        let removed = self.run(|conn| conn.hdel(&raw_key, &raw_fields))?.into_i64()?;
        Ok(removed.max(0) as u64)
    }

    pub fn has_field(&self, key: &K, field: &F) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_field = self.sers().raw_hash_field(field)?;
        self.run(|conn| conn.hexists(&raw_key, &raw_field))?.into_bool()
    }

    pub fn fields(&self, key: &K) -> Result<Vec<F>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.hkeys(&raw_key))?;
        decode_seq(self.sers().hash_field.as_ref(), reply)
    }

    pub fn values(&self, key: &K) -> Result<Vec<W>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.hvals(&raw_key))?;
        decode_seq(self.sers().hash_value.as_ref(), reply)
    }

    /// The whole hash as a map. The store reports entries as a flat
    /// field-value sequence; an odd-length sequence is a malformed reply.
    pub fn entries(&self, key: &K) -> Result<HashMap<F, W>>
    where
        F: Eq + Hash,
    {
        let raw_key = self.sers().raw_key(key)?;
        let flat = self.run(|conn| conn.hgetall(&raw_key))?.into_array()?;
        if flat.len() % 2 != 0 {
            return Err(Error::MalformedReply(format!(
                "hash entries arrived as {} items, expected field-value pairs",
                flat.len()
            )));
        }
        let mut entries = HashMap::with_capacity(flat.len() / 2);
        let mut items = flat.into_iter();
        while let (Some(field), Some(value)) = (items.next(), items.next()) {
            let field = match field.into_bulk()? {
                Some(bytes) => self.sers().hash_field.deserialize(&bytes)?,
                None => return Err(Error::MalformedReply("nil hash field".into())),
            };
            let value = match value.into_bulk()? {
                Some(bytes) => self.sers().hash_value.deserialize(&bytes)?,
                None => return Err(Error::MalformedReply("nil hash value".into())),
            };
            entries.insert(field, value);
        }
        Ok(entries)
    }

    /// Adds `delta` to the integer stored under `field` and returns the new
    /// value. The stored representation bypasses the hash-value serializer.
    pub fn increment(&self, key: &K, field: &F, delta: i64) -> Result<i64> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_field = self.sers().raw_hash_field(field)?;
        self.run(|conn| conn.hincr_by(&raw_key, &raw_field, delta))?.into_i64()
    }

    pub fn size(&self, key: &K) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let length = self.run(|conn| conn.hlen(&raw_key))?.into_i64()?;
        Ok(length.max(0) as u64)
    }
}

//! Operations on score-ordered set values.

use std::sync::Arc;

use redikit_core::{Connection, Result};

use crate::engine::BoundConn;
use crate::serializer::{decode_seq, SerializerSet};
use crate::template::TemplateCore;

pub struct ZSetOps<'a, K, V, F, W> {
    core: Arc<TemplateCore<K, V, F, W>>,
    bound: Option<&'a BoundConn>,
}

impl<'a, K, V, F, W> ZSetOps<'a, K, V, F, W> {
    pub(crate) fn new(core: Arc<TemplateCore<K, V, F, W>>, bound: Option<&'a BoundConn>) -> Self {
        ZSetOps { core, bound }
    }

    fn run<T>(&self, unit: impl FnOnce(&mut dyn Connection) -> Result<T>) -> Result<T> {
        self.core.run(self.bound, unit)
    }

    fn sers(&self) -> &SerializerSet<K, V, F, W> {
        &self.core.serializers
    }

    /// Inserts or rescores `value`. True when the member was newly added,
    /// false when only its score changed.
    pub fn add(&self, key: &K, value: &V, score: f64) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.zadd(&raw_key, score, &raw_value))?.into_bool()
    }

    pub fn remove(&self, key: &K, value: &V) -> Result<bool> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.zrem(&raw_key, &raw_value))?.into_bool()
    }

    /// Adds `delta` to the member's score and returns the new score.
    pub fn increment_score(&self, key: &K, value: &V, delta: f64) -> Result<f64> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.zincr_by(&raw_key, delta, &raw_value))?.into_f64()
    }

    /// Zero-based position in ascending score order; `None` for a missing
    /// member.
    pub fn rank(&self, key: &K, value: &V) -> Result<Option<u64>> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        let rank = self.run(|conn| conn.zrank(&raw_key, &raw_value))?.into_opt_i64()?;
        Ok(rank.map(|r| r.max(0) as u64))
    }

    /// Zero-based position in descending score order.
    pub fn reverse_rank(&self, key: &K, value: &V) -> Result<Option<u64>> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        let rank = self.run(|conn| conn.zrevrank(&raw_key, &raw_value))?.into_opt_i64()?;
        Ok(rank.map(|r| r.max(0) as u64))
    }

    pub fn range(&self, key: &K, start: i64, stop: i64) -> Result<Vec<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.zrange(&raw_key, start, stop))?;
        decode_seq(self.sers().value.as_ref(), reply)
    }

    pub fn range_by_score(&self, key: &K, min: f64, max: f64) -> Result<Vec<V>> {
        let raw_key = self.sers().raw_key(key)?;
        let reply = self.run(|conn| conn.zrange_by_score(&raw_key, min, max))?;
        decode_seq(self.sers().value.as_ref(), reply)
    }

    pub fn score(&self, key: &K, value: &V) -> Result<Option<f64>> {
        let raw_key = self.sers().raw_key(key)?;
        let raw_value = self.sers().raw_value(value)?;
        self.run(|conn| conn.zscore(&raw_key, &raw_value))?.into_opt_f64()
    }

    pub fn size(&self, key: &K) -> Result<u64> {
        let raw_key = self.sers().raw_key(key)?;
        let cardinality = self.run(|conn| conn.zcard(&raw_key))?.into_i64()?;
        Ok(cardinality.max(0) as u64)
    }
}

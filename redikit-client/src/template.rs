//! # Typed Client Template
//!
//! Purpose: Expose a typed, serializer-aware facade over a key-value store
//! connection factory, hiding connection lifecycle, pipelining, and
//! transaction plumbing from operation call-sites.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `KvTemplate` hides acquisition, batching, and
//!    (de)serialization behind domain-level operations.
//! 2. **Configure Then Freeze**: Serializer roles and connection exposure are
//!    fixed by the builder; the built template is `Send + Sync` and shareable.
//! 3. **Eager Facades**: The per-structure operation facades are constructed
//!    at build time and cached for the template's lifetime.
//! 4. **Mode-Agnostic Call-Sites**: The same operations run unchanged in
//!    plain, pipelined, and transactional execution.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;

use redikit_core::{Connection, ConnectionFactory, DataType, Error, Reply, Result};

use crate::engine::{BoundConn, Engine};
use crate::ops::{HashOps, ListOps, SetOps, ValueOps, ZSetOps};
use crate::serializer::{
    decode_opt, decode_opt_seq, decode_seq, JsonSerializer, Serializer, SerializerSet,
    StringSerializer,
};
use crate::session::Session;
use crate::sort::{self, SortQuery};

/// Expiration state of a key, mirroring the store's TTL semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// Key does not exist (or already expired).
    Missing,
    /// Key exists without expiration.
    NoExpiry,
    /// Key expires after the given duration.
    ExpiresIn(Duration),
}

/// Shared internals: the execution engine plus the frozen serializer roles.
/// Facades and sessions hold this behind an `Arc`.
pub(crate) struct TemplateCore<K, V, F, W> {
    pub(crate) engine: Engine,
    pub(crate) serializers: SerializerSet<K, V, F, W>,
}

impl<K, V, F, W> TemplateCore<K, V, F, W> {
    pub(crate) fn run<T>(
        &self,
        bound: Option<&BoundConn>,
        unit: impl FnOnce(&mut dyn Connection) -> Result<T>,
    ) -> Result<T> {
        // Internal operations never terminate the connection themselves, so
        // they bypass the suppressing view.
        self.engine.in_connection(bound, true, unit)
    }

    pub(crate) fn delete(&self, bound: Option<&BoundConn>, key: &K) -> Result<()> {
        let raw = self.serializers.raw_key(key)?;
        self.run(bound, |conn| conn.del(std::slice::from_ref(&raw)).map(|_| ()))
    }

    pub(crate) fn delete_all(&self, bound: Option<&BoundConn>, keys: &[K]) -> Result<()> {
        let raw = self.serializers.raw_keys(keys)?;
        self.run(bound, |conn| conn.del(&raw).map(|_| ()))
    }

    pub(crate) fn has_key(&self, bound: Option<&BoundConn>, key: &K) -> Result<bool> {
        let raw = self.serializers.raw_key(key)?;
        self.run(bound, |conn| conn.exists(&raw))?.into_bool()
    }

    pub(crate) fn expire(&self, bound: Option<&BoundConn>, key: &K, ttl: Duration) -> Result<bool> {
        let raw = self.serializers.raw_key(key)?;
        self.run(bound, |conn| conn.expire(&raw, ttl.as_secs()))?.into_bool()
    }

    pub(crate) fn expire_at(
        &self,
        bound: Option<&BoundConn>,
        key: &K,
        when: SystemTime,
    ) -> Result<bool> {
        let unix_seconds = when
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::InvalidUsage("expiration instant predates the epoch".into()))?
            .as_secs() as i64;
        let raw = self.serializers.raw_key(key)?;
        self.run(bound, |conn| conn.expire_at(&raw, unix_seconds))?.into_bool()
    }

    pub(crate) fn get_expire(&self, bound: Option<&BoundConn>, key: &K) -> Result<KeyTtl> {
        let raw = self.serializers.raw_key(key)?;
        match self.run(bound, |conn| conn.ttl(&raw))?.into_i64()? {
            -2 => Ok(KeyTtl::Missing),
            -1 => Ok(KeyTtl::NoExpiry),
            seconds if seconds >= 0 => Ok(KeyTtl::ExpiresIn(Duration::from_secs(seconds as u64))),
            other => Err(Error::MalformedReply(format!("unexpected TTL value {}", other))),
        }
    }

    pub(crate) fn persist(&self, bound: Option<&BoundConn>, key: &K) -> Result<bool> {
        let raw = self.serializers.raw_key(key)?;
        self.run(bound, |conn| conn.persist(&raw))?.into_bool()
    }

    pub(crate) fn keys(&self, bound: Option<&BoundConn>, pattern: &K) -> Result<Vec<K>> {
        let raw = self.serializers.raw_key(pattern)?;
        let reply = self.run(bound, |conn| conn.keys(&raw))?;
        decode_seq(self.serializers.key.as_ref(), reply)
    }

    pub(crate) fn random_key(&self, bound: Option<&BoundConn>) -> Result<Option<K>> {
        let reply = self.run(bound, |conn| conn.random_key())?;
        decode_opt(self.serializers.key.as_ref(), reply)
    }

    pub(crate) fn rename(&self, bound: Option<&BoundConn>, old_key: &K, new_key: &K) -> Result<()> {
        let raw_old = self.serializers.raw_key(old_key)?;
        let raw_new = self.serializers.raw_key(new_key)?;
        self.run(bound, |conn| conn.rename(&raw_old, &raw_new).map(|_| ()))
    }

    pub(crate) fn rename_if_absent(
        &self,
        bound: Option<&BoundConn>,
        old_key: &K,
        new_key: &K,
    ) -> Result<bool> {
        let raw_old = self.serializers.raw_key(old_key)?;
        let raw_new = self.serializers.raw_key(new_key)?;
        self.run(bound, |conn| conn.rename_nx(&raw_old, &raw_new))?.into_bool()
    }

    pub(crate) fn type_of(&self, bound: Option<&BoundConn>, key: &K) -> Result<DataType> {
        let raw = self.serializers.raw_key(key)?;
        let code = self.run(bound, |conn| conn.type_of(&raw))?.into_status()?;
        DataType::from_code(&code)
    }

    pub(crate) fn publish(
        &self,
        bound: Option<&BoundConn>,
        channel: &str,
        message: &V,
    ) -> Result<()> {
        if channel.is_empty() {
            return Err(Error::InvalidUsage("a non-empty channel is required".into()));
        }
        let raw_channel = self.serializers.raw_string(channel)?;
        let raw_message = self.serializers.raw_value(message)?;
        self.run(bound, |conn| conn.publish(&raw_channel, &raw_message).map(|_| ()))
    }

    pub(crate) fn watch(&self, bound: Option<&BoundConn>, keys: &[K]) -> Result<()> {
        let raw = self.serializers.raw_keys(keys)?;
        self.run(bound, |conn| conn.watch(&raw))
    }

    pub(crate) fn unwatch(&self, bound: Option<&BoundConn>) -> Result<()> {
        self.run(bound, |conn| conn.unwatch())
    }

    pub(crate) fn multi(&self, bound: Option<&BoundConn>) -> Result<()> {
        self.run(bound, |conn| conn.multi())
    }

    pub(crate) fn discard(&self, bound: Option<&BoundConn>) -> Result<()> {
        self.run(bound, |conn| conn.discard())
    }

    pub(crate) fn exec(&self, bound: Option<&BoundConn>) -> Result<Vec<Reply>> {
        self.run(bound, |conn| conn.exec())
    }

    fn sort_reply(&self, bound: Option<&BoundConn>, query: &SortQuery<K>) -> Result<Reply> {
        let raw_key = self.serializers.raw_key(query.key())?;
        let params = sort::translate(query, self.serializers.string.as_ref())?;
        self.run(bound, |conn| conn.sort(&raw_key, &params))
    }

    pub(crate) fn sort(&self, bound: Option<&BoundConn>, query: &SortQuery<K>) -> Result<Vec<V>> {
        let reply = self.sort_reply(bound, query)?;
        decode_seq(self.serializers.value.as_ref(), reply)
    }

    pub(crate) fn sort_with<T>(
        &self,
        bound: Option<&BoundConn>,
        query: &SortQuery<K>,
        serializer: &dyn Serializer<T>,
    ) -> Result<Vec<Option<T>>> {
        let reply = self.sort_reply(bound, query)?;
        decode_opt_seq(serializer, reply)
    }

    pub(crate) fn sort_mapped<T>(
        &self,
        bound: Option<&BoundConn>,
        query: &SortQuery<K>,
        mapper: impl FnMut(&[Option<V>]) -> T,
    ) -> Result<Vec<T>> {
        let values = self.sort_with(bound, query, self.serializers.value.as_ref())?;
        sort::reassemble(values, query.get_pattern_count(), mapper)
    }

    pub(crate) fn sort_and_store(
        &self,
        bound: Option<&BoundConn>,
        query: &SortQuery<K>,
        destination: &K,
    ) -> Result<u64> {
        let raw_key = self.serializers.raw_key(query.key())?;
        let raw_destination = self.serializers.raw_key(destination)?;
        let params = sort::translate(query, self.serializers.string.as_ref())?;
        let stored = self
            .run(bound, |conn| conn.sort_store(&raw_key, &params, &raw_destination))?
            .into_i64()?;
        Ok(stored.max(0) as u64)
    }
}

/// Typed client template over a connection factory.
///
/// `K` and `V` are the key and value types; `F` and `W` type the hash-field
/// and hash-value roles, defaulting to `String` and `V`.
///
/// The central methods are [`KvTemplate::execute`] (plain),
/// [`KvTemplate::execute_pipelined`] (batched, harvested replies), and
/// [`KvTemplate::execute_session`] (one connection bound across several
/// operations, enabling multi-step transactions). Everything else is a
/// convenience translation through those.
pub struct KvTemplate<K, V, F = String, W = V> {
    core: Arc<TemplateCore<K, V, F, W>>,
    value_ops: ValueOps<'static, K, V, F, W>,
    list_ops: ListOps<'static, K, V, F, W>,
    set_ops: SetOps<'static, K, V, F, W>,
    zset_ops: ZSetOps<'static, K, V, F, W>,
    hash_ops: HashOps<'static, K, V, F, W>,
}

impl<K, V, F, W> KvTemplate<K, V, F, W> {
    /// Builds a template with every serializer role defaulted: JSON for
    /// keys, values, and hash roles, UTF-8 for the string role.
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self
    where
        K: Serialize + DeserializeOwned + 'static,
        V: Serialize + DeserializeOwned + 'static,
        F: Serialize + DeserializeOwned + 'static,
        W: Serialize + DeserializeOwned + 'static,
    {
        KvTemplateBuilder::new(factory).build()
    }

    pub fn builder(factory: Arc<dyn ConnectionFactory>) -> KvTemplateBuilder<K, V, F, W> {
        KvTemplateBuilder::new(factory)
    }

    /// Runs a unit of work on a connection acquired for this call and
    /// released on every exit path. Unless the template was built with
    /// `expose_connection(true)`, the unit receives a view that suppresses
    /// lifecycle-terminating commands.
    pub fn execute<T>(&self, unit: impl FnOnce(&mut dyn Connection) -> Result<T>) -> Result<T> {
        self.core.engine.in_connection(None, self.core.engine.expose_connection(), unit)
    }

    /// Runs a unit of work inside a pipeline window and returns the
    /// harvested replies in issue order. The unit returns `()`: its direct
    /// result would be overwritten by the harvest, so the signature does not
    /// admit one. If the connection is already pipelined the window is
    /// inherited, nothing is harvested here, and the result is empty.
    pub fn execute_pipelined(
        &self,
        unit: impl FnOnce(&mut dyn Connection) -> Result<()>,
    ) -> Result<Vec<Reply>> {
        self.core.engine.pipelined_checked(
            None,
            self.core.engine.expose_connection(),
            |conn| unit(conn).map(|()| None::<()>),
        )
    }

    /// Binds one connection for the duration of `session_body`, so that the
    /// operations it issues (watch, multi, data commands, exec) share a
    /// connection. The connection is released when the body returns,
    /// including on failure.
    pub fn execute_session<T>(
        &self,
        session_body: impl FnOnce(&Session<'_, K, V, F, W>) -> Result<T>,
    ) -> Result<T> {
        let bound = self.core.engine.bind()?;
        let session = Session::new(&self.core, bound);
        let result = session_body(&session);
        self.core.engine.unbind(session.into_bound());
        result
    }

    // Typed operation facades, one per data structure, built eagerly.

    pub fn value_ops(&self) -> &ValueOps<'static, K, V, F, W> {
        &self.value_ops
    }

    pub fn list_ops(&self) -> &ListOps<'static, K, V, F, W> {
        &self.list_ops
    }

    pub fn set_ops(&self) -> &SetOps<'static, K, V, F, W> {
        &self.set_ops
    }

    pub fn zset_ops(&self) -> &ZSetOps<'static, K, V, F, W> {
        &self.zset_ops
    }

    pub fn hash_ops(&self) -> &HashOps<'static, K, V, F, W> {
        &self.hash_ops
    }

    // Key-space operations.

    pub fn delete(&self, key: &K) -> Result<()> {
        self.core.delete(None, key)
    }

    pub fn delete_all(&self, keys: &[K]) -> Result<()> {
        self.core.delete_all(None, keys)
    }

    pub fn has_key(&self, key: &K) -> Result<bool> {
        self.core.has_key(None, key)
    }

    pub fn expire(&self, key: &K, ttl: Duration) -> Result<bool> {
        self.core.expire(None, key, ttl)
    }

    pub fn expire_at(&self, key: &K, when: SystemTime) -> Result<bool> {
        self.core.expire_at(None, key, when)
    }

    /// Returns the key's expiration state; see [`KeyTtl`].
    pub fn get_expire(&self, key: &K) -> Result<KeyTtl> {
        self.core.get_expire(None, key)
    }

    pub fn persist(&self, key: &K) -> Result<bool> {
        self.core.persist(None, key)
    }

    pub fn keys(&self, pattern: &K) -> Result<Vec<K>> {
        self.core.keys(None, pattern)
    }

    pub fn random_key(&self) -> Result<Option<K>> {
        self.core.random_key(None)
    }

    pub fn rename(&self, old_key: &K, new_key: &K) -> Result<()> {
        self.core.rename(None, old_key, new_key)
    }

    pub fn rename_if_absent(&self, old_key: &K, new_key: &K) -> Result<bool> {
        self.core.rename_if_absent(None, old_key, new_key)
    }

    pub fn type_of(&self, key: &K) -> Result<DataType> {
        self.core.type_of(None, key)
    }

    /// Serializes `message` with the value serializer and publishes it on
    /// `channel`.
    pub fn publish(&self, channel: &str, message: &V) -> Result<()> {
        self.core.publish(None, channel, message)
    }

    // Transaction control. Outside a session each call runs on its own
    // connection, so these are meaningful inside `execute_session`.

    pub fn watch(&self, key: &K) -> Result<()> {
        self.core.watch(None, std::slice::from_ref(key))
    }

    pub fn watch_all(&self, keys: &[K]) -> Result<()> {
        self.core.watch(None, keys)
    }

    pub fn unwatch(&self) -> Result<()> {
        self.core.unwatch(None)
    }

    pub fn multi(&self) -> Result<()> {
        self.core.multi(None)
    }

    pub fn discard(&self) -> Result<()> {
        self.core.discard(None)
    }

    /// Applies the queued transaction, returning per-command replies in
    /// issue order; an empty sequence when no transaction was active.
    pub fn exec(&self) -> Result<Vec<Reply>> {
        self.core.exec(None)
    }

    // Sort operations.

    /// Sorts and decodes the flat result with the value serializer.
    pub fn sort(&self, query: &SortQuery<K>) -> Result<Vec<V>> {
        self.core.sort(None, query)
    }

    /// Sorts and decodes with a dedicated serializer; GET-pattern gaps for
    /// missing referenced keys stay `None`.
    pub fn sort_with<T>(
        &self,
        query: &SortQuery<K>,
        serializer: &dyn Serializer<T>,
    ) -> Result<Vec<Option<T>>> {
        self.core.sort_with(None, query, serializer)
    }

    /// Sorts with GET patterns and reassembles the flat result into records,
    /// one mapper call per consecutive group of `get_pattern_count` values.
    pub fn sort_mapped<T>(
        &self,
        query: &SortQuery<K>,
        mapper: impl FnMut(&[Option<V>]) -> T,
    ) -> Result<Vec<T>> {
        self.core.sort_mapped(None, query, mapper)
    }

    /// Sorts into `destination`, returning the stored element count.
    pub fn sort_and_store(&self, query: &SortQuery<K>, destination: &K) -> Result<u64> {
        self.core.sort_and_store(None, query, destination)
    }
}

impl KvTemplate<String, String> {
    /// Convenience constructor wiring every role to the UTF-8 string
    /// serializer, for string-intensive workloads.
    pub fn string_template(factory: Arc<dyn ConnectionFactory>) -> Self {
        KvTemplateBuilder::new(factory)
            .key_serializer(StringSerializer)
            .value_serializer(StringSerializer)
            .hash_field_serializer(StringSerializer)
            .hash_value_serializer(StringSerializer)
            .build()
    }
}

/// Configures and builds a [`KvTemplate`]. Serializer roles left unset fall
/// back to the JSON object-graph serializer; the string role independently
/// defaults to UTF-8.
pub struct KvTemplateBuilder<K, V, F = String, W = V> {
    factory: Arc<dyn ConnectionFactory>,
    expose_connection: bool,
    key: Option<Box<dyn Serializer<K>>>,
    value: Option<Box<dyn Serializer<V>>>,
    hash_field: Option<Box<dyn Serializer<F>>>,
    hash_value: Option<Box<dyn Serializer<W>>>,
    string: Option<Box<dyn Serializer<String>>>,
}

impl<K, V, F, W> KvTemplateBuilder<K, V, F, W> {
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        KvTemplateBuilder {
            factory,
            expose_connection: false,
            key: None,
            value: None,
            hash_field: None,
            hash_value: None,
            string: None,
        }
    }

    /// Hands units of work the raw connection instead of the
    /// lifecycle-suppressing view. Default: false.
    pub fn expose_connection(mut self, expose: bool) -> Self {
        self.expose_connection = expose;
        self
    }

    pub fn key_serializer(mut self, serializer: impl Serializer<K> + 'static) -> Self {
        self.key = Some(Box::new(serializer));
        self
    }

    pub fn value_serializer(mut self, serializer: impl Serializer<V> + 'static) -> Self {
        self.value = Some(Box::new(serializer));
        self
    }

    pub fn hash_field_serializer(mut self, serializer: impl Serializer<F> + 'static) -> Self {
        self.hash_field = Some(Box::new(serializer));
        self
    }

    pub fn hash_value_serializer(mut self, serializer: impl Serializer<W> + 'static) -> Self {
        self.hash_value = Some(Box::new(serializer));
        self
    }

    pub fn string_serializer(mut self, serializer: impl Serializer<String> + 'static) -> Self {
        self.string = Some(Box::new(serializer));
        self
    }

    /// Finalizes the configuration. After this point the serializer set is
    /// frozen and the template may be shared across threads.
    pub fn build(self) -> KvTemplate<K, V, F, W>
    where
        K: Serialize + DeserializeOwned + 'static,
        V: Serialize + DeserializeOwned + 'static,
        F: Serialize + DeserializeOwned + 'static,
        W: Serialize + DeserializeOwned + 'static,
    {
        let serializers = SerializerSet {
            key: self.key.unwrap_or_else(|| Box::new(JsonSerializer::new())),
            value: self.value.unwrap_or_else(|| Box::new(JsonSerializer::new())),
            hash_field: self.hash_field.unwrap_or_else(|| Box::new(JsonSerializer::new())),
            hash_value: self.hash_value.unwrap_or_else(|| Box::new(JsonSerializer::new())),
            string: self.string.unwrap_or_else(|| Box::new(StringSerializer)),
        };
        let core = Arc::new(TemplateCore {
            engine: Engine::new(self.factory, self.expose_connection),
            serializers,
        });
        KvTemplate {
            value_ops: ValueOps::new(core.clone(), None),
            list_ops: ListOps::new(core.clone(), None),
            set_ops: SetOps::new(core.clone(), None),
            zset_ops: ZSetOps::new(core.clone(), None),
            hash_ops: HashOps::new(core.clone(), None),
            core,
        }
    }
}

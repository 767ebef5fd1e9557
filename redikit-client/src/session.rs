//! # Bound Connection Session
//!
//! Purpose: Run several operations against one connection, so transaction
//! state (WATCH, MULTI, queued commands) survives across calls.
//!
//! ## Design Principles
//! 1. **Explicit Scope**: A session exists only inside
//!    `KvTemplate::execute_session`; no hidden per-thread registry decides
//!    which connection an operation sees.
//! 2. **One Connection, One Owner**: The session owns the binding and the
//!    template releases it on every exit path of the enclosing call.
//! 3. **Same Surface**: Operations mirror the template's so a unit of work
//!    moves between session and non-session execution unchanged.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use redikit_core::{Connection, DataType, Reply, Result};

use crate::engine::BoundConn;
use crate::ops::{HashOps, ListOps, SetOps, ValueOps, ZSetOps};
use crate::serializer::Serializer;
use crate::sort::SortQuery;
use crate::template::{KeyTtl, TemplateCore};

/// A template view pinned to one bound connection.
///
/// Operations on a session and on the facades it hands out must be issued
/// sequentially from the session body; they share the single bound
/// connection and are not reentrant.
pub struct Session<'t, K, V, F, W> {
    core: &'t Arc<TemplateCore<K, V, F, W>>,
    bound: BoundConn,
}

impl<'t, K, V, F, W> Session<'t, K, V, F, W> {
    pub(crate) fn new(core: &'t Arc<TemplateCore<K, V, F, W>>, bound: BoundConn) -> Self {
        Session { core, bound }
    }

    pub(crate) fn into_bound(self) -> BoundConn {
        self.bound
    }

    /// Runs a unit of work on the bound connection.
    pub fn execute<T>(&self, unit: impl FnOnce(&mut dyn Connection) -> Result<T>) -> Result<T> {
        self.core
            .engine
            .in_connection(Some(&self.bound), self.core.engine.expose_connection(), unit)
    }

    /// Opens a pipeline window on the bound connection and harvests its
    /// replies; inherits (and leaves open) a window that is already active.
    pub fn execute_pipelined(
        &self,
        unit: impl FnOnce(&mut dyn Connection) -> Result<()>,
    ) -> Result<Vec<Reply>> {
        self.core.engine.pipelined_checked(
            Some(&self.bound),
            self.core.engine.expose_connection(),
            |conn| unit(conn).map(|()| None::<()>),
        )
    }

    // Typed facades sharing this session's connection.

    pub fn value_ops(&self) -> ValueOps<'_, K, V, F, W> {
        ValueOps::new(self.core.clone(), Some(&self.bound))
    }

    pub fn list_ops(&self) -> ListOps<'_, K, V, F, W> {
        ListOps::new(self.core.clone(), Some(&self.bound))
    }

    pub fn set_ops(&self) -> SetOps<'_, K, V, F, W> {
        SetOps::new(self.core.clone(), Some(&self.bound))
    }

    pub fn zset_ops(&self) -> ZSetOps<'_, K, V, F, W> {
        ZSetOps::new(self.core.clone(), Some(&self.bound))
    }

    pub fn hash_ops(&self) -> HashOps<'_, K, V, F, W> {
        HashOps::new(self.core.clone(), Some(&self.bound))
    }

    // Transaction control on the bound connection.

    pub fn watch(&self, key: &K) -> Result<()> {
        self.core.watch(Some(&self.bound), std::slice::from_ref(key))
    }

    pub fn watch_all(&self, keys: &[K]) -> Result<()> {
        self.core.watch(Some(&self.bound), keys)
    }

    pub fn unwatch(&self) -> Result<()> {
        self.core.unwatch(Some(&self.bound))
    }

    pub fn multi(&self) -> Result<()> {
        self.core.multi(Some(&self.bound))
    }

    pub fn discard(&self) -> Result<()> {
        self.core.discard(Some(&self.bound))
    }

    /// Applies the queued transaction; empty when a watched key changed or
    /// no transaction was active.
    pub fn exec(&self) -> Result<Vec<Reply>> {
        self.core.exec(Some(&self.bound))
    }

    // Key-space operations, delegated to the bound connection.

    pub fn delete(&self, key: &K) -> Result<()> {
        self.core.delete(Some(&self.bound), key)
    }

    pub fn delete_all(&self, keys: &[K]) -> Result<()> {
        self.core.delete_all(Some(&self.bound), keys)
    }

    pub fn has_key(&self, key: &K) -> Result<bool> {
        self.core.has_key(Some(&self.bound), key)
    }

    pub fn expire(&self, key: &K, ttl: Duration) -> Result<bool> {
        self.core.expire(Some(&self.bound), key, ttl)
    }

    pub fn expire_at(&self, key: &K, when: SystemTime) -> Result<bool> {
        self.core.expire_at(Some(&self.bound), key, when)
    }

    pub fn get_expire(&self, key: &K) -> Result<KeyTtl> {
        self.core.get_expire(Some(&self.bound), key)
    }

    pub fn persist(&self, key: &K) -> Result<bool> {
        self.core.persist(Some(&self.bound), key)
    }

    pub fn keys(&self, pattern: &K) -> Result<Vec<K>> {
        self.core.keys(Some(&self.bound), pattern)
    }

    pub fn random_key(&self) -> Result<Option<K>> {
        self.core.random_key(Some(&self.bound))
    }

    pub fn rename(&self, old_key: &K, new_key: &K) -> Result<()> {
        self.core.rename(Some(&self.bound), old_key, new_key)
    }

    pub fn rename_if_absent(&self, old_key: &K, new_key: &K) -> Result<bool> {
        self.core.rename_if_absent(Some(&self.bound), old_key, new_key)
    }

    pub fn type_of(&self, key: &K) -> Result<DataType> {
        self.core.type_of(Some(&self.bound), key)
    }

    pub fn publish(&self, channel: &str, message: &V) -> Result<()> {
        self.core.publish(Some(&self.bound), channel, message)
    }

    // Sort operations.

    pub fn sort(&self, query: &SortQuery<K>) -> Result<Vec<V>> {
        self.core.sort(Some(&self.bound), query)
    }

    pub fn sort_with<T>(
        &self,
        query: &SortQuery<K>,
        serializer: &dyn Serializer<T>,
    ) -> Result<Vec<Option<T>>> {
        self.core.sort_with(Some(&self.bound), query, serializer)
    }

    pub fn sort_mapped<T>(
        &self,
        query: &SortQuery<K>,
        mapper: impl FnMut(&[Option<V>]) -> T,
    ) -> Result<Vec<T>> {
        self.core.sort_mapped(Some(&self.bound), query, mapper)
    }

    pub fn sort_and_store(&self, query: &SortQuery<K>, destination: &K) -> Result<u64> {
        self.core.sort_and_store(Some(&self.bound), query, destination)
    }
}

//! # Redikit Typed Client
//!
//! Purpose: Provide a typed, serializer-aware template over a key-value
//! store connection factory, with uniform plain, pipelined, and
//! transactional execution.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: Callers work with typed operations; connection
//!    lifecycle and wire payloads stay internal.
//! 2. **Configure Then Freeze**: Serializer roles are fixed at build time,
//!    so the same key always maps to the same bytes.
//! 3. **Explicit Binding**: Multi-operation connection affinity is an
//!    explicit session scope, never ambient per-thread state.
//! 4. **Deterministic Release**: Every acquired connection is released on
//!    every exit path, including failures.

mod engine;
mod guard;
mod ops;
mod serializer;
mod session;
mod sort;
mod template;

pub use guard::CloseSuppressing;
pub use ops::{HashOps, ListOps, SetOps, ValueOps, ZSetOps};
pub use serializer::{BytesSerializer, JsonSerializer, Serializer, StringSerializer};
pub use session::Session;
pub use sort::SortQuery;
pub use template::{KeyTtl, KvTemplate, KvTemplateBuilder};

pub use redikit_core::{
    Connection, ConnectionFactory, DataType, Error, Reply, Result, SortLimit, SortOrder,
    SortParams,
};

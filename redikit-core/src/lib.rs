//! # Redikit Core Contracts
//!
//! Purpose: Define the shared seams between the typed client template and
//! concrete wire-protocol drivers: the connection capability surface, the
//! decoded reply value, sort wire parameters, and the error taxonomy.
//!
//! ## Design Principles
//! 1. **Interface-Only Wire Layer**: No framing or transport code lives here;
//!    drivers implement [`Connection`] however they speak to the store.
//! 2. **Uniform Replies**: Every command returns a [`Reply`], so batched
//!    (pipelined/queued) execution can defer results without changing
//!    signatures.
//! 3. **Explicit Absence**: The store's missing-key marker is its own
//!    [`Reply::Nil`] variant, never conflated with an empty payload.
//! 4. **Typed Failures**: One error enum covers acquisition, usage, store,
//!    and serialization failures; nothing is swallowed or wrapped twice.

mod connection;
mod error;
mod reply;
mod sort;

pub use connection::{Connection, ConnectionFactory};
pub use error::{Error, Result};
pub use reply::{DataType, Reply};
pub use sort::{SortLimit, SortOrder, SortParams};

//! Typed per-structure operation facades.
//!
//! Each facade pairs the shared template internals with an optional bound
//! connection: `None` means every call acquires and releases its own
//! connection, `Some` pins the facade to a session's connection.

mod hash;
mod list;
mod set;
mod value;
mod zset;

pub use hash::HashOps;
pub use list::ListOps;
pub use set::SetOps;
pub use value::ValueOps;
pub use zset::ZSetOps;

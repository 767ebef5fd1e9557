//! Error taxonomy shared by drivers and the client template.

use thiserror::Error;

/// Result type used throughout the redikit crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by connections, serializers, and the template.
///
/// None of these are retried or translated by the execution layer; its only
/// added behavior is guaranteeing the connection is released before a
/// failure reaches the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection factory could not produce a connection. Fatal to the
    /// current call.
    #[error("connection acquisition failed: {0}")]
    Acquire(String),

    /// The caller violated an API contract, e.g. returned a direct result
    /// from a unit of work that owns an open pipeline.
    #[error("invalid API usage: {0}")]
    InvalidUsage(String),

    /// An error reported by the store for an issued command, propagated
    /// unchanged.
    #[error("store error: {0}")]
    Store(String),

    /// Encoding or decoding through a configured serializer failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A reply did not have the shape the issued command requires, e.g. a
    /// bulk reply where an integer was expected, or a sort result that does
    /// not divide into whole records.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

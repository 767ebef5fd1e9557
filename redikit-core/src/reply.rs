//! # Decoded Store Replies
//!
//! Purpose: Represent every reply a driver can hand back, including the
//! placeholders produced while commands are buffered in a pipeline or
//! transaction window.
//!
//! ## Design Principles
//! 1. **Binary-Safe**: Bulk payloads are raw bytes; decoding to typed values
//!    is the serializer set's job, not this type's.
//! 2. **Absence Is a Variant**: `Nil` is distinct from an empty `Bulk`, so
//!    existence checks survive the decode path.
//! 3. **Checked Conversions**: Shape mismatches fail with a malformed-reply
//!    error instead of panicking or defaulting.

use bytes::Bytes;

use crate::error::{Error, Result};

/// A decoded reply from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Simple status line, e.g. `OK`.
    Status(String),
    /// Integer reply.
    Int(i64),
    /// Bulk payload.
    Bulk(Bytes),
    /// Multi-element reply; elements keep issue order.
    Array(Vec<Reply>),
    /// The store's explicit missing-key marker.
    Nil,
    /// Placeholder returned while a command is buffered inside an open
    /// pipeline or `MULTI` window; the real reply arrives at harvest time.
    Queued,
}

impl Reply {
    /// Short human-readable name used in malformed-reply errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Status(_) => "status",
            Reply::Int(_) => "integer",
            Reply::Bulk(_) => "bulk",
            Reply::Array(_) => "array",
            Reply::Nil => "nil",
            Reply::Queued => "queued",
        }
    }

    /// Consumes a status reply.
    pub fn into_status(self) -> Result<String> {
        match self {
            Reply::Status(status) => Ok(status),
            other => Err(other.mismatch("status")),
        }
    }

    /// Consumes an integer reply.
    pub fn into_i64(self) -> Result<i64> {
        match self {
            Reply::Int(value) => Ok(value),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Consumes an integer reply, treating `Nil` as absent. Used for rank
    /// and index style commands.
    pub fn into_opt_i64(self) -> Result<Option<i64>> {
        match self {
            Reply::Int(value) => Ok(Some(value)),
            Reply::Nil => Ok(None),
            other => Err(other.mismatch("integer or nil")),
        }
    }

    /// Consumes a 0/1 integer reply as a boolean.
    pub fn into_bool(self) -> Result<bool> {
        Ok(self.into_i64()? != 0)
    }

    /// Consumes a bulk reply, mapping `Nil` to `None`.
    pub fn into_bulk(self) -> Result<Option<Bytes>> {
        match self {
            Reply::Bulk(data) => Ok(Some(data)),
            Reply::Nil => Ok(None),
            other => Err(other.mismatch("bulk or nil")),
        }
    }

    /// Consumes an array reply. `Nil` (e.g. a missing key for a range
    /// command) maps to an empty sequence, never an absent one.
    pub fn into_array(self) -> Result<Vec<Reply>> {
        match self {
            Reply::Array(items) => Ok(items),
            Reply::Nil => Ok(Vec::new()),
            other => Err(other.mismatch("array or nil")),
        }
    }

    /// Consumes a numeric reply carried either as an integer or as an
    /// ASCII-encoded bulk payload (score style commands).
    pub fn into_f64(self) -> Result<f64> {
        match self {
            Reply::Int(value) => Ok(value as f64),
            Reply::Bulk(data) => std::str::from_utf8(&data)
                .ok()
                .and_then(|text| text.parse::<f64>().ok())
                .ok_or_else(|| Error::MalformedReply("bulk payload is not a number".into())),
            other => Err(other.mismatch("number")),
        }
    }

    /// As [`Reply::into_f64`], with `Nil` mapped to `None`.
    pub fn into_opt_f64(self) -> Result<Option<f64>> {
        match self {
            Reply::Nil => Ok(None),
            other => other.into_f64().map(Some),
        }
    }

    fn mismatch(self, expected: &str) -> Error {
        Error::MalformedReply(format!("expected {} reply, got {}", expected, self.kind()))
    }
}

/// Store-side type of a key, as reported by the TYPE command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    None,
    String,
    List,
    Set,
    ZSet,
    Hash,
}

impl DataType {
    /// Parses the TYPE status code.
    pub fn from_code(code: &str) -> Result<DataType> {
        match code {
            "none" => Ok(DataType::None),
            "string" => Ok(DataType::String),
            "list" => Ok(DataType::List),
            "set" => Ok(DataType::Set),
            "zset" => Ok(DataType::ZSet),
            "hash" => Ok(DataType::Hash),
            other => Err(Error::MalformedReply(format!("unknown data type {:?}", other))),
        }
    }
}

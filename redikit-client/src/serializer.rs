//! # Serializer Set
//!
//! Purpose: Convert caller-level typed objects to and from the store's raw
//! binary payloads, one configurable serializer per role (key, value,
//! hash-field, hash-value, string).
//!
//! ## Design Principles
//! 1. **Fixed After Build**: Roles are assigned while the template is built
//!    and never change, so the same key always encodes to the same bytes.
//! 2. **Independent Roles**: The string role defaults to plain UTF-8 and is
//!    never silently replaced by the object-graph default.
//! 3. **Absence Survives Decoding**: A `Nil` reply decodes to `None`, never
//!    to a zero value of the target type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use redikit_core::{Error, Reply, Result};

/// Bidirectional mapping between a typed value and an opaque byte sequence.
pub trait Serializer<T>: Send + Sync {
    fn serialize(&self, value: &T) -> Result<Vec<u8>>;
    fn deserialize(&self, bytes: &[u8]) -> Result<T>;
}

/// Generic object-graph serializer over JSON. The default for the key,
/// value, hash-field, and hash-value roles.
pub struct JsonSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    pub fn new() -> Self {
        JsonSerializer { _marker: PhantomData }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Serializer<T> for JsonSerializer<T> {
    fn serialize(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|err| Error::Serialization(err.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|err| Error::Serialization(err.to_string()))
    }
}

/// Plain UTF-8 text serializer. The default for the string role.
pub struct StringSerializer;

impl Serializer<String> for StringSerializer {
    fn serialize(&self, value: &String) -> Result<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|err| Error::Serialization(format!("invalid UTF-8 payload: {}", err)))
    }
}

/// Pass-through serializer for callers that work with raw bytes directly.
pub struct BytesSerializer;

impl Serializer<Vec<u8>> for BytesSerializer {
    fn serialize(&self, value: &Vec<u8>) -> Result<Vec<u8>> {
        Ok(value.clone())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}

/// The five serializer roles a template carries, frozen at build time.
pub(crate) struct SerializerSet<K, V, F, W> {
    pub key: Box<dyn Serializer<K>>,
    pub value: Box<dyn Serializer<V>>,
    pub hash_field: Box<dyn Serializer<F>>,
    pub hash_value: Box<dyn Serializer<W>>,
    pub string: Box<dyn Serializer<String>>,
}

impl<K, V, F, W> SerializerSet<K, V, F, W> {
    pub fn raw_key(&self, key: &K) -> Result<Vec<u8>> {
        self.key.serialize(key)
    }

    pub fn raw_keys(&self, keys: &[K]) -> Result<Vec<Vec<u8>>> {
        keys.iter().map(|key| self.key.serialize(key)).collect()
    }

    pub fn raw_value(&self, value: &V) -> Result<Vec<u8>> {
        self.value.serialize(value)
    }

    pub fn raw_hash_field(&self, field: &F) -> Result<Vec<u8>> {
        self.hash_field.serialize(field)
    }

    pub fn raw_hash_value(&self, value: &W) -> Result<Vec<u8>> {
        self.hash_value.serialize(value)
    }

    pub fn raw_string(&self, text: &str) -> Result<Vec<u8>> {
        self.string.serialize(&text.to_owned())
    }
}

/// Decodes a bulk-or-nil reply into an optional typed value.
pub(crate) fn decode_opt<T>(serializer: &dyn Serializer<T>, reply: Reply) -> Result<Option<T>> {
    match reply.into_bulk()? {
        Some(bytes) => serializer.deserialize(&bytes).map(Some),
        None => Ok(None),
    }
}

/// Decodes an array of bulk replies into typed values. A nil element is a
/// shape error here; use [`decode_opt_seq`] for commands that report gaps.
pub(crate) fn decode_seq<T>(serializer: &dyn Serializer<T>, reply: Reply) -> Result<Vec<T>> {
    reply
        .into_array()?
        .into_iter()
        .map(|item| match item.into_bulk()? {
            Some(bytes) => serializer.deserialize(&bytes),
            None => Err(Error::MalformedReply("nil element in bulk sequence".into())),
        })
        .collect()
}

/// Decodes an array of bulk-or-nil replies, keeping gaps as `None`.
pub(crate) fn decode_opt_seq<T>(serializer: &dyn Serializer<T>, reply: Reply) -> Result<Vec<Option<T>>> {
    reply
        .into_array()?
        .into_iter()
        .map(|item| decode_opt(serializer, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Account {
        id: u64,
        name: String,
    }

    #[test]
    fn json_round_trip() {
        let serializer = JsonSerializer::<Account>::new();
        let account = Account { id: 7, name: "kim".into() };
        let bytes = serializer.serialize(&account).unwrap();
        assert_eq!(serializer.deserialize(&bytes).unwrap(), account);
    }

    #[test]
    fn string_round_trip() {
        let serializer = StringSerializer;
        let bytes = serializer.serialize(&"hello".to_owned()).unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(serializer.deserialize(&bytes).unwrap(), "hello");
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let err = StringSerializer.deserialize(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn nil_decodes_to_absent_not_empty() {
        let serializer = StringSerializer;
        assert_eq!(decode_opt(&serializer, Reply::Nil).unwrap(), None);
        // An empty present payload stays present.
        let empty = decode_opt(&serializer, Reply::Bulk(Bytes::new())).unwrap();
        assert_eq!(empty, Some(String::new()));
    }

    #[test]
    fn opt_seq_keeps_gaps() {
        let serializer = StringSerializer;
        let reply = Reply::Array(vec![
            Reply::Bulk(Bytes::from_static(b"a")),
            Reply::Nil,
            Reply::Bulk(Bytes::from_static(b"b")),
        ]);
        let decoded = decode_opt_seq(&serializer, reply).unwrap();
        assert_eq!(decoded, vec![Some("a".into()), None, Some("b".into())]);
    }
}

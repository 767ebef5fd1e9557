//! # Sort Query Translation
//!
//! Purpose: Convert a structured sort specification into wire parameters and
//! reassemble flat GET-pattern results into fixed-width records.

use redikit_core::{Error, Result, SortLimit, SortOrder, SortParams};

use crate::serializer::Serializer;

/// A structured sort specification over a typed key.
#[derive(Debug, Clone)]
pub struct SortQuery<K> {
    key: K,
    by_pattern: Option<String>,
    order: SortOrder,
    alphabetic: bool,
    limit: Option<SortLimit>,
    get_patterns: Vec<String>,
}

impl<K> SortQuery<K> {
    pub fn new(key: K) -> Self {
        SortQuery {
            key,
            by_pattern: None,
            order: SortOrder::Ascending,
            alphabetic: false,
            limit: None,
            get_patterns: Vec::new(),
        }
    }

    /// Sorts by the values found through `pattern` instead of the elements
    /// themselves.
    pub fn by(mut self, pattern: impl Into<String>) -> Self {
        self.by_pattern = Some(pattern.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Compares lexicographically instead of numerically.
    pub fn alphabetic(mut self) -> Self {
        self.alphabetic = true;
        self
    }

    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some(SortLimit { offset, count });
        self
    }

    /// Adds a GET pattern; each pattern contributes one element per record
    /// to the flat result.
    pub fn get(mut self, pattern: impl Into<String>) -> Self {
        self.get_patterns.push(pattern.into());
        self
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn get_pattern_count(&self) -> usize {
        self.get_patterns.len()
    }
}

/// Encodes the query's patterns through the string serializer and produces
/// the wire parameters consumed by the connection's sort command.
pub(crate) fn translate<K>(
    query: &SortQuery<K>,
    string: &dyn Serializer<String>,
) -> Result<SortParams> {
    let by_pattern = match &query.by_pattern {
        Some(pattern) => Some(string.serialize(pattern)?),
        None => None,
    };
    let get_patterns = query
        .get_patterns
        .iter()
        .map(|pattern| string.serialize(pattern))
        .collect::<Result<Vec<_>>>()?;

    Ok(SortParams {
        by_pattern,
        limit: query.limit,
        get_patterns,
        order: query.order,
        alphabetic: query.alphabetic,
    })
}

/// Partitions the flat decoded sequence into consecutive records of `width`
/// elements each, in order. An empty input yields an empty output; a
/// trailing partial record is a malformed reply, never silently dropped.
pub(crate) fn reassemble<T, R>(
    values: Vec<T>,
    width: usize,
    mut map: impl FnMut(&[T]) -> R,
) -> Result<Vec<R>> {
    if width == 0 {
        return Err(Error::InvalidUsage(
            "record reassembly requires at least one GET pattern".into(),
        ));
    }
    if values.is_empty() {
        return Ok(Vec::new());
    }
    if values.len() % width != 0 {
        return Err(Error::MalformedReply(format!(
            "sort returned {} values, not divisible into records of {}",
            values.len(),
            width
        )));
    }
    Ok(values.chunks_exact(width).map(|chunk| map(chunk)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::StringSerializer;

    #[test]
    fn translates_patterns_through_string_serializer() {
        let query = SortQuery::new("tasks")
            .by("weight_*")
            .order(SortOrder::Descending)
            .alphabetic()
            .limit(5, 10)
            .get("task_*")
            .get("owner_*");

        let params = translate(&query, &StringSerializer).unwrap();
        assert_eq!(params.by_pattern, Some(b"weight_*".to_vec()));
        assert_eq!(params.order, SortOrder::Descending);
        assert!(params.alphabetic);
        assert_eq!(params.limit, Some(SortLimit { offset: 5, count: 10 }));
        assert_eq!(params.get_patterns, vec![b"task_*".to_vec(), b"owner_*".to_vec()]);
    }

    #[test]
    fn reassembles_whole_records_in_order() {
        let flat = vec!["a", "1", "b", "2", "c", "3"];
        let records = reassemble(flat, 2, |chunk| (chunk[0], chunk[1])).unwrap();
        assert_eq!(records, vec![("a", "1"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let records = reassemble(Vec::<&str>::new(), 2, |chunk| chunk.len()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn partial_trailing_record_fails_loudly() {
        let flat = vec!["a", "1", "b"];
        let err = reassemble(flat, 2, |chunk| chunk.len()).unwrap_err();
        assert!(matches!(err, Error::MalformedReply(_)));
    }

    #[test]
    fn zero_width_is_invalid_usage() {
        let err = reassemble(vec!["a"], 0, |chunk| chunk.len()).unwrap_err();
        assert!(matches!(err, Error::InvalidUsage(_)));
    }
}

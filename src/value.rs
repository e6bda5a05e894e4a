//! The nested structure produced by bracket-path extraction.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{ArrayFormat, Pair};

/// A value of an extracted query string: either a plain string or a nested
/// mapping.
#[derive(Clone, PartialEq)]
pub enum NestedValue {
    String(String),
    Map(NestedMap),
}

impl NestedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NestedValue::String(s) => Some(s),
            NestedValue::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&NestedMap> {
        match self {
            NestedValue::String(_) => None,
            NestedValue::Map(map) => Some(map),
        }
    }

    /// Turns this value into a map (dropping a string value) and returns it.
    fn make_map(&mut self) -> &mut NestedMap {
        loop {
            match self {
                NestedValue::Map(map) => return map,
                NestedValue::String(_) => *self = NestedValue::Map(NestedMap::new()),
            }
        }
    }
}

impl fmt::Debug for NestedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NestedValue::String(s) => write!(f, "{s:?}"),
            NestedValue::Map(map) => map.fmt(f),
        }
    }
}

impl From<&str> for NestedValue {
    fn from(s: &str) -> Self {
        NestedValue::String(s.to_owned())
    }
}

impl From<String> for NestedValue {
    fn from(s: String) -> Self {
        NestedValue::String(s)
    }
}

impl From<NestedMap> for NestedValue {
    fn from(map: NestedMap) -> Self {
        NestedValue::Map(map)
    }
}

/// An insertion-ordered mapping with array-push semantics.
///
/// Keys are strings. Keys written as canonical integers (`0`, `42`, `-1`,
/// but not `01`) also advance the next index used by [`NestedMap::push`],
/// the way appending to a PHP array does.
#[derive(Clone)]
pub struct NestedMap {
    entries: IndexMap<String, NestedValue>,
    /// `None` once `i64::MAX` has been used.
    next_index: Option<i64>,
}

impl Default for NestedMap {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            next_index: Some(0),
        }
    }
}

/// Parses `key` if it is the canonical decimal form of an integer.
fn integer_key(key: &str) -> Option<i64> {
    let index = key.parse::<i64>().ok()?;
    (itoa::Buffer::new().format(index) == key).then_some(index)
}

impl NestedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&NestedValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, NestedValue> {
        self.entries.iter()
    }

    /// Inserts a value, replacing (in place) any value with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<NestedValue>) -> Option<NestedValue> {
        let key = key.into();
        self.track_index(&key);
        self.entries.insert(key, value.into())
    }

    /// Appends a value at the next free integer index and returns that index.
    ///
    /// Once the index `i64::MAX` is taken there is no next index: the value
    /// is dropped and `None` is returned.
    pub fn push(&mut self, value: impl Into<NestedValue>) -> Option<String> {
        let key = itoa::Buffer::new().format(self.next_index?).to_owned();
        self.insert(key.clone(), value);
        Some(key)
    }

    /// Whether the keys are exactly `0, 1, 2, ...` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(idx, key)| integer_key(key) == i64::try_from(idx).ok())
    }

    /// Returns the map stored under `key`, replacing any string value (or
    /// inserting an empty map) first.
    pub(crate) fn child_map(&mut self, key: &str) -> &mut NestedMap {
        self.track_index(key);
        self.entries
            .entry(key.to_owned())
            .or_insert_with(|| NestedValue::Map(NestedMap::new()))
            .make_map()
    }

    fn track_index(&mut self, key: &str) {
        match (integer_key(key), self.next_index) {
            (Some(index), Some(next)) if index >= next => self.next_index = index.checked_add(1),
            _ => {}
        }
    }

    /// Flattens the map back into bracket-path pairs (`a[b][0]=v`).
    ///
    /// `format` controls how keys of list-like maps are written. Empty
    /// nested maps produce no pair.
    pub fn to_pairs(&self, format: ArrayFormat) -> Vec<Pair> {
        let mut pairs = Vec::with_capacity(self.len());
        let mut key = String::new();
        self.flatten_into(&mut key, true, format, &mut pairs);
        pairs
    }

    fn flatten_into(&self, key: &mut String, root: bool, format: ArrayFormat, pairs: &mut Vec<Pair>) {
        let list = !root && self.is_list();
        for (segment, value) in &self.entries {
            let prefix_len = key.len();
            if root {
                key.push_str(segment);
            } else if list && format == ArrayFormat::EmptyIndexed {
                key.push_str("[]");
            } else if list && format == ArrayFormat::Unindexed {
                // repeated bare keys
            } else {
                key.push('[');
                key.push_str(segment);
                key.push(']');
            }

            match value {
                NestedValue::String(s) => pairs.push((key.clone(), Some(s.clone()))),
                NestedValue::Map(map) => map.flatten_into(key, false, format, pairs),
            }
            key.truncate(prefix_len);
        }
    }
}

impl PartialEq for NestedMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for NestedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<NestedValue>> FromIterator<(K, V)> for NestedMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = NestedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for NestedMap {
    type Item = (String, NestedValue);
    type IntoIter = indexmap::map::IntoIter<String, NestedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a NestedMap {
    type Item = (&'a String, &'a NestedValue);
    type IntoIter = indexmap::map::Iter<'a, String, NestedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Lists serialize as sequences, other maps as maps. This matches the
/// shape `json_encode` gives to PHP arrays.
impl Serialize for NestedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.entries.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in &self.entries {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }
}

impl Serialize for NestedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NestedValue::String(s) => serializer.serialize_str(s),
            NestedValue::Map(map) => map.serialize(serializer),
        }
    }
}

//! In-memory configuration document
//!
//! Sections and keys keep their insertion order so a parsed file regenerates in the
//! same order it was written.

use ahash::AHashMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Value stored under one key of a section
///
/// A key is either repeated (`Key=a`, `Key=b`) or indexed (`Key[0]=a`), never both.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    List(Vec<String>),
    IndexedMap(BTreeMap<u32, String>),
}

impl Value {
    /// Values in generation order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Value::List(items) => items.iter().map(String::as_str).collect(),
            Value::IndexedMap(items) => items.values().map(String::as_str).collect(),
        }
    }

    /// Values paired with their record id: list position or declared index
    pub fn indexed_values(&self) -> Vec<(usize, &str)> {
        match self {
            Value::List(items) => items.iter().map(String::as_str).enumerate().collect(),
            Value::IndexedMap(items) => items
                .iter()
                .map(|(index, value)| (*index as usize, value.as_str()))
                .collect(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            Value::List(items) => items.first().map(String::as_str),
            Value::IndexedMap(items) => items.values().next().map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            Value::IndexedMap(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a list of strings or a map from index to string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Value, E> {
        Ok(Value::List(vec![value.to_string()]))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<String>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    // JSON object keys arrive as strings ("0", "1", ...)
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut items = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            let index = key
                .trim()
                .parse::<u32>()
                .map_err(|_| de::Error::custom(format!("invalid array index '{}'", key)))?;
            items.insert(index, value);
        }
        Ok(Value::IndexedMap(items))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// String-keyed map that remembers insertion order
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: AHashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for OrderedMap<V> {}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Insert or replace; a replaced key keeps its original position
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(i) = self.index.get(&key).copied() {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let existing = self.index.get(key).copied();
        let i = match existing {
            Some(i) => i,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), make()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Keys of one `[Section]`
pub type Section = OrderedMap<Value>;

/// Result of a key insertion that must respect the key's existing value shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeConflict {
    /// `Key[N]=` appeared after `Key=` lines
    ExpectedList,
    /// `Key=` appeared after `Key[N]=` lines
    ExpectedIndexed,
}

impl OrderedMap<Value> {
    /// Append a repeated-key value, creating the list on first sight
    pub fn push_list(&mut self, key: &str, value: String) -> Result<(), ShapeConflict> {
        match self.get_or_insert_with(key, || Value::List(Vec::new())) {
            Value::List(items) => {
                items.push(value);
                Ok(())
            }
            Value::IndexedMap(_) => Err(ShapeConflict::ExpectedIndexed),
        }
    }

    /// Store `key[index]`, creating the map on first sight
    pub fn insert_indexed(
        &mut self,
        key: &str,
        index: u32,
        value: String,
    ) -> Result<(), ShapeConflict> {
        match self.get_or_insert_with(key, || Value::IndexedMap(BTreeMap::new())) {
            Value::IndexedMap(items) => {
                items.insert(index, value);
                Ok(())
            }
            Value::List(_) => Err(ShapeConflict::ExpectedList),
        }
    }
}

/// Parsed configuration file: ordered sections of ordered keys
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: OrderedMap<Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Get a section, appending an empty one if it does not exist yet
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        self.sections.get_or_insert_with(name, Section::new)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Set a key, replacing any previous value of either shape
    pub fn set(&mut self, section: &str, key: &str, value: Value) {
        self.section_or_insert(section).insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

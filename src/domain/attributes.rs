//! Ordered attribute sets carried by document nodes.

use std::fmt;

use itertools::Itertools;

/// Attribute name used to tag each element of a field collection with its position.
pub const ORDER_ATTRIBUTE: &str = "order";

/// Insertion-ordered set of unique attribute keys with their values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single `order` attribute for the collection element at `index`.
    pub fn order(index: usize) -> Self {
        let mut attributes = Self::new();
        attributes.insert(ORDER_ATTRIBUTE, index.to_string());
        attributes
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every key of `self` is present in `other` with the same value.
    pub fn is_subset_of(&self, other: &Attributes) -> bool {
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }

    /// Same keys and values, ignoring insertion order.
    pub fn same_set_as(&self, other: &Attributes) -> bool {
        self.len() == other.len() && self.is_subset_of(other)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.iter().map(|(k, v)| format!("{k}=\"{v}\"")).join(" ")
        )
    }
}

//! Insertion-ordered frequency counter.
//!
//! Keys keep the order they were first seen, so rankings built from a tally
//! break ties by first appearance regardless of hashing.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `key`.
    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: &str, n: usize) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 += n,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), n));
            }
        }
    }

    /// Count for `key`, 0 if never seen.
    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map(|&pos| self.entries[pos].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    /// Up to `n` entries by descending count; equal counts keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.increment(key);
        }
        tally
    }
}

/// Serialized as a JSON object in first-seen order.
impl Serialize for Tally {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, n) in &self.entries {
            map.serialize_entry(k, n)?;
        }
        map.end()
    }
}

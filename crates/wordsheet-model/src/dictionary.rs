use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("dictionary is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("dictionary must be a JSON object mapping terms to definitions, found {0}")]
    NotAnObject(&'static str),
}

/// A local term → definition dictionary, in file order.
///
/// Keys are unique and case-sensitive as stored. Iteration order is the
/// order the keys appeared in the source document, which is what the
/// prefix fallback in [`crate::resolve::resolve`] scans.
#[derive(Debug, Clone, Default)]
pub struct DictionaryMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    skipped: Vec<String>,
}

impl DictionaryMapping {
    /// Parse a dictionary from a JSON object of string → string.
    ///
    /// Entries whose value is not a string are left out and reported through
    /// [`DictionaryMapping::skipped`]; no other validation is done.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(object) = value else {
            return Err(ModelError::NotAnObject(json_kind(&value)));
        };

        let mut mapping = DictionaryMapping::default();
        for (term, definition) in object {
            match definition {
                Value::String(definition) => mapping.insert(term, definition),
                _ => mapping.skipped.push(term),
            }
        }
        Ok(mapping)
    }

    /// Build a mapping from pairs, keeping the first occurrence of a key.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapping = DictionaryMapping::default();
        for (term, definition) in pairs {
            mapping.insert(term.into(), definition.into());
        }
        mapping
    }

    fn insert(&mut self, term: String, definition: String) {
        if self.index.contains_key(&term) {
            return;
        }
        self.index.insert(term.clone(), self.entries.len());
        self.entries.push((term, definition));
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, term: &str) -> Option<&str> {
        self.index
            .get(term)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, d)| (t.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys dropped while loading because their value was not a string.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

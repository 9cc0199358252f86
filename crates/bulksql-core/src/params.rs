//! Named parameter bindings that accompany a generated statement.

use crate::error::{Error, Result};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Sigil that marks a named placeholder in generated SQL text.
pub const PARAM_SIGIL: char = '@';

/// Ordered, append-only mapping from parameter name to bound value.
///
/// Names are stored without the `@` sigil; the statement text references
/// them as `@name`. Iteration yields bindings in the order they were added,
/// which matches the order placeholders appear in the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    /// Bindings in insertion order
    entries: Vec<(String, Value)>,
    /// Name -> index mapping for O(1) lookup
    name_to_index: HashMap<String, usize>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty parameter set with room for `capacity` bindings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            name_to_index: HashMap::with_capacity(capacity),
        }
    }

    /// Bind `value` under `name`.
    ///
    /// Fails with [`Error::DuplicateParameter`] if the name is already bound.
    #[allow(clippy::result_large_err)]
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        if self.name_to_index.contains_key(&name) {
            return Err(Error::DuplicateParameter(name));
        }
        self.name_to_index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value.into()));
        Ok(())
    }

    /// Get a bound value by name (without the `@` sigil).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.name_to_index
            .get(name)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, value)| value)
    }

    /// Check if a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, value) pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate over parameter names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over bound values in binding order.
    ///
    /// Drivers that only understand positional parameters can bind these
    /// in order after rewriting the placeholders.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Consume the set, returning the bindings in order.
    pub fn into_vec(self) -> Vec<(String, Value)> {
        self.entries
    }

    /// The placeholder text for a parameter name, e.g. `@Text_0`.
    pub fn placeholder(name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 1);
        out.push(PARAM_SIGIL);
        out.push_str(name);
        out
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serializes as a JSON-style object in binding order.
impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

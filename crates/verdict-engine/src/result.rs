//! Decision results
//!
//! A decision evaluation produces a [`DecisionResult`]: one [`ResultEntries`]
//! map per matching rule (after hit policy resolution), or a single map
//! holding the collect aggregate. Entry order follows the table's output
//! column order.

use verdict_core::TypedValue;

/// Ordered output-name to value map produced by one matching rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultEntries {
    entries: Vec<(String, TypedValue)>,
}

impl ResultEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any existing entry with the same name.
    pub fn insert(&mut self, name: String, value: TypedValue) {
        if let Some(existing) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// The sole entry, when this map holds exactly one.
    pub fn single(&self) -> Option<(&str, &TypedValue)> {
        match self.entries.as_slice() {
            [(name, value)] => Some((name.as_str(), value)),
            _ => None,
        }
    }
}

/// The outcome of a decision evaluation: zero or more entry maps in rule
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecisionResult {
    results: Vec<ResultEntries>,
}

impl DecisionResult {
    pub fn new(results: Vec<ResultEntries>) -> Self {
        Self { results }
    }

    /// The empty result: no rule matched and no aggregate applies.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultEntries> {
        self.results.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ResultEntries> {
        self.results.get(index)
    }

    pub fn first(&self) -> Option<&ResultEntries> {
        self.results.first()
    }

    /// The sole entry map, when exactly one rule produced a result.
    pub fn single(&self) -> Option<&ResultEntries> {
        match self.results.as_slice() {
            [entries] => Some(entries),
            _ => None,
        }
    }

    /// The sole value, when the result is exactly one map with exactly one
    /// entry.
    pub fn single_value(&self) -> Option<&TypedValue> {
        self.single()
            .and_then(|entries| entries.single())
            .map(|(_, value)| value)
    }

    /// Total number of output entries across all maps.
    pub fn entry_count(&self) -> usize {
        self.results.iter().map(ResultEntries::len).sum()
    }

    /// All values recorded under `output_name`, one per map that carries it.
    pub fn collect_values(&self, output_name: &str) -> Vec<TypedValue> {
        self.results
            .iter()
            .filter_map(|entries| entries.get(output_name))
            .cloned()
            .collect()
    }
}

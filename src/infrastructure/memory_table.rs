use std::collections::HashMap;

use crate::domain::ports::Table;

/// In-memory `Table` that lists entries in first-insertion order.
/// Overwriting a key keeps its original position.
#[derive(Debug, Clone)]
pub struct MemoryTable<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> MemoryTable<V> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for MemoryTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync + 'static> Table<V> for MemoryTable<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let pos = *self.index.get(key)?;
        Some(&mut self.entries[pos].1)
    }

    fn set(&mut self, key: &str, value: V) -> Option<V> {
        match self.index.get(key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
                None
            }
        }
    }

    fn list(&self) -> Vec<(&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}

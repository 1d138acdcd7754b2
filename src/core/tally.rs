// Counting map that remembers first-seen order; iteration never follows hash order.
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct OrderedTally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u32)>,
}

impl<K: Copy + Eq + Hash> OrderedTally<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Adds one to `key`, registering it at the end of the order if unseen.
    pub fn bump(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, u32)> {
        self.entries.iter()
    }

    /// Highest count; ties go to the key seen first.
    pub fn max_entry(&self) -> Option<(K, u32)> {
        let mut best: Option<(K, u32)> = None;
        for &(key, count) in &self.entries {
            match best {
                Some((_, top)) if top >= count => {}
                _ => best = Some((key, count)),
            }
        }
        best
    }

    pub fn into_entries(self) -> Vec<(K, u32)> {
        self.entries
    }
}

impl<K: Copy + Eq + Hash> Default for OrderedTally<K> {
    fn default() -> Self {
        Self::new()
    }
}

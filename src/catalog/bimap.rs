use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

/// One-to-one map, queryable from both sides.
#[derive(Debug, Clone)]
pub struct BiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    forward: HashMap<K, V, RandomState>,
    reverse: HashMap<V, K, RandomState>,
}

impl<K, V> Default for BiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            forward: HashMap::default(),
            reverse: HashMap::default(),
        }
    }

    /// Insert a pair only if neither side is already mapped.
    ///
    /// Return
    /// ----------
    /// * `true` if the pair was inserted, `false` if the key or the value was taken.
    pub fn insert_unique(&mut self, key: K, value: V) -> bool {
        if self.forward.contains_key(&key) || self.reverse.contains_key(&value) {
            return false;
        }
        self.forward.insert(key.clone(), value.clone());
        self.reverse.insert(value, key);
        true
    }

    pub fn get_by_key(&self, key: &K) -> Option<&V> {
        self.forward.get(key)
    }

    pub fn get_by_value(&self, value: &V) -> Option<&K> {
        self.reverse.get(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

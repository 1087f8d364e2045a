//! Capacity-bounded caches of pure store lookups.
//!
//! Every cache here holds the result of a pure function of the read-only,
//! per-search store, so eviction can never change a search's outcome —
//! only its cost. `get`/`insert`/eviction must stay O(1) amortized, since
//! these caches sit on the hottest path of every expansion.
//!
//! Recency order is tracked with an intrusive doubly-linked list over a
//! `Vec` slab (indices, not pointers) rather than a `VecDeque` scan, so
//! `get`/`insert`/eviction are all O(1) instead of O(n).

use std::collections::HashMap;
use std::hash::Hash;

struct Slot<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A bounded cache with least-recently-used eviction.
pub struct BoundedCache<K, V> {
    capacity: usize,
    index: HashMap<K, usize>,
    slab: Vec<Slot<K, V>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    pub hits: u64,
    pub misses: u64,
}

impl<K: Eq + Hash + Clone, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            index: HashMap::new(),
            slab: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.index.get(key).copied() {
            Some(idx) => {
                self.hits += 1;
                self.move_to_front(idx);
                Some(&self.slab[idx].value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Insert a value, evicting the least-recently-used entry if at capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(&idx) = self.index.get(&key) {
            self.slab[idx].value = value;
            self.move_to_front(idx);
            return;
        }

        if self.index.len() >= self.capacity {
            if let Some(lru) = self.tail {
                self.unlink(lru);
                let evicted_key = self.slab[lru].key.clone();
                self.index.remove(&evicted_key);
                self.free.push(lru);
            }
        }

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slab[idx] = Slot { key: key.clone(), value, prev: None, next: None };
                idx
            }
            None => {
                self.slab.push(Slot { key: key.clone(), value, prev: None, next: None });
                self.slab.len() - 1
            }
        };
        self.index.insert(key, idx);
        self.push_front(idx);
    }

    /// Fetch an entry, or compute and insert it via `load` on miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, load: F) -> &V
    where
        F: FnOnce() -> V,
    {
        if !self.index.contains_key(&key) {
            let value = load();
            self.misses += 1;
            self.insert(key.clone(), value);
        } else {
            self.hits += 1;
        }
        let idx = self.index[&key];
        self.move_to_front(idx);
        &self.slab[idx].value
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slab[idx].prev, self.slab[idx].next);
        match prev {
            Some(p) => self.slab[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slab[n].prev = prev,
            None => self.tail = prev,
        }
        self.slab[idx].prev = None;
        self.slab[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.slab[idx].prev = None;
        self.slab[idx].next = self.head;
        if let Some(old_head) = self.head {
            self.slab[old_head].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache: BoundedCache<i32, &'static str> = BoundedCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        // touch 1 so 2 becomes the LRU entry
        assert_eq!(cache.get(&1), Some(&"a"));
        cache.insert(3, "c");
        assert!(!cache.contains(&2));
        assert!(cache.contains(&1));
        assert!(cache.contains(&3));
    }

    #[test]
    fn eviction_does_not_return_stale_data() {
        let mut cache: BoundedCache<i32, i32> = BoundedCache::new(1);
        cache.insert(1, 100);
        cache.insert(2, 200);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&200));
    }

    #[test]
    fn reinserting_an_existing_key_updates_value_without_growing_len() {
        let mut cache: BoundedCache<i32, i32> = BoundedCache::new(4);
        cache.insert(1, 100);
        cache.insert(1, 200);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(&200));
    }

    #[test]
    fn repeated_eviction_reuses_freed_slab_slots() {
        let mut cache: BoundedCache<i32, i32> = BoundedCache::new(2);
        for i in 0..10 {
            cache.insert(i, i * 10);
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&9), Some(&90));
        assert_eq!(cache.get(&8), Some(&80));
        assert_eq!(cache.get(&0), None);
    }
}

//! Unsynchronized indexed binary heap
//!
//! This is the state that [`KeyedHeap`](crate::keyed_binary::KeyedHeap) keeps
//! behind its lock. It is made of two co-indexed containers:
//!
//! - `slots`: the heap array. `slots[i]` is the key occupying heap position `i`
//!   together with that key's current value.
//! - `index`: the inverse of `slots`, mapping each key to its position, so that
//!   `slots[index[k]].key == k` for every key present.
//!
//! A key's value is found by following `index` into `slots`, which makes the
//! value lookup O(1) and keeps it in lockstep with the position by construction.
//!
//! Every method that can fail does all of its checks before touching either
//! container, so a rejected call leaves the heap exactly as it was.

use crate::traits::{Compare, KeyError};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// One heap position: the key that lives there and its priority value
#[derive(Clone)]
pub(crate) struct Slot<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Slot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {:?}", self.key, self.value)
    }
}

pub(crate) struct IndexedHeap<K, V, S> {
    slots: Vec<Slot<K, V>>,
    index: HashMap<K, usize, S>,
}

impl<K, V, S> IndexedHeap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        IndexedHeap {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &i = self.index.get(key)?;
        Some(&self.slots[i].value)
    }

    /// The root slot, i.e. the entry every other entry yields to
    pub(crate) fn top(&self) -> Option<(&K, &V)> {
        self.slots.first().map(|slot| (&slot.key, &slot.value))
    }

    pub(crate) fn push<C>(&mut self, key: K, value: V, cmp: &C) -> Result<(), KeyError<K>>
    where
        K: Clone,
        C: Compare<V> + ?Sized,
    {
        if self.index.contains_key(&key) {
            return Err(KeyError::DuplicateKey(key));
        }

        let i = self.slots.len();
        self.index.insert(key.clone(), i);
        self.slots.push(Slot { key, value });
        self.swim(i, cmp);
        Ok(())
    }

    pub(crate) fn pop<C>(&mut self, cmp: &C) -> Option<(K, V)>
    where
        C: Compare<V> + ?Sized,
    {
        let last = self.slots.len().checked_sub(1)?;
        self.swap(0, last);
        self.sink(0, last, cmp);
        self.evict_last()
    }

    /// Replaces the value of `key`, returning the value it had before
    pub(crate) fn update<C>(&mut self, key: K, value: V, cmp: &C) -> Result<V, KeyError<K>>
    where
        C: Compare<V> + ?Sized,
    {
        let Some(&i) = self.index.get(&key) else {
            return Err(KeyError::KeyNotFound(key));
        };
        Ok(self.replace_at(i, value, cmp))
    }

    /// Inserts `key` or replaces its value, returning the previous value if any
    pub(crate) fn set<C>(&mut self, key: K, value: V, cmp: &C) -> Option<V>
    where
        K: Clone,
        C: Compare<V> + ?Sized,
    {
        match self.index.get(&key) {
            Some(&i) => Some(self.replace_at(i, value, cmp)),
            None => {
                let i = self.slots.len();
                self.index.insert(key.clone(), i);
                self.slots.push(Slot { key, value });
                self.swim(i, cmp);
                None
            }
        }
    }

    pub(crate) fn remove<Q, C>(&mut self, key: &Q, cmp: &C) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        C: Compare<V> + ?Sized,
    {
        let &i = self.index.get(key)?;
        let last = self.slots.len() - 1;
        if i != last {
            // The entry pulled in from the end may belong above or below `i`
            self.swap(i, last);
            self.sink(i, last, cmp);
            self.swim(i, cmp);
        }
        self.evict_last()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    /// Checks every structural invariant in O(n)
    pub(crate) fn check_invariants<C>(&self, cmp: &C) -> bool
    where
        C: Compare<V> + ?Sized,
    {
        if self.slots.len() != self.index.len() {
            return false;
        }
        let indexed = self
            .slots
            .iter()
            .enumerate()
            .all(|(i, slot)| self.index.get(&slot.key) == Some(&i));
        let ordered = (1..self.slots.len()).all(|i| !self.precedes(i, parent(i), cmp));
        indexed && ordered
    }

    /// Writes `value` at slot `i` and moves the entry to where it now belongs
    fn replace_at<C>(&mut self, i: usize, value: V, cmp: &C) -> V
    where
        C: Compare<V> + ?Sized,
    {
        let old = std::mem::replace(&mut self.slots[i].value, value);
        // At most one of these moves anything
        self.swim(i, cmp);
        self.sink(i, self.slots.len(), cmp);
        old
    }

    /// Drops the last slot from both containers
    fn evict_last(&mut self) -> Option<(K, V)> {
        let Slot { key, value } = self.slots.pop()?;
        self.index.remove(&key);
        Some((key, value))
    }

    /// Move the entry at `i` towards the root while it outranks its parent
    fn swim<C>(&mut self, mut i: usize, cmp: &C)
    where
        C: Compare<V> + ?Sized,
    {
        while i > 0 {
            let p = parent(i);
            if !self.precedes(i, p, cmp) {
                break;
            }
            self.swap(i, p);
            i = p;
        }
    }

    /// Move the entry at `i` towards the leaves while a child outranks it,
    /// looking only at slots below `n`
    fn sink<C>(&mut self, mut i: usize, n: usize, cmp: &C)
    where
        C: Compare<V> + ?Sized,
    {
        while let Some(mut j) = left_child(i).filter(|&left| left < n) {
            // j < n, so j + 1 cannot overflow
            let right = j + 1;
            if right < n && self.precedes(right, j, cmp) {
                j = right;
            }
            if !self.precedes(j, i, cmp) {
                break;
            }
            self.swap(i, j);
            i = j;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.slots.swap(i, j);
        for slot in [i, j] {
            let pos = self.index.get_mut(&self.slots[slot].key);
            debug_assert!(pos.is_some(), "keyed heap: slot {slot} holds an unindexed key");
            if let Some(pos) = pos {
                *pos = slot;
            }
        }
    }

    #[inline]
    fn precedes<C>(&self, i: usize, j: usize, cmp: &C) -> bool
    where
        C: Compare<V> + ?Sized,
    {
        cmp.precedes(&self.slots[i].value, &self.slots[j].value)
    }
}

/// Left child of slot `i`, or `None` if the index does not fit in a `usize`
#[inline]
fn left_child(i: usize) -> Option<usize> {
    i.checked_mul(2)?.checked_add(1)
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MaxFirst, MinFirst};
    use rustc_hash::FxBuildHasher;

    fn heap<V>() -> IndexedHeap<&'static str, V, FxBuildHasher> {
        IndexedHeap::with_capacity_and_hasher(0, FxBuildHasher)
    }

    fn positions_match(h: &IndexedHeap<&'static str, i32, FxBuildHasher>) -> bool {
        h.slots
            .iter()
            .enumerate()
            .all(|(i, slot)| h.index[slot.key] == i)
    }

    #[test]
    fn test_index_arithmetic() {
        assert_eq!(left_child(0), Some(1));
        assert_eq!(left_child(3), Some(7));
        assert_eq!(parent(1), 0);
        assert_eq!(parent(2), 0);
        assert_eq!(parent(7), 3);
        assert_eq!(parent(8), 3);
    }

    #[test]
    fn test_left_child_overflow_is_no_child() {
        assert_eq!(left_child(usize::MAX / 2), Some(usize::MAX));
        assert_eq!(left_child(usize::MAX / 2 + 1), None);
        assert_eq!(left_child(usize::MAX), None);
    }

    #[test]
    fn test_push_swims_to_root() {
        let mut h = heap();
        h.push("a", 5, &MinFirst).unwrap();
        h.push("b", 3, &MinFirst).unwrap();
        h.push("c", 1, &MinFirst).unwrap();

        assert_eq!(h.top(), Some((&"c", &1)));
        assert!(positions_match(&h));
        assert!(h.check_invariants(&MinFirst));
    }

    #[test]
    fn test_duplicate_push_leaves_heap_untouched() {
        let mut h = heap();
        h.push("a", 5, &MinFirst).unwrap();
        h.push("b", 3, &MinFirst).unwrap();

        assert_eq!(h.push("a", 0, &MinFirst), Err(KeyError::DuplicateKey("a")));
        assert_eq!(h.len(), 2);
        assert_eq!(h.get("a"), Some(&5));
        assert_eq!(h.top(), Some((&"b", &3)));
    }

    #[test]
    fn test_update_moves_both_directions() {
        let mut h = heap();
        for (k, v) in [("a", 10), ("b", 20), ("c", 30), ("d", 40), ("e", 50)] {
            h.push(k, v, &MinFirst).unwrap();
        }

        assert_eq!(h.update("e", 1, &MinFirst), Ok(50));
        assert_eq!(h.top(), Some((&"e", &1)));
        assert!(h.check_invariants(&MinFirst));

        assert_eq!(h.update("e", 100, &MinFirst), Ok(1));
        assert_eq!(h.top(), Some((&"a", &10)));
        assert!(h.check_invariants(&MinFirst));
        assert!(positions_match(&h));
    }

    #[test]
    fn test_update_missing_key() {
        let mut h = heap();
        h.push("a", 1, &MinFirst).unwrap();
        assert_eq!(h.update("z", 0, &MinFirst), Err(KeyError::KeyNotFound("z")));
        assert_eq!(h.get("a"), Some(&1));
    }

    #[test]
    fn test_set_inserts_then_updates() {
        let mut h = heap();
        assert_eq!(h.set("a", 4, &MaxFirst), None);
        assert_eq!(h.set("b", 2, &MaxFirst), None);
        assert_eq!(h.top(), Some((&"a", &4)));
        assert_eq!(h.set("b", 9, &MaxFirst), Some(2));
        assert_eq!(h.top(), Some((&"b", &9)));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_remove_interior_restores_order() {
        let mut h = heap();
        // Shape: 1 at root, 50 and 2 as children, deep 3 under 2
        for (k, v) in [("r", 1), ("x", 50), ("y", 2), ("p", 60), ("q", 70), ("s", 3)] {
            h.push(k, v, &MinFirst).unwrap();
        }
        assert!(h.check_invariants(&MinFirst));

        // Removing "x" pulls "s" (3) into a subtree rooted at 50's old slot
        assert_eq!(h.remove("x", &MinFirst), Some(("x", 50)));
        assert!(h.check_invariants(&MinFirst));
        assert!(positions_match(&h));

        assert_eq!(h.remove("missing", &MinFirst), None);
        assert_eq!(h.len(), 5);

        let mut out = Vec::new();
        while let Some((_, v)) = h.pop(&MinFirst) {
            out.push(v);
        }
        assert_eq!(out, vec![1, 2, 3, 60, 70]);
    }

    #[test]
    fn test_remove_pulls_small_value_upward() {
        let mut h = heap();
        // Already in heap order: 1 / (10, 2) / (11, 12, 3, 4)
        for (k, v) in [("a", 1), ("b", 10), ("c", 2), ("d", 11), ("e", 12), ("f", 3), ("g", 4)] {
            h.push(k, v, &MinFirst).unwrap();
        }
        assert_eq!(h.slots[4].key, "e");

        // "g" (4) lands under "b" (10) and has to move above it
        assert_eq!(h.remove("e", &MinFirst), Some(("e", 12)));
        assert!(h.check_invariants(&MinFirst));
        assert!(positions_match(&h));
        assert_eq!(h.slots[1].key, "g");
        assert_eq!(h.slots[4].key, "b");

        let mut out = Vec::new();
        while let Some((_, v)) = h.pop(&MinFirst) {
            out.push(v);
        }
        assert_eq!(out, vec![1, 2, 3, 4, 10, 11]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unindexed key")]
    fn test_swap_rejects_unindexed_key() {
        let mut h = heap();
        h.push("a", 1, &MinFirst).unwrap();
        h.push("b", 2, &MinFirst).unwrap();
        h.index.remove("b");
        h.swap(0, 1);
    }

    #[test]
    fn test_remove_last_slot() {
        let mut h = heap();
        h.push("a", 1, &MinFirst).unwrap();
        h.push("b", 2, &MinFirst).unwrap();
        assert_eq!(h.remove("b", &MinFirst), Some(("b", 2)));
        assert_eq!(h.len(), 1);
        assert!(h.check_invariants(&MinFirst));
    }

    #[test]
    fn test_pop_empty() {
        let mut h: IndexedHeap<&str, i32, _> = heap();
        assert_eq!(h.pop(&MinFirst), None);
        assert!(h.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut h = heap();
        h.push("a", 1, &MinFirst).unwrap();
        h.push("b", 2, &MinFirst).unwrap();
        h.clear();
        assert!(h.is_empty());
        assert!(!h.contains_key("a"));
        assert!(h.check_invariants(&MinFirst));
        h.push("a", 3, &MinFirst).unwrap();
        assert_eq!(h.top(), Some((&"a", &3)));
    }

    #[test]
    fn test_check_invariants_detects_disorder() {
        let mut h = heap();
        h.push("a", 1, &MinFirst).unwrap();
        h.push("b", 2, &MinFirst).unwrap();
        // Valid for MinFirst, but the root yields to its child under MaxFirst
        assert!(h.check_invariants(&MinFirst));
        assert!(!h.check_invariants(&MaxFirst));
    }
}

//! Keyed binary heap
//!
//! A binary heap whose entries are identified by a caller-supplied key. On top
//! of the usual push/pop/peek it can change the priority of any entry in place
//! and remove any entry by key, which is what shortest-path searches and
//! schedulers with cancellation need.
//!
//! The heap is ordered by a [`Compare`] implementation fixed at construction.
//! All state sits behind a single `parking_lot::RwLock`, so a `KeyedHeap` can be
//! shared between threads through an `Arc` and every method takes `&self`.
//! Accessors return clones of keys and values; nothing borrowed from inside the
//! lock escapes.
//!
//! # Time Complexity
//!
//! | Operation    | Complexity |
//! |--------------|------------|
//! | `push`       | O(log n)   |
//! | `pop`        | O(log n)   |
//! | `update`     | O(log n)   |
//! | `set`        | O(log n)   |
//! | `remove`     | O(log n)   |
//! | `peek`       | O(1)       |
//! | `value_of`   | O(1)       |
//! | `contains_key` | O(1)     |
//!
//! # Example
//!
//! ```rust
//! use keyed_heap::{KeyedHeap, MinFirst};
//!
//! let heap = KeyedHeap::new(MinFirst);
//! heap.push("fourth", 10).unwrap();
//! heap.push("second", 8).unwrap();
//! heap.push("third", 9).unwrap();
//! heap.push("first", 6).unwrap();
//! heap.push("last", 20).unwrap();
//!
//! assert_eq!(heap.peek(), Some(("first", 6)));
//! assert_eq!(heap.pop(), Some(("first", 6)));
//! assert_eq!(heap.peek(), Some(("second", 8)));
//!
//! heap.remove("third");
//! assert_eq!(heap.peek(), Some(("second", 8)));
//! assert_eq!(heap.len(), 3);
//! ```

use crate::indexed::IndexedHeap;
use crate::traits::{Compare, KeyError};
use log::trace;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// A keyed priority queue backed by an indexed binary heap
///
/// `K` identifies entries and must be unique within the heap. `V` is the
/// priority value, ordered by the comparator `C`: the entry whose value
/// [`precedes`](Compare::precedes) every other value sits at the root. `S` is
/// the hash builder for the key index.
///
/// `KeyedHeap` is not `Clone`. Share one instance through an `Arc`.
pub struct KeyedHeap<K, V, C, S = FxBuildHasher> {
    state: RwLock<IndexedHeap<K, V, S>>,
    cmp: C,
}

impl<K, V, C> KeyedHeap<K, V, C, FxBuildHasher>
where
    K: Eq + Hash,
    C: Compare<V>,
{
    /// Creates an empty heap ordered by `cmp`
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyed_heap::KeyedHeap;
    ///
    /// // Max-first queue through a closure
    /// let heap = KeyedHeap::new(|a: &u32, b: &u32| a > b);
    /// heap.push("low", 1).unwrap();
    /// heap.push("high", 9).unwrap();
    /// assert_eq!(heap.peek_key(), Some("high"));
    /// ```
    pub fn new(cmp: C) -> Self {
        Self::with_capacity_and_hasher(0, cmp, FxBuildHasher)
    }

    /// Creates an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self::with_capacity_and_hasher(capacity, cmp, FxBuildHasher)
    }

    /// Creates an empty heap from a comparator that may be missing
    ///
    /// This is for callers that pick the ordering at runtime. A heap cannot
    /// exist without an ordering, so a missing comparator is a programming
    /// error rather than something to recover from.
    ///
    /// # Panics
    ///
    /// Panics if `cmp` is `None`.
    pub fn from_optional(cmp: Option<C>) -> Self {
        match cmp {
            Some(cmp) => Self::new(cmp),
            None => panic!("keyed heap: comparison function cannot be absent"),
        }
    }
}

impl<K, V, C, S> KeyedHeap<K, V, C, S>
where
    K: Eq + Hash,
    C: Compare<V>,
    S: BuildHasher,
{
    /// Creates an empty heap that hashes keys with `hasher`
    pub fn with_hasher(cmp: C, hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, cmp, hasher)
    }

    /// Creates an empty heap with room for `capacity` entries, hashing keys with `hasher`
    pub fn with_capacity_and_hasher(capacity: usize, cmp: C, hasher: S) -> Self {
        if capacity > 0 {
            trace!("keyed heap: reserving {capacity} slots");
        }
        KeyedHeap {
            state: RwLock::new(IndexedHeap::with_capacity_and_hasher(capacity, hasher)),
            cmp,
        }
    }

    /// Returns the comparator the heap was built with
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Inserts `key` with priority `value`
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::DuplicateKey`] carrying `key` back if it is already
    /// present. The heap is not modified in that case.
    pub fn push(&self, key: K, value: V) -> Result<(), KeyError<K>>
    where
        K: Clone,
    {
        self.state.write().push(key, value, &self.cmp)
    }

    /// Removes and returns the entry at the root
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop(&self) -> Option<(K, V)> {
        self.state.write().pop(&self.cmp)
    }

    /// Changes the priority of `key` to `value`, returning the previous value
    ///
    /// The entry moves up or down as needed, so this works for both raising
    /// and lowering a priority.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyNotFound`] carrying `key` back if it is not
    /// present. The heap is not modified in that case.
    pub fn update(&self, key: K, value: V) -> Result<V, KeyError<K>> {
        self.state.write().update(key, value, &self.cmp)
    }

    /// Inserts `key` with priority `value`, or changes its priority if present
    ///
    /// Returns the previous value when the key was already in the heap.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyed_heap::{KeyedHeap, MinFirst};
    ///
    /// let heap = KeyedHeap::new(MinFirst);
    /// assert_eq!(heap.set(3u32, 40), None);
    /// assert_eq!(heap.set(3, 25), Some(40));
    /// assert_eq!(heap.value_of(&3), Some(25));
    /// ```
    pub fn set(&self, key: K, value: V) -> Option<V>
    where
        K: Clone,
    {
        self.state.write().set(key, value, &self.cmp)
    }

    /// Removes `key` wherever it is in the heap, returning its value
    ///
    /// Removing a key that is not present does nothing and returns `None`.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state
            .write()
            .remove(key, &self.cmp)
            .map(|(_, value)| value)
    }

    /// Pops entries off the root for as long as `pred` accepts them
    ///
    /// The whole drain happens under one write lock, so no other thread can
    /// observe or insert anything in between. Entries come out in priority
    /// order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyed_heap::{KeyedHeap, MinFirst};
    ///
    /// // Deadlines due at or before t=5
    /// let timers = KeyedHeap::new(MinFirst);
    /// timers.push("flush", 3).unwrap();
    /// timers.push("retry", 9).unwrap();
    /// timers.push("ping", 5).unwrap();
    ///
    /// let due = timers.pop_while(|_, &deadline| deadline <= 5);
    /// assert_eq!(due, vec![("flush", 3), ("ping", 5)]);
    /// assert_eq!(timers.len(), 1);
    /// ```
    pub fn pop_while<F>(&self, mut pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut state = self.state.write();
        let mut drained = Vec::new();
        while state.top().is_some_and(|(k, v)| pred(k, v)) {
            match state.pop(&self.cmp) {
                Some(entry) => drained.push(entry),
                None => break,
            }
        }
        if !drained.is_empty() {
            trace!("keyed heap: drained {} entries", drained.len());
        }
        drained
    }

    /// Removes every entry
    pub fn clear(&self) {
        let mut state = self.state.write();
        trace!("keyed heap: clearing {} entries", state.len());
        state.clear();
    }

    /// Returns the entry at the root without removing it
    ///
    /// Returns `None` if the heap is empty.
    pub fn peek(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.state
            .read()
            .top()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Returns the key at the root without removing it
    pub fn peek_key(&self) -> Option<K>
    where
        K: Clone,
    {
        self.state.read().top().map(|(k, _)| k.clone())
    }

    /// Returns the value at the root without removing it
    pub fn peek_value(&self) -> Option<V>
    where
        V: Clone,
    {
        self.state.read().top().map(|(_, v)| v.clone())
    }

    /// Returns true if `key` is in the heap
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.read().contains_key(key)
    }

    /// Returns the current priority of `key`, or `None` if it is not present
    pub fn value_of<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.state.read().get(key).cloned()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Returns true if the heap holds no entries
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    /// Verifies the heap's internal invariants in O(n)
    ///
    /// Checks that the key index and the heap array describe the same key set,
    /// that each is the exact inverse of the other, and that no entry has
    /// priority over its parent. Intended for tests and debugging.
    pub fn check_invariants(&self) -> bool {
        self.state.read().check_invariants(&self.cmp)
    }
}

impl<K, V, C, S> fmt::Debug for KeyedHeap<K, V, C, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("KeyedHeap")
            .field("len", &state.len())
            .field("slots", &state.slots())
            .finish()
    }
}

impl<K, V, C> Default for KeyedHeap<K, V, C, FxBuildHasher>
where
    K: Eq + Hash,
    C: Compare<V> + Default,
{
    fn default() -> Self {
        Self::new(C::default())
    }
}

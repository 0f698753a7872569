//! Keyed priority queue for Rust
//!
//! This crate provides [`KeyedHeap`], a binary heap whose entries are identified
//! by a caller-supplied key. Besides push/pop/peek it supports the two
//! operations a plain `BinaryHeap` cannot do:
//!
//! - **Priority update**: change the priority of any entry in place, up or down
//! - **Removal by key**: evict any entry, not just the root
//!
//! Both run in O(log n); key lookup runs in O(1).
//!
//! The ordering is supplied at construction through the [`Compare`] trait,
//! implemented by closures `Fn(&V, &V) -> bool` and by the [`MinFirst`] and
//! [`MaxFirst`] comparators. All state sits behind one reader/writer lock, so
//! a heap can be shared across threads with an `Arc`.
//!
//! # Features
//!
//! - **KeyedHeap**: indexed binary heap, O(log n) push/pop/update/remove, O(1) peek and lookup
//! - **Pathfinding**: Dijkstra and A* search that relax edges by updating priorities in place
//!
//! # Example
//!
//! ```rust
//! use keyed_heap::{KeyError, KeyedHeap};
//!
//! let heap = KeyedHeap::new(|a: &i32, b: &i32| a < b);
//! heap.push("key1", 42).unwrap();
//! heap.push("key2", 30).unwrap();
//! heap.push("key3", 50).unwrap();
//!
//! assert_eq!(heap.pop(), Some(("key2", 30)));
//!
//! heap.update("key3", 20).unwrap();
//! heap.remove("key1");
//! assert!(heap.contains_key("key3"));
//! assert_eq!(heap.peek(), Some(("key3", 20)));
//!
//! assert_eq!(heap.push("key3", 1), Err(KeyError::DuplicateKey("key3")));
//! ```

mod indexed;
pub mod keyed_binary;
pub mod pathfinding;
pub mod traits;

// Re-export the main types for convenience
pub use keyed_binary::KeyedHeap;
pub use traits::{Compare, KeyError, MaxFirst, MinFirst};

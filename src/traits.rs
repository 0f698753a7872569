//! Common traits and error types for the keyed heap
//!
//! This module provides the two seams the heap is parameterized over:
//!
//! - [`Compare`]: the ordering used to decide which value sits closer to the root
//! - [`KeyError`]: the recoverable errors returned by key-addressed operations
//!
//! A comparator answers one question: "does `a` have priority over `b`?". Any
//! `Fn(&V, &V) -> bool` closure is a comparator, and [`MinFirst`] / [`MaxFirst`]
//! cover the common case of a value type that already implements [`Ord`].

use std::fmt;

/// Error type for key-addressed heap operations
///
/// Both variants hand the offending key back so the caller can decide what to
/// do next (for example, update instead of insert). The heap is left unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyError<K> {
    /// `push` was called with a key that is already in the heap
    DuplicateKey(K),
    /// `update` was called with a key that is not in the heap
    KeyNotFound(K),
}

impl<K> KeyError<K> {
    /// Returns the key that caused the error
    pub fn key(&self) -> &K {
        match self {
            KeyError::DuplicateKey(k) | KeyError::KeyNotFound(k) => k,
        }
    }

    /// Consumes the error, returning the key that caused it
    pub fn into_key(self) -> K {
        match self {
            KeyError::DuplicateKey(k) | KeyError::KeyNotFound(k) => k,
        }
    }
}

impl<K: fmt::Debug> fmt::Display for KeyError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::DuplicateKey(k) => {
                write!(f, "keyed heap: key {:?} already exists", k)
            }
            KeyError::KeyNotFound(k) => {
                write!(f, "keyed heap: key {:?} does not exist", k)
            }
        }
    }
}

impl<K: fmt::Debug> std::error::Error for KeyError<K> {}

/// Ordering used by the heap
///
/// `precedes(a, b)` returns true when `a` has priority over `b`, i.e. `a`
/// belongs closer to the root. The relation must be a strict weak ordering and
/// must answer the same way every time it is asked about the same values.
/// A comparator that violates this cannot corrupt the key set, but the order
/// in which entries come out of the heap becomes unspecified.
///
/// # Example
///
/// ```rust
/// use keyed_heap::{Compare, MaxFirst, MinFirst};
///
/// assert!(MinFirst.precedes(&1, &2));
/// assert!(MaxFirst.precedes(&2, &1));
///
/// let by_len = |a: &String, b: &String| a.len() < b.len();
/// assert!(by_len.precedes(&"ab".to_string(), &"abc".to_string()));
/// ```
pub trait Compare<V: ?Sized> {
    /// Returns true if `a` has priority over `b`
    fn precedes(&self, a: &V, b: &V) -> bool;
}

impl<V: ?Sized, F> Compare<V> for F
where
    F: Fn(&V, &V) -> bool,
{
    #[inline]
    fn precedes(&self, a: &V, b: &V) -> bool {
        self(a, b)
    }
}

/// Comparator that puts the smallest value at the root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinFirst;

impl<V: Ord + ?Sized> Compare<V> for MinFirst {
    #[inline]
    fn precedes(&self, a: &V, b: &V) -> bool {
        a < b
    }
}

/// Comparator that puts the largest value at the root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxFirst;

impl<V: Ord + ?Sized> Compare<V> for MaxFirst {
    #[inline]
    fn precedes(&self, a: &V, b: &V) -> bool {
        a > b
    }
}

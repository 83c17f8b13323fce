//! Containers that can take part in the set algebra of [`merge`](crate::merge).
//!
//! An [`OrderedSource`] yields its items in ascending order; an [`OrderedSink`] can additionally
//! build a fresh container of its own kind from ascending items. The merge functions read every
//! operand as a source and build the result with the first operand's sink, so a `Vec` in gives a
//! `Vec` out and a `String` in gives a `String` out.
//!
//! [`OrderedSet`] is always ascending. Every other container is trusted to already be in
//! ascending order; a violation is reported as [`Error::NotAscending`](crate::Error::NotAscending)
//! when the merge reaches it.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::iter::Cloned;
use core::str::Chars;

use crate::OrderedSet;
use crate::raw::RawWbTree;

/// A container whose items can be read in ascending order.
pub trait OrderedSource {
    /// The element type. Items are produced by value.
    type Item: Ord;

    /// The iterator returned by [`ordered`](OrderedSource::ordered).
    type Ordered<'a>: Iterator<Item = Self::Item>
    where
        Self: 'a;

    /// Returns the items in ascending order. Each call starts from the beginning.
    fn ordered(&self) -> Self::Ordered<'_>;
}

/// An [`OrderedSource`] that can also build a new container of its own kind.
pub trait OrderedSink: OrderedSource + Sized {
    /// Creates a container of the same kind and configuration as `self` holding `items`.
    ///
    /// `items` is in ascending order but may hold runs of equal items; containers that cannot
    /// hold duplicates keep one item of each run.
    fn with_ascending(&self, items: Vec<Self::Item>) -> Self;
}

impl<T: Ord + Clone> OrderedSource for OrderedSet<T> {
    type Item = T;
    type Ordered<'a>
        = Cloned<crate::ordered_set::Iter<'a, T>>
    where
        Self: 'a;

    fn ordered(&self) -> Self::Ordered<'_> {
        self.iter().cloned()
    }
}

impl<T: Ord + Clone> OrderedSink for OrderedSet<T> {
    fn with_ascending(&self, mut items: Vec<T>) -> Self {
        items.dedup();
        OrderedSet::from_raw(RawWbTree::from_sorted(items, self.balance()))
    }
}

impl<T: Ord + Clone> OrderedSource for [T] {
    type Item = T;
    type Ordered<'a>
        = Cloned<core::slice::Iter<'a, T>>
    where
        Self: 'a;

    fn ordered(&self) -> Self::Ordered<'_> {
        self.iter().cloned()
    }
}

impl<T: Ord + Clone, const N: usize> OrderedSource for [T; N] {
    type Item = T;
    type Ordered<'a>
        = Cloned<core::slice::Iter<'a, T>>
    where
        Self: 'a;

    fn ordered(&self) -> Self::Ordered<'_> {
        self.iter().cloned()
    }
}

impl<T: Ord + Clone> OrderedSource for Vec<T> {
    type Item = T;
    type Ordered<'a>
        = Cloned<core::slice::Iter<'a, T>>
    where
        Self: 'a;

    fn ordered(&self) -> Self::Ordered<'_> {
        self.iter().cloned()
    }
}

impl<T: Ord + Clone> OrderedSink for Vec<T> {
    fn with_ascending(&self, items: Vec<T>) -> Self {
        items
    }
}

impl<T: Ord + Clone> OrderedSource for VecDeque<T> {
    type Item = T;
    type Ordered<'a>
        = Cloned<alloc::collections::vec_deque::Iter<'a, T>>
    where
        Self: 'a;

    fn ordered(&self) -> Self::Ordered<'_> {
        self.iter().cloned()
    }
}

impl<T: Ord + Clone> OrderedSink for VecDeque<T> {
    fn with_ascending(&self, items: Vec<T>) -> Self {
        VecDeque::from(items)
    }
}

/// A string is the sequence of its `char`s.
impl OrderedSource for str {
    type Item = char;
    type Ordered<'a>
        = Chars<'a>
    where
        Self: 'a;

    fn ordered(&self) -> Chars<'_> {
        self.chars()
    }
}

impl OrderedSource for String {
    type Item = char;
    type Ordered<'a>
        = Chars<'a>
    where
        Self: 'a;

    fn ordered(&self) -> Chars<'_> {
        self.chars()
    }
}

impl OrderedSink for String {
    fn with_ascending(&self, items: Vec<char>) -> Self {
        items.into_iter().collect()
    }
}

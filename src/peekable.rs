//! An iterator adapter that looks any number of items ahead.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use core::iter::{Fuse, FusedIterator};

use smallvec::SmallVec;

use crate::{Error, Result};

/// Wraps an iterator so that upcoming items can be inspected without being consumed, and tracks
/// how many items have been consumed so far.
///
/// Unlike [`core::iter::Peekable`], this adapter looks arbitrarily far ahead ([`peek_n`]),
/// consumes in batches ([`advance_n`]), and answers position queries ([`is_first`], [`is_last`]).
/// The end of the sequence is reported as `None` everywhere.
///
/// The first item is fetched from the source as soon as the adapter is built, so
/// [`peek`](Peekable::peek) only needs a shared borrow.
///
/// # Examples
///
/// ```
/// use wabi_set::{Error, Peekable};
///
/// let mut p = Peekable::new(0..4);
/// assert_eq!(p.peek(), Some(&0));
/// assert_eq!(p.advance_n(1), Ok(vec![0]));
/// assert!(p.is_first());
/// assert_eq!(p.peek(), Some(&1));
/// assert_eq!(p.peek_n(3).as_slice(), [Some(&1), Some(&2), Some(&3)]);
/// assert_eq!(p.advance_n(2), Ok(vec![1, 2]));
/// assert_eq!(p.peek_n(2).as_slice(), [Some(&3), None]);
///
/// // A batch that cannot be served in full consumes nothing.
/// assert_eq!(p.advance_n(2), Err(Error::InsufficientItems { requested: 2, available: 1 }));
/// assert_eq!(p.advance(), Some(3));
/// assert!(p.is_last());
/// assert_eq!(p.advance(), None);
/// assert_eq!(p.advance_n(0), Ok(vec![]));
/// assert_eq!(p.peek(), None);
/// ```
///
/// [`peek_n`]: Peekable::peek_n
/// [`advance_n`]: Peekable::advance_n
/// [`is_first`]: Peekable::is_first
/// [`is_last`]: Peekable::is_last
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Peekable<I: Iterator> {
    iter: Fuse<I>,
    /// Items already pulled from `iter` but not yet consumed, oldest first.
    cache: VecDeque<I::Item>,
    /// Number of items kept cached ahead while the source lasts.
    depth: usize,
    consumed: usize,
}

impl<I: Iterator> Peekable<I> {
    /// Wraps `iter`, pulling its first item.
    pub fn new<S>(iter: S) -> Peekable<I>
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self::with_depth(iter, 1)
    }

    /// Wraps `iter` and keeps up to `depth` items cached ahead, refilling after every advance.
    /// A `depth` of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::Cell;
    /// use wabi_set::Peekable;
    ///
    /// let pulled = Cell::new(0);
    /// let mut p = Peekable::with_depth((0..10).inspect(|_| pulled.set(pulled.get() + 1)), 3);
    /// assert_eq!(pulled.get(), 3);
    /// p.advance();
    /// assert_eq!(pulled.get(), 4);
    /// ```
    pub fn with_depth<S>(iter: S, depth: usize) -> Peekable<I>
    where
        S: IntoIterator<IntoIter = I>,
    {
        let depth = depth.max(1);
        let mut peekable = Peekable {
            iter: iter.into_iter().fuse(),
            cache: VecDeque::with_capacity(depth),
            depth,
            consumed: 0,
        };
        peekable.fill(depth);
        peekable
    }

    /// Pulls from the source until `n` items are cached or the source runs dry.
    fn fill(&mut self, n: usize) {
        while self.cache.len() < n {
            match self.iter.next() {
                Some(item) => self.cache.push_back(item),
                None => break,
            }
        }
    }

    /// Returns the item the next [`advance`](Peekable::advance) will return, or `None` at the end.
    #[must_use]
    pub fn peek(&self) -> Option<&I::Item> {
        self.cache.front()
    }

    /// Returns the next `n` items without consuming them. Slots past the end of the sequence are
    /// `None`.
    pub fn peek_n(&mut self, n: usize) -> SmallVec<[Option<&I::Item>; 4]> {
        self.fill(n);
        (0..n).map(|i| self.cache.get(i)).collect()
    }

    /// Consumes and returns the next item, or `None` at the end.
    pub fn advance(&mut self) -> Option<I::Item> {
        let item = self.cache.pop_front()?;
        self.consumed += 1;
        self.fill(self.depth);
        Some(item)
    }

    /// Consumes and returns the next `n` items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientItems`] if fewer than `n` items remain. Nothing is consumed
    /// in that case, so a smaller batch can still be taken afterwards.
    pub fn advance_n(&mut self, n: usize) -> Result<Vec<I::Item>> {
        self.fill(n);
        if self.cache.len() < n {
            return Err(Error::InsufficientItems {
                requested: n,
                available: self.cache.len(),
            });
        }
        let batch = self.cache.drain(..n).collect();
        self.consumed += n;
        self.fill(self.depth);
        Ok(batch)
    }

    /// Returns `true` if at least one more item remains.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.cache.is_empty()
    }

    /// Returns `true` if exactly one item has been consumed.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.consumed == 1
    }

    /// Returns `true` once no item remains, that is, right after the last item was consumed and
    /// from then on. An empty source is last from the start.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns the zero-based index of the item consumed last, or `None` before the first one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.consumed.checked_sub(1)
    }

    /// Returns the number of items consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<I: Iterator> Iterator for Peekable<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (low, high) = self.iter.size_hint();
        let cached = self.cache.len();
        (low.saturating_add(cached), high.and_then(|high| high.checked_add(cached)))
    }
}

impl<I: ExactSizeIterator> ExactSizeIterator for Peekable<I> {}

impl<I: Iterator> FusedIterator for Peekable<I> {}

impl<I> fmt::Debug for Peekable<I>
where
    I: Iterator + fmt::Debug,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peekable").field("iter", &self.iter).field("cache", &self.cache).field("depth", &self.depth).field("consumed", &self.consumed).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    #[test]
    fn empty_source_is_last_immediately() {
        let mut p = Peekable::new(core::iter::empty::<u8>());
        assert!(p.is_last());
        assert!(!p.has_next());
        assert!(!p.is_first());
        assert_eq!(p.position(), None);
        assert_eq!(p.advance(), None);
        assert_eq!(p.consumed(), 0);
    }

    #[test]
    fn is_first_only_after_one_item() {
        let mut p = Peekable::new([7, 8]);
        assert!(!p.is_first());
        p.advance();
        assert!(p.is_first());
        assert!(!p.is_last());
        p.advance();
        assert!(!p.is_first());
        assert!(p.is_last());
        assert_eq!(p.position(), Some(1));
    }

    #[test]
    fn short_batch_leaves_everything_in_place() {
        let mut p = Peekable::new(vec!['a', 'b']);
        assert_eq!(
            p.advance_n(3),
            Err(Error::InsufficientItems {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(p.consumed(), 0);
        assert_eq!(p.advance_n(2), Ok(vec!['a', 'b']));
        assert!(p.is_last());
    }

    #[test]
    fn size_hint_counts_cache() {
        let mut p = Peekable::with_depth(0..5, 3);
        assert_eq!(p.len(), 5);
        p.advance();
        assert_eq!(p.size_hint(), (4, Some(4)));
    }

    #[test]
    fn lookahead_depth_is_kept_after_advancing() {
        let pulled = core::cell::Cell::new(0);
        let mut p = Peekable::with_depth((0..10).inspect(|_| pulled.set(pulled.get() + 1)), 3);
        assert_eq!(pulled.get(), 3);
        for consumed in 1..=5 {
            p.advance();
            assert_eq!(pulled.get() - consumed, 3, "lookahead after {consumed} advances");
        }
        assert_eq!(p.advance_n(2), Ok(vec![5, 6]));
        assert_eq!(pulled.get(), 10);
        // The source is exhausted, so the cache drains below the depth.
        assert_eq!(p.advance_n(3), Ok(vec![7, 8, 9]));
        assert!(p.is_last());
        assert_eq!(pulled.get(), 10);
    }

    #[test]
    fn zero_depth_still_pulls_one() {
        let pulled = core::cell::Cell::new(0);
        let mut p = Peekable::with_depth((0..4).inspect(|_| pulled.set(pulled.get() + 1)), 0);
        assert_eq!(pulled.get(), 1);
        p.advance();
        assert_eq!(pulled.get(), 2);
    }

    proptest! {
        #[test]
        fn peeking_never_changes_the_next_item(
            items in prop::collection::vec(any::<i16>(), 0..64),
            peeks in prop::collection::vec(0usize..8, 0..64),
        ) {
            let mut p = Peekable::new(items.clone());
            let mut taken = Vec::new();
            for n in peeks {
                let ahead: Vec<Option<i16>> = p.peek_n(n).into_iter().map(|item| item.copied()).collect();
                let expected: Vec<Option<i16>> = (0..n).map(|i| items.get(taken.len() + i).copied()).collect();
                prop_assert_eq!(ahead, expected);
                prop_assert_eq!(p.peek().copied(), items.get(taken.len()).copied());
                if let Some(item) = p.advance() {
                    taken.push(item);
                }
            }
            taken.extend(p.by_ref());
            prop_assert_eq!(taken, items);
        }
    }
}

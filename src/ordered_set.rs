use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{BitAnd, BitOr, Sub};

use crate::Balance;
use crate::merge;
use crate::raw::{Handle, RawWbTree};

mod cursor;
mod order_statistic;
mod render;

pub use cursor::{Cursor, CursorState};
pub use render::TreeView;

/// An ordered set based on a weight-balanced binary search tree.
///
/// Every node records the weight (node count) of its subtree. Whenever an insertion or removal
/// leaves a node whose heavier child carries more than the configured [`Balance`] fraction of
/// that weight, the highest such node is rebuilt into a perfectly balanced subtree. Lookups,
/// insertions and removals take amortized O(log n) time, and the weights double as order
/// statistics ([`get_by_rank`](OrderedSet::get_by_rank), [`rank_of`](OrderedSet::rank_of)).
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set. The
/// behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `OrderedSet` that observed the logic error and not result in undefined behavior.
///
/// Iterators returned by [`OrderedSet::iter`] and [`OrderedSet::into_iter`] produce their items
/// in ascending order. [`OrderedSet::cursor`] returns a cursor that can also remove the element
/// it just returned.
///
/// # Examples
///
/// ```
/// use wabi_set::OrderedSet;
///
/// let mut primes = OrderedSet::new();
/// primes.update([7, 2, 5, 3, 5]);
///
/// assert_eq!(primes.len(), 4);
/// assert!(primes.contains(&5));
/// assert_eq!(primes.to_string(), "2 3 5 7");
///
/// primes.remove(&5);
/// assert_eq!(primes.to_vec(), [2, 3, 7]);
/// ```
pub struct OrderedSet<T> {
    tree: RawWbTree<T>,
}

/// An iterator over the items of an `OrderedSet`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedSet`].
///
/// # Examples
///
/// ```
/// use wabi_set::OrderedSet;
///
/// let set = OrderedSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OrderedSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    tree: &'a RawWbTree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An owning iterator over the items of an `OrderedSet`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: OrderedSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> OrderedSet<T> {
    /// Makes a new, empty `OrderedSet` using [`Balance::DEFAULT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> OrderedSet<T> {
        Self::with_balance(Balance::DEFAULT)
    }

    /// Makes a new, empty `OrderedSet` that rebalances according to `balance`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::{Balance, OrderedSet};
    ///
    /// let mut set = OrderedSet::with_balance(Balance::OFF);
    /// set.update(0..8);
    /// assert_eq!(set.height(), 8);
    /// ```
    #[must_use]
    pub const fn with_balance(balance: Balance) -> OrderedSet<T> {
        OrderedSet {
            tree: RawWbTree::new(balance),
        }
    }

    pub(crate) fn from_raw(tree: RawWbTree<T>) -> OrderedSet<T> {
        OrderedSet {
            tree,
        }
    }

    /// Returns the balance criterion this set was created with.
    #[must_use]
    pub const fn balance(&self) -> Balance {
        self.tree.balance()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the set, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the number of levels in the underlying tree: 0 when empty, 1 for a single element.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = (0..7).collect();
    /// assert!(set.height() <= 4);
    /// set.rebalance();
    /// assert_eq!(set.height(), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Rebuilds the whole tree into a perfectly balanced shape. The elements are unchanged.
    ///
    /// Mostly useful for sets created with [`Balance::OFF`].
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn rebalance(&mut self) {
        self.tree.rebalance();
    }

    /// Returns a reference to the smallest element, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([2, 1]);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first().map(|handle| self.tree.element(handle))
    }

    /// Returns a reference to the largest element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last().map(|handle| self.tree.element(handle))
    }

    /// Removes and returns the smallest element, if any.
    ///
    /// # Complexity
    ///
    /// O(log n) amortized
    pub fn pop_first(&mut self) -> Option<T> {
        let handle = self.tree.first()?;
        Some(self.tree.unlink(handle))
    }

    /// Removes and returns the largest element, if any.
    ///
    /// # Complexity
    ///
    /// O(log n) amortized
    pub fn pop_last(&mut self) -> Option<T> {
        let handle = self.tree.last()?;
        Some(self.tree.unlink(handle))
    }

    /// Gets an iterator that visits the elements in ascending order.
    ///
    /// Every call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([3, 1, 2]);
    /// assert!(set.iter().copied().eq([1, 2, 3]));
    /// assert!(set.iter().rev().copied().eq([3, 2, 1]));
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: &self.tree,
            front: self.tree.first(),
            back: self.tree.last(),
            remaining: self.tree.len(),
        }
    }

    /// Gets a cursor that visits the elements in ascending order and can remove the element it
    /// returned last. See [`Cursor`].
    ///
    /// The cursor borrows the set mutably, so no other access to the set is possible while it is
    /// alive:
    ///
    /// ```compile_fail
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([1, 2, 3]);
    /// let mut cursor = set.cursor();
    /// set.insert(4);
    /// cursor.advance();
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor::new(&mut self.tree)
    }

    /// Gets a cursor that visits the elements in descending order and can remove the element it
    /// returned last.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([1, 2, 3, 4, 5]);
    /// let mut cursor = set.cursor_rev();
    /// while let Some(&element) = cursor.advance() {
    ///     if element > 3 {
    ///         cursor.remove_current().unwrap();
    ///     } else {
    ///         break;
    ///     }
    /// }
    /// assert_eq!(set.to_vec(), [1, 2, 3]);
    /// ```
    pub fn cursor_rev(&mut self) -> Cursor<'_, T> {
        Cursor::new_rev(&mut self.tree)
    }

    /// Returns the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([20, 4, 3]);
    /// assert_eq!(set.to_vec(), [3, 4, 20]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T: Ord> OrderedSet<T> {
    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// The value may be any borrowed form of the set's element type,
    /// but the ordering on the borrowed form *must* match the
    /// ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([String::from("a"), String::from("b")]);
    /// assert!(set.contains("a"));
    /// assert!(!set.contains("c"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.find(value).is_some()
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.find(value).map(|handle| self.tree.element(handle))
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. If an equal element is already present the
    /// set is left unchanged and the value is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) amortized
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert(value)
    }

    /// Inserts every value of `values` that is not already present.
    ///
    /// Returns how many values were newly inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([1, 2]);
    /// assert_eq!(set.update([2, 3, 3, 4]), 2);
    /// assert_eq!(set.to_vec(), [1, 2, 3, 4]);
    /// ```
    pub fn update<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().map(|value| usize::from(self.tree.insert(value))).sum()
    }

    /// Removes the element equal to the value, if present. Returns whether it was present.
    ///
    /// Removing an absent value is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([2]);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) amortized
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(value).is_some()
    }

    /// Removes and returns the element equal to the value, if present.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(value)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = (0..8).collect();
    /// set.retain(|&k| k % 2 == 0);
    /// assert_eq!(set.to_vec(), [0, 2, 4, 6]);
    /// ```
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.cursor();
        while let Some(element) = cursor.advance() {
            if !keep(element) {
                cursor.remove_current().expect("cursor is positioned on the element it just returned");
            }
        }
    }

    /// Returns the smallest element strictly greater than `value`, provided `value` is in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([10, 20, 30]);
    /// assert_eq!(set.successor_of(&20), Some(&30));
    /// assert_eq!(set.successor_of(&30), None);
    /// assert_eq!(set.successor_of(&25), None);
    /// ```
    pub fn successor_of<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.tree.find(value)?;
        self.tree.successor(handle).map(|next| self.tree.element(next))
    }

    /// Returns the largest element strictly smaller than `value`, provided `value` is in the set.
    pub fn predecessor_of<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.tree.find(value)?;
        self.tree.predecessor(handle).map(|prev| self.tree.element(prev))
    }
}

impl<T: Hash> Hash for OrderedSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &OrderedSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

impl<T: PartialOrd> PartialOrd for OrderedSet<T> {
    fn partial_cmp(&self, other: &OrderedSet<T>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for OrderedSet<T> {
    fn cmp(&self, other: &OrderedSet<T>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Clone> Clone for OrderedSet<T> {
    fn clone(&self) -> Self {
        OrderedSet::from_raw(self.tree.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Renders the elements in ascending order, separated by single spaces.
impl<T: fmt::Display> fmt::Display for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(element, f)?;
        }
        Ok(())
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        OrderedSet::new()
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.update(iter);
        set
    }
}

impl<T: Ord> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.update(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OrderedSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

fn expect_ordered<T>(result: crate::Result<OrderedSet<T>>) -> OrderedSet<T> {
    match result {
        Ok(set) => set,
        Err(error) => panic!("`OrderedSet` iteration is out of order: {error}"),
    }
}

impl<T: Ord + Clone> BitOr<&OrderedSet<T>> for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    /// Returns the union of `self` and `rhs` as a new `OrderedSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let a = OrderedSet::from([1, 3, 5]);
    /// let b = OrderedSet::from([2, 3, 4]);
    /// assert_eq!((&a | &b).to_vec(), [1, 2, 3, 4, 5]);
    /// ```
    fn bitor(self, rhs: &OrderedSet<T>) -> OrderedSet<T> {
        expect_ordered(merge::union(self, rhs))
    }
}

impl<T: Ord + Clone> BitAnd<&OrderedSet<T>> for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    /// Returns the intersection of `self` and `rhs` as a new `OrderedSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let a = OrderedSet::from([1, 3, 5]);
    /// let b = OrderedSet::from([2, 3, 4]);
    /// assert_eq!((&a & &b).to_vec(), [3]);
    /// ```
    fn bitand(self, rhs: &OrderedSet<T>) -> OrderedSet<T> {
        expect_ordered(merge::intersection(self, rhs))
    }
}

impl<T: Ord + Clone> Sub<&OrderedSet<T>> for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    /// Returns the difference of `self` and `rhs` as a new `OrderedSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let a = OrderedSet::from([1, 3, 5]);
    /// let b = OrderedSet::from([2, 3, 4]);
    /// assert_eq!((&a - &b).to_vec(), [1, 5]);
    /// assert_eq!((&b - &a).to_vec(), [2, 4]);
    /// ```
    fn sub(self, rhs: &OrderedSet<T>) -> OrderedSet<T> {
        expect_ordered(merge::difference(self, rhs))
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `OrderedSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.tree.drain_sorted().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(handle);
        Some(self.tree.element(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(handle);
        Some(self.tree.element(handle))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
    }
}

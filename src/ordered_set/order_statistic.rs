use core::borrow::Borrow;
use core::ops::Index;

use super::OrderedSet;
use crate::Rank;

impl<T> OrderedSet<T> {
    /// Returns the element at position `rank` in ascending order.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([10, 20, 30]);
    /// assert_eq!(set.get_by_rank(1), Some(&20));
    /// assert!(set.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.tree.get_by_rank(rank).map(|handle| self.tree.element(handle))
    }
}

impl<T: Ord> OrderedSet<T> {
    /// Returns the zero-based rank of `value` in ascending order, or `None` if the value is not
    /// present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::OrderedSet;
    ///
    /// let set = OrderedSet::from([10, 20]);
    ///
    /// assert_eq!(set.rank_of(&20), Some(1));
    /// assert_eq!(set.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.rank_of(value)
    }
}

/// Indexes into the set by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use wabi_set::{OrderedSet, Rank};
///
/// let set = OrderedSet::from([10, 20, 30]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T> Index<Rank> for OrderedSet<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("index out of bounds")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_removals() {
        let mut set: OrderedSet<i32> = (0..10).map(|i| i * 10).collect();
        assert_eq!(set.rank_of(&50), Some(5));
        set.remove(&0);
        set.remove(&30);
        assert_eq!(set.rank_of(&50), Some(3));
        assert_eq!(set[Rank(3)], 50);
        assert_eq!(set.get_by_rank(set.len()), None);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_past_end() {
        let set = OrderedSet::from([1]);
        let _ = set[Rank(1)];
    }
}

//! Set algebra over ordered containers.
//!
//! Every function walks its operands once, in lock-step, through [`Peekable`] adapters and builds
//! a fresh container of the same kind as the first operand. Two operands of sizes n and m are
//! merged in O(n + m) comparisons.
//!
//! Operands other than [`OrderedSet`](crate::OrderedSet) are trusted to be ascending. Each
//! consumed item is compared with the one after it, and the first strictly smaller successor
//! aborts the merge with [`Error::NotAscending`]. Items the merge never reaches are not checked.
//! Runs of equal items are tolerated.
//!
//! When both operands hold equal items, the first operand's item is the one kept.
//!
//! # Examples
//!
//! ```
//! use wabi_set::{difference, intersection, union};
//!
//! let odd = vec![1, 3, 5];
//! let low = [2, 3, 4];
//! assert_eq!(union(&odd, &low), Ok(vec![1, 2, 3, 4, 5]));
//! assert_eq!(intersection(&odd, &low), Ok(vec![3]));
//! assert_eq!(difference(&odd, &low), Ok(vec![1, 5]));
//! ```

use alloc::vec::Vec;
use core::cmp::Ordering::{Equal, Greater, Less};

use crate::sequence::{OrderedSink, OrderedSource};
use crate::{Error, Peekable, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Operation {
    Union,
    Intersection,
    Difference,
}

impl Operation {
    /// Whether an item found only in the first operand is part of the result.
    fn keeps_first_only(self) -> bool {
        matches!(self, Operation::Union | Operation::Difference)
    }

    fn keeps_second_only(self) -> bool {
        self == Operation::Union
    }

    fn keeps_common(self) -> bool {
        self != Operation::Difference
    }
}

/// One side of a merge, checking the ascending order as items are consumed.
struct Operand<I: Iterator> {
    items: Peekable<I>,
    /// Position of this operand in the caller's argument list.
    operand: usize,
}

impl<I> Operand<I>
where
    I: Iterator,
    I::Item: Ord,
{
    fn new(items: I, operand: usize) -> Self {
        Operand {
            items: Peekable::new(items),
            operand,
        }
    }

    fn peek(&self) -> Option<&I::Item> {
        self.items.peek()
    }

    fn advance(&mut self) -> Result<Option<I::Item>> {
        let Some(item) = self.items.advance() else {
            return Ok(None);
        };
        if self.items.peek().is_some_and(|next| *next < item) {
            let index = self.items.consumed();
            tracing::trace!(operand = self.operand, index, "operand is not in ascending order");
            return Err(Error::NotAscending {
                operand: self.operand,
                index,
            });
        }
        Ok(Some(item))
    }
}

fn merge<S, O>(first: &S, second: &O, operation: Operation, second_operand: usize) -> Result<S>
where
    S: OrderedSink,
    O: OrderedSource<Item = S::Item> + ?Sized,
{
    let mut left = Operand::new(first.ordered(), 0);
    let mut right = Operand::new(second.ordered(), second_operand);
    let mut merged = Vec::new();

    while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
        match a.cmp(b) {
            Less => {
                let item = left.advance()?;
                if operation.keeps_first_only() {
                    merged.extend(item);
                }
            }
            Greater => {
                let item = right.advance()?;
                if operation.keeps_second_only() {
                    merged.extend(item);
                }
            }
            Equal => {
                let item = left.advance()?;
                right.advance()?;
                if operation.keeps_common() {
                    merged.extend(item);
                }
            }
        }
    }

    if operation.keeps_first_only() {
        while let Some(item) = left.advance()? {
            merged.push(item);
        }
    }
    if operation.keeps_second_only() {
        while let Some(item) = right.advance()? {
            merged.push(item);
        }
    }

    Ok(first.with_ascending(merged))
}

/// Folds `rest` into `first` from left to right. With no further operand the result is a copy of
/// `first`.
fn fold<'a, S, O, R>(first: &S, rest: R, operation: Operation) -> Result<S>
where
    S: OrderedSink,
    O: OrderedSource<Item = S::Item> + ?Sized + 'a,
    R: IntoIterator<Item = &'a O>,
{
    let mut rest = rest.into_iter();
    let Some(second) = rest.next() else {
        return Ok(first.with_ascending(first.ordered().collect()));
    };
    let mut accumulated = merge(first, second, operation, 1)?;
    for (i, operand) in rest.enumerate() {
        accumulated = merge(&accumulated, operand, operation, i + 2)?;
    }
    Ok(accumulated)
}

/// Returns every item that is in `first`, in `second`, or in both, as a container of the same kind
/// as `first`.
///
/// # Errors
///
/// Returns [`Error::NotAscending`] if an operand turns out not to be in ascending order.
///
/// # Examples
///
/// ```
/// use wabi_set::{OrderedSet, union};
///
/// let a = OrderedSet::from([1, 3, 5]);
/// let b = OrderedSet::from([2, 3, 4]);
/// assert_eq!(union(&a, &b).unwrap().to_vec(), [1, 2, 3, 4, 5]);
///
/// let text = String::from("abck");
/// assert_eq!(union(&text, "def").unwrap(), "abcdefk");
/// ```
pub fn union<S, O>(first: &S, second: &O) -> Result<S>
where
    S: OrderedSink,
    O: OrderedSource<Item = S::Item> + ?Sized,
{
    merge(first, second, Operation::Union, 1)
}

/// Returns the items that are in both `first` and `second`, as a container of the same kind as
/// `first`.
///
/// # Errors
///
/// Returns [`Error::NotAscending`] if an operand turns out not to be in ascending order.
///
/// # Examples
///
/// ```
/// use wabi_set::intersection;
///
/// assert_eq!(intersection(&vec![1, 3, 5], &[2, 3, 4]), Ok(vec![3]));
/// assert_eq!(intersection(&vec![1, 3, 5], &[0; 0]), Ok(vec![]));
/// ```
pub fn intersection<S, O>(first: &S, second: &O) -> Result<S>
where
    S: OrderedSink,
    O: OrderedSource<Item = S::Item> + ?Sized,
{
    merge(first, second, Operation::Intersection, 1)
}

/// Returns the items of `first` that are not in `second`, as a container of the same kind as
/// `first`.
///
/// # Errors
///
/// Returns [`Error::NotAscending`] if an operand turns out not to be in ascending order.
///
/// # Examples
///
/// ```
/// use wabi_set::difference;
///
/// assert_eq!(difference(&vec![1, 3, 5], &[2, 3, 4]), Ok(vec![1, 5]));
/// assert_eq!(difference(&vec![2, 3, 4], &[1, 3, 5]), Ok(vec![2, 4]));
/// ```
pub fn difference<S, O>(first: &S, second: &O) -> Result<S>
where
    S: OrderedSink,
    O: OrderedSource<Item = S::Item> + ?Sized,
{
    merge(first, second, Operation::Difference, 1)
}

/// Returns the union of `first` and every operand of `rest`, folded from left to right.
///
/// The result has the same kind as `first`. Operands are numbered from 0 (`first`) in
/// [`Error::NotAscending`].
///
/// # Errors
///
/// Returns [`Error::NotAscending`] if an operand turns out not to be in ascending order.
///
/// # Examples
///
/// ```
/// use wabi_set::{OrderedSet, union_all};
///
/// let empty: OrderedSet<i32> = OrderedSet::new();
/// let tree = OrderedSet::from([20, 4, 3]);
/// let all = union_all(&empty, [&tree, &OrderedSet::new()]).unwrap();
/// assert_eq!(all, tree);
/// ```
pub fn union_all<'a, S, O, R>(first: &S, rest: R) -> Result<S>
where
    S: OrderedSink,
    O: OrderedSource<Item = S::Item> + ?Sized + 'a,
    R: IntoIterator<Item = &'a O>,
{
    fold(first, rest, Operation::Union)
}

/// Returns the items common to `first` and every operand of `rest`, folded from left to right.
///
/// The result has the same kind as `first`. Operands are numbered from 0 (`first`) in
/// [`Error::NotAscending`].
///
/// # Errors
///
/// Returns [`Error::NotAscending`] if an operand turns out not to be in ascending order.
///
/// # Examples
///
/// ```
/// use wabi_set::intersection_all;
///
/// let common = intersection_all(&vec![1, 2, 3, 4], [&vec![2, 3, 4], &vec![3, 4, 5]]);
/// assert_eq!(common, Ok(vec![3, 4]));
/// ```
pub fn intersection_all<'a, S, O, R>(first: &S, rest: R) -> Result<S>
where
    S: OrderedSink,
    O: OrderedSource<Item = S::Item> + ?Sized + 'a,
    R: IntoIterator<Item = &'a O>,
{
    fold(first, rest, Operation::Intersection)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::OrderedSet;
    use alloc::collections::BTreeSet;
    use alloc::vec;
    use proptest::prelude::*;

    #[test]
    fn first_operand_wins_on_ties() {
        // Equal under `Ord`, told apart by the second field.
        #[derive(Clone, Debug)]
        struct Tagged(u8, &'static str);
        impl PartialEq for Tagged {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }
        impl Eq for Tagged {}
        impl PartialOrd for Tagged {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Tagged {
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                self.0.cmp(&other.0)
            }
        }

        let first = vec![Tagged(1, "first")];
        let second = vec![Tagged(1, "second")];
        assert_eq!(union(&first, &second).unwrap()[0].1, "first");
        assert_eq!(intersection(&first, &second).unwrap()[0].1, "first");
    }

    #[test]
    fn unsorted_operand_is_reported() {
        assert_eq!(
            union(&vec![1, 2, 3], &[5, 4]),
            Err(Error::NotAscending {
                operand: 1,
                index: 1
            })
        );
        assert_eq!(
            difference(&vec![3, 1], &[0; 0]),
            Err(Error::NotAscending {
                operand: 0,
                index: 1
            })
        );
        // Equal neighbours are fine.
        assert_eq!(union(&vec![1, 1, 2], &[2, 2]), Ok(vec![1, 1, 2, 2]));
    }

    #[test]
    fn unsorted_tail_never_reached_goes_unnoticed() {
        assert_eq!(intersection(&vec![1], &[5, 4]), Ok(vec![]));
    }

    #[test]
    fn fold_numbers_operands_from_first() {
        let sorted = vec![1, 2];
        let unsorted = vec![2, 1];
        assert_eq!(
            union_all(&vec![0], [&sorted, &sorted, &unsorted]),
            Err(Error::NotAscending {
                operand: 3,
                index: 1
            })
        );
    }

    #[test]
    fn fold_without_rest_copies_first() {
        let first = OrderedSet::from([3, 1]);
        let no_more: [&OrderedSet<i32>; 0] = [];
        assert_eq!(union_all(&first, no_more), Ok(first.clone()));
        assert_eq!(intersection_all(&first, no_more), Ok(first));
    }

    fn sorted_vec() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::btree_set(any::<u8>(), 0..64).prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn agrees_with_btree_set(a in sorted_vec(), b in sorted_vec()) {
            let (x, y): (BTreeSet<u8>, BTreeSet<u8>) = (a.iter().copied().collect(), b.iter().copied().collect());
            prop_assert_eq!(union(&a, &b).unwrap(), x.union(&y).copied().collect::<Vec<_>>());
            prop_assert_eq!(intersection(&a, &b).unwrap(), x.intersection(&y).copied().collect::<Vec<_>>());
            prop_assert_eq!(difference(&a, &b).unwrap(), x.difference(&y).copied().collect::<Vec<_>>());
        }
    }
}

/// A zero-based rank into the ascending order of an [`OrderedSet`](crate::OrderedSet).
///
/// # Examples
///
/// ```
/// use wabi_set::{OrderedSet, Rank};
///
/// let set = OrderedSet::from([30, 10, 20]);
///
/// assert_eq!(set[Rank(0)], 10);
/// assert_eq!(set[Rank(2)], 30);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);

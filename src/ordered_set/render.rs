use core::fmt;

use super::OrderedSet;
use crate::raw::RawWbTree;

/// Displays the shape of an [`OrderedSet`]'s tree, one node per line.
///
/// The root comes first and each level is indented by two more spaces. A node is printed as
/// `+ element (weight)` when it has children and `- element (weight)` when it is a leaf. An
/// internal node always lists both children, left first; a missing one is printed as a bare `-`.
///
/// This `struct` is created by the [`tree`] method on [`OrderedSet`].
///
/// # Examples
///
/// ```
/// use wabi_set::OrderedSet;
///
/// let set = OrderedSet::from([3, 4, 5]);
/// assert_eq!(set.tree().to_string(), "+ 4 (3)\n  - 3 (1)\n  - 5 (1)\n");
/// ```
///
/// [`tree`]: OrderedSet::tree
#[must_use]
pub struct TreeView<'a, T> {
    tree: &'a RawWbTree<T>,
}

impl<T> OrderedSet<T> {
    /// Returns a view that draws the underlying tree when displayed. See [`TreeView`].
    pub fn tree(&self) -> TreeView<'_, T> {
        TreeView {
            tree: &self.tree,
        }
    }
}

impl<T: fmt::Display> fmt::Display for TreeView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.write_structure(f)
    }
}

impl<T> fmt::Debug for TreeView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeView").field("len", &self.tree.len()).finish_non_exhaustive()
    }
}

use core::fmt;

use crate::raw::{Handle, RawWbTree};
use crate::{Error, Result};

/// Where a [`Cursor`] is in its traversal, as reported by [`Cursor::state`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CursorState {
    /// No element has been returned yet.
    Ready,
    /// At least one element has been returned and the traversal is not over.
    Positioned,
    /// [`Cursor::advance`] has returned `None`.
    Exhausted,
}

#[derive(Clone, Copy, Debug)]
enum State {
    Ready,
    /// `pending` is the node whose element was returned last, until it is removed.
    Positioned {
        pending: Option<Handle>,
    },
    Exhausted,
}

/// An ascending or descending traversal of an [`OrderedSet`](crate::OrderedSet) that may remove
/// the element it returned last.
///
/// This `struct` is created by the [`cursor`] and [`cursor_rev`] methods on
/// [`OrderedSet`](crate::OrderedSet).
///
/// The cursor holds the set's mutable borrow for its whole lifetime, so the set cannot be modified
/// behind its back. Removing through the cursor never disturbs the rest of the traversal: every
/// element that was not removed is still returned exactly once, in the cursor's order.
///
/// # Examples
///
/// ```
/// use wabi_set::OrderedSet;
///
/// let mut set: OrderedSet<i32> = (1..=6).collect();
/// let mut cursor = set.cursor();
/// while let Some(&element) = cursor.advance() {
///     if element % 3 == 0 {
///         assert_eq!(cursor.remove_current(), Ok(element));
///     }
/// }
/// assert_eq!(set.to_vec(), [1, 2, 4, 5]);
/// ```
///
/// [`cursor`]: crate::OrderedSet::cursor
/// [`cursor_rev`]: crate::OrderedSet::cursor_rev
pub struct Cursor<'a, T> {
    tree: &'a mut RawWbTree<T>,
    /// Node holding the element the next `advance` returns.
    next: Option<Handle>,
    state: State,
    descending: bool,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(tree: &'a mut RawWbTree<T>) -> Self {
        let next = tree.first();
        Cursor {
            tree,
            next,
            state: State::Ready,
            descending: false,
        }
    }

    pub(super) fn new_rev(tree: &'a mut RawWbTree<T>) -> Self {
        let next = tree.last();
        Cursor {
            tree,
            next,
            state: State::Ready,
            descending: true,
        }
    }

    /// Returns the next element in the cursor's order, or `None` once every element has been
    /// returned.
    ///
    /// # Complexity
    ///
    /// O(1) amortized over a full traversal
    pub fn advance(&mut self) -> Option<&T> {
        match self.next {
            Some(handle) => {
                self.next = if self.descending {
                    self.tree.predecessor(handle)
                } else {
                    self.tree.successor(handle)
                };
                self.state = State::Positioned {
                    pending: Some(handle),
                };
                Some(self.tree.element(handle))
            }
            None => {
                self.state = State::Exhausted;
                None
            }
        }
    }

    /// Returns the element the next [`advance`](Cursor::advance) will return, without moving.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.next.map(|handle| self.tree.element(handle))
    }

    /// Returns `true` if [`advance`](Cursor::advance) would return an element.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the element returned by the last [`advance`](Cursor::advance), unless it has been
    /// removed since.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        match self.state {
            State::Positioned {
                pending: Some(handle),
            } => Some(self.tree.element(handle)),
            _ => None,
        }
    }

    /// Returns where the cursor is in its traversal.
    #[must_use]
    pub fn state(&self) -> CursorState {
        match self.state {
            State::Ready => CursorState::Ready,
            State::Positioned {
                ..
            } => CursorState::Positioned,
            State::Exhausted => CursorState::Exhausted,
        }
    }

    /// Removes the element returned by the last [`advance`](Cursor::advance) from the set and
    /// returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCursorState`] if nothing has been returned yet, if that element was
    /// already removed, or if the cursor is exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_set::{CursorState, Error, OrderedSet};
    ///
    /// let mut set = OrderedSet::from([1, 2]);
    /// let mut cursor = set.cursor();
    /// assert_eq!(cursor.remove_current(), Err(Error::InvalidCursorState { state: CursorState::Ready }));
    ///
    /// cursor.advance();
    /// assert_eq!(cursor.remove_current(), Ok(1));
    /// assert!(cursor.remove_current().is_err());
    /// assert_eq!(cursor.advance(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) amortized
    pub fn remove_current(&mut self) -> Result<T> {
        let State::Positioned {
            pending: Some(handle),
        } = self.state
        else {
            return Err(Error::InvalidCursorState {
                state: self.state(),
            });
        };

        // Unlinking a node with two children moves its successor's element into it and frees the
        // successor's node, which is exactly where an ascending `next` points. The predecessor
        // node a descending cursor holds is never freed.
        if !self.descending && self.tree.node(handle).has_two_children() {
            self.next = Some(handle);
        }
        self.state = State::Positioned {
            pending: None,
        };
        let element = self.tree.unlink(handle);
        tracing::debug!(len = self.tree.len(), "removed element through cursor");
        Ok(element)
    }
}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("state", &self.state()).field("current", &self.current()).field("next", &self.peek()).finish()
    }
}

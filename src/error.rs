use crate::ordered_set::CursorState;

/// A `Result` whose error type is [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported at the boundary of the set, the peek-ahead iterator and the merge engine.
///
/// Corruption of the tree structure is never reported through this type: it indicates a bug in
/// the tree itself and panics instead.
///
/// # Examples
///
/// ```
/// use wabi_set::{Error, OrderedSet};
///
/// let mut set = OrderedSet::from([1, 2, 3]);
/// let mut cursor = set.cursor();
///
/// // Nothing has been returned yet, so there is nothing to remove.
/// assert!(matches!(cursor.remove_current(), Err(Error::InvalidCursorState { .. })));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// `remove_current()` was called without a preceding, not yet removed, `advance()`.
    #[error("no element to remove: cursor is {state:?}")]
    InvalidCursorState {
        /// The state the cursor was in when the removal was attempted.
        state: CursorState,
    },

    /// An operand of a set operation yielded an element smaller than its predecessor.
    #[error("operand {operand} is not in ascending order at index {index}")]
    NotAscending {
        /// Zero-based position of the offending operand in the call.
        operand: usize,
        /// Zero-based index of the first out-of-order element within that operand.
        index: usize,
    },

    /// A balance fraction outside `1/2 < numerator/denominator < 1` was requested.
    #[error("balance fraction {numerator}/{denominator} is outside (1/2, 1)")]
    InvalidBalance {
        /// Requested numerator.
        numerator: u32,
        /// Requested denominator.
        denominator: u32,
    },

    /// A batch advance asked for more items than remain; nothing was consumed.
    #[error("requested {requested} items but only {available} remain")]
    InsufficientItems {
        /// Number of items requested.
        requested: usize,
        /// Number of items that were available.
        available: usize,
    },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        let error = Error::NotAscending {
            operand: 1,
            index: 3,
        };
        assert_eq!(error.to_string(), "operand 1 is not in ascending order at index 3");

        let error = Error::InvalidBalance {
            numerator: 1,
            denominator: 3,
        };
        assert_eq!(error.to_string(), "balance fraction 1/3 is outside (1/2, 1)");

        let error = Error::InvalidCursorState {
            state: CursorState::Ready,
        };
        assert_eq!(error.to_string(), "no element to remove: cursor is Ready");
    }
}

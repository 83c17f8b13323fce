use crate::{Error, Result};

/// The weight-balance criterion used by an [`OrderedSet`](crate::OrderedSet).
///
/// A balance of `numerator/denominator = α` declares a node unbalanced when one of its children
/// holds at least `α` of the node's subtree weight. After every insertion or removal the highest
/// unbalanced node on the modified path is rebuilt into a perfectly balanced subtree.
///
/// `α` must satisfy `1/2 < α < 1`. At exactly `1/2` even a perfectly rebuilt subtree of even
/// weight would count as unbalanced. Smaller values rebuild more eagerly and keep the tree
/// shallower; values close to 1 tolerate long chains. [`Balance::OFF`] disables automatic
/// rebuilding entirely, in which case [`OrderedSet::rebalance`](crate::OrderedSet::rebalance)
/// can be called explicitly.
///
/// # Examples
///
/// ```
/// use wabi_set::{Balance, OrderedSet};
///
/// let balance = Balance::alpha(3, 4).unwrap();
/// let mut set = OrderedSet::with_balance(balance);
/// set.update(0..100);
/// assert!(set.height() <= 16);
///
/// assert!(Balance::alpha(1, 3).is_err());
/// assert!(Balance::alpha(2, 2).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Balance {
    // `None` disables rebuilding; weights are still maintained.
    alpha: Option<(u32, u32)>,
}

impl Balance {
    /// The default criterion, `α = 2/3`.
    pub const DEFAULT: Self = Self {
        alpha: Some((2, 3)),
    };

    /// Never rebuild automatically.
    pub const OFF: Self = Self {
        alpha: None,
    };

    /// Creates a criterion with `α = numerator/denominator`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBalance`] unless `1/2 < numerator/denominator < 1`.
    pub const fn alpha(numerator: u32, denominator: u32) -> Result<Self> {
        // `as u64` is lossless here and avoids overflow of `2 * numerator`.
        let (n, d) = (numerator as u64, denominator as u64);
        if d == 0 || d >= 2 * n || d <= n {
            return Err(Error::InvalidBalance {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            alpha: Some((numerator, denominator)),
        })
    }

    /// Returns `true` if insertions and removals rebuild unbalanced subtrees.
    #[must_use]
    pub const fn is_self_balancing(&self) -> bool {
        self.alpha.is_some()
    }

    /// Returns `(numerator, denominator)`, or `None` for [`Balance::OFF`].
    #[must_use]
    pub const fn fraction(&self) -> Option<(u32, u32)> {
        self.alpha
    }

    /// Returns `true` if a child of weight `child` violates the criterion for a node of weight
    /// `weight`. Always `false` for [`Balance::OFF`].
    #[inline]
    pub(crate) fn is_violated_by(&self, child: usize, weight: usize) -> bool {
        match self.alpha {
            Some((numerator, denominator)) => {
                (child as u128) * u128::from(denominator) >= (weight as u128) * u128::from(numerator)
            }
            None => false,
        }
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

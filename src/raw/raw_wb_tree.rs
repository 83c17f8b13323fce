use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::fmt;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use crate::Balance;

/// The weight-balanced binary search tree backing `OrderedSet`.
pub(crate) struct RawWbTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Criterion deciding when a subtree is rebuilt.
    balance: Balance,
}

/// Where a search for a key ended.
enum Search {
    /// The key is stored in this node.
    Found(Handle),
    /// The key is absent; it belongs on `side` of `parent` (or at the root when `parent` is `None`).
    Vacant {
        parent: Option<Handle>,
        side: Side,
    },
}

#[derive(Clone, Copy)]
enum Adjust {
    Increment,
    Decrement,
}

/// Explicit traversal stack; deep only when balancing is off.
type Stack = SmallVec<[Handle; 32]>;

impl<T> RawWbTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(balance: Balance) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            balance,
        }
    }

    /// Builds a perfectly balanced tree from elements already in strictly ascending order.
    pub(crate) fn from_sorted(elements: Vec<T>, balance: Balance) -> Self {
        let mut tree = Self::new(balance);
        let order: Vec<Handle> = elements.into_iter().map(|element| tree.nodes.alloc(Node::leaf(element, None))).collect();
        tree.root = tree.link_balanced(&order, None);
        tree
    }

    pub(crate) const fn balance(&self) -> Balance {
        self.balance
    }

    /// Returns the number of elements in the tree.
    pub(crate) fn len(&self) -> usize {
        self.weight_of(self.root)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Clears all elements from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn element(&self, handle: Handle) -> &T {
        self.nodes.get(handle).element()
    }

    #[inline]
    fn weight_of(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.nodes.get(h).weight())
    }

    /// Returns the handle of the smallest element.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// Returns the handle of the largest element.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Follows `side` links from `handle` as far as possible.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.nodes.get(handle).child(side) {
            handle = child;
        }
        handle
    }

    /// Returns the node holding the next larger element.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Right)
    }

    /// Returns the node holding the next smaller element.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Left)
    }

    // In-order neighbor towards `side`: the opposite extreme of the `side` subtree, or else the
    // closest ancestor reached from its opposite side.
    fn neighbor(&self, handle: Handle, side: Side) -> Option<Handle> {
        let opposite = match side {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        };
        if let Some(child) = self.nodes.get(handle).child(side) {
            return Some(self.extreme(child, opposite));
        }
        let mut child = handle;
        let mut current = self.nodes.get(handle).parent();
        while let Some(parent) = current {
            if self.nodes.get(parent).child(side) != Some(child) {
                return Some(parent);
            }
            child = parent;
            current = self.nodes.get(parent).parent();
        }
        None
    }

    /// Returns the number of levels in the tree: 0 when empty, 1 for a single node.
    pub(crate) fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: SmallVec<[(Handle, usize); 32]> = SmallVec::new();
        if let Some(root) = self.root {
            stack.push((root, 1));
        }
        while let Some((handle, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.nodes.get(handle);
            stack.extend(node.left().into_iter().chain(node.right()).map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Gets the handle of the element at `rank` (0-indexed position in ascending order).
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<Handle> {
        if rank >= self.len() {
            return None;
        }

        let mut remaining = rank;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left = self.weight_of(node.left());
            match remaining.cmp(&left) {
                Less => current = node.left(),
                Equal => return Some(handle),
                Greater => {
                    remaining -= left + 1;
                    current = node.right();
                }
            }
        }
        panic!("`RawWbTree::get_by_rank()` - rank {rank} not found below a root of weight {}", self.len());
    }

    /// Returns the handles of the subtree rooted at `subtree`, in ascending order.
    fn in_order(&self, subtree: Option<Handle>) -> Vec<Handle> {
        let mut order = Vec::with_capacity(self.weight_of(subtree));
        let mut stack = Stack::new();
        let mut current = subtree;
        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left();
            }
            let Some(handle) = stack.pop() else {
                break;
            };
            order.push(handle);
            current = self.nodes.get(handle).right();
        }
        order
    }

    /// Moves every element out of the tree, in ascending order.
    pub(crate) fn drain_sorted(&mut self) -> Vec<T> {
        let order = self.in_order(self.root);
        let elements = order.into_iter().map(|handle| self.nodes.take(handle).into_element()).collect();
        self.clear();
        elements
    }

    /// Rebuilds the whole tree into a perfectly balanced shape.
    pub(crate) fn rebalance(&mut self) {
        if let Some(root) = self.root {
            tracing::debug!(len = self.len(), "rebalancing whole tree");
            self.rebuild(root);
        }
    }

    /// Rebuilds the subtree rooted at `subtree` in place. No node is created or destroyed, so
    /// outstanding handles keep naming the same elements.
    fn rebuild(&mut self, subtree: Handle) {
        let parent = self.nodes.get(subtree).parent();
        let side = parent.map(|p| self.side_in_parent(p, subtree));
        let order = self.in_order(Some(subtree));
        tracing::trace!(weight = order.len(), "rebuilding unbalanced subtree");

        let new_root = self.link_balanced(&order, parent);
        match (parent, side) {
            (Some(parent), Some(side)) => self.nodes.get_mut(parent).set_child(side, new_root),
            _ => self.root = new_root,
        }
    }

    /// Links the nodes in `order` into a perfectly balanced subtree hanging from `parent`.
    fn link_balanced(&mut self, order: &[Handle], parent: Option<Handle>) -> Option<Handle> {
        if order.is_empty() {
            return None;
        }

        let middle = (order.len() - 1) / 2;
        let handle = order[middle];
        let left = self.link_balanced(&order[..middle], Some(handle));
        let right = self.link_balanced(&order[middle + 1..], Some(handle));

        let node = self.nodes.get_mut(handle);
        node.set_parent(parent);
        node.set_child(Side::Left, left);
        node.set_child(Side::Right, right);
        node.set_weight(order.len());
        Some(handle)
    }

    fn side_in_parent(&self, parent: Handle, child: Handle) -> Side {
        match self.nodes.get(parent).side_of(child) {
            Some(side) => side,
            None => panic!("`RawWbTree` - node {child:?} is not a child of its parent {parent:?}!"),
        }
    }

    fn is_unbalanced(&self, handle: Handle) -> bool {
        let node = self.nodes.get(handle);
        let heavier = self.weight_of(node.left()).max(self.weight_of(node.right()));
        self.balance.is_violated_by(heavier, node.weight())
    }

    /// Adjusts the weight of every node from `start` up to the root.
    /// Returns the highest node left unbalanced, if any.
    fn adjust_weights(&mut self, start: Option<Handle>, adjust: Adjust) -> Option<Handle> {
        let mut scapegoat = None;
        let mut current = start;
        while let Some(handle) = current {
            let node = self.nodes.get_mut(handle);
            match adjust {
                Adjust::Increment => node.increment_weight(),
                Adjust::Decrement => node.decrement_weight(),
            }
            current = node.parent();
            if self.is_unbalanced(handle) {
                scapegoat = Some(handle);
            }
        }
        scapegoat
    }

    /// Removes the node `handle`, preserving the search-tree order, and returns its element.
    ///
    /// A node with two children swaps elements with its in-order successor and the successor's
    /// node is unlinked instead; `handle` then holds the element that followed the removed one.
    pub(crate) fn unlink(&mut self, handle: Handle) -> T {
        let node = self.nodes.get(handle);
        let target = match (node.left(), node.right()) {
            (Some(_), Some(right)) => {
                let successor = self.extreme(right, Side::Left);
                let (node, next) = self.nodes.pair_mut(handle, successor);
                core::mem::swap(node.element_mut(), next.element_mut());
                successor
            }
            _ => handle,
        };

        let node = self.nodes.get(target);
        let replacement = node.left().or(node.right());
        let parent = node.parent();
        match parent {
            Some(parent) => {
                let side = self.side_in_parent(parent, target);
                self.nodes.get_mut(parent).set_child(side, replacement);
            }
            None => self.root = replacement,
        }
        if let Some(replacement) = replacement {
            self.nodes.get_mut(replacement).set_parent(parent);
        }

        let element = self.nodes.take(target).into_element();
        if let Some(scapegoat) = self.adjust_weights(parent, Adjust::Decrement) {
            self.rebuild(scapegoat);
        }
        element
    }

    /// Writes the tree structure, root at the left and children top-to-bottom. Internal nodes are
    /// marked `+`, leaves `-`, and a missing child of an internal node is a bare `-`.
    pub(crate) fn write_structure(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        T: fmt::Display,
    {
        let mut stack: SmallVec<[(Option<Handle>, usize); 32]> = SmallVec::new();
        stack.push((self.root, 0));
        while let Some((handle, depth)) = stack.pop() {
            for _ in 0..depth {
                f.write_str("  ")?;
            }
            let Some(handle) = handle else {
                f.write_str("-\n")?;
                continue;
            };
            let node = self.nodes.get(handle);
            let marker = if node.is_leaf() { '-' } else { '+' };
            writeln!(f, "{marker} {} ({})", node.element(), node.weight())?;
            if !node.is_leaf() {
                stack.push((node.right(), depth + 1));
                stack.push((node.left(), depth + 1));
            }
        }
        Ok(())
    }
}

impl<T: Ord> RawWbTree<T> {
    fn search<Q>(&self, key: &Q) -> Search
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            side = match key.cmp(node.element().borrow()) {
                Equal => return Search::Found(handle),
                Less => Side::Left,
                Greater => Side::Right,
            };
            parent = Some(handle);
            current = node.child(side);
        }
        Search::Vacant {
            parent,
            side,
        }
    }

    /// Returns the node holding `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            Search::Found(handle) => Some(handle),
            Search::Vacant {
                ..
            } => None,
        }
    }

    /// Returns the zero-based rank of `key`, or `None` if it is absent.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left = self.weight_of(node.left());
            match key.cmp(node.element().borrow()) {
                Less => current = node.left(),
                Equal => return Some(rank + left),
                Greater => {
                    rank += left + 1;
                    current = node.right();
                }
            }
        }
        None
    }

    /// Inserts `value`. Returns `false`, leaving the tree untouched, if it is already present.
    pub(crate) fn insert(&mut self, value: T) -> bool {
        match self.search(&value) {
            Search::Found(_) => false,
            Search::Vacant {
                parent: None,
                ..
            } => {
                self.root = Some(self.nodes.alloc(Node::leaf(value, None)));
                true
            }
            Search::Vacant {
                parent: Some(parent),
                side,
            } => {
                let leaf = self.nodes.alloc(Node::leaf(value, Some(parent)));
                self.nodes.get_mut(parent).set_child(side, Some(leaf));
                if let Some(scapegoat) = self.adjust_weights(Some(parent), Adjust::Increment) {
                    self.rebuild(scapegoat);
                }
                true
            }
        }
    }

    /// Removes and returns the element equal to `key`, if present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key)?;
        Some(self.unlink(handle))
    }
}

impl<T: Clone> Clone for RawWbTree<T> {
    fn clone(&self) -> Self {
        let elements = self.in_order(self.root).into_iter().map(|handle| self.element(handle).clone()).collect();
        Self::from_sorted(elements, self.balance)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use proptest::prelude::*;

    impl<T: Ord> RawWbTree<T> {
        /// Validates every structural invariant. Panics with a descriptive message on violation.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert!(self.nodes.is_empty(), "Empty tree still owns {} nodes", self.nodes.len());
                return;
            };
            assert!(self.nodes.get(root).parent().is_none(), "Root has a parent");

            let order = self.in_order(Some(root));
            assert_eq!(order.len(), self.nodes.len(), "Unreachable nodes in the arena");
            for pair in order.windows(2) {
                assert!(self.element(pair[0]) < self.element(pair[1]), "In-order sequence is not strictly ascending");
            }

            let strict = self.balance.is_self_balancing();
            for &handle in &order {
                let node = self.nodes.get(handle);
                for child in node.left().into_iter().chain(node.right()) {
                    assert_eq!(self.nodes.get(child).parent(), Some(handle), "Broken parent link at {child:?}");
                }
                let weight = 1 + self.weight_of(node.left()) + self.weight_of(node.right());
                assert_eq!(node.weight(), weight, "Weight mismatch at {handle:?}");
                if strict {
                    assert!(!self.is_unbalanced(handle), "Unbalanced node at {handle:?} (weight {weight})");
                }
            }
        }
    }

    fn elements<T: Clone>(tree: &RawWbTree<T>) -> Vec<T> {
        tree.in_order(tree.root).into_iter().map(|h| tree.element(h).clone()).collect()
    }

    struct Structure<'a, T>(&'a RawWbTree<T>);

    impl<T: fmt::Display> fmt::Display for Structure<'_, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.write_structure(f)
        }
    }

    #[test]
    fn ascending_inserts_stay_shallow() {
        let mut tree = RawWbTree::new(Balance::DEFAULT);
        for i in 0..1_000 {
            assert!(tree.insert(i));
        }
        tree.validate_invariants();
        assert_eq!(tree.len(), 1_000);
        // log base 3/2 of 1000 is just over 17.
        assert!(tree.height() <= 18, "height {}", tree.height());
    }

    #[test]
    fn unbalanced_tree_degenerates_until_rebalanced() {
        let mut tree = RawWbTree::new(Balance::OFF);
        for i in 0..64 {
            tree.insert(i);
        }
        assert_eq!(tree.height(), 64);
        tree.rebalance();
        tree.validate_invariants();
        assert_eq!(tree.height(), 7);
        assert_eq!(elements(&tree), (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut tree = RawWbTree::new(Balance::DEFAULT);
        assert!(tree.insert(5));
        assert!(!tree.insert(5));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn unlink_two_children_moves_successor_up() {
        let mut tree = RawWbTree::from_sorted(vec![1, 2, 3], Balance::DEFAULT);
        let root = tree.root.unwrap();
        assert_eq!(*tree.element(root), 2);
        assert_eq!(tree.unlink(root), 2);
        // The successor's element now lives in the old root node.
        assert_eq!(*tree.element(root), 3);
        tree.validate_invariants();
        assert_eq!(elements(&tree), [1, 3]);
    }

    #[test]
    fn neighbors_walk_both_ways() {
        let tree = RawWbTree::from_sorted((0..10).collect(), Balance::DEFAULT);
        let mut forward = Vec::new();
        let mut current = tree.first();
        while let Some(h) = current {
            forward.push(*tree.element(h));
            current = tree.successor(h);
        }
        assert_eq!(forward, (0..10).collect::<Vec<_>>());

        let mut backward = Vec::new();
        let mut current = tree.last();
        while let Some(h) = current {
            backward.push(*tree.element(h));
            current = tree.predecessor(h);
        }
        assert_eq!(backward, (0..10).rev().collect::<Vec<_>>());
    }

    #[test]
    fn structure_drawing() {
        let tree = RawWbTree::from_sorted(vec![1, 2, 3, 4], Balance::DEFAULT);
        let drawing = Structure(&tree).to_string();
        assert_eq!(drawing, "+ 2 (4)\n  - 1 (1)\n  + 3 (2)\n    -\n    - 4 (1)\n");

        let empty: RawWbTree<i32> = RawWbTree::new(Balance::DEFAULT);
        assert_eq!(Structure(&empty).to_string(), "-\n");
    }

    #[test]
    fn drain_empties_arena() {
        let mut tree = RawWbTree::from_sorted(vec![String::from("a"), String::from("b")], Balance::DEFAULT);
        assert_eq!(tree.drain_sorted(), ["a", "b"]);
        assert!(tree.is_empty());
        tree.validate_invariants();
    }

    #[test]
    fn empty_tree_queries() {
        let tree: RawWbTree<i32> = RawWbTree::new(Balance::DEFAULT);
        assert_eq!(tree.height(), 0);
        assert!(tree.first().is_none());
        assert!(tree.last().is_none());
        assert!(tree.get_by_rank(0).is_none());
        assert!(tree.rank_of(&0).is_none());
        tree.validate_invariants();
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..1000).prop_map(Op::Insert),
            3 => (0i32..1000).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
        ]
    }

    fn balance_strategy() -> impl Strategy<Value = Balance> {
        prop_oneof![
            Just(Balance::DEFAULT),
            Just(Balance::OFF),
            (2u32..20).prop_flat_map(|n| (Just(n), (n + 1)..(2 * n))).prop_map(|(n, d)| Balance::alpha(n, d).unwrap()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn invariants_hold_after_operations(
            balance in balance_strategy(),
            ops in prop::collection::vec(op_strategy(), 0..500),
        ) {
            let mut tree = RawWbTree::new(balance);
            let mut model = alloc::collections::BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(key) => prop_assert_eq!(tree.insert(key), model.insert(key)),
                    Op::Remove(key) => prop_assert_eq!(tree.remove(&key), model.take(&key)),
                    Op::PopFirst => {
                        let popped = tree.first().map(|h| tree.unlink(h));
                        prop_assert_eq!(popped, model.pop_first());
                    }
                }
                tree.validate_invariants();
            }
            prop_assert_eq!(elements(&tree), model.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn rank_round_trip(keys in prop::collection::btree_set(-500i32..500, 1..200)) {
            let mut tree = RawWbTree::new(Balance::DEFAULT);
            for &key in &keys {
                tree.insert(key);
            }
            for (rank, key) in keys.iter().enumerate() {
                let handle = tree.get_by_rank(rank).unwrap();
                prop_assert_eq!(tree.element(handle), key);
                prop_assert_eq!(tree.rank_of(key), Some(rank));
            }
            prop_assert!(tree.get_by_rank(keys.len()).is_none());
        }

        #[test]
        fn clone_is_balanced_copy(keys in prop::collection::vec(-500i32..500, 0..300)) {
            let mut tree = RawWbTree::new(Balance::OFF);
            for &key in &keys {
                tree.insert(key);
            }
            let copy = tree.clone();
            copy.validate_invariants();
            prop_assert_eq!(elements(&copy), elements(&tree));
            prop_assert!(copy.height() <= tree.height());
        }
    }
}

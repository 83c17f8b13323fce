use super::handle::Handle;

/// A binary tree node. Links are arena handles; `weight` is the number of nodes in the subtree
/// rooted here, itself included.
pub(crate) struct Node<T> {
    element: T,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    weight: usize,
}

/// Which side of its parent a node hangs on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl<T> Node<T> {
    /// Creates a detached leaf.
    pub(crate) fn leaf(element: T, parent: Option<Handle>) -> Self {
        Self {
            element,
            parent,
            left: None,
            right: None,
            weight: 1,
        }
    }

    #[inline]
    pub(crate) fn element(&self) -> &T {
        &self.element
    }

    #[inline]
    pub(crate) fn element_mut(&mut self) -> &mut T {
        &mut self.element
    }

    pub(crate) fn into_element(self) -> T {
        self.element
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side `child` hangs on, or `None` if it is not a child of this node.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Returns true if this node has no children.
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns true if both children are present.
    pub(crate) fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    #[inline]
    pub(crate) fn weight(&self) -> usize {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: usize) {
        self.weight = weight;
    }

    pub(crate) fn increment_weight(&mut self) {
        self.weight += 1;
    }

    pub(crate) fn decrement_weight(&mut self) {
        assert!(self.weight > 1, "`Node::decrement_weight()` - weight would drop below one!");
        self.weight -= 1;
    }
}

use std::fmt;
use crate::interval::Interval;
#[cfg(feature="serde")]
use serde::{Serialize, Deserialize};

/// Colour tag of a red-black node.
#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Color {
    Red,
    Black,
}

#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node<K> {
    pub interval: Interval<K>,
    pub max: K, // Max high end-point in this subtree.
    pub color: Color,
    pub left: Option<Box<Node<K>>>,
    pub right: Option<Box<Node<K>>>,
}

impl<K> fmt::Display for Node<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let color = match self.color {
            Color::Red => 'R',
            Color::Black => 'B',
        };

        write!(f, " {{ {} {} ({})", color, self.interval, self.max)?;
        if let Some(left) = &self.left {
            write!(f, " left:{}", left)?;
        }
        if let Some(right) = &self.right {
            write!(f, " right:{}", right)?;
        }
        write!(f, " }} ")
    }
}

impl<K> Node<K> {
    /// New nodes are always red; the insertion fixup decides whether they stay that way.
    pub fn new(interval: Interval<K>) -> Node<K>
    where
        K: Clone,
    {
        let max = interval.high.clone();

        Node {
            interval,
            max,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    ///returns the smallest interval within this subtree
    pub fn min_interval(&self) -> &Interval<K> {
        self.left.as_ref().map_or(&self.interval, |n| n.min_interval())
    }

    ///returns the largest interval within this subtree
    pub fn max_interval(&self) -> &Interval<K> {
        self.right.as_ref().map_or(&self.interval, |n| n.max_interval())
    }
}

impl<K: Ord + Clone> Node<K> {
    /// Recomputes the cached `max` from the node's own interval and its children.
    /// Both children must already carry a correct `max`.
    pub fn update_max(&mut self) {
        self.max.clone_from(&self.interval.high);
        if let Some(ref left) = self.left {
            if left.max > self.max {
                self.max.clone_from(&left.max);
            }
        }
        if let Some(ref right) = self.right {
            if right.max > self.max {
                self.max.clone_from(&right.max);
            }
        }
    }

    /// Perform a single left rotation on this (sub) tree, returning the new local root.
    ///
    /// ```text
    ///     z                y
    ///    / \              / \
    ///   a   y     =>     z   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    ///
    /// Panics if there is no right child.
    pub fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self
            .right
            .take()
            .expect("invariant violation: left rotation without a right child");
        log::trace!("rotate left");
        #[cfg(debug_assertions)]
        let subtree_max = self.max.clone();
        self.right = new_root.left.take();
        self.update_max();
        new_root.left = Some(self);
        new_root.update_max();
        #[cfg(debug_assertions)]
        assert!(new_root.max == subtree_max, "rotation changed the subtree maximum");
        new_root
    }

    /// Perform a single right rotation on this (sub) tree, returning the new local root.
    ///
    /// Panics if there is no left child.
    pub fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self
            .left
            .take()
            .expect("invariant violation: right rotation without a left child");
        log::trace!("rotate right");
        #[cfg(debug_assertions)]
        let subtree_max = self.max.clone();
        self.left = new_root.right.take();
        self.update_max();
        new_root.right = Some(self);
        new_root.update_max();
        #[cfg(debug_assertions)]
        assert!(new_root.max == subtree_max, "rotation changed the subtree maximum");
        new_root
    }
}

/// Missing children count as black.
pub(crate) fn is_red<K>(node: &Option<Box<Node<K>>>) -> bool {
    node.as_ref().map_or(false, |n| n.is_red())
}

pub(crate) fn height<K>(node: &Option<Box<Node<K>>>) -> usize {
    node.as_ref()
        .map_or(0, |n| 1 + std::cmp::max(height(&n.left), height(&n.right)))
}

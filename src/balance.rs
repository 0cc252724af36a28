//! Red-black insertion and deletion.
//!
//! Both operations are recursive. Fixups run while the recursion unwinds, so every
//! node only ever looks at its own children and grandchildren and no parent links are
//! needed. Every ancestor of the touched position also refreshes its `max` on the way
//! back up.
use std::cmp::Ordering;
use crate::interval::Interval;
use crate::node::{is_red, Color, Node};

/// Outcome of removing an interval from a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Removal {
    NotFound,
    /// A node was unlinked. `shrunk` is set when the subtree's black-height dropped
    /// by one and the caller has to repair it.
    Removed { shrunk: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl<K: Ord + Clone> Node<K> {
    /// Inserts `interval` below this node and returns the (possibly rotated) subtree.
    /// Equal keys go to the right, so duplicates are kept as distinct nodes.
    pub fn insert(mut self: Box<Self>, interval: Interval<K>) -> Box<Self> {
        if interval < self.interval {
            self.left = Node::insert_in_successor(self.left.take(), interval);
        } else {
            self.right = Node::insert_in_successor(self.right.take(), interval);
        }
        self.update_max();
        self.insert_fixup()
    }

    fn insert_in_successor(succ: Option<Box<Self>>, interval: Interval<K>) -> Option<Box<Self>> {
        Some(match succ {
            Some(succ) => succ.insert(interval),
            None => Box::new(Node::new(interval)),
        })
    }

    /// Repairs a red child with a red grandchild below this (black) node.
    fn insert_fixup(mut self: Box<Self>) -> Box<Self> {
        let left_violation = matches!(&self.left,
            Some(p) if p.is_red() && (is_red(&p.left) || is_red(&p.right)));
        let right_violation = matches!(&self.right,
            Some(p) if p.is_red() && (is_red(&p.left) || is_red(&p.right)));

        if !left_violation && !right_violation {
            return self;
        }

        // The violation moves up to this node, which the caller's fixup will see.
        if is_red(&self.left) && is_red(&self.right) {
            log::trace!("insert fixup: red uncle, recolor");
            self.flip_colors();
            return self;
        }

        self.color = Color::Red;
        if left_violation {
            if let Some(parent) = self.left.take() {
                self.left = Some(if is_red(&parent.right) {
                    log::trace!("insert fixup: left zig-zag");
                    parent.rotate_left()
                } else {
                    parent
                });
            }
            let mut top = self.rotate_right();
            top.color = Color::Black;
            top
        } else {
            if let Some(parent) = self.right.take() {
                self.right = Some(if is_red(&parent.left) {
                    log::trace!("insert fixup: right zig-zag");
                    parent.rotate_right()
                } else {
                    parent
                });
            }
            let mut top = self.rotate_left();
            top.color = Color::Black;
            top
        }
    }

    fn flip_colors(&mut self) {
        self.color = Color::Red;
        for child in [&mut self.left, &mut self.right].into_iter().flatten() {
            child.color = Color::Black;
        }
    }

    /// Removes one node holding exactly `interval` (compared by `(low, high)`, not by
    /// overlap) from this subtree. Returns the remaining subtree, which is `None` if it
    /// became empty.
    pub fn delete(mut self: Box<Self>, interval: &Interval<K>) -> (Option<Box<Self>>, Removal) {
        match interval.cmp(&self.interval) {
            Ordering::Equal => {
                let (node, shrunk) = self.delete_root();
                (node, Removal::Removed { shrunk })
            }
            Ordering::Less => match self.left.take() {
                Some(succ) => {
                    let (left, removal) = succ.delete(interval);
                    self.left = left;
                    self.after_removal(removal, Side::Left)
                }
                None => (Some(self), Removal::NotFound),
            },
            Ordering::Greater => match self.right.take() {
                Some(succ) => {
                    let (right, removal) = succ.delete(interval);
                    self.right = right;
                    self.after_removal(removal, Side::Right)
                }
                None => (Some(self), Removal::NotFound),
            },
        }
    }

    fn after_removal(mut self: Box<Self>, removal: Removal, side: Side) -> (Option<Box<Self>>, Removal) {
        match removal {
            Removal::NotFound => (Some(self), removal),
            Removal::Removed { shrunk } => {
                self.update_max();
                let (node, shrunk) = if shrunk {
                    self.fix_deficit(side)
                } else {
                    (self, false)
                };
                (Some(node), Removal::Removed { shrunk })
            }
        }
    }

    // Unlink this node. With two children, the in-order successor's interval takes its
    // place and the successor's node is the one that goes away.
    fn delete_root(mut self: Box<Self>) -> (Option<Box<Self>>, bool) {
        match (self.left.take(), self.right.take()) {
            (Some(left), Some(right)) => {
                let (right, successor, shrunk) = right.drop_min();
                self.interval = successor;
                self.left = Some(left);
                self.right = right;
                self.update_max();
                let (node, shrunk) = if shrunk {
                    self.fix_deficit(Side::Right)
                } else {
                    (self, false)
                };
                (Some(node), shrunk)
            }
            (child, None) | (None, child) => Node::splice(self.color, child),
        }
    }

    /// Detaches the minimal node of this subtree and returns the remaining subtree,
    /// the minimal interval and whether the black-height dropped.
    fn drop_min(mut self: Box<Self>) -> (Option<Box<Self>>, Interval<K>, bool) {
        match self.left.take() {
            Some(left) => {
                let (left, min, shrunk) = left.drop_min();
                self.left = left;
                self.update_max();
                let (node, shrunk) = if shrunk {
                    self.fix_deficit(Side::Left)
                } else {
                    (self, false)
                };
                (Some(node), min, shrunk)
            }
            None => {
                let right = self.right.take();
                let (node, shrunk) = Node::splice(self.color, right);
                (node, self.interval, shrunk)
            }
        }
    }

    /// Replaces a node of colour `color` with its only child (or nothing).
    ///
    /// A red node is simply dropped. A black node with a (necessarily red) child is
    /// replaced by that child painted black. Only a black leaf leaves a deficit.
    fn splice(color: Color, child: Option<Box<Self>>) -> (Option<Box<Self>>, bool) {
        match child {
            Some(mut child) => {
                child.color = Color::Black;
                (Some(child), false)
            }
            None => (None, color == Color::Black),
        }
    }

    fn fix_deficit(self: Box<Self>, side: Side) -> (Box<Self>, bool) {
        match side {
            Side::Left => self.fix_left_deficit(),
            Side::Right => self.fix_right_deficit(),
        }
    }

    /// The left subtree is one black node short compared to the right one. Returns
    /// the repaired subtree and whether the deficit still has to be pushed upward.
    fn fix_left_deficit(mut self: Box<Self>) -> (Box<Self>, bool) {
        if is_red(&self.right) {
            log::trace!("delete fixup: red sibling on the right");
            self.color = Color::Red;
            let mut top = self.rotate_left();
            top.color = Color::Black;
            if let Some(parent) = top.left.take() {
                // The parent is red now, so this always terminates here.
                let (parent, _) = parent.fix_left_deficit();
                top.left = Some(parent);
            }
            top.update_max();
            return (top, false);
        }

        let mut sibling = self
            .right
            .take()
            .expect("invariant violation: black-height deficit without a sibling");

        if !is_red(&sibling.left) && !is_red(&sibling.right) {
            log::trace!("delete fixup: black sibling with black children");
            sibling.color = Color::Red;
            self.right = Some(sibling);
            let shrunk = !self.is_red();
            self.color = Color::Black;
            return (self, shrunk);
        }

        if !is_red(&sibling.right) {
            log::trace!("delete fixup: near nephew red");
            sibling.color = Color::Red;
            sibling = sibling.rotate_right();
            sibling.color = Color::Black;
        }

        log::trace!("delete fixup: far nephew red");
        let color = self.color;
        self.color = Color::Black;
        self.right = Some(sibling);
        let mut top = self.rotate_left();
        top.color = color;
        if let Some(far) = top.right.as_mut() {
            far.color = Color::Black;
        }
        (top, false)
    }

    /// Mirror image of [`Node::fix_left_deficit`].
    fn fix_right_deficit(mut self: Box<Self>) -> (Box<Self>, bool) {
        if is_red(&self.left) {
            log::trace!("delete fixup: red sibling on the left");
            self.color = Color::Red;
            let mut top = self.rotate_right();
            top.color = Color::Black;
            if let Some(parent) = top.right.take() {
                let (parent, _) = parent.fix_right_deficit();
                top.right = Some(parent);
            }
            top.update_max();
            return (top, false);
        }

        let mut sibling = self
            .left
            .take()
            .expect("invariant violation: black-height deficit without a sibling");

        if !is_red(&sibling.left) && !is_red(&sibling.right) {
            log::trace!("delete fixup: black sibling with black children");
            sibling.color = Color::Red;
            self.left = Some(sibling);
            let shrunk = !self.is_red();
            self.color = Color::Black;
            return (self, shrunk);
        }

        if !is_red(&sibling.left) {
            log::trace!("delete fixup: near nephew red");
            sibling.color = Color::Red;
            sibling = sibling.rotate_left();
            sibling.color = Color::Black;
        }

        log::trace!("delete fixup: far nephew red");
        let color = self.color;
        self.color = Color::Black;
        self.left = Some(sibling);
        let mut top = self.rotate_right();
        top.color = color;
        if let Some(far) = top.left.as_mut() {
            far.color = Color::Black;
        }
        (top, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Node = super::Node<u64>;

    // Returns the black-height, panicking on any red-black or augmentation breach.
    fn check(node: &Option<Box<Node>>) -> usize {
        let n = match node {
            Some(n) => n,
            None => return 0,
        };
        if n.is_red() {
            assert!(!is_red(&n.left) && !is_red(&n.right), "red node with red child");
        }
        if let Some(l) = &n.left {
            assert!(l.interval <= n.interval);
        }
        if let Some(r) = &n.right {
            assert!(r.interval >= n.interval);
        }
        let mut max = n.interval.high;
        for child in [&n.left, &n.right].into_iter().flatten() {
            max = std::cmp::max(max, child.max);
        }
        assert_eq!(n.max, max, "stale max at {}", n.interval);
        let lh = check(&n.left);
        let rh = check(&n.right);
        assert_eq!(lh, rh, "unbalanced black heights at {}", n.interval);
        lh + if n.is_red() { 0 } else { 1 }
    }

    fn insert(root: Option<Box<Node>>, low: u64, high: u64) -> Option<Box<Node>> {
        let mut root = match root {
            Some(root) => root.insert(Interval::new(low, high)),
            None => Box::new(Node::new(Interval::new(low, high))),
        };
        root.color = Color::Black;
        Some(root)
    }

    fn delete(root: Option<Box<Node>>, low: u64, high: u64) -> (Option<Box<Node>>, Removal) {
        match root {
            Some(root) => {
                let (mut root, removal) = root.delete(&Interval::new(low, high));
                if let Some(root) = root.as_mut() {
                    root.color = Color::Black;
                }
                (root, removal)
            }
            None => (None, Removal::NotFound),
        }
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut root = None;
        for i in 0..255 {
            root = insert(root, i, i + 3);
            check(&root);
        }
        // 255 nodes fit in a red-black tree of height at most 2 * log2(256).
        assert!(crate::node::height(&root) <= 16);
        assert_eq!(root.as_ref().unwrap().max, 254 + 3);
    }

    #[test]
    fn red_uncle_recolors_without_rotation() {
        let mut root = insert(None, 10, 10);
        root = insert(root, 5, 5);
        root = insert(root, 15, 15);
        root = insert(root, 1, 1);
        let root = root.unwrap();
        assert_eq!(root.interval, Interval::new(10, 10));
        assert!(!root.left.as_ref().unwrap().is_red());
        assert!(!root.right.as_ref().unwrap().is_red());
        assert!(root.left.as_ref().unwrap().left.as_ref().unwrap().is_red());
    }

    #[test]
    fn zig_zag_is_straightened() {
        let mut root = insert(None, 10, 10);
        root = insert(root, 5, 50);
        root = insert(root, 7, 7);
        check(&root);
        let root = root.unwrap();
        assert_eq!(root.interval, Interval::new(7, 7));
        assert_eq!(root.max, 50);
        assert_eq!(root.left.as_ref().unwrap().interval, Interval::new(5, 50));
        assert_eq!(root.right.as_ref().unwrap().interval, Interval::new(10, 10));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut root = None;
        for _ in 0..5 {
            root = insert(root, 4, 8);
        }
        check(&root);
        for remaining in (0..5).rev() {
            let (next, removal) = delete(root, 4, 8);
            assert!(matches!(removal, Removal::Removed { .. }));
            root = next;
            check(&root);
            let mut count = 0;
            let mut stack: Vec<&Node> = root.iter().map(|n| &**n).collect();
            while let Some(n) = stack.pop() {
                count += 1;
                stack.extend(n.left.as_deref());
                stack.extend(n.right.as_deref());
            }
            assert_eq!(count, remaining);
        }
        assert!(root.is_none());
    }

    #[test]
    fn missing_interval_leaves_tree_untouched() {
        let mut root = None;
        for i in 0..20 {
            root = insert(root, i, i * 2);
        }
        let before = root.clone();
        let (root, removal) = delete(root, 3, 7);
        assert_eq!(removal, Removal::NotFound);
        assert_eq!(root, before);
    }

    #[test]
    fn delete_refreshes_max_up_to_the_root() {
        let mut root = None;
        for i in 0..30 {
            root = insert(root, i, i + 1);
        }
        root = insert(root, 13, 1000);
        assert_eq!(root.as_ref().unwrap().max, 1000);
        let (root, _) = delete(root, 13, 1000);
        check(&root);
        assert_eq!(root.as_ref().unwrap().max, 30);
    }

    #[test]
    fn delete_every_position() {
        for victim in 0..64 {
            let mut root = None;
            for i in 0..64 {
                root = insert(root, i, 64 - i);
            }
            let (root, removal) = delete(root, victim, 64 - victim);
            assert!(matches!(removal, Removal::Removed { .. }), "lost {}", victim);
            check(&root);
        }
    }

    #[test]
    fn drain_in_mixed_order() {
        let keys: Vec<u64> = (0..200).map(|i| (i * 37) % 200).collect();
        let mut root = None;
        for &k in &keys {
            root = insert(root, k, k + (k % 7));
        }
        for &k in keys.iter().rev().step_by(2).chain(keys.iter().step_by(2)) {
            let (next, removal) = delete(root, k, k + (k % 7));
            assert!(matches!(removal, Removal::Removed { .. }), "lost {}", k);
            root = next;
            check(&root);
        }
        assert!(root.is_none());
    }
}

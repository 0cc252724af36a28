use std::iter::FusedIterator;
use crate::interval::Interval;
use crate::node::Node;

impl<K: Ord> Node<K> {
    /// Appends every interval of this subtree overlapping `query` to `out`, in
    /// ascending order.
    pub fn search_all<'a>(&'a self, query: &Interval<K>, out: &mut Vec<&'a Interval<K>>) {
        // Nothing below reaches as far as the query's start.
        if query.low > self.max {
            return;
        }
        if let Some(ref left) = self.left {
            left.search_all(query, out);
        }
        if self.interval.overlaps(query) {
            out.push(&self.interval);
        }
        // Everything on the right starts at or after this node.
        if self.interval.low <= query.high {
            if let Some(ref right) = self.right {
                right.search_all(query, out);
            }
        }
    }
}

/// Walks down from `node` looking for any interval overlapping `query`.
///
/// If the left subtree reaches `query.low` but holds no overlap, then no interval on
/// the right can overlap either: they all start no earlier than the left one that
/// reaches `query.low`, which already starts after `query.high`.
pub(crate) fn search_any<'a, K: Ord>(
    mut node: Option<&'a Node<K>>,
    query: &Interval<K>,
) -> Option<&'a Interval<K>> {
    while let Some(n) = node {
        if n.max < query.low {
            return None;
        }
        if n.interval.overlaps(query) {
            return Some(&n.interval);
        }
        node = match n.left.as_deref() {
            Some(left) if left.max >= query.low => Some(left),
            _ => n.right.as_deref(),
        };
    }
    None
}

/// In-order iterator over the intervals of an [`IntervalTree`](crate::IntervalTree),
/// sorted by `(low, high)`.
#[derive(Clone, Debug)]
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: Option<&'a Node<K>>, len: usize) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a Interval<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.interval)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

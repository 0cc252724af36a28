use std::fmt;
use crate::balance::Removal;
use crate::error::IntervalTreeError;
use crate::interval::Interval;
use crate::node::{height, is_red, Color, Node};
use crate::query::{self, Iter};
#[cfg(feature="serde")]
use serde::{Serialize, Deserialize};

/// An interval tree: a red-black tree of closed intervals ordered by `(low, high)`,
/// where every node caches the largest `high` of its subtree.
///
/// The same interval can be stored several times.
///
/// With the `serde` feature, deserialization runs [`IntervalTree::validate`] and rejects
/// any tree breaking an invariant.
#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature="serde", serde(
    try_from = "RawIntervalTree<K>",
    bound(deserialize = "K: Deserialize<'de> + Ord + Clone")
))]
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalTree<K> {
    root: Option<Box<Node<K>>>,
    size: usize,
}

// Same layout as `IntervalTree`, accepted as-is from the wire and only turned into a
// tree once it passes validation.
#[cfg(feature="serde")]
#[derive(Deserialize)]
struct RawIntervalTree<K> {
    root: Option<Box<Node<K>>>,
    size: usize,
}

#[cfg(feature="serde")]
impl<K: Ord + Clone> TryFrom<RawIntervalTree<K>> for IntervalTree<K> {
    type Error = IntervalTreeError;

    fn try_from(raw: RawIntervalTree<K>) -> Result<Self, Self::Error> {
        let tree = IntervalTree {
            root: raw.root,
            size: raw.size,
        };
        tree.validate()?;
        Ok(tree)
    }
}

impl<K> Default for IntervalTree<K> {
    fn default() -> Self {
        IntervalTree {
            root: None,
            size: 0,
        }
    }
}

impl<K> fmt::Display for IntervalTree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root {
            Some(ref root) => write!(f, "{}", root),
            None => write!(f, "Empty tree"),
        }
    }
}

impl<K> IntervalTree<K> {
    /// Constructs a new empty tree.
    /// # Examples
    /// ```
    /// let tree = rb_interval_tree::IntervalTree::<u64>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the tree holds no interval.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of stored intervals, counting duplicates.
    /// # Examples
    /// ```
    /// use rb_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 2)).unwrap();
    /// tree.insert(Interval::new(1, 2)).unwrap();
    /// assert_eq!(tree.size(), 2);
    /// ```
    pub fn size(&self) -> usize {
        self.size
    }

    /// Same as [`IntervalTree::size`].
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns the number of nodes on the longest path from the root. An empty tree has
    /// height 0, one with a single interval has height 1, etc.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Removes every interval.
    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
    }

    /// Returns an iterator over all stored intervals, sorted by `(low, high)`.
    /// # Examples
    /// ```
    /// use rb_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// for (low, high) in [(5, 6), (1, 9), (3, 4)] {
    ///     tree.insert(Interval::new(low, high)).unwrap();
    /// }
    /// let lows: Vec<_> = tree.iter().map(|i| i.low).collect();
    /// assert_eq!(lows, vec![1, 3, 5]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root.as_deref(), self.size)
    }

    /// Returns the smallest interval in tree order, or `None` if the tree is empty.
    pub fn min(&self) -> Option<&Interval<K>> {
        self.root.as_ref().map(|n| n.min_interval())
    }

    /// Returns the largest interval in tree order, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&Interval<K>> {
        self.root.as_ref().map(|n| n.max_interval())
    }

    /// Returns the largest `high` end-point stored anywhere in the tree.
    pub fn max_high(&self) -> Option<&K> {
        self.root.as_ref().map(|n| &n.max)
    }
}

impl<K: Ord + Clone> IntervalTree<K> {
    /// Inserts `interval`. Intervals already present are kept, so inserting the same
    /// interval twice stores it twice.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalTreeError::InvalidInterval`] if `interval.low > interval.high`;
    /// the tree is left untouched.
    ///
    /// # Examples
    /// ```
    /// use rb_interval_tree::{Interval, IntervalTree, IntervalTreeError};
    ///
    /// let mut tree = IntervalTree::new();
    /// assert_eq!(tree.insert(Interval::new(2, 8)), Ok(()));
    /// assert_eq!(tree.insert(Interval::new(8, 2)), Err(IntervalTreeError::InvalidInterval));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, interval: Interval<K>) -> Result<(), IntervalTreeError> {
        if !interval.is_valid() {
            log::debug!("rejecting interval with low > high");
            return Err(IntervalTreeError::InvalidInterval);
        }

        let mut root = match self.root.take() {
            Some(root) => root.insert(interval),
            None => Box::new(Node::new(interval)),
        };
        root.color = Color::Black;
        self.root = Some(root);
        self.size += 1;

        self.audit();
        Ok(())
    }

    /// Removes one interval equal to `interval` (same `low` and same `high`; overlap is
    /// not enough). Returns true iff such an interval was stored.
    ///
    /// # Examples
    /// ```
    /// use rb_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(2, 8)).unwrap();
    /// assert!(!tree.delete(&Interval::new(2, 7)));
    /// assert!(tree.delete(&Interval::new(2, 8)));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, interval: &Interval<K>) -> bool {
        let root = match self.root.take() {
            Some(root) => root,
            None => return false,
        };

        let (root, removal) = root.delete(interval);
        self.root = root;
        match removal {
            Removal::NotFound => {
                log::debug!("delete: no matching interval stored");
                false
            }
            Removal::Removed { .. } => {
                if let Some(root) = self.root.as_mut() {
                    root.color = Color::Black;
                }
                self.size -= 1;
                self.audit();
                true
            }
        }
    }

    /// Returns true if an interval equal to `interval` is stored.
    pub fn contains(&self, interval: &Interval<K>) -> bool {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match interval.cmp(&n.interval) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => n.left.as_deref(),
                std::cmp::Ordering::Greater => n.right.as_deref(),
            };
        }
        false
    }

    /// Returns some stored interval overlapping `query`, or `None` if there is none.
    /// Which one is returned is unspecified.
    ///
    /// # Examples
    /// ```
    /// use rb_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 5)).unwrap();
    /// assert_eq!(tree.search_any(&Interval::new(5, 9)), Some(&Interval::new(1, 5)));
    /// assert_eq!(tree.search_any(&Interval::new(6, 9)), None);
    /// ```
    pub fn search_any(&self, query: &Interval<K>) -> Option<&Interval<K>> {
        query::search_any(self.root.as_deref(), query)
    }

    /// Returns every stored interval overlapping `query`. Callers should not rely on the
    /// order of the result.
    ///
    /// # Examples
    /// ```
    /// use rb_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// for (low, high) in [(1, 3), (2, 6), (7, 9)] {
    ///     tree.insert(Interval::new(low, high)).unwrap();
    /// }
    /// let mut hits = tree.search_all(&Interval::new(3, 4));
    /// hits.sort();
    /// assert_eq!(hits, vec![&Interval::new(1, 3), &Interval::new(2, 6)]);
    /// ```
    pub fn search_all(&self, query: &Interval<K>) -> Vec<&Interval<K>> {
        let mut overlaps = Vec::new();
        if let Some(ref root) = self.root {
            root.search_all(query, &mut overlaps);
        }
        overlaps
    }

    /// Returns true if any stored interval overlaps `query`.
    pub fn overlaps_any(&self, query: &Interval<K>) -> bool {
        self.search_any(query).is_some()
    }

    /// Stabbing query: returns every stored interval containing `point`.
    pub fn search_point(&self, point: &K) -> Vec<&Interval<K>> {
        self.search_all(&Interval::point(point.clone()))
    }

    /// Returns true if `point` lies within at least one stored interval.
    ///
    /// # Examples
    /// ```
    /// use rb_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(10, 20)).unwrap();
    /// assert!(tree.contains_point(&20));
    /// assert!(!tree.contains_point(&21));
    /// ```
    pub fn contains_point(&self, point: &K) -> bool {
        self.search_any(&Interval::point(point.clone())).is_some()
    }

    /// Checks every structural invariant of the tree and returns its black-height:
    /// * intervals are in `(low, high)` order and each has `low <= high`,
    /// * every node's `max` is the largest `high` of its subtree,
    /// * the root is black, no red node has a red child, and every path from the
    ///   root to a leaf crosses the same number of black nodes,
    /// * the element count matches the number of nodes.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalTreeError::InvariantViolation`] describing the first breach found.
    pub fn validate(&self) -> Result<usize, IntervalTreeError> {
        if is_red(&self.root) {
            return Err(IntervalTreeError::InvariantViolation("red root".to_string()));
        }

        let mut count = 0;
        let mut previous: Option<&Interval<K>> = None;
        for interval in self.iter() {
            if !interval.is_valid() {
                return Err(IntervalTreeError::InvariantViolation(format!(
                    "interval #{} has low > high",
                    count
                )));
            }
            if previous.map_or(false, |p| p > interval) {
                return Err(IntervalTreeError::InvariantViolation(format!(
                    "interval #{} is out of order",
                    count
                )));
            }
            previous = Some(interval);
            count += 1;
        }
        if count != self.size {
            return Err(IntervalTreeError::InvariantViolation(format!(
                "size is {} but {} intervals are stored",
                self.size, count
            )));
        }

        validate_node(&self.root)
    }

    #[cfg(feature = "check-invariants")]
    fn audit(&self) {
        if let Err(e) = self.validate() {
            panic!("{}", e);
        }
    }

    #[cfg(not(feature = "check-invariants"))]
    fn audit(&self) {
        debug_assert!(!is_red(&self.root), "red root");
    }
}

// Returns the black-height of the subtree.
fn validate_node<K: Ord>(node: &Option<Box<Node<K>>>) -> Result<usize, IntervalTreeError> {
    let n = match node {
        Some(n) => n,
        None => return Ok(0),
    };

    if n.is_red() && (is_red(&n.left) || is_red(&n.right)) {
        return Err(IntervalTreeError::InvariantViolation(
            "red node with a red child".to_string(),
        ));
    }

    let mut expected = &n.interval.high;
    for child in [&n.left, &n.right].into_iter().flatten() {
        if child.max > *expected {
            expected = &child.max;
        }
    }
    if n.max != *expected {
        return Err(IntervalTreeError::InvariantViolation(
            "cached max differs from the subtree's largest high end-point".to_string(),
        ));
    }

    let left = validate_node(&n.left)?;
    let right = validate_node(&n.right)?;
    if left != right {
        return Err(IntervalTreeError::InvariantViolation(format!(
            "unbalanced black heights: left {} and right {}",
            left, right
        )));
    }
    Ok(left + if n.is_red() { 0 } else { 1 })
}

impl<'a, K> IntoIterator for &'a IntervalTree<K> {
    type Item = &'a Interval<K>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate rand;
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    type IntervalTree = super::IntervalTree<u64>;

    fn random_interval<R: Rng>(rng: &mut R) -> Interval<u64> {
        let low = rng.gen_range(0..100);
        let len = rng.gen_range(0..30);
        Interval::new(low, low + len)
    }

    #[test]
    fn test_fuzz() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut t = IntervalTree::new();
        let mut expected = 0;
        for _ in 1..5000 {
            let interval = random_interval(&mut rng);
            if rng.gen::<bool>() {
                t.insert(interval).unwrap();
                expected += 1;
                assert!(t.contains(&interval));
            } else if t.delete(&interval) {
                expected -= 1;
            } else {
                assert!(!t.contains(&interval));
            }
            assert_eq!(t.size(), expected);
            assert!(t.validate().is_ok(), "{:?}", t.validate());
        }
    }

    #[test]
    fn validate_reports_corruption() {
        let mut t = IntervalTree::new();
        for i in 0..10 {
            t.insert(Interval::new(i, i + 1)).unwrap();
        }
        assert!(t.validate().is_ok());

        let mut stale = t.clone();
        stale.root.as_mut().unwrap().max = 0;
        assert!(matches!(stale.validate(), Err(IntervalTreeError::InvariantViolation(_))));

        let mut red_root = t.clone();
        red_root.root.as_mut().unwrap().color = Color::Red;
        assert_eq!(
            red_root.validate(),
            Err(IntervalTreeError::InvariantViolation("red root".to_string()))
        );

        let mut miscounted = t.clone();
        miscounted.size += 1;
        assert!(miscounted.validate().is_err());
    }

    #[cfg(feature = "check-invariants")]
    #[test]
    #[should_panic(expected = "size is")]
    fn audit_panics_on_broken_tree() {
        let mut t = IntervalTree::new();
        for i in 0..4 {
            t.insert(Interval::new(i, i + 2)).unwrap();
        }
        t.size += 1;
        t.insert(Interval::new(9, 9)).unwrap();
    }

    #[test]
    fn display() {
        let mut t = IntervalTree::new();
        assert_eq!(t.to_string(), "Empty tree");
        t.insert(Interval::new(1, 2)).unwrap();
        assert_eq!(t.to_string(), " { B [1, 2] (2) } ");
    }

    #[test]
    fn min_max_and_clear() {
        let mut t = IntervalTree::new();
        assert_eq!(t.min(), None);
        assert_eq!(t.max_high(), None);
        for (low, high) in [(5, 6), (1, 50), (9, 9), (1, 2)] {
            t.insert(Interval::new(low, high)).unwrap();
        }
        assert_eq!(t.min(), Some(&Interval::new(1, 2)));
        assert_eq!(t.max(), Some(&Interval::new(9, 9)));
        assert_eq!(t.max_high(), Some(&50));
        assert!(t.height() >= 2);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert_eq!(t.height(), 0);
    }
}

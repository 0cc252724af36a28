use std::fmt;
use std::ops::RangeInclusive;
#[cfg(feature="serde")]
use serde::{Serialize, Deserialize};

/// A closed interval `[low, high]`.
///
/// The fields are public, so nothing stops a caller from building an interval with
/// `low > high`; the tree rejects those on insertion.
///
/// Intervals are ordered lexicographically on `(low, high)`, which is the order the
/// tree stores them in.
#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<K> {
    /// The lower end-point (inclusive).
    pub low: K,
    /// The upper end-point (inclusive).
    pub high: K,
}

impl<K> Interval<K> {
    /// Shorthand to construct a new `Interval`.
    ///
    /// ```
    /// let i = rb_interval_tree::Interval::new(2, 7);
    /// assert_eq!((i.low, i.high), (2, 7));
    /// ```
    pub fn new(low: K, high: K) -> Self {
        Interval { low, high }
    }
}

impl<K: Clone> Interval<K> {
    /// The zero-width interval `[p, p]`, used for stabbing queries.
    pub fn point(p: K) -> Self {
        Interval {
            low: p.clone(),
            high: p,
        }
    }
}

impl<K: Ord> Interval<K> {
    /// Returns true iff `low <= high`.
    pub fn is_valid(&self) -> bool {
        self.low <= self.high
    }

    /// Returns true iff both intervals share at least one point. End-points are
    /// inclusive, so touching intervals overlap.
    ///
    /// ```
    /// use rb_interval_tree::Interval;
    ///
    /// assert!(Interval::new(1, 5).overlaps(&Interval::new(5, 9)));
    /// assert!(!Interval::new(1, 4).overlaps(&Interval::new(5, 9)));
    /// ```
    pub fn overlaps(&self, other: &Interval<K>) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    /// Returns true iff `p` lies within the interval.
    pub fn contains_point(&self, p: &K) -> bool {
        self.low <= *p && *p <= self.high
    }
}

impl<K> From<(K, K)> for Interval<K> {
    fn from((low, high): (K, K)) -> Self {
        Interval { low, high }
    }
}

impl<K> From<RangeInclusive<K>> for Interval<K> {
    fn from(range: RangeInclusive<K>) -> Self {
        let (low, high) = range.into_inner();
        Interval { low, high }
    }
}

impl<K> fmt::Display for Interval<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

//! Implementation of a self-balancing interval tree ([`interval_tree::IntervalTree`]) over
//! closed intervals. It is based on the data structure described in Cormen et al.
//! (2009, Section 14.3: Interval trees, pp. 348–354): a red-black tree keyed on the
//! low end-point of each interval, where every node also caches the largest high
//! end-point found in its subtree. That cached value lets overlap queries discard
//! whole subtrees, giving `O(log n)` for "is anything overlapping?" and
//! `O(log n + k)` for "list everything overlapping".
//!
//! The tree is a multiset: the same interval may be inserted several times. Intervals
//! are closed, so `[1, 5]` and `[5, 9]` overlap.
//!
//! ```
//! use rb_interval_tree::{Interval, IntervalTree};
//!
//! let mut tree = IntervalTree::new();
//! tree.insert(Interval::new(15, 20)).unwrap();
//! tree.insert(Interval::new(30, 40)).unwrap();
//!
//! assert_eq!(tree.search_all(&Interval::new(18, 25)), vec![&Interval::new(15, 20)]);
//! assert!(tree.search_any(&Interval::new(21, 29)).is_none());
//! ```
//!
//! Note that any type satisfying the [`Ord`] and [`Clone`] traits can be stored in this tree.
#![forbid(unsafe_code)]

mod balance;
mod error;
mod interval;
/// A red-black interval tree.
pub mod interval_tree;
mod node;
mod query;

pub use error::IntervalTreeError;
pub use interval::Interval;
pub use interval_tree::IntervalTree;
pub use query::Iter;

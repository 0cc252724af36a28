use thiserror::Error;

/// Errors that can occur when working with an [`IntervalTree`](crate::IntervalTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalTreeError {
    /// An interval whose low end-point is greater than its high end-point was
    /// offered for insertion.
    #[error("invalid interval: low end-point is greater than high end-point")]
    InvalidInterval,
    /// A structural invariant (ordering, augmentation, colouring or size) does not
    /// hold. Only reported by [`IntervalTree::validate`](crate::IntervalTree::validate).
    #[error("interval tree invariant violated: {0}")]
    InvariantViolation(String),
}

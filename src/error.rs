//! Errors returned by `IntervalSet` operations.

use thiserror::Error;

/// A specialized `Result` type for interval set operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mutating or querying an `IntervalSet`.
///
/// Every error is raised before the set is touched, so a failed call leaves it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The lower bound is greater than the upper bound.
    #[error("from must be smaller or equal than to")]
    InvalidRange,
    /// The new bounds of a re-keyed interval would overlap another stored interval.
    #[error("interval would overlap another stored interval")]
    Overlap,
}

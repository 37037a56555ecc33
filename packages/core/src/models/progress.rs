//! Progress Counts
//!
//! Completion progress as a `done/total` pair. Layout blocks aggregate
//! child progress with [`Progress::add_counts`], an additive combinator
//! where `None` is the identity, so the fold result is independent of
//! child order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation errors for Progress values
#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("invalid progress counts: {done}/{total}")]
    InvalidCounts { done: u32, total: u32 },
}

/// Completion counts for one node: `done` out of `total`.
///
/// Invariant: `done <= total` and `total >= 1`.
///
/// # Examples
///
/// ```rust
/// use courseblock_core::models::Progress;
///
/// let a = Progress::new(1, 2).unwrap();
/// let b = Progress::new(3, 4).unwrap();
///
/// let sum = Progress::add_counts(Some(a), Some(b)).unwrap();
/// assert_eq!((sum.done(), sum.total()), (4, 6));
///
/// // None is the identity
/// assert_eq!(Progress::add_counts(Some(a), None), Some(a));
/// assert_eq!(Progress::add_counts(None, None), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    done: u32,
    total: u32,
}

impl Progress {
    /// Create a new Progress value
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidCounts` if `total` is zero or
    /// `done` exceeds `total`.
    pub fn new(done: u32, total: u32) -> Result<Self, ProgressError> {
        if total == 0 || done > total {
            return Err(ProgressError::InvalidCounts { done, total });
        }
        Ok(Self { done, total })
    }

    /// Completed count
    pub fn done(&self) -> u32 {
        self.done
    }

    /// Total count
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whether every counted item is done
    pub fn is_complete(&self) -> bool {
        self.done == self.total
    }

    /// Add two optional progress values componentwise.
    ///
    /// `None` contributes the identity, so folding a child list with this
    /// combinator seeded from `None` yields `None` only when no child
    /// reported progress. Associative and commutative.
    pub fn add_counts(a: Option<Progress>, b: Option<Progress>) -> Option<Progress> {
        match (a, b) {
            (None, other) => other,
            (other, None) => other,
            (Some(a), Some(b)) => Some(Progress {
                done: a.done + b.done,
                total: a.total + b.total,
            }),
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_counts() {
        assert!(Progress::new(0, 1).is_ok());
        assert!(Progress::new(2, 2).is_ok());
        assert!(matches!(
            Progress::new(3, 2),
            Err(ProgressError::InvalidCounts { .. })
        ));
        assert!(matches!(
            Progress::new(0, 0),
            Err(ProgressError::InvalidCounts { .. })
        ));
    }

    #[test]
    fn test_add_counts_identity() {
        let p = Progress::new(1, 3).unwrap();

        assert_eq!(Progress::add_counts(None, None), None);
        assert_eq!(Progress::add_counts(Some(p), None), Some(p));
        assert_eq!(Progress::add_counts(None, Some(p)), Some(p));
    }

    #[test]
    fn test_add_counts_sums_componentwise() {
        let a = Progress::new(1, 2).unwrap();
        let b = Progress::new(3, 4).unwrap();

        let sum = Progress::add_counts(Some(a), Some(b)).unwrap();
        assert_eq!(sum.done(), 4);
        assert_eq!(sum.total(), 6);
    }

    #[test]
    fn test_add_counts_commutes() {
        let a = Progress::new(0, 5).unwrap();
        let b = Progress::new(2, 2).unwrap();

        assert_eq!(
            Progress::add_counts(Some(a), Some(b)),
            Progress::add_counts(Some(b), Some(a))
        );
    }

    #[test]
    fn test_is_complete() {
        assert!(Progress::new(2, 2).unwrap().is_complete());
        assert!(!Progress::new(1, 2).unwrap().is_complete());
    }

    #[test]
    fn test_display() {
        assert_eq!(Progress::new(1, 4).unwrap().to_string(), "1/4");
    }
}

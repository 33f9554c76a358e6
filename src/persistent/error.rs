//! Error types for the persistent ordered set.
//!
//! [`SetError`] distinguishes the caller errors of the public API
//! (`NotFound`, `ImproperJoin`) from internal corruption of the balance
//! invariant (`InvariantViolation`), which always indicates a bug.

use thiserror::Error;

/// Represents errors that can occur when working with a
/// [`PersistentTreeSet`](super::PersistentTreeSet).
///
/// # Examples
///
/// ```rust
/// use arbor::persistent::{PersistentTreeSet, SetError};
///
/// let empty: PersistentTreeSet<i32> = PersistentTreeSet::new();
/// assert_eq!(empty.min(), Err(SetError::NotFound));
///
/// let low: PersistentTreeSet<i32> = (1..=5).collect();
/// let high: PersistentTreeSet<i32> = (3..=8).collect();
/// assert_eq!(low.join(&high), Err(SetError::ImproperJoin));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetError {
    /// The set is empty, so it has no minimum or maximum.
    #[error("not found: the set is empty")]
    NotFound,

    /// `join` was called with a left set whose maximum is not strictly
    /// less than the right set's minimum.
    #[error("improper join: every element of the left set must precede every element of the right set")]
    ImproperJoin,

    /// The height-balance invariant was found broken while rebuilding a tree.
    #[error("balance invariant violated in `{operation}`")]
    InvariantViolation {
        /// The internal operation that detected the corruption.
        operation: &'static str,
    },
}

impl SetError {
    /// Creates a [`SetError::InvariantViolation`] for the given operation.
    #[inline]
    #[must_use]
    pub const fn invariant_violation(operation: &'static str) -> Self {
        Self::InvariantViolation { operation }
    }

    /// Returns `true` if this error signals internal corruption rather than
    /// a caller error.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

//! # arbor
//!
//! A persistent ordered set for Rust, built on a height-balanced (AVL)
//! binary search tree.
//!
//! ## Overview
//!
//! Every operation that changes a set returns a new set and leaves the
//! original untouched; versions share all unchanged subtrees. On top of the
//! usual membership, insertion, deletion, min/max and predecessor/successor
//! queries, the set supports logarithmic-time:
//!
//! - **join**: concatenate two sets whose ranges do not overlap
//! - **split**: partition a set around a key, with `head_set` / `tail_set`
//!   as convenience wrappers
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes with `Arc` instead of `Rc`, making sets `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use arbor::prelude::*;
//!
//! let set: PersistentTreeSet<i32> = (1..=7).collect();
//! let head = set.head_set(&5, false);
//! let tail = set.tail_set(&5, false);
//!
//! assert_eq!(head.join(&tail).unwrap(), set.remove(&5));
//! assert_eq!(tail.join(&head).err(), Some(SetError::ImproperJoin));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;

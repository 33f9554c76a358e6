//! Persistent (immutable) ordered set.
//!
//! This module provides [`PersistentTreeSet`], an immutable ordered set built
//! on a height-balanced (AVL) binary search tree. Every update returns a new
//! set and shares all untouched subtrees with the previous version.
//!
//! # Structural Sharing
//!
//! Nodes are never modified after they are built. An insert or remove
//! rebuilds only the nodes on one root-to-leaf path; `join` and `split`
//! rebuild only the nodes along the spines they walk. Everything else is
//! shared through reference counting.
//!
//! # Examples
//!
//! ```rust
//! use arbor::persistent::PersistentTreeSet;
//!
//! let set = PersistentTreeSet::new()
//!     .insert(1)
//!     .insert(2)
//!     .insert(3);
//! assert!(set.contains(&1));
//!
//! // Structural sharing: the original set is preserved
//! let updated = set.insert(4);
//! assert!(!set.contains(&4));    // Original unchanged
//! assert!(updated.contains(&4)); // New version
//! ```
//!
//! # Thread Safety
//!
//! By default nodes are shared with [`std::rc::Rc`]. Enabling the `arc`
//! feature switches to [`std::sync::Arc`], which makes sets `Send + Sync` so
//! that several threads can read the same version without locking.

#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod error;
mod join;
mod node;
mod treeset;

pub use error::SetError;
pub use treeset::PersistentTreeSet;
pub use treeset::PersistentTreeSetIntoIterator;
pub use treeset::PersistentTreeSetIterator;
pub use treeset::TreeShape;

// =============================================================================
// Tests
// =============================================================================

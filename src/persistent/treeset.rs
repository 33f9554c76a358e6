//! Persistent (immutable) ordered set based on an AVL tree.
//!
//! This module provides [`PersistentTreeSet`], an immutable ordered set
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentTreeSet` is a height-balanced binary search tree in which the
//! heights of sibling subtrees never differ by more than one. Every update
//! rebuilds only the nodes on one root-to-leaf path and shares the rest of the
//! tree with the previous version.
//!
//! - O(log N) contains, insert, remove
//! - O(log N) min/max, predecessor/successor
//! - O(log N) join of two sets with disjoint, ordered ranges
//! - O(log N) split, `head_set` and `tail_set`
//! - O(N) len (sizes are not cached in the nodes)
//! - O(1) clone and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use arbor::persistent::PersistentTreeSet;
//!
//! let set: PersistentTreeSet<i32> = (1..=7).collect();
//!
//! assert_eq!(set.predecessor(&8), Some(&7));
//! assert_eq!(set.successor(&3), Some(&4));
//!
//! let head = set.head_set(&5, false);
//! let tail = set.tail_set(&5, false);
//! let joined = head.join(&tail).unwrap();
//!
//! let elements: Vec<i32> = joined.into_iter().collect();
//! assert_eq!(elements, vec![1, 2, 3, 4, 6, 7]);
//!
//! // The original set is untouched
//! assert!(set.contains(&5));
//! ```

use super::error::SetError;
use super::join::{self, Split};
use super::node::{self, Link, Node};
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};

/// Stack depth kept inline by [`PersistentTreeSetIterator`]. An AVL tree of
/// height 32 holds millions of elements.
const INLINE_DEPTH: usize = 32;

/// Unwraps the result of an internal tree operation.
///
/// Internal operations only fail when the balance invariant has already been
/// broken, which is a bug in this module, never a caller error.
fn expect_balanced<R>(result: Result<R, SetError>) -> R {
    match result {
        Ok(value) => value,
        Err(error) => {
            tracing::error!(%error, "persistent tree set is corrupted");
            panic!("{error}");
        }
    }
}

/// Which half of a split `half_split` keeps.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Half {
    Head,
    Tail,
}

// =============================================================================
// PersistentTreeSet Definition
// =============================================================================

/// A persistent (immutable) ordered set based on an AVL tree.
///
/// Every operation that changes the set returns a new set and leaves the
/// receiver unchanged. Unchanged subtrees are shared between versions, so an
/// update allocates only O(log N) nodes.
///
/// Elements must implement `Ord`. Updates additionally require `Clone`,
/// because the nodes on the rebuilt path carry copies of their elements.
///
/// # Time Complexity
///
/// | Operation                      | Complexity |
/// |--------------------------------|------------|
/// | `new` / `singleton`            | O(1)       |
/// | `contains`                     | O(log N)   |
/// | `insert` / `remove`            | O(log N)   |
/// | `min` / `max`                  | O(log N)   |
/// | `predecessor` / `successor`    | O(log N)   |
/// | `join`                         | O(log N)   |
/// | `split` / `head_set` / `tail_set` | O(log N) |
/// | `len`                          | O(N)       |
/// | `is_empty` / `clone`           | O(1)       |
///
/// # Examples
///
/// ```rust
/// use arbor::persistent::PersistentTreeSet;
///
/// let set = PersistentTreeSet::new().insert(3).insert(1).insert(2);
/// let removed = set.remove(&2);
///
/// assert!(set.contains(&2));      // Original unchanged
/// assert!(!removed.contains(&2)); // New version
///
/// let elements: Vec<&i32> = set.iter().collect();
/// assert_eq!(elements, vec![&1, &2, &3]);
/// ```
#[derive(Clone)]
pub struct PersistentTreeSet<T> {
    /// Root node of the tree
    root: Link<T>,
}

impl<T> PersistentTreeSet<T> {
    /// Creates a new empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = PersistentTreeSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    #[inline]
    const fn from_root(root: Link<T>) -> Self {
        Self { root }
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the set.
    ///
    /// The count is not cached, so this walks the whole tree. Callers that
    /// need the size repeatedly should keep it themselves.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (0..10).collect();
    /// assert_eq!(set.len(), 10);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        node::count(&self.root)
    }

    /// Returns the height of the underlying tree (0 for the empty set).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (0..40).collect();
    /// assert!(set.height() <= 7);
    /// ```
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Checks the balance invariant of every node.
    ///
    /// Returns `true` if the heights of sibling subtrees differ by at most one
    /// everywhere and every cached height is exact. Always `true` for sets
    /// built through the public API; intended for tests and debugging.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        node::checked_height(&self.root).is_some()
    }

    /// Returns `true` if the set contains an element equal to `key`.
    ///
    /// The key may be any borrowed form of the element type, but the ordering
    /// on the borrowed form must match the ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set = PersistentTreeSet::singleton("hello".to_string());
    /// assert!(set.contains("hello"));
    /// assert!(!set.contains("world"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::contains(&self.root, key)
    }

    /// Returns the smallest element.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::NotFound`] if the set is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::{PersistentTreeSet, SetError};
    ///
    /// let set: PersistentTreeSet<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(set.min(), Ok(&1));
    /// assert_eq!(PersistentTreeSet::<i32>::new().min(), Err(SetError::NotFound));
    /// ```
    pub fn min(&self) -> Result<&T, SetError> {
        self.root
            .as_ref()
            .map(|node| node.leftmost())
            .ok_or(SetError::NotFound)
    }

    /// Returns the largest element.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::NotFound`] if the set is empty.
    pub fn max(&self) -> Result<&T, SetError> {
        self.root
            .as_ref()
            .map(|node| node.rightmost())
            .ok_or(SetError::NotFound)
    }

    /// Returns the largest element strictly less than `key`, if any.
    ///
    /// `key` does not need to be an element of the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=7).collect();
    /// assert_eq!(set.predecessor(&8), Some(&7));
    /// assert_eq!(set.predecessor(&1), None);
    /// ```
    #[must_use]
    pub fn predecessor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::predecessor(&self.root, key, None)
    }

    /// Returns the smallest element strictly greater than `key`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=7).collect();
    /// assert_eq!(set.successor(&3), Some(&4));
    /// assert_eq!(set.successor(&7), None);
    /// ```
    #[must_use]
    pub fn successor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::successor(&self.root, key, None)
    }

    /// Returns an iterator over references to the elements in ascending
    /// order.
    ///
    /// The iterator borrows the set and walks the tree with an explicit stack
    /// no deeper than the tree's height.
    #[must_use]
    pub fn iter(&self) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator::new(&self.root)
    }

    /// Returns a value that displays the shape of the underlying tree.
    ///
    /// Each node is printed as `(left value right)`, and the empty tree as
    /// nothing at all.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=3).collect();
    /// assert_eq!(set.shape().to_string(), "(( 1 ) 2 ( 3 ))");
    /// ```
    #[must_use]
    pub const fn shape(&self) -> TreeShape<'_, T> {
        TreeShape { root: &self.root }
    }
}

impl<T: Clone + Ord> PersistentTreeSet<T> {
    /// Creates a set containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set = PersistentTreeSet::singleton(42);
    /// assert_eq!(set.len(), 1);
    /// assert!(set.contains(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::from_root(node::create(None, element, None))
    }

    /// Inserts an element into the set.
    ///
    /// If the set already contains the element, the returned set shares the
    /// whole tree with `self`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Panics
    ///
    /// Panics if the balance invariant of the tree has been corrupted, which
    /// indicates a bug in this crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set1 = PersistentTreeSet::new().insert(1);
    /// let set2 = set1.insert(2);
    ///
    /// assert!(!set1.contains(&2)); // Original unchanged
    /// assert!(set2.contains(&2));  // New version
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self::from_root(expect_balanced(node::insert(&self.root, element)))
    }

    /// Removes an element from the set.
    ///
    /// If the set does not contain the element, the returned set shares the
    /// whole tree with `self`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Panics
    ///
    /// Panics if the balance invariant of the tree has been corrupted, which
    /// indicates a bug in this crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=3).collect();
    /// let removed = set.remove(&2);
    ///
    /// assert_eq!(set.len(), 3);     // Original unchanged
    /// assert_eq!(removed.len(), 2); // New version
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::from_root(expect_balanced(node::remove(&self.root, key)))
    }

    /// Concatenates two sets whose ranges do not overlap.
    ///
    /// Every element of `self` must be strictly less than every element of
    /// `other`. Either set may be empty.
    ///
    /// # Complexity
    ///
    /// O(log N + log M)
    ///
    /// # Errors
    ///
    /// Returns [`SetError::ImproperJoin`] if the maximum of `self` is not
    /// strictly less than the minimum of `other`, and
    /// [`SetError::InvariantViolation`] if either tree is corrupted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::{PersistentTreeSet, SetError};
    ///
    /// let low: PersistentTreeSet<i32> = (0..10).collect();
    /// let high: PersistentTreeSet<i32> = (10..20).collect();
    ///
    /// let joined = low.join(&high).unwrap();
    /// assert_eq!(joined.len(), 20);
    ///
    /// assert_eq!(high.join(&low).err(), Some(SetError::ImproperJoin));
    /// ```
    pub fn join(&self, other: &Self) -> Result<Self, SetError> {
        tracing::trace!(
            left_height = self.height(),
            right_height = other.height(),
            "joining sets"
        );
        join::join(&self.root, &other.root)
            .map(Self::from_root)
            .inspect_err(|error| {
                if *error == SetError::ImproperJoin {
                    tracing::debug!("rejected join of sets with overlapping ranges");
                } else {
                    tracing::error!(%error, "persistent tree set is corrupted");
                }
            })
    }

    /// Partitions the set around `key`.
    ///
    /// Returns the set of elements less than `key`, the stored element equal
    /// to `key` if there is one, and the set of elements greater than `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Panics
    ///
    /// Panics if the balance invariant of the tree has been corrupted, which
    /// indicates a bug in this crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=7).collect();
    /// let (lesser, found, greater) = set.split(&5);
    ///
    /// assert_eq!(lesser.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// assert_eq!(found, Some(5));
    /// assert_eq!(greater.iter().copied().collect::<Vec<_>>(), vec![6, 7]);
    /// ```
    #[must_use]
    pub fn split<Q>(&self, key: &Q) -> (Self, Option<T>, Self)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tracing::trace!(height = self.height(), "splitting set");
        let Split {
            lesser,
            found,
            greater,
        } = expect_balanced(join::split(&self.root, key));
        (Self::from_root(lesser), found, Self::from_root(greater))
    }

    /// Returns the subset of elements less than `key` (less than or equal to
    /// when `inclusive` is `true`).
    ///
    /// # Panics
    ///
    /// Panics if the balance invariant of the tree has been corrupted, which
    /// indicates a bug in this crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=7).collect();
    /// assert_eq!(set.head_set(&5, false).len(), 4);
    /// assert_eq!(set.head_set(&5, true).len(), 5);
    /// ```
    #[must_use]
    pub fn head_set<Q>(&self, key: &Q, inclusive: bool) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.half_split(key, inclusive, Half::Head)
    }

    /// Returns the subset of elements greater than `key` (greater than or
    /// equal to when `inclusive` is `true`).
    ///
    /// # Panics
    ///
    /// Panics if the balance invariant of the tree has been corrupted, which
    /// indicates a bug in this crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=7).collect();
    /// assert_eq!(set.tail_set(&5, false).len(), 2);
    /// assert_eq!(set.tail_set(&5, true).len(), 3);
    /// ```
    #[must_use]
    pub fn tail_set<Q>(&self, key: &Q, inclusive: bool) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.half_split(key, inclusive, Half::Tail)
    }

    fn half_split<Q>(&self, key: &Q, inclusive: bool, half: Half) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Split {
            lesser,
            found,
            greater,
        } = expect_balanced(join::split(&self.root, key));
        let selected = match half {
            Half::Head => lesser,
            Half::Tail => greater,
        };
        match found {
            Some(element) if inclusive => {
                Self::from_root(expect_balanced(node::insert(&selected, element)))
            }
            _ => Self::from_root(selected),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A borrowing iterator over the elements of a [`PersistentTreeSet`] in
/// ascending order.
pub struct PersistentTreeSetIterator<'a, T> {
    /// Nodes whose value has not been yielded yet; the top is the next one.
    stack: SmallVec<[&'a Node<T>; INLINE_DEPTH]>,
}

impl<'a, T> PersistentTreeSetIterator<'a, T> {
    fn new(root: &'a Link<T>) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut link: &'a Link<T>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, T> Iterator for PersistentTreeSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        Some(&node.value)
    }
}

impl<T> FusedIterator for PersistentTreeSetIterator<'_, T> {}

/// An owning iterator over the elements of a [`PersistentTreeSet`] in
/// ascending order.
///
/// The iterator holds its own root. Each step takes the minimum of that root
/// and replaces the root with a version that no longer contains it, so the
/// set the iterator was created from is never affected. Creating one is O(1)
/// (`set.clone().into_iter()`), and every iterator is an independent
/// traversal.
///
/// # Complexity
///
/// O(log N) per element.
pub struct PersistentTreeSetIntoIterator<T> {
    remaining: Link<T>,
}

impl<T: Clone + Ord> Iterator for PersistentTreeSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let minimum = self.remaining.as_ref()?.leftmost().clone();
        self.remaining = expect_balanced(node::remove(&self.remaining, &minimum));
        Some(minimum)
    }
}

impl<T: Clone + Ord> FusedIterator for PersistentTreeSetIntoIterator<T> {}

// =============================================================================
// Tree Shape Display
// =============================================================================

/// Displays the structure of a [`PersistentTreeSet`].
///
/// Created by [`PersistentTreeSet::shape`].
pub struct TreeShape<'a, T> {
    root: &'a Link<T>,
}

fn write_shape<T: fmt::Display>(
    link: &Link<T>,
    formatter: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if let Some(node) = link {
        write!(formatter, "(")?;
        write_shape(&node.left, formatter)?;
        write!(formatter, " {} ", node.value)?;
        write_shape(&node.right, formatter)?;
        write!(formatter, ")")?;
    }
    Ok(())
}

impl<T: fmt::Display> fmt::Display for TreeShape<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_shape(self.root, formatter)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentTreeSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> FromIterator<T> for PersistentTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, element| set.insert(element))
    }
}

impl<T: Clone + Ord> IntoIterator for PersistentTreeSet<T> {
    type Item = T;
    type IntoIter = PersistentTreeSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentTreeSetIntoIterator {
            remaining: self.root,
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentTreeSet<T> {
    type Item = &'a T;
    type IntoIter = PersistentTreeSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        node::same_link(&self.root, &other.root) || self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentTreeSet<T> {}

/// Hashes the length first, then each element in ascending order, so equal
/// sets hash equally regardless of their tree shape.
impl<T: Hash> Hash for PersistentTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreeSet<i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreeSet<i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

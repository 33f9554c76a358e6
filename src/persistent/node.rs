//! Immutable AVL nodes and the balance primitives built on them.
//!
//! Every function in this module takes existing subtrees by reference (or by
//! value when the caller already owns them) and returns a new root. Nodes are
//! never mutated after construction, so any subtree may be shared by many
//! versions of a set at once.
//!
//! # Invariants
//!
//! For every node reachable from a live root:
//! 1. Every value in `left` < `value` < every value in `right`
//! 2. `|height(left) - height(right)| <= BALANCE_FACTOR`
//! 3. `height == 1 + max(height(left), height(right))`
//!
//! Only [`create`] and [`bal`] build nodes. `create` assumes the children
//! already satisfy invariant 2; `bal` repairs a height difference of exactly
//! `BALANCE_FACTOR + 1` with a single or double rotation.

use super::ReferenceCounter;
use super::error::SetError;
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Maximum allowed height difference between siblings.
pub(crate) const BALANCE_FACTOR: usize = 1;

/// An optional shared subtree. `None` is the empty tree.
pub(crate) type Link<T> = Option<ReferenceCounter<Node<T>>>;

/// Internal node structure for the AVL tree.
pub(crate) struct Node<T> {
    pub(crate) left: Link<T>,
    pub(crate) value: T,
    pub(crate) right: Link<T>,
    pub(crate) height: usize,
}

impl<T> Node<T> {
    /// Returns the smallest value of the subtree rooted at this node.
    pub(crate) fn leftmost(&self) -> &T {
        self.left
            .as_ref()
            .map_or(&self.value, |left| left.leftmost())
    }

    /// Returns the largest value of the subtree rooted at this node.
    pub(crate) fn rightmost(&self) -> &T {
        self.right
            .as_ref()
            .map_or(&self.value, |right| right.rightmost())
    }
}

/// Height of a subtree; the empty tree has height 0.
#[inline]
pub(crate) fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

/// Returns `true` if both links point at the same node (or are both empty).
#[inline]
pub(crate) fn same_link<T>(first: &Link<T>, second: &Link<T>) -> bool {
    match (first, second) {
        (None, None) => true,
        (Some(first), Some(second)) => ReferenceCounter::ptr_eq(first, second),
        _ => false,
    }
}

// =============================================================================
// Balance Primitives
// =============================================================================

/// Builds a node from two subtrees whose heights differ by at most
/// `BALANCE_FACTOR`. No rebalancing is performed.
pub(crate) fn create<T>(left: Link<T>, value: T, right: Link<T>) -> Link<T> {
    let left_height = height(&left);
    let right_height = height(&right);
    debug_assert!(
        left_height.abs_diff(right_height) <= BALANCE_FACTOR,
        "create called with subtree heights {left_height} and {right_height}"
    );
    Some(ReferenceCounter::new(Node {
        left,
        value,
        right,
        height: 1 + left_height.max(right_height),
    }))
}

/// Same as [`create`], but performs one rotation step when the subtree
/// heights differ by `BALANCE_FACTOR + 1`.
///
/// Returns [`SetError::InvariantViolation`] if the difference is larger than
/// that, or if a child the rotation needs is missing.
pub(crate) fn bal<T: Clone>(
    left: Link<T>,
    value: T,
    right: Link<T>,
) -> Result<Link<T>, SetError> {
    let left_height = height(&left);
    let right_height = height(&right);

    if left_height.abs_diff(right_height) > BALANCE_FACTOR + 1 {
        return Err(SetError::invariant_violation("bal"));
    }

    if left_height > right_height + BALANCE_FACTOR {
        let Some(pivot) = left else {
            return Err(SetError::invariant_violation("bal"));
        };
        if height(&pivot.left) >= height(&pivot.right) {
            // Single right rotation
            Ok(create(
                pivot.left.clone(),
                pivot.value.clone(),
                create(pivot.right.clone(), value, right),
            ))
        } else {
            // Left-right double rotation through pivot.right
            let Some(inner) = &pivot.right else {
                return Err(SetError::invariant_violation("bal"));
            };
            Ok(create(
                create(pivot.left.clone(), pivot.value.clone(), inner.left.clone()),
                inner.value.clone(),
                create(inner.right.clone(), value, right),
            ))
        }
    } else if right_height > left_height + BALANCE_FACTOR {
        let Some(pivot) = right else {
            return Err(SetError::invariant_violation("bal"));
        };
        if height(&pivot.right) >= height(&pivot.left) {
            // Single left rotation
            Ok(create(
                create(left, value, pivot.left.clone()),
                pivot.value.clone(),
                pivot.right.clone(),
            ))
        } else {
            // Right-left double rotation through pivot.left
            let Some(inner) = &pivot.left else {
                return Err(SetError::invariant_violation("bal"));
            };
            Ok(create(
                create(left, value, inner.left.clone()),
                inner.value.clone(),
                create(inner.right.clone(), pivot.value.clone(), pivot.right.clone()),
            ))
        }
    } else {
        Ok(create(left, value, right))
    }
}

// =============================================================================
// Queries
// =============================================================================

pub(crate) fn contains<T, Q>(link: &Link<T>, key: &Q) -> bool
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    link.as_ref()
        .is_some_and(|node| match key.cmp(node.value.borrow()) {
            Ordering::Less => contains(&node.left, key),
            Ordering::Greater => contains(&node.right, key),
            Ordering::Equal => true,
        })
}

/// Largest value strictly less than `key`; `best` is the best candidate seen
/// on the way down.
pub(crate) fn predecessor<'a, T, Q>(
    link: &'a Link<T>,
    key: &Q,
    best: Option<&'a T>,
) -> Option<&'a T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    match link {
        None => best,
        Some(node) => {
            if key.cmp(node.value.borrow()) == Ordering::Greater {
                predecessor(&node.right, key, Some(&node.value))
            } else {
                predecessor(&node.left, key, best)
            }
        }
    }
}

/// Smallest value strictly greater than `key`.
pub(crate) fn successor<'a, T, Q>(
    link: &'a Link<T>,
    key: &Q,
    best: Option<&'a T>,
) -> Option<&'a T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    match link {
        None => best,
        Some(node) => {
            if key.cmp(node.value.borrow()) == Ordering::Less {
                successor(&node.left, key, Some(&node.value))
            } else {
                successor(&node.right, key, best)
            }
        }
    }
}

/// Number of values in the subtree. O(n); sizes are not cached.
pub(crate) fn count<T>(link: &Link<T>) -> usize {
    link.as_ref()
        .map_or(0, |node| count(&node.left) + 1 + count(&node.right))
}

/// Recomputes the height of the subtree, returning `None` if any node is out
/// of balance or carries a stale cached height.
pub(crate) fn checked_height<T>(link: &Link<T>) -> Option<usize> {
    match link {
        None => Some(0),
        Some(node) => {
            let left = checked_height(&node.left)?;
            let right = checked_height(&node.right)?;
            let height = 1 + left.max(right);
            (left.abs_diff(right) <= BALANCE_FACTOR && height == node.height).then_some(height)
        }
    }
}

// =============================================================================
// Insertion / Deletion
// =============================================================================

/// Inserts `value`, rebuilding the search path with [`bal`].
///
/// If the value is already present the original root is returned, so no
/// nodes are allocated.
pub(crate) fn insert<T: Clone + Ord>(link: &Link<T>, value: T) -> Result<Link<T>, SetError> {
    let Some(node) = link else {
        return Ok(create(None, value, None));
    };
    match value.cmp(&node.value) {
        Ordering::Equal => Ok(link.clone()),
        Ordering::Less => {
            let new_left = insert(&node.left, value)?;
            if same_link(&new_left, &node.left) {
                return Ok(link.clone());
            }
            bal(new_left, node.value.clone(), node.right.clone())
        }
        Ordering::Greater => {
            let new_right = insert(&node.right, value)?;
            if same_link(&new_right, &node.right) {
                return Ok(link.clone());
            }
            bal(node.left.clone(), node.value.clone(), new_right)
        }
    }
}

/// Removes the minimum value.
pub(crate) fn delete_min<T: Clone>(link: &Link<T>) -> Result<Link<T>, SetError> {
    let Some(node) = link else {
        return Err(SetError::invariant_violation("delete_min"));
    };
    if node.left.is_none() {
        return Ok(node.right.clone());
    }
    bal(delete_min(&node.left)?, node.value.clone(), node.right.clone())
}

/// Merges two subtrees where every value of `first` precedes every value of
/// `second` and their heights differ by at most `BALANCE_FACTOR`.
fn merge<T: Clone>(first: &Link<T>, second: &Link<T>) -> Result<Link<T>, SetError> {
    match (first, second) {
        (None, _) => Ok(second.clone()),
        (_, None) => Ok(first.clone()),
        (Some(_), Some(node)) => bal(
            first.clone(),
            node.leftmost().clone(),
            delete_min(second)?,
        ),
    }
}

/// Removes the value matching `key`, rebuilding the search path with [`bal`].
///
/// If no value matches, the original root is returned unchanged.
pub(crate) fn remove<T, Q>(link: &Link<T>, key: &Q) -> Result<Link<T>, SetError>
where
    T: Clone + Borrow<Q>,
    Q: Ord + ?Sized,
{
    let Some(node) = link else {
        return Ok(None);
    };
    match key.cmp(node.value.borrow()) {
        Ordering::Equal => merge(&node.left, &node.right),
        Ordering::Less => {
            let new_left = remove(&node.left, key)?;
            if same_link(&new_left, &node.left) {
                return Ok(link.clone());
            }
            bal(new_left, node.value.clone(), node.right.clone())
        }
        Ordering::Greater => {
            let new_right = remove(&node.right, key)?;
            if same_link(&new_right, &node.right) {
                return Ok(link.clone());
            }
            bal(node.left.clone(), node.value.clone(), new_right)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

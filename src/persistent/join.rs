//! Concatenation and partitioning of AVL trees.
//!
//! [`join3`] is the general concatenation primitive: unlike
//! [`create`](super::node::create) and [`bal`](super::node::bal) it places no
//! restriction on the relative heights of its operands. It walks down the
//! spine of the taller tree until the heights are compatible, then rebuilds
//! the spine with `bal`, so its cost is proportional to the height
//! difference. [`join`] and [`split`] are both expressed in terms of it.

use super::error::SetError;
use super::node::{BALANCE_FACTOR, Link, bal, create, delete_min, insert};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Concatenates `left`, `value` and `right` into one balanced tree.
///
/// Every value of `left` must precede `value`, and `value` must precede every
/// value of `right`.
pub(crate) fn join3<T: Clone + Ord>(
    left: Link<T>,
    value: T,
    right: Link<T>,
) -> Result<Link<T>, SetError> {
    match (left, right) {
        (None, right) => insert(&right, value),
        (left, None) => insert(&left, value),
        (Some(left_node), Some(right_node)) => {
            if left_node.height > right_node.height + BALANCE_FACTOR {
                bal(
                    left_node.left.clone(),
                    left_node.value.clone(),
                    join3(left_node.right.clone(), value, Some(right_node))?,
                )
            } else if right_node.height > left_node.height + BALANCE_FACTOR {
                bal(
                    join3(Some(left_node), value, right_node.left.clone())?,
                    right_node.value.clone(),
                    right_node.right.clone(),
                )
            } else {
                Ok(create(Some(left_node), value, Some(right_node)))
            }
        }
    }
}

/// Concatenates two trees where every value of `left` is strictly less than
/// every value of `right`.
///
/// The minimum of `right` becomes the pivot for [`join3`]. Returns
/// [`SetError::ImproperJoin`] when the ranges overlap.
pub(crate) fn join<T: Clone + Ord>(
    left: &Link<T>,
    right: &Link<T>,
) -> Result<Link<T>, SetError> {
    match (left, right) {
        (None, _) => Ok(right.clone()),
        (_, None) => Ok(left.clone()),
        (Some(left_node), Some(right_node)) => {
            let pivot = right_node.leftmost();
            if left_node.rightmost() >= pivot {
                return Err(SetError::ImproperJoin);
            }
            join3(left.clone(), pivot.clone(), delete_min(right)?)
        }
    }
}

/// The three parts of a tree partitioned around a key.
pub(crate) struct Split<T> {
    /// Every value less than the key.
    pub(crate) lesser: Link<T>,
    /// The stored value equal to the key, if any.
    pub(crate) found: Option<T>,
    /// Every value greater than the key.
    pub(crate) greater: Link<T>,
}

/// Partitions the tree around `key`.
///
/// Each level of the recursion reattaches the node it descended past with
/// [`join3`], so the two halves stay balanced regardless of how unevenly the
/// key divides the tree.
pub(crate) fn split<T, Q>(link: &Link<T>, key: &Q) -> Result<Split<T>, SetError>
where
    T: Clone + Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    let Some(node) = link else {
        return Ok(Split {
            lesser: None,
            found: None,
            greater: None,
        });
    };
    match key.cmp(node.value.borrow()) {
        Ordering::Equal => Ok(Split {
            lesser: node.left.clone(),
            found: Some(node.value.clone()),
            greater: node.right.clone(),
        }),
        Ordering::Less => {
            let Split {
                lesser,
                found,
                greater,
            } = split(&node.left, key)?;
            Ok(Split {
                lesser,
                found,
                greater: join3(greater, node.value.clone(), node.right.clone())?,
            })
        }
        Ordering::Greater => {
            let Split {
                lesser,
                found,
                greater,
            } = split(&node.right, key)?;
            Ok(Split {
                lesser: join3(node.left.clone(), node.value.clone(), lesser)?,
                found,
                greater,
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

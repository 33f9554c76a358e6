//! Unit tests for PersistentTreeSet.

use arbor::persistent::{PersistentTreeSet, SetError};
use rstest::{fixture, rstest};
use std::collections::HashSet;

#[fixture]
fn one_to_seven() -> PersistentTreeSet<i32> {
    (1..=7).collect()
}

fn elements(set: &PersistentTreeSet<i32>) -> Vec<i32> {
    set.iter().copied().collect()
}

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_set() {
    let set: PersistentTreeSet<i32> = PersistentTreeSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert_eq!(set.height(), 0);
}

#[rstest]
fn test_default_creates_empty_set() {
    let set: PersistentTreeSet<i32> = PersistentTreeSet::default();
    assert!(set.is_empty());
}

#[rstest]
fn test_singleton_creates_set_with_one_element() {
    let set = PersistentTreeSet::singleton(42);
    assert_eq!(set.len(), 1);
    assert!(set.contains(&42));
    assert_eq!(set.min(), Ok(&42));
    assert_eq!(set.max(), Ok(&42));
}

// =============================================================================
// Insert / Contains Tests
// =============================================================================

#[rstest]
fn test_insert_multiple_elements() {
    let set = PersistentTreeSet::new().insert(2).insert(1).insert(3);
    assert_eq!(set.len(), 3);
    assert_eq!(elements(&set), vec![1, 2, 3]);
}

#[rstest]
fn test_insert_is_idempotent() {
    let set = PersistentTreeSet::new().insert(5).insert(3);
    let again = set.insert(5);
    assert_eq!(again, set);
    assert_eq!(again.len(), 2);
}

#[rstest]
fn test_insert_preserves_original_set() {
    let set1 = PersistentTreeSet::new().insert(1);
    let set2 = set1.insert(2);

    assert!(!set1.contains(&2));
    assert!(set2.contains(&2));
    assert_eq!(set1.len(), 1);
    assert_eq!(set2.len(), 2);
}

#[rstest]
fn test_contains_with_borrowed_key() {
    let set = PersistentTreeSet::new()
        .insert("pear".to_string())
        .insert("apple".to_string());
    assert!(set.contains("apple"));
    assert!(!set.contains("plum"));
}

#[rstest]
fn test_contains_on_empty_set() {
    let set: PersistentTreeSet<i32> = PersistentTreeSet::new();
    assert!(!set.contains(&1));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[rstest]
fn test_remove_existing_element(one_to_seven: PersistentTreeSet<i32>) {
    let removed = one_to_seven.remove(&4);
    assert_eq!(elements(&removed), vec![1, 2, 3, 5, 6, 7]);
    assert!(removed.is_balanced());
}

#[rstest]
fn test_remove_absent_element_is_noop(one_to_seven: PersistentTreeSet<i32>) {
    let removed = one_to_seven.remove(&42);
    assert_eq!(removed, one_to_seven);
    assert_eq!(removed.shape().to_string(), one_to_seven.shape().to_string());
}

#[rstest]
fn test_remove_preserves_original_set(one_to_seven: PersistentTreeSet<i32>) {
    let removed = one_to_seven.remove(&1);
    assert!(one_to_seven.contains(&1));
    assert!(!removed.contains(&1));
}

#[rstest]
fn test_remove_all_elements_yields_empty_set(one_to_seven: PersistentTreeSet<i32>) {
    let emptied = (1..=7).fold(one_to_seven, |set, element| set.remove(&element));
    assert!(emptied.is_empty());
}

#[rstest]
fn test_remove_by_borrowed_key() {
    let set: PersistentTreeSet<String> = ["a", "b", "c"]
        .into_iter()
        .map(String::from)
        .collect();
    let removed = set.remove("b");
    assert_eq!(removed.len(), 2);
    assert!(!removed.contains("b"));
}

// =============================================================================
// Min / Max Tests
// =============================================================================

#[rstest]
fn test_min_max(one_to_seven: PersistentTreeSet<i32>) {
    assert_eq!(one_to_seven.min(), Ok(&1));
    assert_eq!(one_to_seven.max(), Ok(&7));
}

#[rstest]
fn test_min_max_on_empty_set_is_not_found() {
    let set: PersistentTreeSet<i32> = PersistentTreeSet::new();
    assert_eq!(set.min(), Err(SetError::NotFound));
    assert_eq!(set.max(), Err(SetError::NotFound));
}

// =============================================================================
// Predecessor / Successor Tests
// =============================================================================

#[rstest]
#[case(8, Some(7))]
#[case(7, Some(6))]
#[case(1, None)]
#[case(0, None)]
fn test_predecessor(
    one_to_seven: PersistentTreeSet<i32>,
    #[case] key: i32,
    #[case] expected: Option<i32>,
) {
    assert_eq!(one_to_seven.predecessor(&key).copied(), expected);
}

#[rstest]
#[case(3, Some(4))]
#[case(0, Some(1))]
#[case(7, None)]
#[case(100, None)]
fn test_successor(
    one_to_seven: PersistentTreeSet<i32>,
    #[case] key: i32,
    #[case] expected: Option<i32>,
) {
    assert_eq!(one_to_seven.successor(&key).copied(), expected);
}

#[rstest]
fn test_predecessor_successor_of_absent_key() {
    let set: PersistentTreeSet<i32> = (0..10).map(|value| value * 10).collect();
    assert_eq!(set.predecessor(&35), Some(&30));
    assert_eq!(set.successor(&35), Some(&40));
}

#[rstest]
fn test_predecessor_successor_on_empty_set() {
    let set: PersistentTreeSet<i32> = PersistentTreeSet::new();
    assert_eq!(set.predecessor(&1), None);
    assert_eq!(set.successor(&1), None);
}

// =============================================================================
// Join Tests
// =============================================================================

#[rstest]
fn test_join_disjoint_sets() {
    let low: PersistentTreeSet<i32> = (0..10).collect();
    let high: PersistentTreeSet<i32> = (10..100).collect();
    let joined = low.join(&high).unwrap();

    assert_eq!(elements(&joined), (0..100).collect::<Vec<_>>());
    assert!(joined.is_balanced());
    assert_eq!(low.len(), 10);
    assert_eq!(high.len(), 90);
}

#[rstest]
fn test_join_with_empty_sets() {
    let set: PersistentTreeSet<i32> = (0..10).collect();
    let empty = PersistentTreeSet::new();

    assert_eq!(set.join(&empty).unwrap(), set);
    assert_eq!(empty.join(&set).unwrap(), set);
    assert!(empty.join(&empty).unwrap().is_empty());
}

#[rstest]
#[case(0..10, 5..15)]
#[case(0..10, 9..10)]
#[case(10..20, 0..5)]
fn test_join_overlapping_sets_is_improper(
    #[case] left: std::ops::Range<i32>,
    #[case] right: std::ops::Range<i32>,
) {
    let left: PersistentTreeSet<i32> = left.collect();
    let right: PersistentTreeSet<i32> = right.collect();
    assert_eq!(left.join(&right), Err(SetError::ImproperJoin));
}

// =============================================================================
// Split / Head Set / Tail Set Tests
// =============================================================================

#[rstest]
fn test_head_and_tail_set_exclusive(one_to_seven: PersistentTreeSet<i32>) {
    let head = one_to_seven.head_set(&5, false);
    let tail = one_to_seven.tail_set(&5, false);
    assert_eq!(elements(&head), vec![1, 2, 3, 4]);
    assert_eq!(elements(&tail), vec![6, 7]);

    let joined = head.join(&tail).unwrap();
    assert_eq!(elements(&joined), vec![1, 2, 3, 4, 6, 7]);
    assert_eq!(joined, one_to_seven.remove(&5));
}

#[rstest]
fn test_head_and_tail_set_inclusive(one_to_seven: PersistentTreeSet<i32>) {
    assert_eq!(elements(&one_to_seven.head_set(&5, true)), vec![1, 2, 3, 4, 5]);
    assert_eq!(elements(&one_to_seven.tail_set(&5, true)), vec![5, 6, 7]);
}

#[rstest]
fn test_inclusive_subset_of_absent_key() {
    let set: PersistentTreeSet<i32> = (0..10).map(|value| value * 2).collect();
    assert_eq!(elements(&set.head_set(&7, true)), vec![0, 2, 4, 6]);
    assert_eq!(elements(&set.tail_set(&7, true)), vec![8, 10, 12, 14, 16, 18]);
}

#[rstest]
#[case(-5)]
#[case(100)]
fn test_subsets_beyond_range(one_to_seven: PersistentTreeSet<i32>, #[case] key: i32) {
    let head = one_to_seven.head_set(&key, true);
    let tail = one_to_seven.tail_set(&key, true);
    assert_eq!(head.len() + tail.len(), 7);
}

#[rstest]
fn test_split_returns_stored_element(one_to_seven: PersistentTreeSet<i32>) {
    let (lesser, found, greater) = one_to_seven.split(&3);
    assert_eq!(elements(&lesser), vec![1, 2]);
    assert_eq!(found, Some(3));
    assert_eq!(elements(&greater), vec![4, 5, 6, 7]);
}

#[rstest]
fn test_split_preserves_original(one_to_seven: PersistentTreeSet<i32>) {
    let _ = one_to_seven.split(&4);
    assert_eq!(elements(&one_to_seven), (1..=7).collect::<Vec<_>>());
}

// =============================================================================
// Balance Tests
// =============================================================================

#[rstest]
fn test_sequential_inserts_stay_balanced() {
    let set: PersistentTreeSet<i32> = (0..40).collect();
    // ceil(log2(41)) + 1
    assert!(set.height() <= 7);
    assert!(set.is_balanced());
}

#[rstest]
fn test_interleaved_updates_stay_balanced() {
    let mut set = PersistentTreeSet::new();
    for index in 0..1000 {
        set = set.insert(2 * index);
        set = set.remove(&(2 * index));
        set = set.insert(2 * index);
        assert!(set.contains(&(2 * index)));
        assert!(!set.contains(&(2 * index + 1)));
    }
    assert!(set.is_balanced());
    assert_eq!(set.len(), 1000);
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[rstest]
fn test_into_iter_yields_ascending_order() {
    let set: PersistentTreeSet<i32> = [3, 1, 2].into_iter().collect();

    let first: Vec<i32> = set.clone().into_iter().collect();
    let second: Vec<i32> = set.clone().into_iter().collect();

    assert_eq!(first, vec![1, 2, 3]);
    assert_eq!(second, vec![1, 2, 3]);
    assert!(set.contains(&1) && set.contains(&2) && set.contains(&3));
}

#[rstest]
fn test_into_iter_of_empty_set() {
    let set: PersistentTreeSet<i32> = PersistentTreeSet::new();
    assert_eq!(set.into_iter().next(), None);
}

#[rstest]
fn test_iter_matches_into_iter() {
    let set: PersistentTreeSet<i32> = [9, 4, 7, 1, 8, 2].into_iter().collect();
    let borrowed: Vec<i32> = set.iter().copied().collect();
    let owned: Vec<i32> = set.into_iter().collect();
    assert_eq!(borrowed, owned);
}

#[rstest]
fn test_for_loop_over_reference() {
    let set: PersistentTreeSet<i32> = (1..=5).collect();
    let mut sum = 0;
    for element in &set {
        sum += element;
    }
    assert_eq!(sum, 15);
}

#[rstest]
fn test_iter_over_large_set() {
    let set: PersistentTreeSet<i32> = (0..10_000).rev().collect();
    assert!(set.iter().copied().eq(0..10_000));
}

// =============================================================================
// Trait Tests
// =============================================================================

#[rstest]
fn test_eq_ignores_insertion_order() {
    let ascending: PersistentTreeSet<i32> = (0..50).collect();
    let descending: PersistentTreeSet<i32> = (0..50).rev().collect();
    assert_eq!(ascending, descending);
}

#[rstest]
fn test_ne_for_different_elements() {
    let set1: PersistentTreeSet<i32> = (0..5).collect();
    let set2: PersistentTreeSet<i32> = (1..6).collect();
    assert_ne!(set1, set2);
}

#[rstest]
fn test_hash_consistent_with_eq() {
    let ascending: PersistentTreeSet<i32> = (0..50).collect();
    let descending: PersistentTreeSet<i32> = (0..50).rev().collect();

    let mut outer = HashSet::new();
    outer.insert(ascending);
    assert!(outer.contains(&descending));
}

#[rstest]
fn test_display_and_debug() {
    let set: PersistentTreeSet<i32> = [2, 3, 1].into_iter().collect();
    assert_eq!(format!("{set}"), "{1, 2, 3}");
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");
}

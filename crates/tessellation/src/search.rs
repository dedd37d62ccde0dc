//! Binary searches over sorted slices with a caller-provided ordering.
//!
//! Each function takes a closure that compares an element of the slice against an implicit
//! key. The slice must be partitioned with respect to that closure: all elements ordered
//! `Less` first, then `Equal`, then `Greater`.
//!
//! The midpoint sequence is fixed so that the same inputs always select the same element,
//! even when several elements compare `Equal`.

use std::cmp::Ordering;

/// Index of the first element that is not `Less`, or `items.len()`.
pub fn first_greater_or_equal<T, F>(items: &[T], mut compare: F) -> usize
where
    F: FnMut(&T) -> Ordering,
{
    let mut result = items.len();
    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = (lo + hi - 1) / 2;
        if compare(&items[mid]) != Ordering::Less {
            result = mid;
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    result
}

/// Index of the first element that is `Greater`, or `items.len()`.
pub fn first_greater<T, F>(items: &[T], mut compare: F) -> usize
where
    F: FnMut(&T) -> Ordering,
{
    let mut result = items.len();
    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = (lo + hi - 1) / 2;
        if compare(&items[mid]) == Ordering::Greater {
            result = mid;
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    result
}

/// Index of the last element that is `Less`.
pub fn last_less<T, F>(items: &[T], mut compare: F) -> Option<usize>
where
    F: FnMut(&T) -> Ordering,
{
    let mut result = None;
    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = (lo + hi - 1) / 2;
        if compare(&items[mid]) == Ordering::Less {
            result = Some(mid);
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    result
}

/// Index of the last element that is not `Greater`.
pub fn last_less_or_equal<T, F>(items: &[T], mut compare: F) -> Option<usize>
where
    F: FnMut(&T) -> Ordering,
{
    let mut result = None;
    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = (lo + hi - 1) / 2;
        if compare(&items[mid]) != Ordering::Greater {
            result = Some(mid);
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    result
}

/// Index of an element that is `Equal`, if any.
pub fn find_equal<T, F>(items: &[T], mut compare: F) -> Option<usize>
where
    F: FnMut(&T) -> Ordering,
{
    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = (lo + hi - 1) / 2;
        match compare(&items[mid]) {
            Ordering::Equal => {
                return Some(mid);
            }
            Ordering::Less => {
                lo = mid + 1;
            }
            Ordering::Greater => {
                hi = mid;
            }
        }
    }

    None
}

#[test]
fn bounds() {
    let items = [1, 3, 3, 3, 5, 8];
    let key = |k: i32| move |x: &i32| x.cmp(&k);

    assert_eq!(first_greater_or_equal(&items, key(3)), 1);
    assert_eq!(first_greater(&items, key(3)), 4);
    assert_eq!(last_less(&items, key(3)), Some(0));
    assert_eq!(last_less_or_equal(&items, key(3)), Some(3));
    assert!(matches!(find_equal(&items, key(3)), Some(1..=3)));

    assert_eq!(first_greater_or_equal(&items, key(9)), 6);
    assert_eq!(first_greater(&items, key(0)), 0);
    assert_eq!(last_less(&items, key(1)), None);
    assert_eq!(last_less_or_equal(&items, key(0)), None);
    assert_eq!(last_less_or_equal(&items, key(100)), Some(5));
    assert_eq!(find_equal(&items, key(4)), None);
}

#[test]
fn empty_slice() {
    let items: [u8; 0] = [];
    assert_eq!(first_greater_or_equal(&items, |x| x.cmp(&0)), 0);
    assert_eq!(first_greater(&items, |x| x.cmp(&0)), 0);
    assert_eq!(last_less(&items, |x| x.cmp(&0)), None);
    assert_eq!(last_less_or_equal(&items, |x| x.cmp(&0)), None);
    assert_eq!(find_equal(&items, |x| x.cmp(&0)), None);
}

#[test]
fn matches_std_partition_point() {
    let items: Vec<u32> = (0..100).map(|i| i / 3).collect();
    for k in 0..40 {
        let compare = |x: &u32| x.cmp(&k);
        assert_eq!(
            first_greater_or_equal(&items, compare),
            items.partition_point(|x| *x < k)
        );
        assert_eq!(first_greater(&items, compare), items.partition_point(|x| *x <= k));
        assert_eq!(
            last_less_or_equal(&items, compare),
            items.partition_point(|x| *x <= k).checked_sub(1)
        );
        if let Some(i) = find_equal(&items, compare) {
            assert_eq!(items[i], k);
        }
    }
}

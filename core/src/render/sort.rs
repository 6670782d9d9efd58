//! Depth sorting of faces for the painter's algorithm.

use core::mem;

use super::ProjectedFace;

/// Slices shorter than this are sorted by insertion sort.
pub const INSERTION_THRESHOLD: usize = 20;

/// Sorts `items` in descending order of `key`.
///
/// A quicksort that hands slices shorter than [`INSERTION_THRESHOLD`] over
/// to insertion sort. Recurses only into the shorter partition and loops
/// on the longer one, so the stack depth is logarithmic in the length.
/// Not stable. Incomparable keys such as NaNs end up in arbitrary order.
///
/// # Examples
/// ```
/// use facet_core::render::sort::sort_desc_by_key;
/// let mut depths = [1.0, 5.0, 3.0, 4.0, 2.0];
/// sort_desc_by_key(&mut depths, |&d| d);
/// assert_eq!(depths, [5.0, 4.0, 3.0, 2.0, 1.0]);
/// ```
pub fn sort_desc_by_key<T, K, F>(mut items: &mut [T], key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> K + Copy,
{
    while items.len() >= INSERTION_THRESHOLD {
        let p = partition(items, key);
        let (lo, hi) = mem::take(&mut items).split_at_mut(p);
        let hi = &mut hi[1..];
        if lo.len() < hi.len() {
            sort_desc_by_key(lo, key);
            items = hi;
        } else {
            sort_desc_by_key(hi, key);
            items = lo;
        }
    }
    insertion_sort(items, key);
}

/// Sorts `faces` far to near by their depth.
pub fn sort_faces(faces: &mut [ProjectedFace]) {
    sort_desc_by_key(faces, |f| f.depth);
}

fn insertion_sort<T, K, F>(items: &mut [T], key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && key(&items[j - 1]) < key(&items[j]) {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Partitions `items` around a median-of-three pivot and returns the final
/// index of the pivot. Items before it have greater keys, items after it
/// have smaller or equal keys.
fn partition<T, K, F>(items: &mut [T], key: F) -> usize
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let last = items.len() - 1;
    let mid = items.len() / 2;

    let (a, b, c) = (key(&items[0]), key(&items[mid]), key(&items[last]));
    let median = if (a >= b) == (b >= c) {
        mid
    } else if (b >= a) == (a >= c) {
        0
    } else {
        last
    };
    items.swap(median, last);

    let pivot = key(&items[last]);
    let mut store = 0;
    for i in 0..last {
        if key(&items[i]) > pivot {
            items.swap(i, store);
            store += 1;
        }
    }
    items.swap(store, last);
    store
}

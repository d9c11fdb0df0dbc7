//! In-place block partitioning of keys with their payloads.
//!
//! Works like a two-ended vectorized quicksort partition: one block is buffered from each end to
//! open up free space, then blocks are loaded from whichever side has less free room left and
//! compress-stored to the left and right write cursors. Tracks the observed minimum and maximum
//! key on the way.

use core::ops::Range;

use crate::vector::{Lanes, Mask, SortKey, LANES};

/// Result of [`partition`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Split<K> {
    /// First index of the right side. Everything before it has a key `<=` the pivot, everything
    /// from it on a key `>` the pivot.
    pub index: usize,
    /// Smallest key seen in the range.
    pub min: K,
    /// Largest key seen in the range.
    pub max: K,
}

/// Partitions `keys[range]` around `pivot`, permuting `values[range]` identically.
///
/// Keys `<= pivot` end up before the returned split index, keys `> pivot` after it. For an empty
/// range the split is `range.start` with `min` set to the largest and `max` to the smallest
/// representable key. Float keys must not be NaN.
///
/// Panics if `keys` and `values` differ in length or if `range` is out of bounds.
pub fn partition<K: SortKey>(
    keys: &mut [K],
    values: &mut [u64],
    range: Range<usize>,
    pivot: K,
) -> Split<K> {
    assert_eq!(
        keys.len(),
        values.len(),
        "keys and values must have the same length"
    );

    let start = range.start;
    let (index, min, max) =
        partition_slice::<K, false>(&mut keys[range.clone()], &mut values[range], pivot);

    Split {
        index: start + index,
        min,
        max,
    }
}

/// Keys that belong to the right side. With `STRICT` keys equal to the pivot go right too.
#[inline(always)]
fn right_mask<K: SortKey, const STRICT: bool>(keys: Lanes<K>, pivot: Lanes<K>) -> Mask {
    if STRICT {
        keys.ge(pivot)
    } else {
        keys.gt(pivot)
    }
}

#[inline(always)]
fn goes_right<K: SortKey, const STRICT: bool>(key: K, pivot: K) -> bool {
    if STRICT {
        key >= pivot
    } else {
        key > pivot
    }
}

/// Writes the left keys of one block to `left_store..` and the right keys so they end at
/// `right_end`. Returns how many went right.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
fn partition_block<K: SortKey, const STRICT: bool>(
    keys: &mut [K],
    values: &mut [u64],
    left_store: usize,
    right_end: usize,
    block_keys: Lanes<K>,
    block_values: Lanes<u64>,
    pivot: Lanes<K>,
    bounds: &mut (Lanes<K>, Lanes<K>),
) -> usize {
    let mask = right_mask::<K, STRICT>(block_keys, pivot);
    let amount_right = mask.count_ones() as usize;
    let right_start = right_end - amount_right;

    block_keys.compress_store(!mask, &mut keys[left_store..]);
    block_values.compress_store(!mask, &mut values[left_store..]);
    block_keys.compress_store(mask, &mut keys[right_start..]);
    block_values.compress_store(mask, &mut values[right_start..]);

    bounds.0 = bounds.0.min(block_keys);
    bounds.1 = bounds.1.max(block_keys);

    amount_right
}

/// Partitions the whole slice and returns `(split, min, max)`.
///
/// Without `STRICT` the left side holds keys `<= pivot`, with it keys `< pivot`.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn partition_slice<K: SortKey, const STRICT: bool>(
    keys: &mut [K],
    values: &mut [u64],
    pivot: K,
) -> (usize, K, K) {
    debug_assert_eq!(keys.len(), values.len());

    let len = keys.len();
    let mut min = K::MAX_SENTINEL;
    let mut max = K::MIN_SENTINEL;
    let mut left = 0;
    let mut right = len;

    // Peel off elements one by one until the rest is a whole number of blocks.
    for _ in 0..len % LANES {
        let key = keys[left];
        if key < min {
            min = key;
        }
        if key > max {
            max = key;
        }

        if goes_right::<K, STRICT>(key, pivot) {
            right -= 1;
            keys.swap(left, right);
            values.swap(left, right);
        } else {
            left += 1;
        }
    }

    if left == right {
        return (left, min, max);
    }

    let pivot_vec = Lanes::splat(pivot);
    let mut bounds = (Lanes::splat(min), Lanes::splat(max));

    if right - left == LANES {
        let block_keys = Lanes::load(&keys[left..]);
        let block_values = Lanes::load(&values[left..]);
        let amount_right = partition_block::<K, STRICT>(
            keys,
            values,
            left,
            right,
            block_keys,
            block_values,
            pivot_vec,
            &mut bounds,
        );
        return (
            right - amount_right,
            bounds.0.reduce_min(),
            bounds.1.reduce_max(),
        );
    }

    // Buffer one block from each end, the space they occupied is where the first writes go.
    let first_keys = Lanes::load(&keys[left..]);
    let first_values = Lanes::load(&values[left..]);
    let last_keys = Lanes::load(&keys[right - LANES..]);
    let last_values = Lanes::load(&values[right - LANES..]);

    let mut left_store = left;
    let mut right_store = right - LANES;
    left += LANES;
    right -= LANES;

    while left != right {
        // Read from the side with less free space so neither cursor overtakes unread data.
        let (block_keys, block_values) = if (right_store + LANES) - right < left - left_store {
            right -= LANES;
            (Lanes::load(&keys[right..]), Lanes::load(&values[right..]))
        } else {
            let block = (Lanes::load(&keys[left..]), Lanes::load(&values[left..]));
            left += LANES;
            block
        };

        let amount_right = partition_block::<K, STRICT>(
            keys,
            values,
            left_store,
            right_store + LANES,
            block_keys,
            block_values,
            pivot_vec,
            &mut bounds,
        );
        right_store -= amount_right;
        left_store += LANES - amount_right;
    }

    let amount_right = partition_block::<K, STRICT>(
        keys,
        values,
        left_store,
        right_store + LANES,
        first_keys,
        first_values,
        pivot_vec,
        &mut bounds,
    );
    left_store += LANES - amount_right;

    let amount_right = partition_block::<K, STRICT>(
        keys,
        values,
        left_store,
        left_store + LANES,
        last_keys,
        last_values,
        pivot_vec,
        &mut bounds,
    );
    left_store += LANES - amount_right;

    (left_store, bounds.0.reduce_min(), bounds.1.reduce_max())
}

use tracing::trace;

use crate::heapsort::heapsort;
use crate::network::{small_sort, NETWORK_SORT_THRESHOLD};
use crate::partition::partition_slice;
use crate::pivot::select_pivot;
use crate::vector::SortKey;

/// Recursion budget for a slice of `len` elements, `2 * ceil(log2(len))`.
pub(crate) fn recursion_limit(len: usize) -> u32 {
    if len < 2 {
        return 0;
    }

    2 * (usize::BITS - (len - 1).leading_zeros())
}

/// Sorts `keys` together with `values`, keys must be NaN free.
///
/// `limit` is the number of partitioning levels still allowed before switching to heapsort.
pub(crate) fn quicksort<K: SortKey>(keys: &mut [K], values: &mut [u64], limit: u32) {
    if limit == 0 {
        trace!(len = keys.len(), "recursion budget exhausted, falling back to heapsort");
        heapsort(keys, values);
        return;
    }

    if keys.len() <= NETWORK_SORT_THRESHOLD {
        small_sort(keys, values);
        return;
    }

    let pivot = select_pivot(keys, values);
    let (split, min, max) = partition_slice::<K, false>(keys, values, pivot);

    if max == pivot {
        if min == pivot {
            // All keys are equal.
            return;
        }

        // The pivot is the maximum, so the right side is empty. Split off the keys equal to the
        // pivot instead, they are already in their final place.
        trace!(len = keys.len(), "pivot is the maximum, partitioning out equal keys");
        let (split, _, _) = partition_slice::<K, true>(keys, values, pivot);
        quicksort(&mut keys[..split], &mut values[..split], limit - 1);
        return;
    }

    let (left_keys, right_keys) = keys.split_at_mut(split);
    let (left_values, right_values) = values.split_at_mut(split);

    if min != pivot {
        quicksort(left_keys, left_values, limit - 1);
    }
    quicksort(right_keys, right_values, limit - 1);
}

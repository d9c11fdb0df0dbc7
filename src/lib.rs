//! Vectorized key-value quicksort for `i64`, `u64` and `f64` keys with a `u64` payload.
//!
//! Keys and payloads live in two parallel slices. Sorting permutes both identically, so the
//! payload at index `i` always stays attached to the key it started with.

mod error;
mod heapsort;
mod nan;
mod network;
mod partition;
mod pivot;
mod quicksort;
mod vector;

use tracing::debug;

pub use error::SortError;
pub use heapsort::heapsort;
pub use partition::{partition, Split};
pub use vector::{Lanes, Mask, SortKey, LANES};

/// Sorts `keys` ascending and applies the same permutation to `values`.
///
/// This sort is unstable (i.e., may reorder equal keys and with them their payloads), in-place
/// (i.e., does not allocate), and *O*(*n* \* log(*n*)) worst-case.
///
/// NaN float keys end up at the end. Their count is preserved but which payloads end up next to
/// NaN and which next to `+inf` keys is unspecified.
///
/// # Current implementation
///
/// Quicksort over blocks of eight lanes. Pivots are the median of eight samples, ranges of up to
/// 128 elements are finished with a bitonic sorting network, and once the recursion budget of
/// `2 * ceil(log2(len))` levels runs out the remaining range is heapsorted.
///
/// # Panics
///
/// Panics if `keys` and `values` differ in length. See [`try_sort_keys_with_values`] for a
/// variant that reports this as an error.
///
/// # Examples
///
/// ```
/// let mut keys = [5i64, 3, 3, 1];
/// let mut values = [100u64, 200, 300, 400];
///
/// kv_sort::sort_keys_with_values(&mut keys, &mut values);
/// assert_eq!(keys, [1, 3, 3, 5]);
/// assert_eq!(values[0], 400);
/// assert_eq!(values[3], 100);
/// ```
#[inline]
pub fn sort_keys_with_values<K: SortKey>(keys: &mut [K], values: &mut [u64]) {
    assert_eq!(
        keys.len(),
        values.len(),
        "keys and values must have the same length"
    );

    sort_impl(keys, values);
}

/// Like [`sort_keys_with_values`] but returns [`SortError::LengthMismatch`] instead of panicking
/// when the slices differ in length. Nothing is modified in that case.
#[inline]
pub fn try_sort_keys_with_values<K: SortKey>(
    keys: &mut [K],
    values: &mut [u64],
) -> Result<(), SortError> {
    if keys.len() != values.len() {
        return Err(SortError::LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }

    sort_impl(keys, values);
    Ok(())
}

/// Returns the indices that would sort `keys`, without modifying `keys`.
///
/// Equal keys may appear in any order. NaN keys sort last, after `+inf`.
///
/// # Examples
///
/// ```
/// let order = kv_sort::argsort(&[2.5f64, -1.0, 7.0]);
/// assert_eq!(order, [1, 0, 2]);
/// ```
pub fn argsort<K: SortKey>(keys: &[K]) -> Vec<u64> {
    let mut scratch = keys.to_vec();
    let mut indices: Vec<u64> = (0..keys.len() as u64).collect();
    sort_impl(&mut scratch, &mut indices);

    if scratch.last().is_some_and(is_nan) {
        // NaN and +inf keys share the tail as one group, put the NaN indices last.
        let tail_start = scratch
            .iter()
            .rposition(|k| *k < K::MAX_SENTINEL)
            .map_or(0, |i| i + 1);
        indices[tail_start..].sort_by_key(|i| is_nan(&keys[*i as usize]));
    }

    indices
}

#[inline(always)]
fn is_nan<K: SortKey>(key: &K) -> bool {
    key.partial_cmp(key).is_none()
}

fn sort_impl<K: SortKey>(keys: &mut [K], values: &mut [u64]) {
    let len = keys.len();
    if len < 2 {
        return;
    }

    let nan_count = K::replace_nan_with_sentinel(keys);
    debug!(len, key = K::NAME, nan_count, "sorting keys with values");

    quicksort::quicksort(keys, values, quicksort::recursion_limit(len));

    K::restore_nan(keys, nan_count);
}

//! NaN normalization for float keys.
//!
//! NaN is unordered, so before sorting every NaN key becomes `+inf` and sorts with the largest
//! keys. Afterwards the tail of the sorted keys is overwritten with NaN again, one per replaced
//! key. Payloads are never touched here.

use crate::vector::{prefix_mask, Lanes, LANES};

/// Replaces every NaN in `keys` with `+inf` and returns how many were replaced.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn replace_nan_with_inf(keys: &mut [f64]) -> usize {
    let infinity = Lanes::splat(f64::INFINITY);
    let mut nan_count = 0;

    for chunk in keys.chunks_mut(LANES) {
        let mask = prefix_mask(chunk.len());
        let block = Lanes::masked_load(infinity, mask, chunk);
        // Padding lanes hold +inf and never report NaN.
        let nan_mask = block.ne_mask(block);
        nan_count += nan_mask.count_ones() as usize;
        infinity.masked_store(nan_mask, chunk);
    }

    nan_count
}

/// Overwrites the last `nan_count` keys with NaN.
pub(crate) fn restore_nan(keys: &mut [f64], nan_count: usize) {
    debug_assert!(nan_count <= keys.len());

    let start = keys.len() - nan_count;
    keys[start..].fill(f64::NAN);
}

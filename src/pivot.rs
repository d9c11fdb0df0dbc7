use crate::network::sort_block;
use crate::vector::{Lanes, SortKey, LANES};

/// Picks the pivot for a range as the median of eight evenly spaced samples.
///
/// The samples sit at `step * k` for `k` in `1..=8` with `step = (len - 1) / 8`, they are sorted as
/// one block and lane 4 is returned. The range itself is not modified.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn select_pivot<K: SortKey>(keys: &[K], values: &[u64]) -> K {
    debug_assert!(keys.len() > LANES);

    let step = (keys.len() - 1) / LANES;
    let offsets: [usize; LANES] = core::array::from_fn(|i| step * (i + 1));

    let mut samples = Lanes::gather(keys, &offsets);
    let mut sample_values = Lanes::gather(values, &offsets);
    sort_block(&mut samples, &mut sample_values);

    samples.lane(LANES / 2)
}

//! Bitonic sorting networks over 8-lane blocks.
//!
//! Every compare-exchange carries the `u64` payload in lockstep with its key. Lanes only move when
//! their keys are strictly out of order, so equal keys keep their own payload and bit pattern.

use crate::vector::{prefix_mask, Lanes, Mask, SortKey, LANES};

/// Largest range sorted entirely by the network.
pub(crate) const NETWORK_SORT_THRESHOLD: usize = 128;

const MAX_BLOCKS: usize = NETWORK_SORT_THRESHOLD / LANES;

// Entry `i` of a permutation names the partner lane of lane `i`.
const SWAP_1: [usize; LANES] = [1, 0, 3, 2, 5, 4, 7, 6];
const SWAP_2: [usize; LANES] = [2, 3, 0, 1, 6, 7, 4, 5];
const SWAP_4: [usize; LANES] = [4, 5, 6, 7, 0, 1, 2, 3];
const REVERSE_4: [usize; LANES] = [3, 2, 1, 0, 7, 6, 5, 4];
const REVERSE_8: [usize; LANES] = [7, 6, 5, 4, 3, 2, 1, 0];

type Stage = ([usize; LANES], Mask);

/// Stages of the 8 lane bitonic sorter. A set mask bit makes that lane keep the larger key of its
/// pair.
const SORT_8_STAGES: [Stage; 6] = [
    (SWAP_1, 0xAA),
    (REVERSE_4, 0xCC),
    (SWAP_1, 0xAA),
    (REVERSE_8, 0xF0),
    (SWAP_2, 0xCC),
    (SWAP_1, 0xAA),
];

/// Half-cleaners at distance 4, 2 and 1. Sorts a block holding a bitonic sequence.
const MERGE_8_STAGES: [Stage; 3] = [(SWAP_4, 0xF0), (SWAP_2, 0xCC), (SWAP_1, 0xAA)];

/// Compare-and-carry against a partner block. Lanes selected by `max_mask` keep the larger key,
/// the rest keep the smaller one. A lane takes the partner key and payload only if the partner is
/// strictly better in that lane's direction.
#[inline(always)]
fn compare_and_carry<K: SortKey>(
    keys: Lanes<K>,
    partner_keys: Lanes<K>,
    values: Lanes<u64>,
    partner_values: Lanes<u64>,
    max_mask: Mask,
) -> (Lanes<K>, Lanes<u64>) {
    let take_partner =
        (partner_keys.lt(keys) & !max_mask) | (keys.lt(partner_keys) & max_mask);

    (
        keys.select(take_partner, partner_keys),
        values.select(take_partner, partner_values),
    )
}

#[inline(always)]
fn apply_stages<K: SortKey>(keys: &mut Lanes<K>, values: &mut Lanes<u64>, stages: &[Stage]) {
    for (perm, max_mask) in stages {
        let (k, v) = compare_and_carry(
            *keys,
            keys.permute(perm),
            *values,
            values.permute(perm),
            *max_mask,
        );
        *keys = k;
        *values = v;
    }
}

/// Sorts the eight lanes of one block ascending, payload following its key.
#[inline(always)]
pub(crate) fn sort_block<K: SortKey>(keys: &mut Lanes<K>, values: &mut Lanes<u64>) {
    apply_stages(keys, values, &SORT_8_STAGES);
}

/// Sorts a block whose lanes hold a bitonic sequence.
#[inline(always)]
fn merge_block<K: SortKey>(keys: &mut Lanes<K>, values: &mut Lanes<u64>) {
    apply_stages(keys, values, &MERGE_8_STAGES);
}

/// Lane-wise compare-exchange between blocks `a < b`, the smaller keys end up in `a`.
#[inline(always)]
fn exchange_blocks<K: SortKey>(
    keys: &mut [Lanes<K>],
    values: &mut [Lanes<u64>],
    a: usize,
    b: usize,
) {
    let swap = keys[b].lt(keys[a]);
    let (ka, kb) = (keys[a], keys[b]);
    let (va, vb) = (values[a], values[b]);

    keys[a] = ka.select(swap, kb);
    keys[b] = kb.select(swap, ka);
    values[a] = va.select(swap, vb);
    values[b] = vb.select(swap, va);
}

/// Merges two sorted halves of a power of two number of blocks into one sorted sequence.
fn merge_blocks<K: SortKey>(keys: &mut [Lanes<K>], values: &mut [Lanes<u64>]) {
    let n = keys.len();
    let half = n / 2;
    debug_assert!(n.is_power_of_two() && n >= 2);

    // Pair the low half against the mirrored high half. The high results are written back
    // reversed so the upper half ends up holding a bitonic sequence.
    for i in 0..half {
        let j = n - 1 - i;
        let mirrored_keys = keys[j].permute(&REVERSE_8);
        let mirrored_values = values[j].permute(&REVERSE_8);
        let swap = mirrored_keys.lt(keys[i]);

        let lo_keys = keys[i].select(swap, mirrored_keys);
        let hi_keys = mirrored_keys.select(swap, keys[i]);
        let lo_values = values[i].select(swap, mirrored_values);
        let hi_values = mirrored_values.select(swap, values[i]);

        keys[i] = lo_keys;
        values[i] = lo_values;
        keys[j] = hi_keys.permute(&REVERSE_8);
        values[j] = hi_values.permute(&REVERSE_8);
    }

    let mut dist = half / 2;
    while dist > 0 {
        for group in (0..n).step_by(2 * dist) {
            for i in group..group + dist {
                exchange_blocks(keys, values, i, i + dist);
            }
        }
        dist /= 2;
    }

    for (k, v) in keys.iter_mut().zip(values.iter_mut()) {
        merge_block(k, v);
    }
}

/// Sorts a power of two number of blocks as one sequence.
fn sort_blocks<K: SortKey>(keys: &mut [Lanes<K>], values: &mut [Lanes<u64>]) {
    let n = keys.len();
    if n == 1 {
        sort_block(&mut keys[0], &mut values[0]);
        return;
    }

    let half = n / 2;
    {
        let (keys_lo, keys_hi) = keys.split_at_mut(half);
        let (values_lo, values_hi) = values.split_at_mut(half);
        sort_blocks(keys_lo, values_lo);
        sort_blocks(keys_hi, values_hi);
    }
    merge_blocks(keys, values);
}

/// Moves every element whose key equals the padding sentinel to the end of the range and returns
/// the length of the remaining prefix.
///
/// Padding lanes compare equal to these keys, so they are kept out of the network to guarantee
/// that no real payload is ever exchanged with a padding lane.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
fn move_sentinels_to_tail<K: SortKey>(keys: &mut [K], values: &mut [u64]) -> usize {
    let mut len = keys.len();
    let mut i = 0;
    while i < len {
        if keys[i] == K::MAX_SENTINEL {
            len -= 1;
            keys.swap(i, len);
            values.swap(i, len);
        } else {
            i += 1;
        }
    }

    len
}

/// Sorts a range of at most [`NETWORK_SORT_THRESHOLD`] elements with the bitonic network.
///
/// The range is padded to a power of two number of blocks with the sentinel key.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn small_sort<K: SortKey>(keys: &mut [K], values: &mut [u64]) {
    debug_assert!(keys.len() <= NETWORK_SORT_THRESHOLD);
    debug_assert_eq!(keys.len(), values.len());

    let len = move_sentinels_to_tail(keys, values);
    if len < 2 {
        return;
    }

    let keys = &mut keys[..len];
    let values = &mut values[..len];

    let block_count = len.div_ceil(LANES).next_power_of_two();
    let key_padding = Lanes::splat(K::MAX_SENTINEL);
    let value_padding = Lanes::splat(0u64);

    let mut key_blocks = [key_padding; MAX_BLOCKS];
    let mut value_blocks = [value_padding; MAX_BLOCKS];

    for b in 0..block_count {
        let start = (b * LANES).min(len);
        let mask = prefix_mask(len - start);
        key_blocks[b] = Lanes::masked_load(key_padding, mask, &keys[start..]);
        value_blocks[b] = Lanes::masked_load(value_padding, mask, &values[start..]);
    }

    sort_blocks(
        &mut key_blocks[..block_count],
        &mut value_blocks[..block_count],
    );

    for b in 0..block_count {
        let start = (b * LANES).min(len);
        let mask = prefix_mask(len - start);
        key_blocks[b].masked_store(mask, &mut keys[start..]);
        value_blocks[b].masked_store(mask, &mut values[start..]);
    }
}

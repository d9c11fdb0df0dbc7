/// Sorts `keys` ascending with heapsort, permuting `values` identically.
///
/// Guaranteed `O(n * log(n))` worst case and used as the fallback once quicksort runs out of its
/// recursion budget. Float keys must not be NaN.
///
/// Panics if `keys` and `values` differ in length.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub fn heapsort<K: crate::SortKey>(keys: &mut [K], values: &mut [u64]) {
    assert_eq!(
        keys.len(),
        values.len(),
        "keys and values must have the same length"
    );

    // This binary heap respects the invariant `parent >= child`.
    let sift_down = |keys: &mut [K], values: &mut [u64], mut node: usize| loop {
        // Children of `node`.
        let mut child = 2 * node + 1;
        if child >= keys.len() {
            break;
        }

        // Choose the greater child.
        if child + 1 < keys.len() && keys[child] < keys[child + 1] {
            child += 1;
        }

        // Stop if the invariant holds at `node`.
        if keys[node] >= keys[child] {
            break;
        }

        keys.swap(node, child);
        values.swap(node, child);
        node = child;
    };

    let len = keys.len();

    // Build the heap in linear time.
    for i in (0..len / 2).rev() {
        sift_down(keys, values, i);
    }

    // Pop maximal elements from the heap.
    for i in (1..len).rev() {
        keys.swap(0, i);
        values.swap(0, i);
        sift_down(&mut keys[..i], &mut values[..i], 0);
    }
}

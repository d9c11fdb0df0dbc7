/// Splits fuzzer input into 16 byte records, each one key followed by its payload.
/// Trailing bytes that don't fill a record are ignored.
pub fn u8_as_pairs<K>(data: &[u8], key_from_bits: impl Fn(u64) -> K) -> (Vec<K>, Vec<u64>) {
    data.chunks_exact(16)
        .map(|record| {
            let (key, value) = record.split_at(8);
            (
                key_from_bits(u64::from_le_bytes(key.try_into().unwrap())),
                u64::from_le_bytes(value.try_into().unwrap()),
            )
        })
        .unzip()
}

/// Checks the sorted output against the input. NaN and +inf keys share a tail group whose
/// payloads may be exchanged, every other key must keep its payload.
pub fn check_sorted<K: Copy + PartialOrd + std::fmt::Debug>(
    orig_keys: &[K],
    orig_values: &[u64],
    keys: &[K],
    values: &[u64],
    bucket: impl Fn(K) -> Option<u64>,
) {
    assert_eq!(keys.len(), orig_keys.len());

    let sortable = keys.iter().take_while(|k| k.partial_cmp(k).is_some()).count();
    assert!(keys[sortable..].iter().all(|k| k.partial_cmp(k).is_none()));
    assert!(keys[..sortable].windows(2).all(|w| w[0] <= w[1]), "{keys:?}");

    let pairs = |keys: &[K], values: &[u64]| {
        let mut pairs: Vec<(Option<u64>, u64)> = keys
            .iter()
            .zip(values)
            .map(|(k, v)| (bucket(*k), *v))
            .collect();
        pairs.sort_unstable();
        pairs
    };
    assert_eq!(pairs(keys, values), pairs(orig_keys, orig_values));
}

#![no_main]

use libfuzzer_sys::fuzz_target;

use fuzz_util::{check_sorted, u8_as_pairs};

fuzz_target!(|data: &[u8]| {
    let (orig_keys, orig_values) = u8_as_pairs(data, |bits| bits as i64);
    let mut keys = orig_keys.clone();
    let mut values = orig_values.clone();

    kv_sort::sort_keys_with_values(&mut keys, &mut values);

    check_sorted(&orig_keys, &orig_values, &keys, &values, |k: i64| Some(k as u64));
});

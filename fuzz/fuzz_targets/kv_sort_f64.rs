#![no_main]

use libfuzzer_sys::fuzz_target;

use fuzz_util::{check_sorted, u8_as_pairs};

fuzz_target!(|data: &[u8]| {
    let (orig_keys, orig_values) = u8_as_pairs(data, f64::from_bits);
    let mut keys = orig_keys.clone();
    let mut values = orig_values.clone();

    kv_sort::sort_keys_with_values(&mut keys, &mut values);

    // NaN and +inf payloads may be exchanged, both land in the same bucket.
    check_sorted(&orig_keys, &orig_values, &keys, &values, |k: f64| {
        (!k.is_nan() && k != f64::INFINITY).then_some(k.to_bits())
    });
});

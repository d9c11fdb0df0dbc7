use std::cmp::Ordering;
use std::fmt::Debug;

/// A sort over parallel key and payload slices, one entry point per supported key type.
pub trait KeyValueSort {
    fn name() -> String;

    fn sort_i64(keys: &mut [i64], values: &mut [u64]);

    fn sort_u64(keys: &mut [u64], values: &mut [u64]);

    fn sort_f64(keys: &mut [f64], values: &mut [u64]);
}

/// Key types the test suite is instantiated for.
pub trait TestKey: Copy + PartialOrd + Debug + 'static {
    const NAME: &'static str;

    const MIN: Self;
    const MAX: Self;

    /// Order preserving conversion from the `i64` values the patterns produce.
    fn from_i64(val: i64) -> Self;

    /// Total order used as reference, NaN sorts last and equal to other NaN.
    fn key_cmp(&self, other: &Self) -> Ordering;

    /// Keys that share the tail of the output with NaN, their payloads may be interleaved.
    fn is_top(&self) -> bool {
        false
    }

    fn sort_with<S: KeyValueSort>(keys: &mut [Self], values: &mut [u64]);
}

impl TestKey for i64 {
    const NAME: &'static str = "i64";
    const MIN: Self = i64::MIN;
    const MAX: Self = i64::MAX;

    fn from_i64(val: i64) -> Self {
        val
    }

    fn key_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn sort_with<S: KeyValueSort>(keys: &mut [Self], values: &mut [u64]) {
        S::sort_i64(keys, values);
    }
}

impl TestKey for u64 {
    const NAME: &'static str = "u64";
    const MIN: Self = u64::MIN;
    const MAX: Self = u64::MAX;

    fn from_i64(val: i64) -> Self {
        // Flipping the sign bit maps the i64 order onto the u64 order.
        (val as u64) ^ (1 << 63)
    }

    fn key_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn sort_with<S: KeyValueSort>(keys: &mut [Self], values: &mut [u64]) {
        S::sort_u64(keys, values);
    }
}

impl TestKey for f64 {
    const NAME: &'static str = "f64";
    const MIN: Self = f64::NEG_INFINITY;
    const MAX: Self = f64::INFINITY;

    fn from_i64(val: i64) -> Self {
        val as f64
    }

    fn key_cmp(&self, other: &Self) -> Ordering {
        match (self.is_nan(), other.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.partial_cmp(other).unwrap_or(Ordering::Equal),
        }
    }

    fn is_top(&self) -> bool {
        self.is_nan() || *self == f64::INFINITY
    }

    fn sort_with<S: KeyValueSort>(keys: &mut [Self], values: &mut [u64]) {
        S::sort_f64(keys, values);
    }
}

pub mod patterns;

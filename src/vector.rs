//! Fixed-width lane blocks and the per-key-type capabilities the sorting kernels build on.
//!
//! A [`Lanes`] value is the register-block view of eight consecutive array elements. Every
//! operation is a pure lane-wise transformation written without data dependent branches, so the
//! optimizer can lower it to wide vector instructions. Lane `i` corresponds to bit `i` of a
//! [`Mask`].

use core::fmt::Debug;

/// Number of lanes in one register block.
pub const LANES: usize = 8;

/// One bit per lane, bit `i` selects lane `i`.
pub type Mask = u8;

/// Mask selecting every lane.
pub const FULL_MASK: Mask = 0xFF;

/// Returns a mask selecting the first `len` lanes. Values of `len` larger than [`LANES`] select
/// all lanes.
#[inline(always)]
pub const fn prefix_mask(len: usize) -> Mask {
    if len >= LANES {
        FULL_MASK
    } else {
        ((1u16 << len) - 1) as Mask
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for f64 {}
}

/// Key types the vectorized key-value sort supports.
///
/// Implemented for `i64`, `u64` and `f64`. The trait is sealed, the kernels rely on the keys
/// forming a total order once NaN values have been normalized.
pub trait SortKey: Copy + PartialOrd + Debug + Send + Sync + private::Sealed + 'static {
    /// Largest representable value, used to pad partial blocks. `+inf` for floats.
    const MAX_SENTINEL: Self;

    /// Smallest representable value. `-inf` for floats.
    const MIN_SENTINEL: Self;

    /// Type name reported in diagnostics.
    const NAME: &'static str;

    /// Replaces every NaN in `keys` with [`Self::MAX_SENTINEL`] and returns how many were
    /// replaced.
    #[inline(always)]
    fn replace_nan_with_sentinel(_keys: &mut [Self]) -> usize {
        0
    }

    /// Overwrites the last `nan_count` keys with NaN.
    #[inline(always)]
    fn restore_nan(_keys: &mut [Self], _nan_count: usize) {}
}

impl SortKey for i64 {
    const MAX_SENTINEL: Self = i64::MAX;
    const MIN_SENTINEL: Self = i64::MIN;
    const NAME: &'static str = "i64";
}

impl SortKey for u64 {
    const MAX_SENTINEL: Self = u64::MAX;
    const MIN_SENTINEL: Self = u64::MIN;
    const NAME: &'static str = "u64";
}

impl SortKey for f64 {
    const MAX_SENTINEL: Self = f64::INFINITY;
    const MIN_SENTINEL: Self = f64::NEG_INFINITY;
    const NAME: &'static str = "f64";

    #[inline(always)]
    fn replace_nan_with_sentinel(keys: &mut [Self]) -> usize {
        crate::nan::replace_nan_with_inf(keys)
    }

    #[inline(always)]
    fn restore_nan(keys: &mut [Self], nan_count: usize) {
        crate::nan::restore_nan(keys, nan_count);
    }
}

/// Eight lanes of `T`, aligned like a 512-bit register.
///
/// Used both for keys and for the `u64` payload travelling with them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C, align(64))]
pub struct Lanes<T>(pub [T; LANES]);

impl<T> Lanes<T>
where
    T: Copy + PartialOrd,
{
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self([value; LANES])
    }

    /// Loads the first [`LANES`] elements of `src`.
    ///
    /// Panics if `src` is shorter than [`LANES`].
    #[inline(always)]
    pub fn load(src: &[T]) -> Self {
        let src = &src[..LANES];
        Self(core::array::from_fn(|i| src[i]))
    }

    /// Loads lane `i` from `src[i]` where `mask` selects it, otherwise from `fallback`.
    ///
    /// `src` only needs to cover the selected lanes.
    #[inline(always)]
    pub fn masked_load(fallback: Self, mask: Mask, src: &[T]) -> Self {
        Self(core::array::from_fn(|i| {
            if mask & (1 << i) != 0 {
                src[i]
            } else {
                fallback.0[i]
            }
        }))
    }

    /// Stores all lanes into the first [`LANES`] elements of `dst`.
    #[inline(always)]
    pub fn store(self, dst: &mut [T]) {
        dst[..LANES].copy_from_slice(&self.0);
    }

    /// Stores the lanes selected by `mask` into the matching positions of `dst`, leaving the
    /// others untouched. `dst` only needs to cover the selected lanes.
    #[inline(always)]
    pub fn masked_store(self, mask: Mask, dst: &mut [T]) {
        for i in 0..LANES {
            if mask & (1 << i) != 0 {
                dst[i] = self.0[i];
            }
        }
    }

    /// Writes the lanes selected by `mask` contiguously to the start of `dst`, in lane order.
    /// Returns how many were written.
    #[inline(always)]
    pub fn compress_store(self, mask: Mask, dst: &mut [T]) -> usize {
        let mut packed = self.0;
        let mut count = 0;
        for i in 0..LANES {
            packed[count] = self.0[i];
            count += ((mask >> i) & 1) as usize;
        }

        dst[..count].copy_from_slice(&packed[..count]);
        count
    }

    /// Loads lane `i` from `src[offsets[i]]`.
    #[inline(always)]
    pub fn gather(src: &[T], offsets: &[usize; LANES]) -> Self {
        Self(core::array::from_fn(|i| src[offsets[i]]))
    }

    /// Output lane `i` is input lane `idx[i]`.
    #[inline(always)]
    pub fn permute(self, idx: &[usize; LANES]) -> Self {
        Self(core::array::from_fn(|i| self.0[idx[i] & (LANES - 1)]))
    }

    /// Exchanges each even lane with its odd neighbour.
    #[inline(always)]
    pub fn swap_adjacent(self) -> Self {
        Self(core::array::from_fn(|i| self.0[i ^ 1]))
    }

    /// Lane-wise blend, lanes selected by `mask` come from `other`.
    #[inline(always)]
    pub fn select(self, mask: Mask, other: Self) -> Self {
        Self(core::array::from_fn(|i| {
            if mask & (1 << i) != 0 {
                other.0[i]
            } else {
                self.0[i]
            }
        }))
    }

    /// Lane-wise minimum, ties keep `self`.
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        self.select(other.lt(self), other)
    }

    /// Lane-wise maximum, ties keep `self`.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        self.select(self.lt(other), other)
    }

    #[inline(always)]
    pub fn lt(self, other: Self) -> Mask {
        self.compare(other, |a, b| a < b)
    }

    #[inline(always)]
    pub fn le(self, other: Self) -> Mask {
        self.compare(other, |a, b| a <= b)
    }

    #[inline(always)]
    pub fn gt(self, other: Self) -> Mask {
        self.compare(other, |a, b| a > b)
    }

    #[inline(always)]
    pub fn ge(self, other: Self) -> Mask {
        self.compare(other, |a, b| a >= b)
    }

    #[inline(always)]
    pub fn eq_mask(self, other: Self) -> Mask {
        self.compare(other, |a, b| a == b)
    }

    /// Lanes that compare unequal. `v.ne_mask(v)` selects the NaN lanes of a float block.
    #[inline(always)]
    pub fn ne_mask(self, other: Self) -> Mask {
        self.compare(other, |a, b| a != b)
    }

    #[inline(always)]
    pub fn reduce_min(self) -> T {
        let mut acc = self.0[0];
        for &lane in &self.0[1..] {
            if lane < acc {
                acc = lane;
            }
        }
        acc
    }

    #[inline(always)]
    pub fn reduce_max(self) -> T {
        let mut acc = self.0[0];
        for &lane in &self.0[1..] {
            if lane > acc {
                acc = lane;
            }
        }
        acc
    }

    #[inline(always)]
    pub fn lane(self, i: usize) -> T {
        self.0[i]
    }

    #[inline(always)]
    fn compare(self, other: Self, op: impl Fn(T, T) -> bool) -> Mask {
        let mut mask: Mask = 0;
        for i in 0..LANES {
            mask |= (op(self.0[i], other.0[i]) as Mask) << i;
        }
        mask
    }
}

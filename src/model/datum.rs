//! Contracts for the values a graph carries: node data, edge data, weights.

use std::fmt::Debug;

/// Merge another value of the same kind into `self`.
///
/// This is the `+=` used when a node absorbs another node, and when two
/// parallel edges collapse into one during a contraction.
pub trait Accumulate {
    fn accumulate(&mut self, other: &Self);
}

macro_rules! impl_accumulate_for_numbers {
    ($($t:ty),* $(,)?) => {
        $(
            impl Accumulate for $t {
                #[inline]
                fn accumulate(&mut self, other: &Self) {
                    *self += *other;
                }
            }
        )*
    };
}

impl_accumulate_for_numbers!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Accumulate for () {
    #[inline]
    fn accumulate(&mut self, _other: &Self) {}
}

/// Anything that can live on a node or an edge.
pub trait Datum: Clone + Default + Accumulate {}

impl<T: Clone + Default + Accumulate> Datum for T {}

/// Edge weight type.
///
/// Only a partial order is required so that `f32`/`f64` qualify. NaN weights
/// are accepted but their position in the queue is unspecified.
pub trait Weight: Copy + PartialOrd + Debug {}

impl<T: Copy + PartialOrd + Debug> Weight for T {}

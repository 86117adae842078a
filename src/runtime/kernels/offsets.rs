//! Per-thread offset resolution

use crate::runtime::params::{IndexParams, OffsetParams};
use crate::tensor::{DataOffsets, OffsetComponent, PackedStride};

/// Decode `thread_index` into its offset triple
///
/// Treats the id as a mixed-radix number whose digits have radices
/// `iter_shape` (dimension 0 fastest), and sums `digit * strides[dim]`
/// component-wise in a single pass. No bounds checking: an id at or past
/// `product(iter_shape)` wraps silently.
#[inline]
pub fn resolve_offsets(
    thread_index: u32,
    iter_shape: &[u32],
    strides: &[PackedStride],
) -> DataOffsets {
    let mut offsets = DataOffsets::default();
    let mut idx = thread_index;
    for (&extent, &stride) in iter_shape.iter().zip(strides) {
        let remainder = idx % extent;
        idx /= extent;
        offsets = offsets.advance(remainder, stride);
    }
    offsets
}

/// Offset precompute: the direct offset triple of one thread id
///
/// No indirect indexing and no copy; the caller stores the result in slot
/// `thread_index` of its output array.
#[inline]
pub fn index_offsets(params: &OffsetParams<'_>, thread_index: u32) -> DataOffsets {
    resolve_offsets(thread_index, params.iter_shape, params.strides)
}

/// Offset precompute for a single component of the triple
#[inline]
pub fn index_offset_component(
    params: &OffsetParams<'_>,
    component: OffsetComponent,
    thread_index: u32,
) -> u32 {
    index_offsets(params, thread_index).component(component)
}

/// Map a possibly negative index into `[0, size)`
///
/// Only a single wrap is applied: valid inputs are `[-size, size)`.
#[inline]
pub fn normalize_index(index: i64, size: i64) -> i64 {
    if index < 0 {
        index.wrapping_add(size)
    } else {
        index
    }
}

/// Byte offset contributed by the indexed dimensions
///
/// For each indexed dimension `i`, reads the entry at `aux / 8` of index
/// array `i`, wraps it if negative, and accumulates `index * index_strides[i]`
/// in 64-bit arithmetic.
#[inline]
pub fn indirect_offset(params: &IndexParams<'_>, aux: u32) -> i64 {
    let slot = aux as usize / size_of::<i64>();
    (0..params.num_indices as usize).fold(0i64, |offset, i| {
        let index = normalize_index(params.indices.get(i)[slot], params.index_sizes[i]);
        offset.wrapping_add(index.wrapping_mul(params.index_strides[i]))
    })
}

/// Add a signed indirect offset to a direct byte offset
///
/// # Panics
///
/// Panics if the resulting address is negative.
#[inline]
pub(crate) fn displace(base: u32, offset: i64) -> usize {
    let address = i64::from(base).wrapping_add(offset);
    usize::try_from(address)
        .unwrap_or_else(|_| panic!("indexed byte address {address} is out of range"))
}

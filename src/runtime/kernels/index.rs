//! Indexed gather/scatter kernels
//!
//! Each function is the body of one grid thread: it resolves the thread's
//! offsets, adds the indirect contribution of the indexed dimensions, and
//! moves exactly one element. None of them check bounds beyond what is needed
//! for memory safety; a violated launch contract panics the thread.

use super::offsets::{displace, indirect_offset, resolve_offsets};
use crate::dtype::Element;
use crate::runtime::atomic::{EmulatedAtomicAdd, NativeAtomicAdd, atomic_fetch_add_relaxed};
use crate::runtime::params::IndexParams;
use crate::tensor::DeviceBuffer;

/// Read one unaligned element of type `T` from `input` at `byte_offset`
///
/// # Panics
///
/// Panics if the element extends past the end of `input`.
#[inline]
pub fn load_element<T: Element>(input: &[u8], byte_offset: usize) -> T {
    let end = byte_offset + size_of::<T>();
    bytemuck::pod_read_unaligned(&input[byte_offset..end])
}

/// Gather: `output[out] = input[in + indirect]`
///
/// The indirect offset displaces the read; the write goes to the thread's
/// own output slot, so gather threads never contend.
#[inline]
pub fn index_select<T: Element>(
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
    thread_index: u32,
) {
    let offsets = resolve_offsets(thread_index, params.iter_shape, params.strides);
    let offset = indirect_offset(params, offsets.aux);
    let value: T = load_element(input, displace(offsets.input, offset));
    output.store(offsets.output as usize, value);
}

/// Scatter: `output[out + indirect] = input[in]`
///
/// Threads that resolve to the same destination race; one of the written
/// values survives, with no defined winner.
#[inline]
pub fn index_put<T: Element>(
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
    thread_index: u32,
) {
    let offsets = resolve_offsets(thread_index, params.iter_shape, params.strides);
    let offset = indirect_offset(params, offsets.aux);
    let value: T = load_element(input, offsets.input as usize);
    output.store(displace(offsets.output, offset), value);
}

/// Accumulating scatter through a native atomic add
///
/// `output[out + indirect] += input[in]` as one relaxed fetch-add on slot
/// type `A`.
#[inline]
pub fn index_put_accumulate_native<A: NativeAtomicAdd>(
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
    thread_index: u32,
) {
    let offsets = resolve_offsets(thread_index, params.iter_shape, params.strides);
    let offset = indirect_offset(params, offsets.aux);
    let value: A::Value = load_element(input, offsets.input as usize);
    output
        .slot::<A>(displace(offsets.output, offset))
        .fetch_add_relaxed(value);
}

/// Accumulating scatter through a compare-and-swap emulated atomic add
///
/// `output[out + indirect] += input[in]`, where the destination holds the
/// bit pattern of a `T` inside an unsigned atomic slot.
#[inline]
pub fn index_put_accumulate_emulated<T: EmulatedAtomicAdd>(
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
    thread_index: u32,
) {
    let offsets = resolve_offsets(thread_index, params.iter_shape, params.strides);
    let offset = indirect_offset(params, offsets.aux);
    let value: T = load_element(input, offsets.input as usize);
    atomic_fetch_add_relaxed(output.slot::<T::Slot>(displace(offsets.output, offset)), value);
}

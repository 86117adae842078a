//! Atomic primitives used by accumulating scatters
//!
//! Two families are provided:
//!
//! - [`NativeAtomicAdd`]: the substrate has a fetch-add for the element type
//!   (32/64-bit integers). One relaxed `fetch_add` per update.
//! - [`EmulatedAtomicAdd`]: no fetch-add exists for the numeric type, so the
//!   value lives as a bit pattern inside an unsigned atomic slot and the add is
//!   a weak compare-and-swap loop ([`atomic_fetch_add_relaxed`]).
//!
//! All operations use relaxed ordering. Only the read-modify-write of a
//! single slot is atomic; nothing is ordered relative to other addresses.

use crate::dtype::Element;
use std::sync::atomic::{
    AtomicI32, AtomicI64, AtomicU8, AtomicU16, AtomicU32, AtomicU64, Ordering,
};

/// An atomic storage slot with the same size and alignment as its bit pattern
///
/// Implemented for the std atomics kernels write through. The layout
/// guarantee lets a `DeviceBuffer` hand out `&Self` at any aligned byte
/// offset.
pub trait AtomicSlot: Send + Sync + Sized {
    /// Plain integer stored in the slot
    type Bits: Copy + Eq;

    /// Atomic load
    fn load(&self, order: Ordering) -> Self::Bits;

    /// Atomic store
    fn store(&self, value: Self::Bits, order: Ordering);

    /// Weak compare-and-swap; may fail spuriously
    fn compare_exchange_weak(
        &self,
        current: Self::Bits,
        new: Self::Bits,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self::Bits, Self::Bits>;
}

macro_rules! impl_atomic_slot {
    ($($atomic:ty => $bits:ty),* $(,)?) => {
        $(
            impl AtomicSlot for $atomic {
                type Bits = $bits;

                #[inline]
                fn load(&self, order: Ordering) -> $bits {
                    <$atomic>::load(self, order)
                }

                #[inline]
                fn store(&self, value: $bits, order: Ordering) {
                    <$atomic>::store(self, value, order)
                }

                #[inline]
                fn compare_exchange_weak(
                    &self,
                    current: $bits,
                    new: $bits,
                    success: Ordering,
                    failure: Ordering,
                ) -> Result<$bits, $bits> {
                    <$atomic>::compare_exchange_weak(self, current, new, success, failure)
                }
            }
        )*
    };
}

impl_atomic_slot! {
    AtomicU8 => u8,
    AtomicU16 => u16,
    AtomicU32 => u32,
    AtomicU64 => u64,
    AtomicI32 => i32,
    AtomicI64 => i64,
}

/// Atomic slots with a hardware fetch-add
pub trait NativeAtomicAdd: AtomicSlot {
    /// Value type read from the input buffer and added to the slot
    type Value: Element;

    /// Relaxed fetch-add, returning the previous value
    ///
    /// Integer overflow wraps.
    fn fetch_add_relaxed(&self, value: Self::Value) -> Self::Value;
}

macro_rules! impl_native_atomic_add {
    ($($atomic:ty => $value:ty),* $(,)?) => {
        $(
            impl NativeAtomicAdd for $atomic {
                type Value = $value;

                #[inline]
                fn fetch_add_relaxed(&self, value: $value) -> $value {
                    self.fetch_add(value, Ordering::Relaxed)
                }
            }
        )*
    };
}

impl_native_atomic_add! {
    AtomicI32 => i32,
    AtomicU32 => u32,
    AtomicI64 => i64,
}

/// Element types whose atomic add is emulated through a bit-reinterpreted slot
///
/// The conversions must be pure reinterpretations: no rounding, NaN payloads
/// and signed zeros preserved.
pub trait EmulatedAtomicAdd: Element {
    /// Unsigned atomic slot of the same width
    type Slot: AtomicSlot;

    /// Reinterpret the value as the slot's bit pattern
    fn into_slot_bits(self) -> <Self::Slot as AtomicSlot>::Bits;

    /// Reinterpret a slot bit pattern as a value
    fn from_slot_bits(bits: <Self::Slot as AtomicSlot>::Bits) -> Self;
}

impl EmulatedAtomicAdd for f32 {
    type Slot = AtomicU32;

    #[inline]
    fn into_slot_bits(self) -> u32 {
        self.to_bits()
    }

    #[inline]
    fn from_slot_bits(bits: u32) -> Self {
        f32::from_bits(bits)
    }
}

/// Atomically add `value` to the number stored as a bit pattern in `slot`
///
/// Loads the current pattern, adds in the value domain, and publishes the sum
/// with a weak compare-and-swap. On failure the sum is recomputed from the
/// pattern the CAS observed, never from the stale one, so no update is lost.
/// The loop only exits on success; under pathological contention it can spin.
///
/// Returns the value the slot held immediately before this update.
#[inline]
pub fn atomic_fetch_add_relaxed<T: EmulatedAtomicAdd>(slot: &T::Slot, value: T) -> T {
    let mut expected = slot.load(Ordering::Relaxed);
    let mut updated = T::from_slot_bits(expected) + value;
    while let Err(observed) = slot.compare_exchange_weak(
        expected,
        updated.into_slot_bits(),
        Ordering::Relaxed,
        Ordering::Relaxed,
    ) {
        expected = observed;
        updated = T::from_slot_bits(expected) + value;
    }
    T::from_slot_bits(expected)
}

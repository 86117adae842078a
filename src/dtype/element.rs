//! Element trait for mapping Rust types to DType

use super::DType;
use crate::runtime::atomic::AtomicSlot;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::Add;
use std::sync::atomic::{AtomicU8, AtomicU16, AtomicU32, AtomicU64};

/// Unsigned bit-pattern types that back an element's atomic storage slot
///
/// Every element width (8/16/32/64) maps to exactly one unsigned integer,
/// which in turn maps to the atomic type kernels use to write it.
pub trait AtomicBits: Pod + Eq + Send + Sync {
    /// Atomic slot holding this bit pattern
    type Atomic: AtomicSlot<Bits = Self>;
}

impl AtomicBits for u8 {
    type Atomic = AtomicU8;
}

impl AtomicBits for u16 {
    type Atomic = AtomicU16;
}

impl AtomicBits for u32 {
    type Atomic = AtomicU32;
}

impl AtomicBits for u64 {
    type Atomic = AtomicU64;
}

/// Trait for types that can be moved by the indexing kernels
///
/// This trait connects Rust's type system to the runtime dtype tags.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe reinterpretation to and from bytes (bytemuck)
/// - `Add` - Accumulating scatters add values of this type
pub trait Element:
    Copy + Send + Sync + Pod + Zeroable + 'static + Add<Output = Self> + PartialEq + Debug
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Unsigned type with the same width, used for atomic stores
    type Bits: AtomicBits;

    /// Reinterpret the value as its raw bit pattern (no conversion)
    #[inline]
    fn to_bit_pattern(self) -> Self::Bits {
        bytemuck::cast(self)
    }

    /// Reinterpret a raw bit pattern as a value (no conversion)
    #[inline]
    fn from_bit_pattern(bits: Self::Bits) -> Self {
        bytemuck::cast(bits)
    }
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident, $bits:ty);* $(;)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
                type Bits = $bits;
            }
        )*
    };
}

impl_element! {
    f64 => F64, u64;
    f32 => F32, u32;
    i64 => I64, u64;
    i32 => I32, u32;
    i16 => I16, u16;
    i8 => I8, u8;
    u64 => U64, u64;
    u32 => U32, u32;
    u16 => U16, u16;
    u8 => U8, u8;
}

#[cfg(feature = "f16")]
impl_element! {
    half::f16 => F16, u16;
    half::bf16 => BF16, u16;
}

//! Data type system for indexed kernels
//!
//! This module provides the `DType` runtime tag used to route a launch to the
//! kernel variant of the matching element width, and the `Element` trait that
//! binds Rust scalars to those tags.

mod element;

pub use element::{AtomicBits, Element};

use std::fmt;

/// Element types the indexing kernels can move
///
/// Gather and scatter only care about the element width; accumulation also
/// cares about the numeric type, because it decides between a native atomic
/// add and a compare-and-swap emulation.
///
/// Discriminants are grouped by category (floats from 0, signed integers
/// from 10, unsigned integers from 20) and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// IEEE 754 binary64
    F64 = 0,
    /// IEEE 754 binary32
    F32 = 1,
    /// IEEE 754 binary16
    F16 = 2,
    /// bfloat16
    BF16 = 3,

    /// `i64`
    I64 = 10,
    /// `i32`
    I32 = 11,
    /// `i16`
    I16 = 12,
    /// `i8`
    I8 = 13,

    /// `u64`
    U64 = 20,
    /// `u32`
    U32 = 21,
    /// `u16`
    U16 = 22,
    /// `u8`
    U8 = 23,
}

impl DType {
    /// Element width in bits
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 | Self::F16 | Self::BF16 => 16,
            Self::I32 | Self::U32 | Self::F32 => 32,
            Self::I64 | Self::U64 | Self::F64 => 64,
        }
    }

    /// Element width in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Whether elements are floating point numbers
    #[inline]
    pub const fn is_float(self) -> bool {
        (self as u8) < 10
    }

    /// Whether elements are integers, signed or not
    #[inline]
    pub const fn is_int(self) -> bool {
        !self.is_float()
    }

    /// Whether elements carry a sign (signed integers and every float)
    #[inline]
    pub const fn is_signed(self) -> bool {
        (self as u8) < 20
    }

    /// Rust spelling of the element type
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

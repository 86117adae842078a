//! Stride table: per-dimension weights for the three offsets a thread resolves

use super::shape::STACK_DIMS;
use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Three independently scaled stride weights for one dimension
///
/// Laid out as three packed `u32`, matching a 12-byte `packed_uint3`.
/// NOTE: `output` and `input` are in BYTES; `aux` is the byte offset into an
/// `i64` index array.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct PackedStride {
    /// Weight applied to the output-buffer offset
    pub output: u32,
    /// Weight applied to the input-buffer offset
    pub input: u32,
    /// Weight applied to the index-array coordinate
    pub aux: u32,
}

impl PackedStride {
    /// Create a stride triple.
    pub const fn new(output: u32, input: u32, aux: u32) -> Self {
        Self { output, input, aux }
    }
}

impl From<[u32; 3]> for PackedStride {
    fn from([output, input, aux]: [u32; 3]) -> Self {
        Self { output, input, aux }
    }
}

/// Offsets a thread resolves from its flat id
///
/// Arithmetic wraps at 32 bits, like the unsigned vector arithmetic of the
/// grid it models.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct DataOffsets {
    /// Byte offset into the output buffer
    pub output: u32,
    /// Byte offset into the input buffer
    pub input: u32,
    /// Byte offset into each index array
    pub aux: u32,
}

impl DataOffsets {
    /// Add `coord * stride` component-wise.
    #[inline]
    pub fn advance(self, coord: u32, stride: PackedStride) -> Self {
        Self {
            output: self.output.wrapping_add(coord.wrapping_mul(stride.output)),
            input: self.input.wrapping_add(coord.wrapping_mul(stride.input)),
            aux: self.aux.wrapping_add(coord.wrapping_mul(stride.aux)),
        }
    }

    /// Pick one component.
    #[inline]
    pub fn component(self, component: OffsetComponent) -> u32 {
        match component {
            OffsetComponent::Output => self.output,
            OffsetComponent::Input => self.input,
            OffsetComponent::Aux => self.aux,
        }
    }
}

/// Selects one component of a [`DataOffsets`] triple
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OffsetComponent {
    /// Output-buffer offset
    Output,
    /// Input-buffer offset
    Input,
    /// Index-array coordinate
    Aux,
}

/// Stride table, aligned index-for-index with an [`IterShape`](super::IterShape)
#[derive(Clone, PartialEq, Eq, Default)]
pub struct StrideTable(SmallVec<[PackedStride; STACK_DIMS]>);

impl StrideTable {
    /// Create an empty stride table.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Push a stride triple.
    pub fn push(&mut self, stride: PackedStride) {
        self.0.push(stride);
    }

    /// View strides as a slice.
    pub fn as_slice(&self) -> &[PackedStride] {
        self.0.as_slice()
    }

    /// Raw bytes of the table, 12 bytes per dimension.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.0.as_slice())
    }
}

impl Deref for StrideTable {
    type Target = [PackedStride];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl DerefMut for StrideTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut_slice()
    }
}

impl fmt::Debug for StrideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[PackedStride]> for StrideTable {
    fn as_ref(&self) -> &[PackedStride] {
        self.0.as_slice()
    }
}

impl From<Vec<PackedStride>> for StrideTable {
    fn from(value: Vec<PackedStride>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[PackedStride]> for StrideTable {
    fn from(value: &[PackedStride]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[PackedStride; N]> for StrideTable {
    fn from(value: [PackedStride; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl<const N: usize> From<[[u32; 3]; N]> for StrideTable {
    fn from(value: [[u32; 3]; N]) -> Self {
        Self(value.into_iter().map(PackedStride::from).collect())
    }
}

impl FromIterator<PackedStride> for StrideTable {
    fn from_iter<T: IntoIterator<Item = PackedStride>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

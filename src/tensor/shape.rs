//! Iteration shape: the mixed-radix digits a flat thread id is decoded with

use smallvec::SmallVec;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Stack allocation threshold for dimensions
/// Index iterations rarely exceed 6 dimensions, so we stack-allocate up to 6
pub(crate) const STACK_DIMS: usize = 6;

/// Iteration shape used to decode a flat thread id
///
/// Dimension 0 is the fastest-varying (innermost) digit.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct IterShape(SmallVec<[u32; STACK_DIMS]>);

impl IterShape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Push a dimension.
    pub fn push(&mut self, dim: u32) {
        self.0.push(dim);
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[u32] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Number of flat ids the shape spans, or `None` if it overflows `u32`.
    pub fn numel(&self) -> Option<u32> {
        self.0
            .iter()
            .try_fold(1u32, |acc, &extent| acc.checked_mul(extent))
    }
}

impl Deref for IterShape {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl DerefMut for IterShape {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut_slice()
    }
}

impl fmt::Debug for IterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[u32]> for IterShape {
    fn as_ref(&self) -> &[u32] {
        self.0.as_slice()
    }
}

impl From<Vec<u32>> for IterShape {
    fn from(value: Vec<u32>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[u32]> for IterShape {
    fn from(value: &[u32]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[u32; N]> for IterShape {
    fn from(value: [u32; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<u32> for IterShape {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

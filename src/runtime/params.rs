//! Launch parameters: the boundary contract between a dispatcher and the kernels

use crate::error::{Error, Result};
use crate::tensor::{IndexTable, MAX_INDICES, PackedStride};
use log::trace;

/// Parameters shared by every indexed gather/scatter launch
///
/// Everything here is read-only for the duration of a launch. The byte
/// buffers are passed separately because gather reads from an immutable
/// slice while scatters write into a [`DeviceBuffer`](crate::tensor::DeviceBuffer).
#[derive(Clone, Copy)]
pub struct IndexParams<'a> {
    /// One index array per indexed dimension
    pub indices: &'a dyn IndexTable,
    /// Size of each indexed dimension, for negative-index wraparound
    pub index_sizes: &'a [i64],
    /// Byte stride applied to each resolved index
    pub index_strides: &'a [i64],
    /// Number of indexed dimensions, at most [`MAX_INDICES`]
    pub num_indices: u32,
    /// Shape used to decode the flat thread id
    pub iter_shape: &'a [u32],
    /// Per-dimension offset weights, aligned with `iter_shape`
    pub strides: &'a [PackedStride],
}

impl<'a> IndexParams<'a> {
    /// Bundle launch parameters, taking `num_indices` from the table length
    pub fn new(
        indices: &'a dyn IndexTable,
        index_sizes: &'a [i64],
        index_strides: &'a [i64],
        iter_shape: &'a [u32],
        strides: &'a [PackedStride],
    ) -> Self {
        Self {
            indices,
            index_sizes,
            index_strides,
            num_indices: indices.len() as u32,
            iter_shape,
            strides,
        }
    }

    /// Rank used for offset decomposition
    #[inline]
    pub fn num_dimensions(&self) -> u32 {
        self.iter_shape.len() as u32
    }

    /// Number of grid threads the launch needs: `product(iter_shape)`
    pub fn thread_count(&self) -> Result<u32> {
        thread_count(self.iter_shape)
    }

    /// Structural checks owed to the kernels before launch
    ///
    /// Index values themselves are not inspected; see
    /// [`validate_indices`](crate::ops::IndexingOps::validate_indices).
    pub fn validate(&self) -> Result<()> {
        trace!(
            "validating index launch: rank {}, {} indices",
            self.iter_shape.len(),
            self.num_indices
        );
        check_rank(self.iter_shape, self.strides)?;

        let count = self.num_indices as usize;
        if count > MAX_INDICES {
            return Err(Error::TooManyIndices {
                count,
                max: MAX_INDICES,
            });
        }
        if self.indices.len() < count {
            return Err(Error::length_mismatch("indices", count, self.indices.len()));
        }
        if self.index_sizes.len() < count {
            return Err(Error::length_mismatch(
                "index_sizes",
                count,
                self.index_sizes.len(),
            ));
        }
        if self.index_strides.len() < count {
            return Err(Error::length_mismatch(
                "index_strides",
                count,
                self.index_strides.len(),
            ));
        }

        self.thread_count().map(|_| ())
    }
}

/// Parameters for materialising direct strided offsets
#[derive(Clone, Copy, Debug)]
pub struct OffsetParams<'a> {
    /// Shape used to decode the flat thread id
    pub iter_shape: &'a [u32],
    /// Per-dimension offset weights, aligned with `iter_shape`
    pub strides: &'a [PackedStride],
    /// Number of offsets to compute (one thread each)
    pub num_offsets: u32,
}

impl<'a> OffsetParams<'a> {
    /// Parameters covering every id of `iter_shape`
    pub fn new(iter_shape: &'a [u32], strides: &'a [PackedStride]) -> Result<Self> {
        Ok(Self {
            iter_shape,
            strides,
            num_offsets: thread_count(iter_shape)?,
        })
    }

    /// Rank used for offset decomposition
    #[inline]
    pub fn num_dimensions(&self) -> u32 {
        self.iter_shape.len() as u32
    }

    /// Structural checks owed to the kernel before launch
    pub fn validate(&self) -> Result<()> {
        trace!(
            "validating offset launch: rank {}, {} offsets",
            self.iter_shape.len(),
            self.num_offsets
        );
        check_rank(self.iter_shape, self.strides)?;
        if self.num_offsets > 0 && self.iter_shape.contains(&0) {
            return Err(Error::invalid_argument(
                "iter_shape",
                "zero-sized dimension cannot decode a non-empty grid",
            ));
        }
        Ok(())
    }
}

fn check_rank(iter_shape: &[u32], strides: &[PackedStride]) -> Result<()> {
    if iter_shape.len() != strides.len() {
        return Err(Error::RankMismatch {
            shape: iter_shape.len(),
            strides: strides.len(),
        });
    }
    Ok(())
}

fn thread_count(iter_shape: &[u32]) -> Result<u32> {
    iter_shape
        .iter()
        .try_fold(1u32, |acc, &extent| acc.checked_mul(extent))
        .ok_or_else(|| {
            Error::invalid_argument(
                "iter_shape",
                format!("{iter_shape:?} spans more than u32::MAX threads"),
            )
        })
}

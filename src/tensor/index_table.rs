//! Index tables: per-dimension `i64` index arrays behind one access contract

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::ops::Range;

/// Maximum number of indexed dimensions a launch can carry
pub const MAX_INDICES: usize = 16;

/// Uniform access to the index arrays of one launch
///
/// Entry `i` belongs to indexed dimension `i`. Kernels only ever call
/// [`get`](IndexTable::get), so how the arrays are stored is decided when the
/// table is built and never branched on inside a kernel.
pub trait IndexTable: Sync {
    /// Number of index arrays in the table
    fn len(&self) -> usize;

    /// Index array for indexed dimension `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    fn get(&self, i: usize) -> &[i64];

    /// Whether the table holds no arrays
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed index arrays, one slice per indexed dimension
///
/// The array-of-handles layout: up to [`MAX_INDICES`] independent slices.
#[derive(Clone, Debug, Default)]
pub struct IndexArrays<'a> {
    arrays: SmallVec<[&'a [i64]; MAX_INDICES]>,
}

impl<'a> IndexArrays<'a> {
    /// Build a table from borrowed arrays
    pub fn new(arrays: &[&'a [i64]]) -> Result<Self> {
        check_capacity(arrays.len())?;
        Ok(Self {
            arrays: arrays.iter().copied().collect(),
        })
    }

    /// Append one array
    pub fn push(&mut self, array: &'a [i64]) -> Result<()> {
        check_capacity(self.arrays.len() + 1)?;
        self.arrays.push(array);
        Ok(())
    }
}

impl IndexTable for IndexArrays<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.arrays.len()
    }

    #[inline]
    fn get(&self, i: usize) -> &[i64] {
        self.arrays[i]
    }
}

/// All index arrays packed into one owned buffer
///
/// The single-buffer layout: arrays are concatenated and each entry keeps the
/// range of its base within the shared storage.
#[derive(Clone, Debug, Default)]
pub struct PackedIndexBuffer {
    data: Vec<i64>,
    entries: SmallVec<[Range<usize>; MAX_INDICES]>,
}

impl PackedIndexBuffer {
    /// Pack copies of `arrays` into one buffer
    pub fn from_arrays(arrays: &[&[i64]]) -> Result<Self> {
        check_capacity(arrays.len())?;
        let mut data = Vec::with_capacity(arrays.iter().map(|a| a.len()).sum());
        let mut entries = SmallVec::new();
        for array in arrays {
            let start = data.len();
            data.extend_from_slice(array);
            entries.push(start..data.len());
        }
        Ok(Self { data, entries })
    }

    /// Backing storage of every entry, in order
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }
}

impl IndexTable for PackedIndexBuffer {
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn get(&self, i: usize) -> &[i64] {
        &self.data[self.entries[i].clone()]
    }
}

fn check_capacity(count: usize) -> Result<()> {
    if count > MAX_INDICES {
        return Err(Error::TooManyIndices {
            count,
            max: MAX_INDICES,
        });
    }
    Ok(())
}

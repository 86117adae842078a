//! Indexing operations trait and its grid implementation

use super::dispatch::{self, IndexOp};
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::kernels::{self, normalize_index, resolve_offsets};
use crate::runtime::{Grid, IndexParams, OffsetParams};
use crate::tensor::{DataOffsets, DeviceBuffer, OffsetComponent};
use log::debug;
use std::sync::atomic::{AtomicU32, Ordering};

/// Indexed gather/scatter operations
///
/// Every method validates the structural launch contract
/// ([`IndexParams::validate`] / [`OffsetParams::validate`]) before any thread
/// runs. Index values are only checked by [`validate_indices`]; a launch with
/// an out-of-range index panics in the offending thread.
///
/// Byte offsets in the stride tables are relative to the start of `input`
/// and `output`.
///
/// [`validate_indices`]: IndexingOps::validate_indices
pub trait IndexingOps {
    /// Gather: `output[out] = input[in + indirect]` for every thread
    ///
    /// # Arguments
    ///
    /// * `dtype` - Element type; selects the kernel of the same width
    /// * `params` - Index tables, iteration shape and stride table
    /// * `input` - Source bytes
    /// * `output` - Destination buffer
    fn index_select(
        &self,
        dtype: DType,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()>;

    /// Scatter: `output[out + indirect] = input[in]` for every thread
    ///
    /// When several threads hit the same destination, one of their values
    /// survives.
    fn index_put(
        &self,
        dtype: DType,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()>;

    /// Accumulating scatter: `output[out + indirect] += input[in]`
    ///
    /// Every update is a relaxed atomic read-modify-write, so colliding
    /// threads never lose an addend. Supported for `I32` (native atomic add)
    /// and `F32` (compare-and-swap emulation).
    fn index_put_accumulate(
        &self,
        dtype: DType,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()>;

    /// Launch a kernel variant by its registered name
    ///
    /// Fails with [`Error::UnknownKernel`] for names not in
    /// [`INDEX_KERNELS`](crate::ops::INDEX_KERNELS).
    fn launch_kernel(
        &self,
        name: &str,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()>;

    /// Direct offset triple of every thread id in `[0, num_offsets)`
    fn index_offsets(&self, params: &OffsetParams<'_>) -> Result<Vec<DataOffsets>>;

    /// Like [`index_offsets`](IndexingOps::index_offsets), writing into `out`
    ///
    /// `out.len()` must equal `params.num_offsets`.
    fn index_offsets_into(&self, params: &OffsetParams<'_>, out: &mut [DataOffsets])
    -> Result<()>;

    /// One component of the direct offset of every thread id
    fn index_offset_component(
        &self,
        params: &OffsetParams<'_>,
        component: OffsetComponent,
    ) -> Result<Vec<u32>>;

    /// Check every index value a launch with `params` would read
    ///
    /// Returns [`Error::IndexOutOfBounds`] for the lowest thread id (and,
    /// within it, the lowest indexed dimension) whose index lies outside
    /// `[-size, size)`.
    fn validate_indices(&self, params: &IndexParams<'_>) -> Result<()>;
}

impl Grid {
    fn run_indexed(
        &self,
        op: IndexOp,
        dtype: DType,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()> {
        params.validate()?;
        let kernel = dispatch::select_kernel(op, dtype)?;
        kernel.launch(self, params.thread_count()?, params, input, output);
        Ok(())
    }
}

impl IndexingOps for Grid {
    fn index_select(
        &self,
        dtype: DType,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()> {
        self.run_indexed(IndexOp::Select, dtype, params, input, output)
    }

    fn index_put(
        &self,
        dtype: DType,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()> {
        self.run_indexed(IndexOp::Put, dtype, params, input, output)
    }

    fn index_put_accumulate(
        &self,
        dtype: DType,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()> {
        self.run_indexed(IndexOp::PutAccumulate, dtype, params, input, output)
    }

    fn launch_kernel(
        &self,
        name: &str,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) -> Result<()> {
        let kernel = dispatch::lookup(name)?;
        params.validate()?;
        kernel.launch(self, params.thread_count()?, params, input, output);
        Ok(())
    }

    fn index_offsets(&self, params: &OffsetParams<'_>) -> Result<Vec<DataOffsets>> {
        let mut out = vec![DataOffsets::default(); params.num_offsets as usize];
        self.index_offsets_into(params, &mut out)?;
        Ok(out)
    }

    fn index_offsets_into(
        &self,
        params: &OffsetParams<'_>,
        out: &mut [DataOffsets],
    ) -> Result<()> {
        params.validate()?;
        if out.len() != params.num_offsets as usize {
            return Err(Error::invalid_argument(
                "out",
                format!(
                    "expected {} offset slots, got {}",
                    params.num_offsets,
                    out.len()
                ),
            ));
        }
        debug!("launching index_offsets over {} threads", params.num_offsets);
        self.dispatch_map(out, |tid| kernels::index_offsets(params, tid));
        Ok(())
    }

    fn index_offset_component(
        &self,
        params: &OffsetParams<'_>,
        component: OffsetComponent,
    ) -> Result<Vec<u32>> {
        params.validate()?;
        let mut out = vec![0u32; params.num_offsets as usize];
        debug!(
            "launching index_offsets ({component:?}) over {} threads",
            params.num_offsets
        );
        self.dispatch_map(&mut out, |tid| {
            kernels::index_offset_component(params, component, tid)
        });
        Ok(out)
    }

    fn validate_indices(&self, params: &IndexParams<'_>) -> Result<()> {
        params.validate()?;
        let threads = params.thread_count()?;
        debug!(
            "validating {} indices over {} threads",
            params.num_indices, threads
        );

        let first_bad = AtomicU32::new(u32::MAX);
        self.dispatch(threads, |tid| {
            if check_thread(params, tid).is_err() {
                first_bad.fetch_min(tid, Ordering::Relaxed);
            }
        });

        match first_bad.into_inner() {
            u32::MAX => Ok(()),
            tid => check_thread(params, tid),
        }
    }
}

/// Check the index values one thread reads
fn check_thread(params: &IndexParams<'_>, tid: u32) -> Result<()> {
    let aux = resolve_offsets(tid, params.iter_shape, params.strides).aux;
    let slot = aux as usize / size_of::<i64>();
    for dim in 0..params.num_indices as usize {
        let array = params.indices.get(dim);
        let &index = array.get(slot).ok_or_else(|| {
            Error::invalid_argument(
                "indices",
                format!(
                    "index array {dim} has {} entries, thread {tid} reads entry {slot}",
                    array.len()
                ),
            )
        })?;
        let size = params.index_sizes[dim];
        let normalized = normalize_index(index, size);
        if normalized < 0 || normalized >= size {
            return Err(Error::IndexOutOfBounds { dim, index, size });
        }
    }
    Ok(())
}

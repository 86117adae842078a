//! Kernel table for indexed gather/scatter
//!
//! Every launchable variant is one row of [`INDEX_KERNELS`], keyed by
//! operation, element width and atomic capability. Gather and scatter move
//! bit patterns, so one variant per width serves every dtype of that width.
//! Accumulation adds numbers, so its variants exist per concrete numeric type:
//!
//! | Name | Dtypes |
//! |---|---|
//! | `index_select_{8,16,32,64}bit` | any of that width |
//! | `index_put_{8,16,32,64}bit` | any of that width |
//! | `index_put_accumulate_32bit_int` | `I32` (native atomic add) |
//! | `index_put_accumulate_32bit_float` | `F32` (emulated atomic add) |
//!
//! A dtype is only ever routed to the variant of its exact width.

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::kernels;
use crate::runtime::{Grid, IndexParams};
use crate::tensor::DeviceBuffer;
use log::debug;
use std::fmt;
use std::sync::atomic::AtomicI32;

/// Indexed operation a kernel performs
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexOp {
    /// Gather (`index_select`)
    Select,
    /// Scatter with plain stores (`index_put`)
    Put,
    /// Scatter with atomic accumulation (`index_put_accumulate`)
    PutAccumulate,
}

impl IndexOp {
    /// Operation name used in kernel names and errors
    pub const fn name(self) -> &'static str {
        match self {
            Self::Select => "index_select",
            Self::Put => "index_put",
            Self::PutAccumulate => "index_put_accumulate",
        }
    }
}

/// Width of one element in bits
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    /// 8-bit elements
    W8,
    /// 16-bit elements
    W16,
    /// 32-bit elements
    W32,
    /// 64-bit elements
    W64,
}

impl ElementWidth {
    /// Width of `dtype`
    pub const fn of(dtype: DType) -> Self {
        match dtype {
            DType::I8 | DType::U8 => Self::W8,
            DType::I16 | DType::U16 | DType::F16 | DType::BF16 => Self::W16,
            DType::I32 | DType::U32 | DType::F32 => Self::W32,
            DType::I64 | DType::U64 | DType::F64 => Self::W64,
        }
    }

    /// Width in bytes
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }
}

/// How a kernel updates its destination
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AtomicMode {
    /// Plain relaxed store, last writer wins
    None,
    /// Hardware atomic fetch-add
    Native,
    /// Compare-and-swap loop over the value's bit pattern
    Emulated,
}

/// Lookup key of a kernel variant
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KernelKey {
    /// Operation
    pub op: IndexOp,
    /// Element width
    pub width: ElementWidth,
    /// Atomic capability
    pub atomic: AtomicMode,
}

impl KernelKey {
    /// Create a key
    pub const fn new(op: IndexOp, width: ElementWidth, atomic: AtomicMode) -> Self {
        Self { op, width, atomic }
    }

    /// Key of the variant that runs `op` on `dtype`
    ///
    /// Fails with [`Error::UnsupportedDType`] when no variant accumulates
    /// `dtype`.
    pub fn for_dtype(op: IndexOp, dtype: DType) -> Result<Self> {
        let width = ElementWidth::of(dtype);
        let atomic = match (op, dtype) {
            (IndexOp::Select | IndexOp::Put, _) => AtomicMode::None,
            (IndexOp::PutAccumulate, DType::I32) => AtomicMode::Native,
            (IndexOp::PutAccumulate, DType::F32) => AtomicMode::Emulated,
            (IndexOp::PutAccumulate, _) => {
                return Err(Error::unsupported_dtype(dtype, op.name()));
            }
        };
        Ok(Self::new(op, width, atomic))
    }
}

/// Launch function: runs a kernel over `threads` grid threads
pub type LaunchFn = fn(&Grid, u32, &IndexParams<'_>, &[u8], &DeviceBuffer);

/// One registered kernel variant
#[derive(Copy, Clone)]
pub struct IndexKernel {
    /// Variant name
    pub name: &'static str,
    /// Lookup key
    pub key: KernelKey,
    launch: LaunchFn,
}

impl IndexKernel {
    /// Run this variant over `threads` grid threads
    ///
    /// Parameters are not validated here; see
    /// [`IndexingOps`](crate::ops::IndexingOps) for the checked entry points.
    pub fn launch(
        &self,
        grid: &Grid,
        threads: u32,
        params: &IndexParams<'_>,
        input: &[u8],
        output: &DeviceBuffer,
    ) {
        debug!("launching {} over {} threads", self.name, threads);
        (self.launch)(grid, threads, params, input, output)
    }
}

impl fmt::Debug for IndexKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexKernel")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn launch_select<T: Element>(
    grid: &Grid,
    threads: u32,
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
) {
    grid.dispatch(threads, |tid| {
        kernels::index_select::<T>(params, input, output, tid)
    });
}

fn launch_put<T: Element>(
    grid: &Grid,
    threads: u32,
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
) {
    grid.dispatch(threads, |tid| {
        kernels::index_put::<T>(params, input, output, tid)
    });
}

fn launch_accumulate_int(
    grid: &Grid,
    threads: u32,
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
) {
    grid.dispatch(threads, |tid| {
        kernels::index_put_accumulate_native::<AtomicI32>(params, input, output, tid)
    });
}

fn launch_accumulate_float(
    grid: &Grid,
    threads: u32,
    params: &IndexParams<'_>,
    input: &[u8],
    output: &DeviceBuffer,
) {
    grid.dispatch(threads, |tid| {
        kernels::index_put_accumulate_emulated::<f32>(params, input, output, tid)
    });
}

macro_rules! kernel {
    ($name:literal, $op:ident, $width:ident, $atomic:ident, $launch:expr) => {
        IndexKernel {
            name: $name,
            key: KernelKey::new(IndexOp::$op, ElementWidth::$width, AtomicMode::$atomic),
            launch: $launch,
        }
    };
}

/// Every registered kernel variant
pub static INDEX_KERNELS: [IndexKernel; 10] = [
    kernel!("index_select_8bit", Select, W8, None, launch_select::<u8>),
    kernel!("index_select_16bit", Select, W16, None, launch_select::<u16>),
    kernel!("index_select_32bit", Select, W32, None, launch_select::<u32>),
    kernel!("index_select_64bit", Select, W64, None, launch_select::<u64>),
    kernel!("index_put_8bit", Put, W8, None, launch_put::<u8>),
    kernel!("index_put_16bit", Put, W16, None, launch_put::<u16>),
    kernel!("index_put_32bit", Put, W32, None, launch_put::<u32>),
    kernel!("index_put_64bit", Put, W64, None, launch_put::<u64>),
    kernel!(
        "index_put_accumulate_32bit_int",
        PutAccumulate,
        W32,
        Native,
        launch_accumulate_int
    ),
    kernel!(
        "index_put_accumulate_32bit_float",
        PutAccumulate,
        W32,
        Emulated,
        launch_accumulate_float
    ),
];

/// Find a kernel by name
pub fn lookup(name: &str) -> Result<&'static IndexKernel> {
    INDEX_KERNELS
        .iter()
        .find(|kernel| kernel.name == name)
        .ok_or_else(|| Error::UnknownKernel {
            name: name.to_owned(),
        })
}

/// Find the kernel by key
pub fn lookup_key(key: KernelKey) -> Option<&'static IndexKernel> {
    INDEX_KERNELS.iter().find(|kernel| kernel.key == key)
}

/// Select the kernel that runs `op` on elements of `dtype`
pub fn select_kernel(op: IndexOp, dtype: DType) -> Result<&'static IndexKernel> {
    let key = KernelKey::for_dtype(op, dtype)?;
    lookup_key(key).ok_or_else(|| Error::unsupported_dtype(dtype, op.name()))
}

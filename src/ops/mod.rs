//! Indexed gather/scatter operations
//!
//! ```text
//! Grid
//!   └── implements IndexingOps
//!         ├── index_select, index_put, index_put_accumulate (by dtype)
//!         ├── launch_kernel                                 (by name)
//!         ├── index_offsets, index_offset_component         (offset precompute)
//!         └── validate_indices                              (host-side bounds check)
//! ```
//!
//! Each typed operation validates its [`IndexParams`](crate::runtime::IndexParams),
//! picks a variant from the [`INDEX_KERNELS`] table, and runs it over
//! `product(iter_shape)` grid threads.

mod dispatch;
mod indexing;

pub use dispatch::{
    AtomicMode, ElementWidth, INDEX_KERNELS, IndexKernel, IndexOp, KernelKey, LaunchFn, lookup,
    lookup_key, select_kernel,
};
pub use indexing::IndexingOps;

//! # ndscatter
//!
//! **N-dimensional indexed gather/scatter kernels with atomic accumulation.**
//!
//! ndscatter implements the inner loop of advanced indexing: every thread of a
//! data-parallel grid decodes its flat id into strided byte offsets, adds the
//! contribution of up to 16 indexed dimensions read from `i64` index arrays,
//! and moves one element.
//!
//! ## Operations
//!
//! - **Gather** (`index_select`): read at an indirect offset, write densely
//! - **Scatter** (`index_put`): read densely, write at an indirect offset
//! - **Accumulating scatter** (`index_put_accumulate`): atomic add at an
//!   indirect offset, natively for `i32` and through a compare-and-swap loop
//!   for `f32`
//! - **Offset precompute** (`index_offsets`): materialise the direct offsets
//!   of a grid without copying anything
//!
//! ## Quick Start
//!
//! ```rust
//! use ndscatter::prelude::*;
//!
//! # fn main() -> ndscatter::error::Result<()> {
//! // Rows [2, 0] of a 3x2 i32 matrix.
//! let source: Vec<u8> = bytemuck::cast_slice(&[1i32, 2, 3, 4, 5, 6]).to_vec();
//! let rows = [-1i64, 0];
//! let table = IndexArrays::new(&[&rows])?;
//!
//! // dim 0: column (4 bytes in both buffers); dim 1: output row, index slot.
//! let strides = StrideTable::from([[4, 4, 0], [8, 0, 8]]);
//! let params = IndexParams::new(&table, &[3], &[8], &[2, 2], &strides);
//!
//! let output = DeviceBuffer::zeroed(16);
//! Grid::default().index_select(DType::I32, &params, &source, &output)?;
//! assert_eq!(output.to_vec::<i32>()?, [5, 6, 1, 2]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): run grid threads on a rayon pool
//! - `f16`: half-precision element types (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::ops::IndexingOps;
    pub use crate::runtime::{Grid, GridConfig, IndexParams, OffsetParams};
    pub use crate::tensor::{
        DataOffsets, DeviceBuffer, IndexArrays, IndexTable, IterShape, OffsetComponent,
        PackedIndexBuffer, PackedStride, StrideTable,
    };
}

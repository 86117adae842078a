//! Launch-time data model
//!
//! Iteration shapes, stride tables, resolved offset triples, index tables, and
//! the device buffer kernels write into.

mod index_table;
mod shape;
mod storage;
mod strides;

pub use index_table::{IndexArrays, IndexTable, MAX_INDICES, PackedIndexBuffer};
pub use shape::IterShape;
pub use storage::DeviceBuffer;
pub use strides::{DataOffsets, OffsetComponent, PackedStride, StrideTable};

//! Per-thread kernel bodies
//!
//! Every kernel is a plain function of its launch parameters and a flat
//! thread id. Launching one over a [`Grid`](crate::runtime::Grid) is the job
//! of [`crate::ops`].

mod index;
mod offsets;

pub use index::{
    index_put, index_put_accumulate_emulated, index_put_accumulate_native, index_select,
    load_element,
};
pub use offsets::{
    index_offset_component, index_offsets, indirect_offset, normalize_index, resolve_offsets,
};

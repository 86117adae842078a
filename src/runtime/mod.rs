//! Execution runtime: the compute grid, launch parameters, atomics, and kernels
//!
//! ```text
//! Grid (runs one closure per thread id)
//! ├── IndexParams / OffsetParams (read-only launch contract)
//! ├── kernels (per-thread bodies)
//! └── atomic (native and emulated relaxed fetch-add)
//! ```

pub mod atomic;
mod grid;
pub mod kernels;
mod params;

pub use grid::{DEFAULT_MIN_LEN, Grid, GridConfig};
pub use params::{IndexParams, OffsetParams};

//! Common test utilities
#![allow(dead_code)]

use ndscatter::runtime::{Grid, GridConfig};
use ndscatter::tensor::{IterShape, StrideTable};

/// Iteration shape, stride table and index tables for moving whole rows of a
/// row-major `rows x cols` matrix, selected by one index array over dim 0.
///
/// Grid dimension 0 walks the columns, dimension 1 walks the index entries.
pub struct RowPlan {
    pub iter_shape: IterShape,
    pub strides: StrideTable,
    pub index_sizes: Vec<i64>,
    pub index_strides: Vec<i64>,
}

/// Plan for `out[i, :] = src[index[i], :]`
pub fn gather_rows(rows: usize, cols: usize, elem: usize, count: usize) -> RowPlan {
    let e = elem as u32;
    let row_bytes = (cols * elem) as u32;
    RowPlan {
        iter_shape: IterShape::from([cols as u32, count as u32]),
        strides: StrideTable::from([[e, e, 0], [row_bytes, 0, 8]]),
        index_sizes: vec![rows as i64],
        index_strides: vec![row_bytes as i64],
    }
}

/// Plan for `out[index[i], :] = src[i, :]`
pub fn scatter_rows(rows: usize, cols: usize, elem: usize, count: usize) -> RowPlan {
    let e = elem as u32;
    let row_bytes = (cols * elem) as u32;
    RowPlan {
        iter_shape: IterShape::from([cols as u32, count as u32]),
        strides: StrideTable::from([[e, e, 0], [0, row_bytes, 8]]),
        index_sizes: vec![rows as i64],
        index_strides: vec![row_bytes as i64],
    }
}

/// Byte copy of a typed slice
pub fn bytes_of<T: bytemuck::Pod>(data: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(data).to_vec()
}

/// Grids covering the default pool and a small-chunk dedicated pool
pub fn grids() -> Vec<Grid> {
    vec![
        Grid::default(),
        Grid::new(GridConfig::default().with_min_len(1).with_num_threads(4)).unwrap(),
    ]
}

/// Grid tuned for maximum contention: tiny chunks on many workers
pub fn contended_grid() -> Grid {
    Grid::new(GridConfig::default().with_min_len(16).with_num_threads(8)).unwrap()
}

/// Row-major reference gather of whole rows, with negative-index wrap
pub fn reference_gather_rows<T: Copy>(src: &[T], cols: usize, index: &[i64]) -> Vec<T> {
    let rows = (src.len() / cols) as i64;
    index
        .iter()
        .flat_map(|&i| {
            let row = (if i < 0 { i + rows } else { i }) as usize;
            src[row * cols..(row + 1) * cols].iter().copied()
        })
        .collect()
}

//! Kernel table routing tests

use crate::common::{bytes_of, gather_rows};
use ndscatter::ops::{INDEX_KERNELS, IndexOp, lookup, select_kernel};
use ndscatter::prelude::*;

#[test]
fn test_name_and_dtype_lookups_agree() {
    for dtype in [
        DType::I8,
        DType::U16,
        DType::F16,
        DType::F32,
        DType::I32,
        DType::U64,
    ] {
        for op in [IndexOp::Select, IndexOp::Put] {
            let by_dtype = select_kernel(op, dtype).unwrap();
            let by_name = lookup(by_dtype.name).unwrap();
            assert_eq!(by_dtype.key, by_name.key);
        }
    }
    assert_eq!(INDEX_KERNELS.len(), 10);
}

#[test]
fn test_launch_kernel_matches_typed_entry_point() {
    let source: Vec<u32> = (0..24).map(|i| i * i).collect();
    let index = [3i64, -6, 1];
    let plan = gather_rows(6, 4, 4, index.len());
    let table = IndexArrays::new(&[&index]).unwrap();
    let params = IndexParams::new(
        &table,
        &plan.index_sizes,
        &plan.index_strides,
        &plan.iter_shape,
        &plan.strides,
    );
    let grid = Grid::default();
    let input = bytes_of(&source);

    let typed = DeviceBuffer::zeroed(12 * 4);
    grid.index_select(DType::F32, &params, &input, &typed).unwrap();
    let named = DeviceBuffer::zeroed(12 * 4);
    grid.launch_kernel("index_select_32bit", &params, &input, &named)
        .unwrap();

    assert_eq!(typed.to_bytes(), named.to_bytes());
}

#[test]
fn test_launch_unknown_kernel() {
    let table = IndexArrays::default();
    let params = IndexParams::new(&table, &[], &[], &[], &[]);
    let output = DeviceBuffer::zeroed(0);
    assert!(matches!(
        Grid::default().launch_kernel("index_select_24bit", &params, &[], &output),
        Err(Error::UnknownKernel { .. })
    ));
}

#[test]
fn test_launch_validates_before_running() {
    let index = [0i64];
    let arrays = vec![&index[..]; 16];
    let table = IndexArrays::new(&arrays).unwrap();
    let strides = StrideTable::from([[4, 4, 0]]);
    // Only one size for sixteen indexed dimensions.
    let params = IndexParams::new(&table, &[1], &[4; 16], &[1], &strides);
    let output = DeviceBuffer::zeroed(4);
    assert!(matches!(
        Grid::default().launch_kernel("index_put_32bit", &params, &[0; 4], &output),
        Err(Error::LengthMismatch {
            what: "index_sizes",
            expected: 16,
            got: 1
        })
    ));
}

#[test]
fn test_validate_indices_before_launch() {
    let index = [0i64, 3, -3, 2];
    let table = IndexArrays::new(&[&index]).unwrap();
    let strides = StrideTable::from([[4, 0, 8]]);
    let params = IndexParams::new(&table, &[3], &[4], &[4], &strides);

    let err = Grid::default().validate_indices(&params).unwrap_err();
    assert!(matches!(
        err,
        Error::IndexOutOfBounds {
            dim: 0,
            index: 3,
            size: 3
        }
    ));
    assert_eq!(
        err.to_string(),
        "Index 3 out of bounds for indexed dimension 0 of size 3"
    );
}

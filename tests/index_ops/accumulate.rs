//! Accumulating scatter tests (native and emulated atomics)

use crate::common::{bytes_of, contended_grid, grids};
use ndscatter::prelude::*;

/// Params sending thread `t` (reading element `t`) to destination
/// `index[t]`, with 4-byte elements
fn funnel<'a>(
    table: &'a IndexArrays<'_>,
    sizes: &'a [i64],
    shape: &'a [u32],
    strides: &'a StrideTable,
) -> IndexParams<'a> {
    IndexParams::new(table, sizes, &[4], shape, strides)
}

#[test]
fn test_accumulate_i32_same_destination() {
    let strides = StrideTable::from([[0, 4, 8]]);
    for k in [1u32, 2, 1024] {
        let values: Vec<i32> = (0..k as i32).map(|i| i - 300).collect();
        let index = vec![-1i64; k as usize];
        let table = IndexArrays::new(&[&index]).unwrap();
        let shape = [k];
        let params = funnel(&table, &[2], &shape, &strides);

        for grid in grids() {
            let output = DeviceBuffer::from_slice(&[0i32, 17]);
            grid.index_put_accumulate(DType::I32, &params, &bytes_of(&values), &output)
                .unwrap();
            let expected = 17 + values.iter().sum::<i32>();
            assert_eq!(output.to_vec::<i32>().unwrap(), [0, expected], "k = {k}");
        }
    }
}

#[test]
fn test_accumulate_f32_same_destination() {
    let strides = StrideTable::from([[0, 4, 8]]);
    for k in [1u32, 2, 1024] {
        // Integral values keep every partial sum exact in any order.
        let values: Vec<f32> = (0..k).map(|i| i as f32).collect();
        let index = vec![0i64; k as usize];
        let table = IndexArrays::new(&[&index]).unwrap();
        let shape = [k];
        let params = funnel(&table, &[1], &shape, &strides);

        for grid in grids() {
            let output = DeviceBuffer::from_slice(&[0.5f32]);
            grid.index_put_accumulate(DType::F32, &params, &bytes_of(&values), &output)
                .unwrap();
            let expected = 0.5 + (k * (k - 1) / 2) as f32;
            assert_eq!(output.to_vec::<f32>().unwrap(), [expected], "k = {k}");
        }
    }
}

#[test]
fn test_accumulate_f32_never_drops_an_update() {
    const N: u32 = 100_000;
    let ones = [1.0f32];
    let index = [0i64];
    let table = IndexArrays::new(&[&index]).unwrap();
    // Every thread reads the same element and index entry.
    let strides = StrideTable::from([[0, 0, 0]]);
    let params = IndexParams::new(&table, &[1], &[4], &[N], &strides);

    let output = DeviceBuffer::zeroed(4);
    contended_grid()
        .index_put_accumulate(DType::F32, &params, &bytes_of(&ones), &output)
        .unwrap();
    assert_eq!(output.load::<f32>(0), N as f32);
}

#[test]
fn test_accumulate_histogram() {
    let n = 1000u32;
    let index: Vec<i64> = (0..n as i64).map(|i| i % 10).collect();
    let ones = vec![1i32; n as usize];
    let table = IndexArrays::new(&[&index]).unwrap();
    let strides = StrideTable::from([[0, 4, 8]]);
    let shape = [n];
    let params = funnel(&table, &[10], &shape, &strides);

    let output = DeviceBuffer::zeroed(10 * 4);
    contended_grid()
        .index_put_accumulate(DType::I32, &params, &bytes_of(&ones), &output)
        .unwrap();
    assert_eq!(output.to_vec::<i32>().unwrap(), [100; 10]);
}

#[test]
fn test_accumulate_rows_by_name() {
    // out[index[i], :] += src[i, :] over a 2x3 f32 destination
    let source = [1.0f32, 2.0, 3.0, 10.0, 20.0, 30.0, 0.25, 0.5, 0.75];
    let index = [1i64, -1, 0];
    let table = IndexArrays::new(&[&index]).unwrap();
    let strides = StrideTable::from([[4, 4, 0], [0, 12, 8]]);
    let params = IndexParams::new(&table, &[2], &[12], &[3, 3], &strides);

    let output = DeviceBuffer::zeroed(6 * 4);
    Grid::default()
        .launch_kernel(
            "index_put_accumulate_32bit_float",
            &params,
            &bytes_of(&source),
            &output,
        )
        .unwrap();
    assert_eq!(
        output.to_vec::<f32>().unwrap(),
        [0.25, 0.5, 0.75, 11.0, 22.0, 33.0]
    );
}

#[test]
fn test_accumulate_wraps_on_overflow() {
    let values = [i32::MAX, 1];
    let index = [0i64, 0];
    let table = IndexArrays::new(&[&index]).unwrap();
    let strides = StrideTable::from([[0, 4, 8]]);
    let shape = [2u32];
    let params = funnel(&table, &[1], &shape, &strides);

    let output = DeviceBuffer::zeroed(4);
    Grid::default()
        .index_put_accumulate(DType::I32, &params, &bytes_of(&values), &output)
        .unwrap();
    assert_eq!(output.load::<i32>(0), i32::MIN);
}

#[test]
fn test_accumulate_rejects_unsupported_dtypes() {
    let index = [0i64];
    let table = IndexArrays::new(&[&index]).unwrap();
    let strides = StrideTable::from([[0, 8, 8]]);
    let params = IndexParams::new(&table, &[1], &[8], &[1], &strides);
    let output = DeviceBuffer::zeroed(8);

    for dtype in [DType::I64, DType::F64, DType::U8] {
        assert!(matches!(
            Grid::default().index_put_accumulate(dtype, &params, &[0; 8], &output),
            Err(Error::UnsupportedDType { .. })
        ));
    }
    assert_eq!(output.to_bytes(), [0; 8]);
}

//! Offset precompute tests

use crate::common::grids;
use ndscatter::prelude::*;

#[test]
fn test_index_offsets_unit_stride() {
    let strides = StrideTable::from([[1, 0, 0]]);
    let params = OffsetParams::new(&[5], &strides).unwrap();
    assert_eq!(params.num_offsets, 5);

    for grid in grids() {
        let outputs = grid
            .index_offset_component(&params, OffsetComponent::Output)
            .unwrap();
        assert_eq!(outputs, [0, 1, 2, 3, 4]);

        let triples = grid.index_offsets(&params).unwrap();
        assert!(triples.iter().all(|t| t.input == 0 && t.aux == 0));
    }
}

#[test]
fn test_index_offsets_transposed_input() {
    // 2x3 row-major output read from a column-major input, f32 elements
    let strides = StrideTable::from([[4, 8, 0], [12, 4, 0]]);
    let params = OffsetParams::new(&[3, 2], &strides).unwrap();
    let offsets = Grid::default().index_offsets(&params).unwrap();

    let output: Vec<u32> = offsets.iter().map(|o| o.output).collect();
    let input: Vec<u32> = offsets.iter().map(|o| o.input).collect();
    assert_eq!(output, [0, 4, 8, 12, 16, 20]);
    assert_eq!(input, [0, 8, 16, 4, 12, 20]);
}

#[test]
fn test_index_offsets_into_matches_component() {
    let strides = StrideTable::from([[2, 3, 8], [10, 1, 0], [40, 7, 16]]);
    let params = OffsetParams::new(&[5, 2, 3], &strides).unwrap();
    let grid = Grid::default();

    let mut triples = vec![DataOffsets::default(); params.num_offsets as usize];
    grid.index_offsets_into(&params, &mut triples).unwrap();

    for component in [
        OffsetComponent::Output,
        OffsetComponent::Input,
        OffsetComponent::Aux,
    ] {
        let single = grid.index_offset_component(&params, component).unwrap();
        let projected: Vec<u32> = triples.iter().map(|t| t.component(component)).collect();
        assert_eq!(single, projected);
    }
}

#[test]
fn test_index_offsets_partial_grid() {
    let strides = StrideTable::from([[3, 0, 0], [100, 0, 0]]);
    let params = OffsetParams {
        iter_shape: &[4, 2],
        strides: &strides,
        num_offsets: 3,
    };
    let outputs = Grid::default()
        .index_offset_component(&params, OffsetComponent::Output)
        .unwrap();
    assert_eq!(outputs, [0, 3, 6]);
}

#[test]
fn test_index_offsets_rank_zero() {
    let params = OffsetParams::new(&[], &[]).unwrap();
    let offsets = Grid::default().index_offsets(&params).unwrap();
    assert_eq!(offsets, [DataOffsets::default()]);
}

#[test]
fn test_index_offsets_rank_mismatch() {
    let strides = StrideTable::from([[1, 0, 0]]);
    let params = OffsetParams::new(&[2, 2], &strides).unwrap();
    assert!(matches!(
        Grid::default().index_offsets(&params),
        Err(Error::RankMismatch {
            shape: 2,
            strides: 1
        })
    ));
}

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use bcrs::{
    flat_mv, BcrsError, BcrsMatrix, BuildMode, BuildStage, CompressionStatistics, ErrorCategory,
    FieldMatrix, ImplicitBuildParams, ImplicitMatrixBuilder, Result,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

type ScalarMatrix = BcrsMatrix<f64>;

/// Coordinates of the tridiagonal band plus three scattered entries
fn pattern() -> Vec<(usize, usize)> {
    let mut coords = vec![(0, 0), (0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)];
    for i in 2..9 {
        coords.extend([(i, i - 1), (i, i), (i, i + 1)]);
    }
    coords.extend([(9, 8), (9, 9)]);
    coords.extend([(7, 3), (6, 0), (3, 8)]);
    coords
}

fn build_matrix(m: &mut ScalarMatrix) -> Result<()> {
    for (i, j) in pattern() {
        *m.entry(i, j)? = 1.0;
    }
    Ok(())
}

fn set_matrix(m: &mut ScalarMatrix) -> Result<()> {
    for (i, j) in pattern() {
        *m.get_mut(i, j)? = 1.0;
    }
    Ok(())
}

fn assert_reference_stats(stats: &CompressionStatistics) {
    assert_relative_eq!(stats.avg, 33.0 / 10.0);
    assert_eq!(stats.maximum, 4);
    assert_eq!(stats.overflow_total, 4);
}

fn built_reference() -> ScalarMatrix {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    build_matrix(&mut m).unwrap();
    m.compress().unwrap();
    m
}

#[test]
fn test_implicit_build() {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    assert_eq!(m.implicit_capacity(), Some(33));
    build_matrix(&mut m).unwrap();
    let stats = m.compress().unwrap();
    assert_reference_stats(&stats);
    assert_relative_eq!(stats.mem_ratio, 1.0);
    assert_eq!(m.nnz(), 33);
    assert_eq!(m.build_stage(), BuildStage::Built);
    assert_eq!(m.build_mode(), BuildMode::Implicit);
    set_matrix(&mut m).unwrap();

    let row = m.row(3).unwrap();
    assert_eq!(row.columns(), &[2, 3, 4, 8]);
    let row = m.row(6).unwrap();
    assert_eq!(row.columns(), &[0, 5, 6, 7]);
}

#[test]
fn test_insufficient_overflow() {
    let mut m = ScalarMatrix::implicit(10, 10, 1, 0.0).unwrap();
    for i in 0..10 {
        *m.entry(i, i).unwrap() = 1.0;
        *m.entry(0, i).unwrap() = 1.0;
    }
    let err = m.compress().unwrap_err();
    assert_eq!(
        err,
        BcrsError::OverflowExhausted {
            required: 19,
            capacity: 10
        }
    );
    assert_eq!(err.category(), ErrorCategory::CapacityExhaustion);
    // the buffer survives a failed compress
    assert_eq!(m.build_stage(), BuildStage::ImplicitBuilding);
    assert!(m.entry(5, 5).is_ok());
}

#[test]
fn test_setter_interface() {
    let mut m = ScalarMatrix::new();
    m.set_build_mode(BuildMode::Implicit).unwrap();
    m.set_implicit_build_params(3, 0.1).unwrap();
    m.set_size(10, 10, 0).unwrap();
    build_matrix(&mut m).unwrap();
    assert_reference_stats(&m.compress().unwrap());
}

#[test]
fn test_double_set_size() {
    let mut m = ScalarMatrix::new();
    m.set_build_mode(BuildMode::Implicit).unwrap();
    m.set_implicit_build_params(3, 0.1).unwrap();
    m.set_size(14, 14, 0).unwrap();
    m.set_size(10, 10, 0).unwrap();
    build_matrix(&mut m).unwrap();
    assert_reference_stats(&m.compress().unwrap());
}

#[test]
fn test_implicit_params_need_implicit_mode() {
    assert!(matches!(
        ScalarMatrix::with_implicit_params(10, 10, 1, -1.0, BuildMode::Random),
        Err(BcrsError::InvalidParameter { .. })
    ));
}

#[test]
fn test_negative_overflow_rejected() {
    let err = ScalarMatrix::implicit(10, 10, 1, -1.0).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InvalidParameter);

    let mut m = ScalarMatrix::new();
    m.set_build_mode(BuildMode::Implicit).unwrap();
    assert!(m.set_implicit_build_params(1, -1.0).is_err());
}

#[test]
fn test_params_locked_after_set_size() {
    let mut m = ScalarMatrix::new();
    m.set_build_mode(BuildMode::Implicit).unwrap();
    m.set_implicit_build_params(3, 0.1).unwrap();
    m.set_size(10, 10, 0).unwrap();
    assert!(matches!(
        m.set_implicit_build_params(4, 0.1),
        Err(BcrsError::InvalidState(_))
    ));
    assert_eq!(m.implicit_params(), Some(ImplicitBuildParams::new(3, 0.1).unwrap()));
}

#[test]
fn test_set_size_with_nonzeros_rejected() {
    let mut m = ScalarMatrix::new();
    m.set_build_mode(BuildMode::Implicit).unwrap();
    m.set_implicit_build_params(3, 0.1).unwrap();
    assert!(matches!(
        m.set_size(10, 10, 300),
        Err(BcrsError::InvalidParameter { name: "nnz", .. })
    ));
}

#[test]
fn test_copy_construction_and_assignment() {
    let m = built_reference();
    let mut m2 = m.try_clone().unwrap();
    m2.fill(3.0).unwrap();
    let mut m3 = m.try_clone().unwrap();
    m3.assign_from(&m2).unwrap();
    assert_eq!(m3.get(7, 3), Ok(&3.0));
    let mut m4 = ScalarMatrix::new();
    m4.assign_from(&m).unwrap();
    assert_eq!(m4.nnz(), 33);
    assert_eq!(m.get(7, 3), Ok(&1.0));
}

#[test]
fn test_copy_while_building_rejected() {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    build_matrix(&mut m).unwrap();
    assert!(matches!(m.try_clone(), Err(BcrsError::InvalidState(_))));
}

#[test]
fn test_assignment_involving_partial_builds() {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    build_matrix(&mut m).unwrap();

    // incomplete into empty
    let mut empty = ScalarMatrix::new();
    assert!(empty.assign_from(&m).is_err());

    // incomplete into full
    let mut full = built_reference();
    assert!(full.assign_from(&m).is_err());

    // full into half-built
    m.compress().unwrap();
    let mut half = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    build_matrix(&mut half).unwrap();
    assert!(matches!(half.assign_from(&m), Err(BcrsError::InvalidState(_))));
}

#[test]
fn test_entry_consistency() {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    assert_eq!(*m.entry(0, 3).unwrap(), 0.0);
    assert_eq!(*m.entry(7, 6).unwrap(), 0.0);
    build_matrix(&mut m).unwrap();
    assert_eq!(*m.entry(0, 3).unwrap(), 1.0);
    assert_eq!(*m.entry(7, 6).unwrap(), 1.0);
    *m.entry(4, 4).unwrap() += 3.0;
    assert_eq!(*m.entry(4, 4).unwrap(), 4.0);
    m.compress().unwrap();
    assert_eq!(m.get(0, 3), Ok(&1.0));
    assert_eq!(m.get(7, 6), Ok(&1.0));
    assert_eq!(m.get(4, 4), Ok(&4.0));
}

#[test]
fn test_entry_after_compress_rejected() {
    let mut m = built_reference();
    assert!(matches!(m.entry(3, 3), Err(BcrsError::InvalidState(_))));
}

#[test]
fn test_row_access_before_compress_rejected() {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    build_matrix(&mut m).unwrap();
    assert!(matches!(m.row_mut(3), Err(BcrsError::InvalidState(_))));
    assert!(matches!(m.row(3), Err(BcrsError::InvalidState(_))));
    assert!(matches!(m.get(3, 3), Err(BcrsError::InvalidState(_))));
}

#[test]
fn test_out_of_pattern_access() {
    let m = built_reference();
    assert_eq!(
        m.get(0, 9),
        Err(BcrsError::NotInPattern { row: 0, col: 9 })
    );
    assert_eq!(
        m.get(10, 0),
        Err(BcrsError::IndexOutOfBounds { index: 10, len: 10 })
    );
}

#[test]
fn test_never_inserted_coordinates_read_zero() {
    let m = built_reference();
    let stored: std::collections::BTreeSet<_> = pattern().into_iter().collect();

    let csr = m.to_scalar_csr().unwrap();
    let mut dense = [[0.0; 10]; 10];
    for i in 0..10 {
        for k in csr.ptr[i]..csr.ptr[i + 1] {
            dense[i][csr.idx[k]] = csr.values[k];
        }
    }

    for j in 0..10 {
        let mut e = vec![0.0; 10];
        e[j] = 1.0;
        let mut column = vec![f64::NAN; 10];
        flat_mv(&m, &e, &mut column).unwrap();
        for i in 0..10 {
            let expected = if stored.contains(&(i, j)) { 1.0 } else { 0.0 };
            assert_eq!(dense[i][j], expected, "csr entry ({i}, {j})");
            assert_eq!(column[i], expected, "product entry ({i}, {j})");
        }
    }
}

#[test]
fn test_implicit_matrix_builder() {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    {
        let mut builder = ImplicitMatrixBuilder::new(&mut m).unwrap();
        for (i, j) in pattern() {
            *builder.row(i).unwrap().entry(j).unwrap() = 1.0;
        }
    }
    assert_reference_stats(&m.compress().unwrap());
    set_matrix(&mut m).unwrap();
}

#[test]
fn test_implicit_matrix_builder_sizes_matrix() {
    let mut m = ScalarMatrix::new();
    {
        let mut builder = ImplicitMatrixBuilder::with_size(&mut m, 10, 10, 3, 0.1).unwrap();
        assert_eq!((builder.n(), builder.m()), (10, 10));
        for (i, j) in pattern() {
            *builder.row(i).unwrap().entry(j).unwrap() = 1.0;
        }
    }
    assert_reference_stats(&m.compress().unwrap());
    set_matrix(&mut m).unwrap();
}

#[test]
fn test_blocks_accumulate() {
    let mut m = BcrsMatrix::<FieldMatrix<f64, 1, 1>>::implicit(2, 2, 1, 1.0).unwrap();
    *m.entry(1, 0).unwrap() += FieldMatrix([[2.0]]);
    *m.entry(1, 0).unwrap() += FieldMatrix([[0.5]]);
    m.compress().unwrap();
    assert_eq!(m.get(1, 0).unwrap().0, [[2.5]]);
}

#[test]
fn test_shuffled_insertion_gives_same_pattern() {
    let reference = built_reference();
    let mut coords = pattern();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        coords.shuffle(&mut rng);
        let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
        for &(i, j) in &coords {
            *m.entry(i, j).unwrap() += (i * 10 + j) as f64;
        }
        m.compress().unwrap();
        let (a, b) = (m.as_csr().unwrap(), reference.as_csr().unwrap());
        assert_eq!(a.row_ptr, b.row_ptr);
        assert_eq!(a.col_idx, b.col_idx);
        for (i, j) in pattern() {
            assert_eq!(m.get(i, j), Ok(&((i * 10 + j) as f64)));
        }
    }
}

#[test]
fn test_statistics_serde_round_trip() {
    let stats = built_reference_stats();
    let json = serde_json::to_string(&stats).unwrap();
    let back: CompressionStatistics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stats);

    let params = ImplicitBuildParams::new(3, 0.1).unwrap();
    let json = serde_json::to_string(&params).unwrap();
    assert_eq!(
        serde_json::from_str::<ImplicitBuildParams>(&json).unwrap(),
        params
    );
}

fn built_reference_stats() -> CompressionStatistics {
    let mut m = ScalarMatrix::implicit(10, 10, 3, 0.1).unwrap();
    build_matrix(&mut m).unwrap();
    m.compress().unwrap()
}

fn matrix_size_and_entries() -> impl Strategy<Value = (usize, Vec<(usize, usize, i64)>)> {
    (1usize..8).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, -5i64..5), 0..40),
        )
    })
}

proptest! {
    #[test]
    fn prop_repeated_entries_accumulate((n, entries) in matrix_size_and_entries()) {
        let mut m = BcrsMatrix::<i64>::implicit(n, n, n, 0.0).unwrap();
        let mut expected = BTreeMap::new();
        for &(i, j, v) in &entries {
            *m.entry(i, j).unwrap() += v;
            *expected.entry((i, j)).or_insert(0) += v;
        }
        let stats = m.compress().unwrap();
        prop_assert_eq!(m.nnz(), expected.len());
        prop_assert_eq!(stats.overflow_total, 0);
        for ((i, j), v) in &expected {
            prop_assert_eq!(m.get(*i, *j), Ok(v));
        }
        for row in m.rows().unwrap() {
            prop_assert!(row.columns().windows(2).all(|w| w[0] < w[1]));
        }
    }
}

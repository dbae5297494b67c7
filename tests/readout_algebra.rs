use qreadout::errors::NoiseError;
use qreadout::{MAX_TOL, ReadoutError, Tolerance};

const TOL: f64 = 1e-12;

fn a() -> ReadoutError {
    ReadoutError::new(&[[0.9, 0.1], [0.2, 0.8]]).unwrap()
}

fn assert_row_stochastic(err: &ReadoutError) {
    for row in err.matrix().outer_iter() {
        assert!((row.sum() - 1.0).abs() < 1e-10);
        assert!(row.iter().all(|&p| p >= 0.0));
    }
}

#[test]
fn identity_matrix_is_ideal() {
    let eye = ReadoutError::new(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
    assert_eq!(eye.num_qubits(), 1);
    assert!(eye.is_identity());
}

#[test]
fn noisy_matrix_is_not_ideal() {
    let err = a();
    assert_eq!(err.num_qubits(), 1);
    assert!(!err.is_identity());
}

#[test]
fn non_power_of_two_sizes_are_rejected() {
    for n in [3usize, 5, 6, 7] {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|m| (0..n).map(|j| if m == j { 1.0 } else { 0.0 }).collect())
            .collect();
        assert!(
            matches!(ReadoutError::new(&rows), Err(NoiseError::InvalidDimension { .. })),
            "size {n} accepted"
        );
    }
}

#[test]
fn rows_beyond_atol_are_not_normalized() {
    let err = ReadoutError::new(&[[1.0, 0.0], [0.3, 0.6]]).unwrap_err();
    assert!(matches!(err, NoiseError::NotNormalized { row: 1, .. }));

    // Noise below the default tolerance is accepted
    let err = ReadoutError::new(&[[1.0, 1e-10], [0.3, 0.7]]).unwrap();
    assert_row_stochastic(&err);
}

#[test]
fn two_qubit_matrix_has_two_qubits() {
    let rows = vec![
        vec![0.97, 0.01, 0.01, 0.01],
        vec![0.02, 0.96, 0.01, 0.01],
        vec![0.02, 0.01, 0.95, 0.02],
        vec![0.0, 0.05, 0.05, 0.9],
    ];
    let err = ReadoutError::new(&rows).unwrap();
    assert_eq!(err.num_qubits(), 2);
    assert_eq!(err.probabilities(), rows);
}

#[test]
fn composing_with_identity_is_a_no_op() {
    let a = a();
    let eye = ReadoutError::new(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();

    for front in [false, true] {
        assert_eq!(a.compose(&eye, front).unwrap().matrix(), a.matrix());
        assert_eq!(eye.compose(&a, front).unwrap().matrix(), a.matrix());
    }
}

#[test]
fn composition_is_order_sensitive() {
    let a = a();
    let b = ReadoutError::from_flip_probabilities(0.3, 0.0).unwrap();

    let back = a.compose(&b, false).unwrap();
    let front = a.compose(&b, true).unwrap();
    assert_ne!(back, front);
    assert_eq!(front, b.compose(&a, false).unwrap());
    assert_row_stochastic(&back);
    assert_row_stochastic(&front);
}

#[test]
fn compose_requires_equal_qubit_counts() {
    let two = a().tensor(a()).unwrap();
    assert!(matches!(
        a().compose(&two, true),
        Err(NoiseError::DimensionMismatch { left: 1, right: 2 })
    ));
}

#[test]
fn power_matches_repeated_compose() {
    let a = a();
    assert_eq!(a.power(1).unwrap().matrix(), a.matrix());
    assert_eq!(a.power(2).unwrap(), a.compose(&a, false).unwrap());
    assert_eq!(a.power(0).unwrap_err(), NoiseError::InvalidExponent(0));
    assert_eq!(a.power(-1).unwrap_err(), NoiseError::InvalidExponent(-1));
}

#[test]
fn power_converges_towards_stationary_rows() {
    let p = a().power(64).unwrap();
    // Stationary distribution of [[0.9, 0.1], [0.2, 0.8]] is [2/3, 1/3]
    for row in p.matrix().outer_iter() {
        assert!((row[0] - 2.0 / 3.0).abs() < 1e-9);
        assert!((row[1] - 1.0 / 3.0).abs() < 1e-9);
    }
}

#[test]
fn tensor_and_expand_build_joint_error() {
    let a = a();
    let b = ReadoutError::from_flip_probabilities(0.05, 0.15).unwrap();

    let ab = a.tensor(&b).unwrap();
    let ba = b.expand(&a).unwrap();
    assert_eq!(ab.num_qubits(), 2);
    assert_eq!(ab.dim(), 4);
    assert_row_stochastic(&ab);
    assert_eq!(ab.matrix(), ba.matrix());

    // Outcome 0b10: first qubit (a) reads 1, second (b) reads 0
    assert!((ab.matrix()[[0, 2]] - 0.1 * 0.95).abs() < TOL);
}

#[test]
fn tensor_accepts_raw_operands() {
    let a = a();
    let joint = a.tensor(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    assert_eq!(joint.num_qubits(), 2);
    assert!(a.expand([[0.5, 0.7], [0.5, 0.5]]).is_err());
}

#[test]
fn tolerance_bounds() {
    assert!(matches!(
        Tolerance::default().with_atol(1e-3),
        Err(NoiseError::InvalidTolerance { .. })
    ));
    assert!(matches!(
        Tolerance::default().with_rtol(-1e-6),
        Err(NoiseError::InvalidTolerance { .. })
    ));
    assert!(Tolerance::new(MAX_TOL, 0.0).is_ok());
}

#[test]
fn stricter_tolerance_does_not_revalidate_existing_errors() {
    let rows = [[0.9 + 2e-6, 0.1], [0.2, 0.8]];
    let loose = Tolerance::default().with_atol(1e-5).unwrap();
    let err = ReadoutError::with_tolerance(&rows, loose).unwrap();
    let snapshot = err.clone();

    // The same rows are rejected under a stricter tolerance
    let strict = Tolerance::new(0.0, 0.0).unwrap();
    assert!(matches!(
        ReadoutError::with_tolerance(&rows, strict),
        Err(NoiseError::NotNormalized { row: 0, .. })
    ));

    // while the earlier error is still usable and unchanged
    assert_eq!(err, snapshot);
    assert_eq!(err.tolerance(), loose);
    assert_eq!(err.power(2).unwrap().num_qubits(), 1);
}

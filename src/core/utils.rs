//! Utility functions for assignment-probability matrices.
//!
//! This module contains helper functions for:
//! - Matrix operations (Kronecker product, Frobenius norm).
//! - Decimal rounding used by exact identity checks.
//! - Converting matrix dimensions to qubit counts.

use ndarray::Array2;

/// Computes the Kronecker (Tensor) product of two matrices.
///
/// If `A` is an $m \times n$ matrix and `B` is a $p \times q$ matrix,
/// the result is an $mp \times nq$ matrix in which `A` indexes the
/// more-significant block:
/// $(A \otimes B)_{ip + k,\, jq + l} = A_{ij} B_{kl}$.
pub fn kronecker_product(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let (m, n) = a.dim();
    let (p, q) = b.dim();

    Array2::from_shape_fn((m * p, n * q), |(row, col)| {
        a[[row / p, col / q]] * b[[row % p, col % q]]
    })
}

/// Euclidean (Frobenius) norm of a matrix: $\sqrt{\sum_{ij} |M_{ij}|^2}$.
pub fn frobenius_norm(matrix: &Array2<f64>) -> f64 {
    matrix.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Rounds `value` to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Number of qubits for a matrix side of `dim` outcomes.
///
/// Returns `None` unless `dim` is a non-zero power of two.
pub fn qubits_from_dim(dim: usize) -> Option<usize> {
    // log_2
    dim.is_power_of_two().then(|| dim.trailing_zeros() as usize)
}

use crate::core::errors::NoiseError;
use crate::core::record::ReadoutRecord;
use crate::core::tolerance::Tolerance;
use crate::core::utils;
use ndarray::{Array2, ArrayView1, array};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, trace};

/// Classical readout (assignment) error on one or more qubits.
///
/// Row `m` of the matrix is the distribution of reported outcomes given the
/// true outcome `m`: entry `(m, j)` is `P(j | m)`, with `j` and `m` the
/// integer values of the measured bitstrings.
///
/// ```text
/// 1 qubit:  [[P(0|0), P(1|0)],
///            [P(0|1), P(1|1)]]
/// ```
///
/// Instances are validated once at construction and never mutated; every
/// algebraic operation returns a new, re-validated instance.
#[derive(Clone, Debug)]
pub struct ReadoutError {
    probabilities: Array2<f64>,
    num_qubits: usize,
    tolerance: Tolerance,
}

impl ReadoutError {
    /// Creates a readout error from row-major assignment probabilities using
    /// the default [`Tolerance`].
    ///
    /// # Errors
    ///
    /// See [`ReadoutError::with_tolerance`].
    pub fn new<R: AsRef<[f64]>>(probabilities: &[R]) -> Result<Self, NoiseError> {
        Self::with_tolerance(probabilities, Tolerance::default())
    }

    /// Creates a readout error, checking row normalization against `tolerance.atol()`.
    ///
    /// # Errors
    ///
    /// Checks run in order and the first failure is returned:
    /// - `EmptyInput` if no rows are given.
    /// - `InvalidDimension` if the first row length is not a power of two, the
    ///   number of rows differs from it, or any row has a different length.
    /// - `NotNormalized` if a row does not sum to 1 within `atol`.
    /// - `NegativeProbability` if a row has a negative entry.
    pub fn with_tolerance<R: AsRef<[f64]>>(
        probabilities: &[R],
        tolerance: Tolerance,
    ) -> Result<Self, NoiseError> {
        let first = probabilities.first().ok_or_else(|| {
            debug!("rejected readout error: no rows");
            NoiseError::EmptyInput
        })?;
        let num_outcomes = first.as_ref().len();
        let num_qubits = check_shape(num_outcomes, probabilities.len())?;

        for (idx, row) in probabilities.iter().enumerate() {
            check_row(idx, ArrayView1::from(row.as_ref()), num_outcomes, tolerance.atol())?;
        }

        let matrix = Array2::from_shape_fn((num_outcomes, num_outcomes), |(m, j)| {
            probabilities[m].as_ref()[j]
        });

        trace!(num_qubits, "created readout error");
        Ok(Self {
            probabilities: matrix,
            num_qubits,
            tolerance,
        })
    }

    /// Creates a readout error from an owned matrix using the default [`Tolerance`].
    pub fn from_matrix(probabilities: Array2<f64>) -> Result<Self, NoiseError> {
        Self::from_matrix_with_tolerance(probabilities, Tolerance::default())
    }

    /// Matrix counterpart of [`ReadoutError::with_tolerance`], with the same checks.
    pub fn from_matrix_with_tolerance(
        probabilities: Array2<f64>,
        tolerance: Tolerance,
    ) -> Result<Self, NoiseError> {
        let (rows, cols) = probabilities.dim();
        if rows == 0 {
            debug!("rejected readout error: no rows");
            return Err(NoiseError::EmptyInput);
        }
        let num_qubits = check_shape(cols, rows)?;

        for (idx, row) in probabilities.outer_iter().enumerate() {
            check_row(idx, row, cols, tolerance.atol())?;
        }

        trace!(num_qubits, "created readout error");
        Ok(Self {
            probabilities,
            num_qubits,
            tolerance,
        })
    }

    /// Ideal (error-free) readout on `num_qubits` qubits.
    ///
    /// # Errors
    ///
    /// Returns `NoiseError::InvalidDimension` if `2^num_qubits` does not fit in a `usize`.
    pub fn identity(num_qubits: usize) -> Result<Self, NoiseError> {
        let dim = u32::try_from(num_qubits)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .ok_or(NoiseError::InvalidDimension {
                expected: usize::BITS as usize - 1,
                got: num_qubits,
                context: "number of qubits",
            })?;

        Ok(Self {
            probabilities: Array2::eye(dim),
            num_qubits,
            tolerance: Tolerance::default(),
        })
    }

    /// Single-qubit readout error from its two flip probabilities.
    ///
    /// * `p01` - P(report 1 | true 0)
    /// * `p10` - P(report 0 | true 1)
    pub fn from_flip_probabilities(p01: f64, p10: f64) -> Result<Self, NoiseError> {
        Self::from_matrix(array![[1.0 - p01, p01], [p10, 1.0 - p10]])
    }

    /// Single-qubit readout error flipping either outcome with probability `p`.
    pub fn symmetric(p: f64) -> Result<Self, NoiseError> {
        Self::from_flip_probabilities(p, p)
    }

    /// Number of qubits the error acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of outcomes, `2^num_qubits`.
    pub fn dim(&self) -> usize {
        self.probabilities.nrows()
    }

    /// Assignment probability matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.probabilities
    }

    /// Owned copy of the assignment probabilities, one `Vec` per true outcome.
    pub fn probabilities(&self) -> Vec<Vec<f64>> {
        self.probabilities
            .outer_iter()
            .map(|row| row.to_vec())
            .collect()
    }

    /// Tolerance this error was validated under.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Returns true if the error is the identity channel.
    ///
    /// The Frobenius distance to the identity is rounded to 12 decimals and
    /// must be exactly zero; the construction tolerance plays no part.
    pub fn is_identity(&self) -> bool {
        let eye = Array2::<f64>::eye(self.dim());
        let delta = utils::frobenius_norm(&(&self.probabilities - &eye));
        utils::round_to(delta, 12) == 0.0
    }

    /// Average probability of reporting the true outcome, `Tr(M) / 2^n`.
    pub fn assignment_fidelity(&self) -> f64 {
        self.probabilities.diag().sum() / self.dim() as f64
    }

    /// Distribution of reported outcomes for a distribution of true outcomes.
    pub fn apply_to_distribution(&self, distribution: &[f64]) -> Result<Vec<f64>, NoiseError> {
        if distribution.len() != self.dim() {
            return Err(NoiseError::InvalidDimension {
                expected: self.dim(),
                got: distribution.len(),
                context: "distribution length",
            });
        }
        Ok(ArrayView1::from(distribution)
            .dot(&self.probabilities)
            .to_vec())
    }

    /// External record `{type: "readout_error", operations: ["measure"], probabilities}`.
    pub fn serialize(&self) -> ReadoutRecord {
        ReadoutRecord::new(self.probabilities())
    }

    /// Composes the current readout error with another one.
    ///
    /// With `front == false` the result is `other(self(input))`, computed as
    /// `other · self`. With `front == true` it is `self(other(input))`,
    /// computed as `self · other`. The product is validated under the
    /// operand tolerance with the larger `atol`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the qubit counts differ, or any construction
    /// error raised while coercing `other` or validating the product.
    pub fn compose<'a, E: IntoReadoutError<'a>>(
        &self,
        other: E,
        front: bool,
    ) -> Result<ReadoutError, NoiseError> {
        let other = other.into_readout_error()?;
        if self.num_qubits != other.num_qubits {
            return Err(NoiseError::DimensionMismatch {
                left: self.num_qubits,
                right: other.num_qubits,
            });
        }

        let probs = if front {
            self.probabilities.dot(&other.probabilities)
        } else {
            other.probabilities.dot(&self.probabilities)
        };

        // Returns a different ReadoutError
        Self::from_matrix_with_tolerance(probs, self.tolerance.looser(other.tolerance))
    }

    /// Composes the readout error with itself `n` times.
    ///
    /// # Errors
    ///
    /// `InvalidExponent` if `n < 1`.
    pub fn power(&self, n: i64) -> Result<ReadoutError, NoiseError> {
        if n < 1 {
            return Err(NoiseError::InvalidExponent(n));
        }
        let mut ret = self.clone();
        for _ in 1..n {
            ret = ret.compose(self, false)?;
        }
        Ok(ret)
    }

    /// Tensor product `self ⊗ other`; `self` holds the more-significant qubits.
    pub fn tensor<'a, E: IntoReadoutError<'a>>(&self, other: E) -> Result<ReadoutError, NoiseError> {
        self.tensor_product(other, false)
    }

    /// Tensor product `other ⊗ self`; `other` holds the more-significant qubits.
    pub fn expand<'a, E: IntoReadoutError<'a>>(&self, other: E) -> Result<ReadoutError, NoiseError> {
        self.tensor_product(other, true)
    }

    fn tensor_product<'a, E: IntoReadoutError<'a>>(
        &self,
        other: E,
        reverse: bool,
    ) -> Result<ReadoutError, NoiseError> {
        let other = other.into_readout_error()?;
        let probs = if reverse {
            utils::kronecker_product(&other.probabilities, &self.probabilities)
        } else {
            utils::kronecker_product(&self.probabilities, &other.probabilities)
        };
        Self::from_matrix_with_tolerance(probs, self.tolerance.looser(other.tolerance))
    }
}

/// Checks the matrix side and returns the qubit count.
fn check_shape(num_outcomes: usize, num_rows: usize) -> Result<usize, NoiseError> {
    let num_qubits = utils::qubits_from_dim(num_outcomes).ok_or_else(|| {
        debug!(num_outcomes, "rejected readout error: length is not a power of two");
        NoiseError::InvalidDimension {
            expected: num_outcomes.next_power_of_two(),
            got: num_outcomes,
            context: "row length is not a power of two",
        }
    })?;

    if num_rows != num_outcomes {
        debug!(num_rows, num_outcomes, "rejected readout error: not square");
        return Err(NoiseError::InvalidDimension {
            expected: num_outcomes,
            got: num_rows,
            context: "number of rows",
        });
    }

    Ok(num_qubits)
}

/// Validates a single row of assignment probabilities.
fn check_row(
    row: usize,
    vec: ArrayView1<'_, f64>,
    num_outcomes: usize,
    atol: f64,
) -> Result<(), NoiseError> {
    if vec.len() != num_outcomes {
        debug!(row, len = vec.len(), "rejected readout error: ragged rows");
        return Err(NoiseError::InvalidDimension {
            expected: num_outcomes,
            got: vec.len(),
            context: "vectors are different lengths",
        });
    }

    let sum = vec.sum();
    // Written so that a NaN sum is rejected
    if !((sum - 1.0).abs() <= atol) {
        debug!(row, sum, atol, "rejected readout error: row not normalized");
        return Err(NoiseError::NotNormalized { row, sum });
    }

    if let Some(&value) = vec.iter().find(|&&p| p < 0.0) {
        debug!(row, value, "rejected readout error: negative probability");
        return Err(NoiseError::NegativeProbability { row, value });
    }

    Ok(())
}

impl PartialEq for ReadoutError {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits && self.probabilities == other.probabilities
    }
}

impl fmt::Display for ReadoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReadoutError on {} qubits. Assignment probabilities:",
            self.num_qubits
        )?;
        for (m, row) in self.probabilities.outer_iter().enumerate() {
            write!(f, "\n P(j|{m}) = {:?}", row.to_vec())?;
        }
        Ok(())
    }
}

impl TryFrom<&ReadoutRecord> for ReadoutError {
    type Error = NoiseError;

    fn try_from(record: &ReadoutRecord) -> Result<Self, Self::Error> {
        record.check_header()?;
        ReadoutError::new(&record.probabilities)
    }
}

impl TryFrom<ReadoutRecord> for ReadoutError {
    type Error = NoiseError;

    fn try_from(record: ReadoutRecord) -> Result<Self, Self::Error> {
        ReadoutError::try_from(&record)
    }
}

/// Values that can be used where a [`ReadoutError`] operand is expected.
///
/// Raw matrices are validated with the default [`Tolerance`].
pub trait IntoReadoutError<'a> {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError>;
}

impl<'a> IntoReadoutError<'a> for ReadoutError {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError> {
        Ok(Cow::Owned(self))
    }
}

impl<'a> IntoReadoutError<'a> for &'a ReadoutError {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError> {
        Ok(Cow::Borrowed(self))
    }
}

impl<'a> IntoReadoutError<'a> for Vec<Vec<f64>> {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError> {
        ReadoutError::new(&self).map(Cow::Owned)
    }
}

impl<'a> IntoReadoutError<'a> for &[Vec<f64>] {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError> {
        ReadoutError::new(self).map(Cow::Owned)
    }
}

impl<'a, const N: usize, const M: usize> IntoReadoutError<'a> for [[f64; N]; M] {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError> {
        ReadoutError::new(&self).map(Cow::Owned)
    }
}

impl<'a> IntoReadoutError<'a> for Array2<f64> {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError> {
        ReadoutError::from_matrix(self).map(Cow::Owned)
    }
}

impl<'a> IntoReadoutError<'a> for &Array2<f64> {
    fn into_readout_error(self) -> Result<Cow<'a, ReadoutError>, NoiseError> {
        ReadoutError::from_matrix(self.clone()).map(Cow::Owned)
    }
}

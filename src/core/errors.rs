use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoiseError {
    #[error("Input probabilities: empty")]
    EmptyInput,

    #[error("Invalid probabilities: expected {expected} entries, got {got} ({context})")]
    InvalidDimension {
        expected: usize,
        got: usize,
        context: &'static str,
    },

    #[error("Invalid probabilities: sum of row {row} = {sum} is not 1")]
    NotNormalized { row: usize, sum: f64 },

    #[error("Invalid probabilities: row {row} contains a negative probability {value}")]
    NegativeProbability { row: usize, value: f64 },

    #[error("Dimension mismatch: {left} qubits vs {right} qubits")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Can only power with positive integer powers, got {0}")]
    InvalidExponent(i64),

    #[error("Invalid {name}: {value} must be in [0, {max}]")]
    InvalidTolerance {
        name: &'static str,
        value: f64,
        max: f64,
    },

    #[error("Outcome {outcome} out of range for a {dim}-outcome readout error")]
    OutcomeOutOfRange { outcome: usize, dim: usize },

    #[error("Invalid readout record: {0}")]
    InvalidRecord(String),
}

use crate::{ReadoutError, errors::NoiseError};
use rand::Rng;
use std::collections::HashMap;

/// Applies a readout error to ideal measurement outcomes.
///
/// Each true outcome is replaced by a reported outcome drawn from the
/// matching row of the assignment matrix.
#[derive(Debug, Clone)]
pub struct ReadoutSampler {
    /// The readout error to apply.
    pub error: ReadoutError,
    /// Cumulative distribution of each row, computed once.
    cdfs: Vec<Vec<f64>>,
}

impl ReadoutSampler {
    /// Creates a new `ReadoutSampler` for the given error.
    pub fn new(error: ReadoutError) -> Self {
        let cdfs = error
            .matrix()
            .outer_iter()
            .map(|row| {
                let mut current_sum = 0.0;
                row.iter()
                    .map(|&p| {
                        current_sum += p;
                        current_sum
                    })
                    .collect()
            })
            .collect();

        Self { error, cdfs }
    }

    /// Draws the reported outcome for a single shot whose true outcome is `true_outcome`.
    ///
    /// # Errors
    ///
    /// Returns `NoiseError::OutcomeOutOfRange` if `true_outcome >= 2^num_qubits`.
    pub fn sample_outcome<R: Rng>(
        &self,
        true_outcome: usize,
        rng: &mut R,
    ) -> Result<usize, NoiseError> {
        let cdf = self
            .cdfs
            .get(true_outcome)
            .ok_or(NoiseError::OutcomeOutOfRange {
                outcome: true_outcome,
                dim: self.cdfs.len(),
            })?;

        let r: f64 = rng.random(); // Generates [0.0, 1.0)

        // Rows may sum to slightly less than 1; fall back to the last reachable outcome
        let outcome = cdf.iter().position(|&c| r < c).unwrap_or_else(|| {
            self.error
                .matrix()
                .row(true_outcome)
                .iter()
                .rposition(|&p| p > 0.0)
                .unwrap_or(cdf.len() - 1)
        });

        Ok(outcome)
    }

    /// Applies the error shot by shot to a histogram of true outcomes.
    ///
    /// The returned histogram holds the reported outcomes and has the same
    /// total number of shots. Outcomes with zero counts are omitted.
    pub fn corrupt_counts<R: Rng>(
        &self,
        counts: &HashMap<usize, usize>,
        rng: &mut R,
    ) -> Result<HashMap<usize, usize>, NoiseError> {
        let mut raw_counts = vec![0usize; self.cdfs.len()];

        for (&true_outcome, &shots) in counts {
            for _ in 0..shots {
                let reported = self.sample_outcome(true_outcome, rng)?;
                raw_counts[reported] += 1;
            }
        }

        Ok(raw_counts
            .into_iter()
            .enumerate()
            .filter(|&(_, count)| count > 0)
            .collect())
    }

    /// [`ReadoutSampler::corrupt_counts`] with the thread-local RNG.
    pub fn run(&self, counts: &HashMap<usize, usize>) -> Result<HashMap<usize, usize>, NoiseError> {
        let mut rng = rand::rng();
        self.corrupt_counts(counts, &mut rng)
    }
}

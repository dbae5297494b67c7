//! Serialized form of a readout error, as consumed by noise models and simulators.

use crate::core::errors::NoiseError;
use serde::{Deserialize, Serialize};

/// Value of the `type` field of every readout record.
pub const READOUT_ERROR_TYPE: &str = "readout_error";
/// The only instruction a readout error applies to.
pub const MEASURE_OPERATION: &str = "measure";

/// External representation of a readout error.
///
/// Rows and entries keep the order of the stored matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadoutRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub operations: Vec<String>,
    pub probabilities: Vec<Vec<f64>>,
}

impl ReadoutRecord {
    /// Builds a record for the given row-major probabilities.
    pub fn new(probabilities: Vec<Vec<f64>>) -> Self {
        Self {
            kind: READOUT_ERROR_TYPE.to_string(),
            operations: vec![MEASURE_OPERATION.to_string()],
            probabilities,
        }
    }

    /// Checks the fixed `type` and `operations` fields.
    pub fn check_header(&self) -> Result<(), NoiseError> {
        if self.kind != READOUT_ERROR_TYPE {
            return Err(NoiseError::InvalidRecord(format!(
                "type must be \"{READOUT_ERROR_TYPE}\", got \"{}\"",
                self.kind
            )));
        }
        if self.operations.len() != 1 || self.operations[0] != MEASURE_OPERATION {
            return Err(NoiseError::InvalidRecord(format!(
                "operations must be [\"{MEASURE_OPERATION}\"], got {:?}",
                self.operations
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, NoiseError> {
        serde_json::to_string(self).map_err(|e| NoiseError::InvalidRecord(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, NoiseError> {
        serde_json::from_str(json).map_err(|e| NoiseError::InvalidRecord(e.to_string()))
    }
}

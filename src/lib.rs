//! Classical readout (measurement assignment) errors for multi-qubit devices.
//!
//! A [`ReadoutError`] is a row-stochastic confusion matrix validated at
//! construction, with an algebra of composition, powers and tensor products.

mod core;
mod sampler;

pub use crate::core::{
    DEFAULT_ATOL, DEFAULT_RTOL, IntoReadoutError, MAX_TOL, MEASURE_OPERATION, READOUT_ERROR_TYPE,
    ReadoutError, ReadoutRecord, Tolerance, errors, utils,
};
pub use crate::sampler::ReadoutSampler;

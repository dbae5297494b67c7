pub mod errors;
mod readout;
mod record;
mod tolerance;
pub mod utils;

pub use readout::{IntoReadoutError, ReadoutError};
pub use record::{MEASURE_OPERATION, READOUT_ERROR_TYPE, ReadoutRecord};
pub use tolerance::{DEFAULT_ATOL, DEFAULT_RTOL, MAX_TOL, Tolerance};

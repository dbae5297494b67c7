use crate::core::errors::NoiseError;

/// Largest accepted value for either tolerance parameter.
pub const MAX_TOL: f64 = 1e-4;
/// Default absolute tolerance for the row normalization check.
pub const DEFAULT_ATOL: f64 = 1e-8;
/// Default relative tolerance for float comparisons.
pub const DEFAULT_RTOL: f64 = 1e-5;

/// Floating-point tolerances used when validating assignment probabilities.
///
/// A `Tolerance` is plain configuration: it is passed to construction and
/// only affects instances built with it afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    atol: f64,
    rtol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            atol: DEFAULT_ATOL,
            rtol: DEFAULT_RTOL,
        }
    }
}

impl Tolerance {
    /// Creates a tolerance context.
    ///
    /// # Errors
    ///
    /// Returns `NoiseError::InvalidTolerance` if either value is outside `[0, MAX_TOL]`.
    pub fn new(atol: f64, rtol: f64) -> Result<Self, NoiseError> {
        Ok(Self {
            atol: validate_tol("atol", atol)?,
            rtol: validate_tol("rtol", rtol)?,
        })
    }

    /// Absolute tolerance.
    pub fn atol(&self) -> f64 {
        self.atol
    }

    /// Relative tolerance.
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Sets the absolute tolerance.
    ///
    /// # Errors
    ///
    /// Returns `NoiseError::InvalidTolerance` if `atol` is outside `[0, MAX_TOL]`;
    /// the current value is kept.
    pub fn set_atol(&mut self, atol: f64) -> Result<(), NoiseError> {
        self.atol = validate_tol("atol", atol)?;
        Ok(())
    }

    /// Sets the relative tolerance.
    ///
    /// # Errors
    ///
    /// Returns `NoiseError::InvalidTolerance` if `rtol` is outside `[0, MAX_TOL]`;
    /// the current value is kept.
    pub fn set_rtol(&mut self, rtol: f64) -> Result<(), NoiseError> {
        self.rtol = validate_tol("rtol", rtol)?;
        Ok(())
    }

    /// Returns a copy with a different absolute tolerance.
    pub fn with_atol(mut self, atol: f64) -> Result<Self, NoiseError> {
        self.set_atol(atol)?;
        Ok(self)
    }

    /// Returns a copy with a different relative tolerance.
    pub fn with_rtol(mut self, rtol: f64) -> Result<Self, NoiseError> {
        self.set_rtol(rtol)?;
        Ok(self)
    }

    /// The tolerance with the larger `atol`, `self` on ties.
    pub fn looser(self, other: Tolerance) -> Tolerance {
        if other.atol > self.atol { other } else { self }
    }

    /// `|a - b| <= atol + rtol * |b|`
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }
}

fn validate_tol(name: &'static str, value: f64) -> Result<f64, NoiseError> {
    // NaN fails the range check
    if !(0.0..=MAX_TOL).contains(&value) {
        return Err(NoiseError::InvalidTolerance {
            name,
            value,
            max: MAX_TOL,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_fixed_constants() {
        let tol = Tolerance::default();
        assert_eq!(tol.atol(), DEFAULT_ATOL);
        assert_eq!(tol.rtol(), DEFAULT_RTOL);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(Tolerance::new(0.0, 0.0).is_ok());
        assert!(Tolerance::new(MAX_TOL, MAX_TOL).is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            Tolerance::new(1e-3, DEFAULT_RTOL),
            Err(NoiseError::InvalidTolerance { name: "atol", .. })
        ));
        assert!(matches!(
            Tolerance::new(DEFAULT_ATOL, -1e-9),
            Err(NoiseError::InvalidTolerance { name: "rtol", .. })
        ));
        assert!(Tolerance::new(f64::NAN, DEFAULT_RTOL).is_err());
    }

    #[test]
    fn failed_setter_leaves_value_unchanged() {
        let mut tol = Tolerance::default();
        assert!(tol.set_atol(-1.0).is_err());
        assert_eq!(tol.atol(), DEFAULT_ATOL);

        tol.set_atol(1e-6).unwrap();
        assert_eq!(tol.atol(), 1e-6);
    }

    #[test]
    fn looser_picks_larger_atol() {
        let strict = Tolerance::default();
        let loose = Tolerance::new(1e-5, 0.0).unwrap();
        assert_eq!(strict.looser(loose), loose);
        assert_eq!(loose.looser(strict), loose);
        assert_eq!(strict.looser(strict), strict);
    }

    #[test]
    fn is_close_combines_absolute_and_relative() {
        let tol = Tolerance::new(1e-8, 1e-5).unwrap();
        assert!(tol.is_close(1.0, 1.0 + 5e-6));
        assert!(!tol.is_close(1.0, 1.0 + 5e-5));
        assert!(tol.is_close(0.0, 5e-9));
    }
}

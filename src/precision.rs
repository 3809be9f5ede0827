//! Experimental precision assessment.
//!
//! The coefficient of variation expresses the residual standard deviation
//! relative to the grand mean; agronomists read it as a quality grade of the
//! whole trial.

use std::fmt;

use crate::error::{Error, Result};

/// Qualitative band for a coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrecisionBand {
    /// CV% below 10: excellent experimental precision.
    Excellent,
    /// CV% in [10, 20): good precision.
    Good,
    /// CV% in [20, 30): moderate precision.
    Moderate,
    /// CV% of 30 or more: poor precision, results are hard to trust.
    Poor,
}

impl PrecisionBand {
    /// Classify a coefficient of variation into its band.
    #[must_use]
    pub fn classify(cv_percent: f64) -> Self {
        if cv_percent < 10.0 {
            Self::Excellent
        } else if cv_percent < 20.0 {
            Self::Good
        } else if cv_percent < 30.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for PrecisionBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
        };
        write!(f, "{name}")
    }
}

/// Coefficient of variation together with its qualitative band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecisionAssessment {
    /// The coefficient of variation, in percent.
    pub cv_percent: f64,
    /// The band the value falls into.
    pub band: PrecisionBand,
}

/// Compute the coefficient of variation, in percent.
///
/// `CV% = (sqrt(MS_error) / grand_mean) × 100`
///
/// # Errors
///
/// Returns [`Error::UndefinedCoefficientOfVariation`] if the grand mean is 0;
/// the ratio has no meaning on a scale centered at zero.
pub fn coefficient_of_variation(ms_error: f64, grand_mean: f64) -> Result<f64> {
    if grand_mean == 0.0 {
        return Err(Error::UndefinedCoefficientOfVariation);
    }
    Ok(ms_error.sqrt() / grand_mean * 100.0)
}

/// Compute the coefficient of variation and classify it.
///
/// # Errors
///
/// Same conditions as [`coefficient_of_variation`].
pub fn assess(ms_error: f64, grand_mean: f64) -> Result<PrecisionAssessment> {
    let cv_percent = coefficient_of_variation(ms_error, grand_mean)?;
    Ok(PrecisionAssessment {
        cv_percent,
        band: PrecisionBand::classify(cv_percent),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cv_known_value() {
        // sqrt(0.0533...) / 11 * 100 = 2.099...
        let cv = coefficient_of_variation(0.32 / 6.0, 11.0).unwrap();
        assert!((cv - 2.099_461).abs() < 1e-4);
    }

    #[test]
    fn test_cv_zero_mean_undefined() {
        assert!(matches!(
            coefficient_of_variation(1.0, 0.0),
            Err(Error::UndefinedCoefficientOfVariation)
        ));
    }

    #[test]
    fn test_cv_scale_invariance() {
        // Scaling every observation by k scales MS_error by k^2 and the grand
        // mean by k, leaving CV% unchanged.
        let base = coefficient_of_variation(0.5, 20.0).unwrap();
        for &k in &[0.5, 2.0, 7.0, 100.0] {
            let scaled = coefficient_of_variation(0.5 * k * k, 20.0 * k).unwrap();
            assert!(
                (scaled - base).abs() < 1e-9,
                "CV changed under scaling by {k}"
            );
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(PrecisionBand::classify(2.0), PrecisionBand::Excellent);
        assert_eq!(PrecisionBand::classify(9.999), PrecisionBand::Excellent);
        assert_eq!(PrecisionBand::classify(10.0), PrecisionBand::Good);
        assert_eq!(PrecisionBand::classify(19.999), PrecisionBand::Good);
        assert_eq!(PrecisionBand::classify(20.0), PrecisionBand::Moderate);
        assert_eq!(PrecisionBand::classify(29.999), PrecisionBand::Moderate);
        assert_eq!(PrecisionBand::classify(30.0), PrecisionBand::Poor);
        assert_eq!(PrecisionBand::classify(55.0), PrecisionBand::Poor);
    }

    #[test]
    fn test_assess() {
        let assessment = assess(4.0, 10.0).unwrap();
        assert!((assessment.cv_percent - 20.0).abs() < 1e-12);
        assert_eq!(assessment.band, PrecisionBand::Moderate);
    }
}

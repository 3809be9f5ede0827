//! F-statistic computation and theoretical comparison.
//!
//! The observed ratio is always effect mean square over error mean square;
//! that denominator is fixed by the two-way randomized-block model.

use crate::dist;
use crate::error::{Error, Result};

use super::types::{FComparison, FStatistics, MeanSquares};

/// Compute the observed F ratios for the treatment and block effects.
///
/// # Errors
///
/// Returns [`Error::UndefinedFStatistic`] if the error mean square is 0:
/// with no estimate of residual variability the ratio is undefined, not
/// infinite.
pub fn f_statistics(ms: &MeanSquares) -> Result<FStatistics> {
    if ms.error == 0.0 {
        return Err(Error::UndefinedFStatistic);
    }

    Ok(FStatistics {
        treatment: ms.treatment / ms.error,
        block: ms.block / ms.error,
    })
}

/// Compare one observed F ratio against the theoretical F-distribution.
///
/// Looks up the critical value at level `alpha` and the p-value of the
/// observed ratio. The effect is significant iff `observed > critical`
/// (strictly); by monotonicity of the distribution this agrees with
/// `p_value < alpha` away from the boundary.
///
/// # Errors
///
/// Propagates [`Error::InvalidSignificanceLevel`] and
/// [`Error::DegenerateDistribution`] from the oracle.
pub fn compare(observed: f64, df1: usize, df2: usize, alpha: f64) -> Result<FComparison> {
    let critical = dist::quantile(alpha, df1, df2)?;
    let p_value = dist::survival(observed, df1, df2);

    Ok(FComparison {
        observed,
        critical,
        p_value,
        significant: observed > critical,
    })
}

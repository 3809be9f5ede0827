//! Randomized-block ANOVA engines.
//!
//! This module decomposes a complete block experiment step by step:
//!
//! 1. Degrees of freedom from the design shape ([`DegreesOfFreedom`])
//! 2. Sum-of-squares decomposition ([`sums_of_squares`])
//! 3. Mean squares, one variance estimate per source ([`mean_squares`])
//! 4. Observed F ratios ([`f_statistics`])
//! 5. Comparison against the theoretical distribution ([`compare`])
//!
//! Each stage is a pure function over the previous stage's output, which is
//! what lets the learning progression validate them one at a time. The
//! [`analyze`] entry point runs the whole pipeline at once and assembles the
//! recap table.

mod dof;
mod f_ratio;
mod means;
mod sums;
mod types;

pub use f_ratio::{compare, f_statistics};
pub use means::mean_squares;
pub use sums::sums_of_squares;
pub use types::{
    AnovaRow, AnovaTable, DegreesOfFreedom, EffectComparisons, FComparison, FStatistics,
    MeanSquares, SumsOfSquares, VarianceSource,
};

use crate::design::ExperimentalDesign;
use crate::error::Result;
use crate::precision::{self, PrecisionAssessment};

/// Complete analysis of one randomized block experiment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    /// Degrees of freedom for every source.
    pub degrees_of_freedom: DegreesOfFreedom,
    /// The sum-of-squares decomposition.
    pub sums_of_squares: SumsOfSquares,
    /// Variance estimates.
    pub mean_squares: MeanSquares,
    /// Observed F ratios.
    pub f_statistics: FStatistics,
    /// Treatment and block verdicts at the chosen level.
    pub comparisons: EffectComparisons,
    /// Coefficient of variation and its band.
    pub precision: PrecisionAssessment,
    /// The assembled recap table.
    pub table: AnovaTable,
}

/// Run the full ANOVA pipeline on a design.
///
/// # Errors
///
/// Propagates any stage failure: [`crate::Error::NegativeResidual`],
/// [`crate::Error::ZeroDegreesOfFreedom`],
/// [`crate::Error::UndefinedFStatistic`],
/// [`crate::Error::InvalidSignificanceLevel`], or
/// [`crate::Error::UndefinedCoefficientOfVariation`].
pub fn analyze(design: &ExperimentalDesign, alpha: f64) -> Result<Analysis> {
    let dof = DegreesOfFreedom::for_shape(design.shape());
    let ss = sums_of_squares(design)?;
    let ms = mean_squares(&ss, &dof)?;
    let f = f_statistics(&ms)?;

    let treatment = compare(f.treatment, dof.treatment, dof.error, alpha)?;
    let block = compare(f.block, dof.block, dof.error, alpha)?;
    let comparisons = EffectComparisons {
        alpha,
        treatment,
        block,
    };

    let precision = precision::assess(ms.error, ss.grand_mean)?;

    let table = AnovaTable {
        alpha,
        rows: vec![
            AnovaRow {
                source: VarianceSource::Treatment,
                sum_of_squares: ss.treatment,
                degrees_of_freedom: dof.treatment,
                mean_square: Some(ms.treatment),
                f_ratio: Some(f.treatment),
                p_value: Some(treatment.p_value),
                significant: Some(treatment.significant),
            },
            AnovaRow {
                source: VarianceSource::Block,
                sum_of_squares: ss.block,
                degrees_of_freedom: dof.block,
                mean_square: Some(ms.block),
                f_ratio: Some(f.block),
                p_value: Some(block.p_value),
                significant: Some(block.significant),
            },
            AnovaRow {
                source: VarianceSource::Error,
                sum_of_squares: ss.error,
                degrees_of_freedom: dof.error,
                mean_square: Some(ms.error),
                f_ratio: None,
                p_value: None,
                significant: None,
            },
            AnovaRow {
                source: VarianceSource::Total,
                sum_of_squares: ss.total,
                degrees_of_freedom: dof.total,
                mean_square: None,
                f_ratio: None,
                p_value: None,
                significant: None,
            },
        ],
    };

    Ok(Analysis {
        degrees_of_freedom: dof,
        sums_of_squares: ss,
        mean_squares: ms,
        f_statistics: f,
        comparisons,
        precision,
        table,
    })
}

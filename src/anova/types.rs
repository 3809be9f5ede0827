//! ANOVA result types.
//!
//! Core records produced by the staged randomized-block analysis.

use std::fmt;

/// A source of variability in the randomized block decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VarianceSource {
    /// Variation attributable to the treatments.
    Treatment,
    /// Variation attributable to the blocks.
    Block,
    /// Residual (unexplained) variation.
    Error,
    /// Total variation around the grand mean.
    Total,
}

impl fmt::Display for VarianceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Treatment => "treatment",
            Self::Block => "block",
            Self::Error => "error",
            Self::Total => "total",
        };
        write!(f, "{name}")
    }
}

// `crate::Error::ZeroDegreesOfFreedom` holds a field named `source`, which
// `thiserror` treats as the error's `#[source]`. That requires this type to
// implement `std::error::Error`; the default methods suffice.
impl std::error::Error for VarianceSource {}

/// Degrees of freedom for every variance source of the design.
///
/// Satisfies `treatment + block + error == total` for any analyzable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DegreesOfFreedom {
    /// Total degrees of freedom, `t·b − 1`.
    pub total: usize,
    /// Treatment degrees of freedom, `t − 1`.
    pub treatment: usize,
    /// Block degrees of freedom, `b − 1`.
    pub block: usize,
    /// Error degrees of freedom, `(t − 1)(b − 1)`.
    pub error: usize,
}

/// The sum-of-squares decomposition of a complete balanced design.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SumsOfSquares {
    /// Total sum of squares around the grand mean.
    pub total: f64,
    /// Sum of squares attributable to treatments.
    pub treatment: f64,
    /// Sum of squares attributable to blocks.
    pub block: f64,
    /// Residual sum of squares, obtained by subtraction.
    pub error: f64,
    /// Mean of all observations.
    pub grand_mean: f64,
    /// Mean response of each treatment, averaged over blocks.
    pub treatment_means: Vec<f64>,
    /// Mean response of each block, averaged over treatments.
    pub block_means: Vec<f64>,
}

/// Variance estimates for the three estimable sources.
///
/// The total source has no mean square.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeanSquares {
    /// Treatment mean square, `SS_treatment / df_treatment`.
    pub treatment: f64,
    /// Block mean square, `SS_block / df_block`.
    pub block: f64,
    /// Error mean square, `SS_error / df_error`.
    pub error: f64,
}

/// Observed F ratios, with the error mean square as denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FStatistics {
    /// Treatment F ratio, `MS_treatment / MS_error`.
    pub treatment: f64,
    /// Block F ratio, `MS_block / MS_error`.
    pub block: f64,
}

/// Comparison of one observed F ratio against the theoretical distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FComparison {
    /// The observed F ratio.
    pub observed: f64,
    /// Critical value of the F-distribution at the chosen level.
    pub critical: f64,
    /// Probability of an F at least this extreme under the null hypothesis.
    pub p_value: f64,
    /// Whether the effect is significant: `observed > critical` (strict;
    /// boundary equality is not significant).
    pub significant: bool,
}

/// The treatment and block comparisons at one significance level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectComparisons {
    /// Significance level the comparisons were made at.
    pub alpha: f64,
    /// Comparison for the treatment effect.
    pub treatment: FComparison,
    /// Comparison for the block effect.
    pub block: FComparison,
}

/// One row of the ANOVA recap table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaRow {
    /// The variance source this row describes.
    pub source: VarianceSource,
    /// Sum of squares for this source.
    pub sum_of_squares: f64,
    /// Degrees of freedom for this source.
    pub degrees_of_freedom: usize,
    /// Mean square, `None` for the total row.
    pub mean_square: Option<f64>,
    /// Observed F ratio, `None` for the error and total rows.
    pub f_ratio: Option<f64>,
    /// P-value of the observed F, `None` where there is no ratio.
    pub p_value: Option<f64>,
    /// Significance verdict, `None` where there is no ratio.
    pub significant: Option<bool>,
}

/// The complete ANOVA recap table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaTable {
    /// Rows in source order: treatment, block, error, total.
    pub rows: Vec<AnovaRow>,
    /// Significance level the verdicts were made at.
    pub alpha: f64,
}

impl fmt::Display for AnovaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>4} {:>12} {:>12} {:>10} {:>10}  significant",
            "source", "df", "SS", "MS", "F", "p"
        )?;
        for row in &self.rows {
            let ms = row
                .mean_square
                .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
            let fr = row
                .f_ratio
                .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
            let p = row
                .p_value
                .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
            let sig = row.significant.map_or("-", |s| if s { "yes" } else { "no" });
            writeln!(
                f,
                "{:<10} {:>4} {:>12.4} {:>12} {:>10} {:>10}  {}",
                row.source.to_string(),
                row.degrees_of_freedom,
                row.sum_of_squares,
                ms,
                fr,
                p,
                sig
            )?;
        }
        Ok(())
    }
}

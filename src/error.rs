//! Error types for the fisher library.
//!
//! This module provides comprehensive error handling using the `thiserror` crate,
//! with specific error variants for design validation, the variance decomposition,
//! the F-distribution oracle, and learning-progression gating.
//!
//! Every variant is a local, recoverable condition: the engines never abort a
//! session, they surface the offending inputs so the learner can correct them
//! and retry. Internal arithmetic contracts (such as the degrees-of-freedom
//! additivity identity) are `debug_assert!`s, not error variants.

use thiserror::Error;

use crate::anova::VarianceSource;
use crate::session::{DesignLayout, Stage};

/// The main error type for the fisher library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============ Design Validation Errors ============
    /// The design shape cannot be analyzed (fewer than 2 treatments or blocks).
    #[error("design with {treatments} treatment(s) and {blocks} block(s) is degenerate, need at least 2 of each")]
    DegenerateDesign {
        /// Requested number of treatments.
        treatments: usize,
        /// Requested number of blocks.
        blocks: usize,
    },

    /// The number of supplied observations does not match the design.
    #[error("expected {expected} observations for a complete design, got {actual}")]
    ObservationCountMismatch {
        /// Number of cells the design requires.
        expected: usize,
        /// Number of observations supplied.
        actual: usize,
    },

    /// A design cell has no observation.
    #[error("no observation for block {block}, treatment {treatment}")]
    MissingObservation {
        /// Block index of the empty cell.
        block: usize,
        /// Treatment index of the empty cell.
        treatment: usize,
    },

    /// A design cell was supplied more than once.
    #[error("duplicate observation for block {block}, treatment {treatment}")]
    DuplicateObservation {
        /// Block index of the duplicated cell.
        block: usize,
        /// Treatment index of the duplicated cell.
        treatment: usize,
    },

    /// An observation addresses a cell outside the design.
    #[error("cell (block {block}, treatment {treatment}) is out of range for {blocks} blocks x {treatments} treatments")]
    CellOutOfRange {
        /// Block index of the offending observation.
        block: usize,
        /// Treatment index of the offending observation.
        treatment: usize,
        /// Number of blocks in the design.
        blocks: usize,
        /// Number of treatments in the design.
        treatments: usize,
    },

    /// Matrix dimensions are inconsistent with the design shape.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension description.
        expected: String,
        /// Actual dimension description.
        actual: String,
    },

    // ============ Decomposition Errors ============
    /// The residual sum of squares came out negative, which a balanced
    /// complete design cannot produce.
    #[error("residual sum of squares is negative ({residual}), observations are inconsistent with a balanced design")]
    NegativeResidual {
        /// The offending residual value.
        residual: f64,
    },

    /// A variance source has zero degrees of freedom, so no mean square
    /// can be estimated for it.
    #[error("cannot estimate a variance for the {source} source: zero degrees of freedom")]
    ZeroDegreesOfFreedom {
        /// The variance source that has no degrees of freedom.
        source: VarianceSource,
    },

    /// The error mean square is zero, so the F ratio is undefined.
    #[error("error mean square is zero, the F statistic is undefined")]
    UndefinedFStatistic,

    /// The grand mean is zero, so the coefficient of variation is undefined.
    #[error("grand mean is zero, the coefficient of variation is undefined")]
    UndefinedCoefficientOfVariation,

    // ============ Distribution Oracle Errors ============
    /// The significance level is outside the open interval (0, 1).
    #[error("significance level {alpha} is outside (0, 1)")]
    InvalidSignificanceLevel {
        /// The invalid level.
        alpha: f64,
    },

    /// The F-distribution is not defined for non-positive degrees of freedom.
    #[error("F-distribution requires positive degrees of freedom, got ({df1}, {df2})")]
    DegenerateDistribution {
        /// Numerator degrees of freedom.
        df1: usize,
        /// Denominator degrees of freedom.
        df2: usize,
    },

    // ============ Progression Errors ============
    /// The chosen experimental layout has no numeric analysis in this engine.
    #[error("the {layout} layout is not analyzed numerically, choose the randomized complete block layout")]
    UnsupportedLayout {
        /// The unsupported layout.
        layout: DesignLayout,
    },

    /// A stage was entered before its prerequisite stage was validated.
    #[error("stage {stage} is locked, complete {requires} first")]
    StageLocked {
        /// The stage that was attempted.
        stage: Stage,
        /// The earliest stage that still needs to be validated.
        requires: Stage,
    },
}

/// A specialized `Result` type for fisher operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DegenerateDesign {
            treatments: 1,
            blocks: 3,
        };
        assert!(err.to_string().contains("1 treatment"));
        assert!(err.to_string().contains("3 block"));

        let err = Error::ZeroDegreesOfFreedom {
            source: VarianceSource::Treatment,
        };
        assert!(err.to_string().contains("treatment"));

        let err = Error::StageLocked {
            stage: Stage::MeanSquareCheck,
            requires: Stage::DataEntry,
        };
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn test_error_equality() {
        let err1 = Error::UndefinedFStatistic;
        let err2 = Error::UndefinedFStatistic;
        let err3 = Error::UndefinedCoefficientOfVariation;

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}

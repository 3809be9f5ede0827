//! # Fisher
//!
//! A step-by-step ANOVA engine for randomized complete block experiments,
//! built for teaching agricultural experimentation: every statistic in the
//! analysis is validated against the learner's own derivation before the next
//! one becomes reachable.
//!
//! ## Overview
//!
//! A randomized complete block design controls one known nuisance source of
//! variation by grouping plots into blocks; every treatment appears exactly
//! once in every block. Its analysis of variance decomposes total variability
//! into treatment, block, and residual components, and judges each effect by
//! comparing its F ratio against the theoretical F-distribution.
//!
//! This library provides:
//! - A validated, immutable experimental design model
//! - The staged computation pipeline: degrees of freedom, sums of squares,
//!   mean squares, F statistics, theoretical comparison, and the coefficient
//!   of variation
//! - An exact F-distribution oracle (survival function and upper-tail
//!   quantile) matching published Fisher-Snedecor tables
//! - A progression controller that gates each stage behind validation of the
//!   previous one, with per-item pass/fail reporting
//!
//! Presentation (widgets, charts, wording) is deliberately out of scope: a
//! front end calls into this crate with raw data and renders what comes back.
//!
//! ## Quick Start
//!
//! ```rust
//! use fisher::anova::{self, DegreesOfFreedom};
//! use fisher::design::{DesignShape, ExperimentalDesign};
//! use ndarray::array;
//!
//! # fn main() -> Result<(), fisher::Error> {
//! // 4 treatments observed across 3 blocks.
//! let shape = DesignShape::new(4, 3)?;
//! let design = ExperimentalDesign::from_matrix(
//!     shape,
//!     array![
//!         [8.3, 9.9, 12.3, 13.9],
//!         [7.8, 10.2, 11.8, 14.2],
//!         [7.9, 9.9, 11.9, 13.9],
//!     ],
//! )?;
//!
//! let analysis = anova::analyze(&design, 0.05)?;
//!
//! assert_eq!(analysis.degrees_of_freedom, DegreesOfFreedom {
//!     total: 11,
//!     treatment: 3,
//!     block: 2,
//!     error: 6,
//! });
//! assert!(analysis.comparisons.treatment.significant);
//! assert!(!analysis.comparisons.block.significant);
//! # Ok(())
//! # }
//! ```
//!
//! ## Gated Progression
//!
//! The same analysis, driven as a learning session. Each check stage accepts
//! the learner's values and opens the next gate only when all of them match
//! the engine:
//!
//! ```rust
//! use fisher::design::{DesignShape, ExperimentalDesign};
//! use fisher::session::{
//!     Controller, DesignLayout, DofSubmission, FSubmission, MeanSquareSubmission,
//!     ProgressionState, Stage,
//! };
//! use ndarray::array;
//!
//! # fn main() -> Result<(), fisher::Error> {
//! let design = ExperimentalDesign::from_matrix(
//!     DesignShape::new(4, 3)?,
//!     array![
//!         [8.3, 9.9, 12.3, 13.9],
//!         [7.8, 10.2, 11.8, 14.2],
//!         [7.9, 9.9, 11.9, 13.9],
//!     ],
//! )?;
//!
//! let controller = Controller::new();
//! let state = ProgressionState::new();
//!
//! // The F-statistic stage is unreachable until everything before it passes.
//! assert!(!state.is_open(Stage::FStatisticCheck));
//!
//! let state = controller.choose_layout(state, DesignLayout::RandomizedCompleteBlock);
//! let state = controller.enter_data(state, DesignLayout::RandomizedCompleteBlock, &design)?;
//!
//! let (state, report) = controller.check_degrees_of_freedom(
//!     state,
//!     &design,
//!     &DofSubmission { total: 11, treatment: 3, block: 2, error: 6 },
//! )?;
//! assert!(report.gate_opened);
//!
//! let (state, ss) = controller.review_sums_of_squares(state, &design)?;
//! assert!((ss.total - 60.4).abs() < 1e-6);
//!
//! let (state, report) = controller.check_mean_squares(
//!     state,
//!     &design,
//!     &MeanSquareSubmission { treatment: 20.0, block: 0.04, error: 0.0533 },
//! )?;
//! assert!(report.gate_opened);
//!
//! let (state, report) = controller.check_f_statistics(
//!     state,
//!     &design,
//!     &FSubmission { treatment: 375.0, block: 0.75 },
//! )?;
//! assert!(report.gate_opened);
//!
//! let (state, comparisons) = controller.compare_to_theoretical(state, &design, 0.05)?;
//! assert!(comparisons.treatment.significant);
//!
//! let (_state, analysis) = controller.interpret(state, &design, 0.05)?;
//! println!("{}", analysis.table);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of design, result, and
//!   progression types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod anova;
pub mod design;
pub mod dist;
pub mod error;
pub mod precision;
pub mod session;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::anova::{
        analyze, compare, f_statistics, mean_squares, sums_of_squares, Analysis, AnovaRow,
        AnovaTable, DegreesOfFreedom, EffectComparisons, FComparison, FStatistics, MeanSquares,
        SumsOfSquares, VarianceSource,
    };
    pub use crate::design::{DesignShape, ExperimentalDesign, Observation};
    pub use crate::dist::{cdf, quantile, survival};
    pub use crate::error::{Error, Result};
    pub use crate::precision::{
        assess, coefficient_of_variation, PrecisionAssessment, PrecisionBand,
    };
    pub use crate::session::{
        Controller, DesignLayout, DofSubmission, FSubmission, ItemCheck, MeanSquareSubmission,
        ProgressionState, Stage, StageReport, StageSubmission, Tolerances,
    };
}

// Re-export commonly used items at crate root
pub use anova::{analyze, Analysis};
pub use design::{DesignShape, ExperimentalDesign};
pub use error::{Error, Result};
pub use session::{Controller, ProgressionState};

//! Learning progression control.
//!
//! The controller sequences the ANOVA engines behind validation gates: a
//! learner cannot reach a stage's inputs until every previous stage has been
//! validated. It holds no computational logic of its own; each transition
//! calls the engines, compares the learner's submission against the computed
//! values, and returns the updated [`ProgressionState`] together with a
//! per-item report.
//!
//! State is an explicit value, passed to and returned from every transition.
//! Gates never regress, with two exceptions: re-entering data invalidates
//! everything downstream of data entry, and [`Controller::reset`] does the
//! same explicitly.
//!
//! Degrees of freedom are checked by exact integer equality; mean squares and
//! F ratios within a configurable absolute tolerance ([`Tolerances`],
//! default 0.01).

use std::fmt;

use crate::anova::{
    self, Analysis, DegreesOfFreedom, EffectComparisons, SumsOfSquares,
};
use crate::design::ExperimentalDesign;
use crate::error::{Error, Result};

/// The stages of the learning progression, in strict order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    /// Choosing the experimental layout.
    DesignSelection,
    /// Entering the block × treatment observations.
    DataEntry,
    /// Deriving the degrees of freedom by hand.
    DegreesOfFreedomCheck,
    /// Reviewing the computed sum-of-squares decomposition.
    SumsOfSquaresReview,
    /// Computing the mean squares by hand.
    MeanSquareCheck,
    /// Computing the F ratios by hand.
    FStatisticCheck,
    /// Comparing observed F against the theoretical distribution.
    TheoreticalComparison,
    /// Reading the full ANOVA table and precision assessment.
    Interpretation,
}

impl Stage {
    /// All stages in progression order.
    pub const ORDER: [Self; 8] = [
        Self::DesignSelection,
        Self::DataEntry,
        Self::DegreesOfFreedomCheck,
        Self::SumsOfSquaresReview,
        Self::MeanSquareCheck,
        Self::FStatisticCheck,
        Self::TheoreticalComparison,
        Self::Interpretation,
    ];

    fn index(self) -> usize {
        match self {
            Self::DesignSelection => 0,
            Self::DataEntry => 1,
            Self::DegreesOfFreedomCheck => 2,
            Self::SumsOfSquaresReview => 3,
            Self::MeanSquareCheck => 4,
            Self::FStatisticCheck => 5,
            Self::TheoreticalComparison => 6,
            Self::Interpretation => 7,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DesignSelection => "design selection",
            Self::DataEntry => "data entry",
            Self::DegreesOfFreedomCheck => "degrees-of-freedom check",
            Self::SumsOfSquaresReview => "sums-of-squares review",
            Self::MeanSquareCheck => "mean-square check",
            Self::FStatisticCheck => "F-statistic check",
            Self::TheoreticalComparison => "theoretical comparison",
            Self::Interpretation => "interpretation",
        };
        write!(f, "{name}")
    }
}

/// Experimental layouts a learner can choose from.
///
/// Only the randomized complete block layout is analyzed numerically; the
/// others are presented as design alternatives and rejected at data entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DesignLayout {
    /// Every treatment appears exactly once in every block.
    RandomizedCompleteBlock,
    /// Rows and columns both controlled; not analyzed numerically.
    LatinSquare,
    /// Main plots and sub-plots; not analyzed numerically.
    SplitPlot,
}

impl fmt::Display for DesignLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RandomizedCompleteBlock => "randomized complete block",
            Self::LatinSquare => "Latin square",
            Self::SplitPlot => "split-plot",
        };
        write!(f, "{name}")
    }
}

/// The validation gates of a learning session.
///
/// One boolean per stage; a stage is reachable only when every earlier gate
/// is set. The default value has every gate closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionState {
    design_chosen: bool,
    data_entered: bool,
    dof_validated: bool,
    ss_computed: bool,
    ms_validated: bool,
    f_validated: bool,
    f_compared: bool,
    interpreted: bool,
}

impl ProgressionState {
    /// A fresh session with every gate closed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stage's own gate has been validated.
    #[must_use]
    pub fn is_validated(&self, stage: Stage) -> bool {
        match stage {
            Stage::DesignSelection => self.design_chosen,
            Stage::DataEntry => self.data_entered,
            Stage::DegreesOfFreedomCheck => self.dof_validated,
            Stage::SumsOfSquaresReview => self.ss_computed,
            Stage::MeanSquareCheck => self.ms_validated,
            Stage::FStatisticCheck => self.f_validated,
            Stage::TheoreticalComparison => self.f_compared,
            Stage::Interpretation => self.interpreted,
        }
    }

    /// Whether a stage is reachable, i.e. every earlier gate is validated.
    #[must_use]
    pub fn is_open(&self, stage: Stage) -> bool {
        Stage::ORDER[..stage.index()]
            .iter()
            .all(|&earlier| self.is_validated(earlier))
    }

    /// The first stage that has not been validated yet.
    ///
    /// Returns [`Stage::Interpretation`] once every gate is set.
    #[must_use]
    pub fn current(&self) -> Stage {
        Stage::ORDER
            .iter()
            .copied()
            .find(|&stage| !self.is_validated(stage))
            .unwrap_or(Stage::Interpretation)
    }

    fn validated(mut self, stage: Stage) -> Self {
        match stage {
            Stage::DesignSelection => self.design_chosen = true,
            Stage::DataEntry => self.data_entered = true,
            Stage::DegreesOfFreedomCheck => self.dof_validated = true,
            Stage::SumsOfSquaresReview => self.ss_computed = true,
            Stage::MeanSquareCheck => self.ms_validated = true,
            Stage::FStatisticCheck => self.f_validated = true,
            Stage::TheoreticalComparison => self.f_compared = true,
            Stage::Interpretation => self.interpreted = true,
        }
        self
    }

    /// Clear a stage's gate and everything after it.
    fn cleared_from(mut self, stage: Stage) -> Self {
        for &later in &Stage::ORDER[stage.index()..] {
            match later {
                Stage::DesignSelection => self.design_chosen = false,
                Stage::DataEntry => self.data_entered = false,
                Stage::DegreesOfFreedomCheck => self.dof_validated = false,
                Stage::SumsOfSquaresReview => self.ss_computed = false,
                Stage::MeanSquareCheck => self.ms_validated = false,
                Stage::FStatisticCheck => self.f_validated = false,
                Stage::TheoreticalComparison => self.f_compared = false,
                Stage::Interpretation => self.interpreted = false,
            }
        }
        self
    }
}

/// Absolute tolerances for validating learner-submitted values.
///
/// These are usability knobs, not statistical ones; degrees of freedom are
/// always compared by exact integer equality.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    /// Tolerance for mean-square submissions.
    pub mean_square: f64,
    /// Tolerance for F-ratio submissions.
    pub f_ratio: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            mean_square: 0.01,
            f_ratio: 0.01,
        }
    }
}

/// Learner-submitted degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DofSubmission {
    /// Submitted total degrees of freedom.
    pub total: usize,
    /// Submitted treatment degrees of freedom.
    pub treatment: usize,
    /// Submitted block degrees of freedom.
    pub block: usize,
    /// Submitted error degrees of freedom.
    pub error: usize,
}

/// Learner-submitted mean squares.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeanSquareSubmission {
    /// Submitted treatment mean square.
    pub treatment: f64,
    /// Submitted block mean square.
    pub block: f64,
    /// Submitted error mean square.
    pub error: f64,
}

/// Learner-submitted F ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FSubmission {
    /// Submitted treatment F ratio.
    pub treatment: f64,
    /// Submitted block F ratio.
    pub block: f64,
}

/// A submission for any of the three check stages.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageSubmission {
    /// Degrees-of-freedom check values.
    DegreesOfFreedom(DofSubmission),
    /// Mean-square check values.
    MeanSquares(MeanSquareSubmission),
    /// F-statistic check values.
    FStatistics(FSubmission),
}

/// Verdict for one submitted value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCheck {
    /// Which value this item is (e.g. `"treatment"`).
    pub label: String,
    /// The value the learner submitted.
    pub submitted: f64,
    /// The engine-computed value.
    pub expected: f64,
    /// Whether the submission matched within tolerance.
    pub passed: bool,
}

/// Per-item report for one check stage.
///
/// The gate opens only when every item passes; partial correctness keeps it
/// closed but still reports which items were right.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageReport {
    /// The stage this report belongs to.
    pub stage: Stage,
    /// One verdict per submitted value.
    pub items: Vec<ItemCheck>,
    /// Whether this submission opened the gate.
    pub gate_opened: bool,
}

/// Sequences the engines and enforces the progression gates.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    tolerances: Tolerances,
}

impl Controller {
    /// Create a controller with the default tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with explicit tolerances.
    #[must_use]
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Get the configured tolerances.
    #[must_use]
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Record that the learner has chosen an experimental layout.
    ///
    /// Any layout may be chosen here; unsupported ones are rejected when data
    /// entry is attempted.
    #[must_use]
    pub fn choose_layout(&self, state: ProgressionState, _layout: DesignLayout) -> ProgressionState {
        state.validated(Stage::DesignSelection)
    }

    /// Accept the entered observations and open the first check stage.
    ///
    /// Re-entering data on an ongoing session invalidates every gate from
    /// data entry onward.
    ///
    /// # Errors
    ///
    /// - [`Error::StageLocked`] if no layout has been chosen yet
    /// - [`Error::UnsupportedLayout`] for layouts without numeric analysis
    pub fn enter_data(
        &self,
        state: ProgressionState,
        layout: DesignLayout,
        _design: &ExperimentalDesign,
    ) -> Result<ProgressionState> {
        self.ensure_open(&state, Stage::DataEntry)?;
        if layout != DesignLayout::RandomizedCompleteBlock {
            return Err(Error::UnsupportedLayout { layout });
        }
        Ok(state
            .cleared_from(Stage::DataEntry)
            .validated(Stage::DataEntry))
    }

    /// Validate the learner's degrees-of-freedom derivation.
    ///
    /// Comparison is exact integer equality.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StageLocked`] if data entry is not validated yet.
    pub fn check_degrees_of_freedom(
        &self,
        state: ProgressionState,
        design: &ExperimentalDesign,
        submission: &DofSubmission,
    ) -> Result<(ProgressionState, StageReport)> {
        self.ensure_open(&state, Stage::DegreesOfFreedomCheck)?;

        let expected = DegreesOfFreedom::for_shape(design.shape());
        let items = vec![
            dof_item("total", submission.total, expected.total),
            dof_item("treatment", submission.treatment, expected.treatment),
            dof_item("block", submission.block, expected.block),
            dof_item("error", submission.error, expected.error),
        ];

        Ok(self.close_out(state, Stage::DegreesOfFreedomCheck, items))
    }

    /// Compute the sum-of-squares decomposition and open its gate.
    ///
    /// This stage reviews engine-computed values rather than checking a
    /// numeric submission, so the gate opens on acknowledgement.
    ///
    /// # Errors
    ///
    /// - [`Error::StageLocked`] if the degrees-of-freedom check is not passed
    /// - [`Error::NegativeResidual`] for inconsistent observations
    pub fn review_sums_of_squares(
        &self,
        state: ProgressionState,
        design: &ExperimentalDesign,
    ) -> Result<(ProgressionState, SumsOfSquares)> {
        self.ensure_open(&state, Stage::SumsOfSquaresReview)?;
        let ss = anova::sums_of_squares(design)?;
        Ok((state.validated(Stage::SumsOfSquaresReview), ss))
    }

    /// Validate the learner's mean squares within tolerance.
    ///
    /// # Errors
    ///
    /// - [`Error::StageLocked`] if the sums-of-squares review is not done
    /// - any engine failure while recomputing the expected values
    pub fn check_mean_squares(
        &self,
        state: ProgressionState,
        design: &ExperimentalDesign,
        submission: &MeanSquareSubmission,
    ) -> Result<(ProgressionState, StageReport)> {
        self.ensure_open(&state, Stage::MeanSquareCheck)?;

        let dof = DegreesOfFreedom::for_shape(design.shape());
        let ss = anova::sums_of_squares(design)?;
        let expected = anova::mean_squares(&ss, &dof)?;

        let tol = self.tolerances.mean_square;
        let items = vec![
            value_item("treatment", submission.treatment, expected.treatment, tol),
            value_item("block", submission.block, expected.block, tol),
            value_item("error", submission.error, expected.error, tol),
        ];

        Ok(self.close_out(state, Stage::MeanSquareCheck, items))
    }

    /// Validate the learner's F ratios within tolerance.
    ///
    /// # Errors
    ///
    /// - [`Error::StageLocked`] if the mean-square check is not passed
    /// - [`Error::UndefinedFStatistic`] if the error mean square is 0
    pub fn check_f_statistics(
        &self,
        state: ProgressionState,
        design: &ExperimentalDesign,
        submission: &FSubmission,
    ) -> Result<(ProgressionState, StageReport)> {
        self.ensure_open(&state, Stage::FStatisticCheck)?;

        let dof = DegreesOfFreedom::for_shape(design.shape());
        let ss = anova::sums_of_squares(design)?;
        let ms = anova::mean_squares(&ss, &dof)?;
        let expected = anova::f_statistics(&ms)?;

        let tol = self.tolerances.f_ratio;
        let items = vec![
            value_item("treatment", submission.treatment, expected.treatment, tol),
            value_item("block", submission.block, expected.block, tol),
        ];

        Ok(self.close_out(state, Stage::FStatisticCheck, items))
    }

    /// Compare the observed F ratios against the theoretical distribution.
    ///
    /// # Errors
    ///
    /// - [`Error::StageLocked`] if the F-statistic check is not passed
    /// - [`Error::InvalidSignificanceLevel`] for a level outside (0, 1)
    pub fn compare_to_theoretical(
        &self,
        state: ProgressionState,
        design: &ExperimentalDesign,
        alpha: f64,
    ) -> Result<(ProgressionState, EffectComparisons)> {
        self.ensure_open(&state, Stage::TheoreticalComparison)?;

        let dof = DegreesOfFreedom::for_shape(design.shape());
        let ss = anova::sums_of_squares(design)?;
        let ms = anova::mean_squares(&ss, &dof)?;
        let f = anova::f_statistics(&ms)?;

        let comparisons = EffectComparisons {
            alpha,
            treatment: anova::compare(f.treatment, dof.treatment, dof.error, alpha)?,
            block: anova::compare(f.block, dof.block, dof.error, alpha)?,
        };

        Ok((state.validated(Stage::TheoreticalComparison), comparisons))
    }

    /// Produce the full analysis for the interpretation stage.
    ///
    /// # Errors
    ///
    /// - [`Error::StageLocked`] if the theoretical comparison is not done
    /// - any engine failure from [`anova::analyze`]
    pub fn interpret(
        &self,
        state: ProgressionState,
        design: &ExperimentalDesign,
        alpha: f64,
    ) -> Result<(ProgressionState, Analysis)> {
        self.ensure_open(&state, Stage::Interpretation)?;
        let analysis = anova::analyze(design, alpha)?;
        Ok((state.validated(Stage::Interpretation), analysis))
    }

    /// Validate a submission for whichever check stage it belongs to.
    ///
    /// # Errors
    ///
    /// Same conditions as the matching check transition.
    pub fn validate_stage(
        &self,
        state: ProgressionState,
        design: &ExperimentalDesign,
        submission: &StageSubmission,
    ) -> Result<(ProgressionState, StageReport)> {
        match submission {
            StageSubmission::DegreesOfFreedom(sub) => {
                self.check_degrees_of_freedom(state, design, sub)
            }
            StageSubmission::MeanSquares(sub) => self.check_mean_squares(state, design, sub),
            StageSubmission::FStatistics(sub) => self.check_f_statistics(state, design, sub),
        }
    }

    /// Restart the experiment: the layout choice survives, everything from
    /// data entry onward is invalidated.
    #[must_use]
    pub fn reset(&self, state: ProgressionState) -> ProgressionState {
        state.cleared_from(Stage::DataEntry)
    }

    fn ensure_open(&self, state: &ProgressionState, stage: Stage) -> Result<()> {
        if state.is_open(stage) {
            Ok(())
        } else {
            Err(Error::StageLocked {
                stage,
                requires: state.current(),
            })
        }
    }

    /// Open the stage's gate iff every item passed; gates never close on a
    /// failed re-submission.
    fn close_out(
        &self,
        state: ProgressionState,
        stage: Stage,
        items: Vec<ItemCheck>,
    ) -> (ProgressionState, StageReport) {
        let gate_opened = items.iter().all(|item| item.passed);
        let new_state = if gate_opened {
            state.validated(stage)
        } else {
            state
        };
        (
            new_state,
            StageReport {
                stage,
                items,
                gate_opened,
            },
        )
    }
}

fn dof_item(label: &str, submitted: usize, expected: usize) -> ItemCheck {
    ItemCheck {
        label: label.to_string(),
        submitted: submitted as f64,
        expected: expected as f64,
        passed: submitted == expected,
    }
}

fn value_item(label: &str, submitted: f64, expected: f64, tolerance: f64) -> ItemCheck {
    ItemCheck {
        label: label.to_string(),
        submitted,
        expected,
        passed: (submitted - expected).abs() < tolerance,
    }
}

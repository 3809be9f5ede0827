//! Sum-of-squares decomposition for the randomized block design.
//!
//! Splits total variability around the grand mean into treatment, block, and
//! residual components. The residual is obtained by subtraction, which is the
//! standard randomized-block identity and exact for a complete balanced
//! design.

use crate::design::ExperimentalDesign;
use crate::error::{Error, Result};

use super::types::SumsOfSquares;

/// Relative threshold below which a negative residual is treated as data
/// inconsistency rather than floating-point rounding.
const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// Decompose the design's variability into sums of squares.
///
/// Computes the grand mean, the per-treatment means (averaged over blocks)
/// and per-block means (averaged over treatments), then:
///
/// - `SS_total = Σ (x_ij − x̄)²` over all cells
/// - `SS_treatment = b · Σ (t̄_j − x̄)²`
/// - `SS_block = t · Σ (b̄_i − x̄)²`
/// - `SS_error = SS_total − SS_treatment − SS_block`
///
/// # Errors
///
/// Returns [`Error::NegativeResidual`] if the residual comes out negative
/// beyond rounding noise, which indicates inconsistent observations. Rounding
/// noise itself is returned as computed, never clamped to zero.
pub fn sums_of_squares(design: &ExperimentalDesign) -> Result<SumsOfSquares> {
    let treatments = design.treatments();
    let blocks = design.blocks();
    let obs = design.observations();
    let n = (treatments * blocks) as f64;

    let grand_mean = obs.iter().sum::<f64>() / n;

    let treatment_means: Vec<f64> = (0..treatments)
        .map(|j| obs.column(j).sum() / blocks as f64)
        .collect();
    let block_means: Vec<f64> = (0..blocks)
        .map(|i| obs.row(i).sum() / treatments as f64)
        .collect();

    let total: f64 = obs.iter().map(|x| (x - grand_mean).powi(2)).sum();
    let treatment: f64 = blocks as f64
        * treatment_means
            .iter()
            .map(|m| (m - grand_mean).powi(2))
            .sum::<f64>();
    let block: f64 = treatments as f64
        * block_means
            .iter()
            .map(|m| (m - grand_mean).powi(2))
            .sum::<f64>();

    let error = residual(total, treatment, block)?;

    Ok(SumsOfSquares {
        total,
        treatment,
        block,
        error,
        grand_mean,
        treatment_means,
        block_means,
    })
}

/// Residual sum of squares by subtraction, rejecting genuinely negative
/// values.
fn residual(total: f64, treatment: f64, block: f64) -> Result<f64> {
    let error = total - treatment - block;
    if error < -(RESIDUAL_TOLERANCE * total.max(1.0)) {
        return Err(Error::NegativeResidual { residual: error });
    }
    Ok(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignShape;
    use ndarray::array;

    fn four_by_three() -> ExperimentalDesign {
        // Treatment means 8, 10, 12, 14; block effects +0.1, 0, -0.1; noise
        // orthogonal to both, so every component is known exactly.
        let shape = DesignShape::new(4, 3).unwrap();
        ExperimentalDesign::from_matrix(
            shape,
            array![
                [8.3, 9.9, 12.3, 13.9],
                [7.8, 10.2, 11.8, 14.2],
                [7.9, 9.9, 11.9, 13.9],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_means() {
        let ss = sums_of_squares(&four_by_three()).unwrap();

        assert!((ss.grand_mean - 11.0).abs() < 1e-9);
        for (mean, expected) in ss.treatment_means.iter().zip([8.0, 10.0, 12.0, 14.0]) {
            assert!((mean - expected).abs() < 1e-9);
        }
        for (mean, expected) in ss.block_means.iter().zip([11.1, 11.0, 10.9]) {
            assert!((mean - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_decomposition_known_values() {
        let ss = sums_of_squares(&four_by_three()).unwrap();

        assert!((ss.treatment - 60.0).abs() < 1e-9);
        assert!((ss.block - 0.08).abs() < 1e-9);
        assert!((ss.error - 0.32).abs() < 1e-9);
        assert!((ss.total - 60.4).abs() < 1e-9);
    }

    #[test]
    fn test_components_sum_to_total() {
        let ss = sums_of_squares(&four_by_three()).unwrap();
        let sum = ss.treatment + ss.block + ss.error;
        assert!((sum - ss.total).abs() < 1e-9);

        assert!(ss.treatment >= 0.0);
        assert!(ss.block >= 0.0);
        assert!(ss.error >= 0.0);
    }

    #[test]
    fn test_treatment_effect_dominates() {
        let ss = sums_of_squares(&four_by_three()).unwrap();
        assert!(ss.treatment > 100.0 * ss.block);
    }

    #[test]
    fn test_identical_observations() {
        let shape = DesignShape::new(3, 3).unwrap();
        let design = ExperimentalDesign::from_matrix(
            shape,
            array![[12.0, 12.0, 12.0], [12.0, 12.0, 12.0], [12.0, 12.0, 12.0]],
        )
        .unwrap();

        let ss = sums_of_squares(&design).unwrap();
        assert_eq!(ss.total, 0.0);
        assert_eq!(ss.treatment, 0.0);
        assert_eq!(ss.block, 0.0);
        assert_eq!(ss.error, 0.0);
        assert!((ss.grand_mean - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_residual_rejects_negative() {
        assert!(matches!(
            residual(10.0, 8.0, 3.0),
            Err(Error::NegativeResidual { .. })
        ));
    }

    #[test]
    fn test_residual_keeps_rounding_noise() {
        // A tiny negative within tolerance is rounding, not inconsistency.
        let r = residual(10.0, 10.0 + 1e-12, 0.0).unwrap();
        assert!(r <= 0.0);
        assert!(r.abs() < 1e-9);
    }

    #[test]
    fn test_two_by_two_by_hand() {
        let shape = DesignShape::new(2, 2).unwrap();
        let design =
            ExperimentalDesign::from_matrix(shape, array![[1.0, 3.0], [2.0, 6.0]]).unwrap();

        // grand mean = 3; treatment means 1.5, 4.5; block means 2, 4
        let ss = sums_of_squares(&design).unwrap();
        assert!((ss.grand_mean - 3.0).abs() < 1e-12);
        // SS_total = 4 + 0 + 1 + 9 = 14
        assert!((ss.total - 14.0).abs() < 1e-12);
        // SS_treatment = 2 * (2.25 + 2.25) = 9
        assert!((ss.treatment - 9.0).abs() < 1e-12);
        // SS_block = 2 * (1 + 1) = 4
        assert!((ss.block - 4.0).abs() < 1e-12);
        // SS_error = 14 - 9 - 4 = 1
        assert!((ss.error - 1.0).abs() < 1e-12);
    }
}

//! Mean-square estimation.
//!
//! Converts sums of squares into variance estimates by dividing each by its
//! degrees of freedom. The total source has no mean square.

use crate::error::{Error, Result};

use super::types::{DegreesOfFreedom, MeanSquares, SumsOfSquares, VarianceSource};

/// Compute the treatment, block, and error mean squares.
///
/// # Errors
///
/// Returns [`Error::ZeroDegreesOfFreedom`] naming the first source whose
/// degrees of freedom are 0, since no variance can be estimated for it.
pub fn mean_squares(ss: &SumsOfSquares, dof: &DegreesOfFreedom) -> Result<MeanSquares> {
    Ok(MeanSquares {
        treatment: divide(ss.treatment, dof.treatment, VarianceSource::Treatment)?,
        block: divide(ss.block, dof.block, VarianceSource::Block)?,
        error: divide(ss.error, dof.error, VarianceSource::Error)?,
    })
}

fn divide(ss: f64, dof: usize, source: VarianceSource) -> Result<f64> {
    if dof == 0 {
        return Err(Error::ZeroDegreesOfFreedom { source });
    }
    Ok(ss / dof as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(treatment: f64, block: f64, error: f64) -> SumsOfSquares {
        SumsOfSquares {
            total: treatment + block + error,
            treatment,
            block,
            error,
            grand_mean: 11.0,
            treatment_means: vec![],
            block_means: vec![],
        }
    }

    #[test]
    fn test_mean_squares() {
        let dof = DegreesOfFreedom::new(4, 3).unwrap();
        let ms = mean_squares(&sums(60.0, 0.08, 0.32), &dof).unwrap();

        assert!((ms.treatment - 20.0).abs() < 1e-12);
        assert!((ms.block - 0.04).abs() < 1e-12);
        assert!((ms.error - 0.32 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_dof_rejected() {
        let dof = DegreesOfFreedom {
            total: 1,
            treatment: 1,
            block: 0,
            error: 0,
        };
        assert!(matches!(
            mean_squares(&sums(3.0, 0.0, 0.0), &dof),
            Err(Error::ZeroDegreesOfFreedom {
                source: VarianceSource::Block
            })
        ));
    }

    #[test]
    fn test_zero_sums_give_zero_means() {
        let dof = DegreesOfFreedom::new(3, 3).unwrap();
        let ms = mean_squares(&sums(0.0, 0.0, 0.0), &dof).unwrap();
        assert_eq!(ms.treatment, 0.0);
        assert_eq!(ms.block, 0.0);
        assert_eq!(ms.error, 0.0);
    }
}

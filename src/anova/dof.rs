//! Degrees-of-freedom derivation for the randomized block design.

use crate::design::DesignShape;
use crate::error::{Error, Result};

use super::types::DegreesOfFreedom;

impl DegreesOfFreedom {
    /// Derive all degrees of freedom from the design counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateDesign`] if `treatments < 2` or
    /// `blocks < 2`, since the error degrees of freedom would vanish and no
    /// residual variance could be estimated.
    pub fn new(treatments: usize, blocks: usize) -> Result<Self> {
        if treatments < 2 || blocks < 2 {
            return Err(Error::DegenerateDesign { treatments, blocks });
        }

        let dof = Self {
            total: treatments * blocks - 1,
            treatment: treatments - 1,
            block: blocks - 1,
            error: (treatments - 1) * (blocks - 1),
        };

        // Additivity identity of the decomposition; a violation is an engine
        // bug, not a user-facing condition.
        debug_assert_eq!(dof.treatment + dof.block + dof.error, dof.total);

        Ok(dof)
    }

    /// Derive the degrees of freedom for an already-validated shape.
    #[must_use]
    pub fn for_shape(shape: DesignShape) -> Self {
        Self {
            total: shape.cells() - 1,
            treatment: shape.treatments() - 1,
            block: shape.blocks() - 1,
            error: (shape.treatments() - 1) * (shape.blocks() - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dof_four_by_three() {
        let dof = DegreesOfFreedom::new(4, 3).unwrap();
        assert_eq!(dof.total, 11);
        assert_eq!(dof.treatment, 3);
        assert_eq!(dof.block, 2);
        assert_eq!(dof.error, 6);
    }

    #[test]
    fn test_dof_additivity_grid() {
        for t in 2..=10 {
            for b in 2..=10 {
                let dof = DegreesOfFreedom::new(t, b).unwrap();
                assert_eq!(
                    dof.treatment + dof.block + dof.error,
                    dof.total,
                    "additivity failed for t={t}, b={b}"
                );
            }
        }
    }

    #[test]
    fn test_dof_degenerate() {
        assert!(matches!(
            DegreesOfFreedom::new(1, 5),
            Err(Error::DegenerateDesign { .. })
        ));
        assert!(matches!(
            DegreesOfFreedom::new(5, 1),
            Err(Error::DegenerateDesign { .. })
        ));
        assert!(DegreesOfFreedom::new(0, 3).is_err());
    }

    #[test]
    fn test_dof_for_shape_matches_new() {
        let shape = DesignShape::new(6, 4).unwrap();
        let from_shape = DegreesOfFreedom::for_shape(shape);
        let from_counts = DegreesOfFreedom::new(6, 4).unwrap();
        assert_eq!(from_shape, from_counts);
    }
}

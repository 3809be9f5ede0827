//! Experimental design core types.
//!
//! This module provides the data model for a randomized complete block
//! experiment: a validated design shape plus the complete block × treatment
//! observation matrix.
//!
//! ## Overview
//!
//! - [`DesignShape`]: validated design parameters (treatments, blocks)
//! - [`ExperimentalDesign`]: the shape together with one observation per cell
//! - [`Observation`]: a single (block, treatment, value) record for cell-wise entry
//!
//! A design is complete and balanced by construction: every (block, treatment)
//! pair carries exactly one value, and the shape never changes after the
//! observations are accepted. Restarting an experiment means building a new
//! `ExperimentalDesign`, which is what invalidates downstream results.

use ndarray::Array2;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Validated parameters of a randomized complete block design.
///
/// Both counts must be at least 2, otherwise no residual variance can be
/// estimated and the design is not analyzable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignShape {
    treatments: usize,
    blocks: usize,
}

impl DesignShape {
    /// Create a new design shape with automatic validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateDesign`] if `treatments < 2` or `blocks < 2`.
    pub fn new(treatments: usize, blocks: usize) -> Result<Self> {
        if treatments < 2 || blocks < 2 {
            return Err(Error::DegenerateDesign { treatments, blocks });
        }
        Ok(Self { treatments, blocks })
    }

    /// Get the number of treatments.
    #[must_use]
    pub fn treatments(&self) -> usize {
        self.treatments
    }

    /// Get the number of blocks.
    #[must_use]
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Get the total number of cells (one observation each).
    #[must_use]
    pub fn cells(&self) -> usize {
        self.treatments * self.blocks
    }
}

impl fmt::Display for DesignShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RCBD({} treatments, {} blocks)", self.treatments, self.blocks)
    }
}

/// A single observed value for one design cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Block index (0-based).
    pub block: usize,
    /// Treatment index (0-based).
    pub treatment: usize,
    /// Measured response value.
    pub value: f64,
}

/// A complete randomized block experiment.
///
/// The observation matrix has shape (blocks, treatments): row `i` holds the
/// responses measured in block `i`, column `j` the responses of treatment `j`.
/// The value type is immutable once constructed.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExperimentalDesign {
    shape: DesignShape,
    observations: Array2<f64>,
}

impl ExperimentalDesign {
    /// Create a design from a complete (blocks × treatments) matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the matrix shape does not
    /// match the design shape.
    pub fn from_matrix(shape: DesignShape, observations: Array2<f64>) -> Result<Self> {
        if observations.nrows() != shape.blocks() {
            return Err(Error::DimensionMismatch {
                expected: format!("{} rows", shape.blocks()),
                actual: format!("{} rows", observations.nrows()),
            });
        }
        if observations.ncols() != shape.treatments() {
            return Err(Error::DimensionMismatch {
                expected: format!("{} columns", shape.treatments()),
                actual: format!("{} columns", observations.ncols()),
            });
        }

        Ok(Self {
            shape,
            observations,
        })
    }

    /// Create a design from cell-wise observations.
    ///
    /// Accepts exactly one observation per (block, treatment) cell, in any
    /// order.
    ///
    /// # Errors
    ///
    /// - [`Error::ObservationCountMismatch`] if the number of observations is
    ///   not `treatments × blocks`
    /// - [`Error::CellOutOfRange`] if an observation addresses a cell outside
    ///   the design
    /// - [`Error::DuplicateObservation`] if a cell is supplied twice
    /// - [`Error::MissingObservation`] if a cell has no value
    pub fn from_cells(shape: DesignShape, cells: &[Observation]) -> Result<Self> {
        if cells.len() != shape.cells() {
            return Err(Error::ObservationCountMismatch {
                expected: shape.cells(),
                actual: cells.len(),
            });
        }

        let mut observations = Array2::zeros((shape.blocks(), shape.treatments()));
        let mut seen = vec![false; shape.cells()];

        for obs in cells {
            if obs.block >= shape.blocks() || obs.treatment >= shape.treatments() {
                return Err(Error::CellOutOfRange {
                    block: obs.block,
                    treatment: obs.treatment,
                    blocks: shape.blocks(),
                    treatments: shape.treatments(),
                });
            }

            let idx = obs.block * shape.treatments() + obs.treatment;
            if seen[idx] {
                return Err(Error::DuplicateObservation {
                    block: obs.block,
                    treatment: obs.treatment,
                });
            }
            seen[idx] = true;
            observations[[obs.block, obs.treatment]] = obs.value;
        }

        if let Some(idx) = seen.iter().position(|&filled| !filled) {
            return Err(Error::MissingObservation {
                block: idx / shape.treatments(),
                treatment: idx % shape.treatments(),
            });
        }

        Ok(Self {
            shape,
            observations,
        })
    }

    /// Get the design shape.
    #[must_use]
    pub fn shape(&self) -> DesignShape {
        self.shape
    }

    /// Get the number of treatments.
    #[must_use]
    pub fn treatments(&self) -> usize {
        self.shape.treatments()
    }

    /// Get the number of blocks.
    #[must_use]
    pub fn blocks(&self) -> usize {
        self.shape.blocks()
    }

    /// Get a reference to the observation matrix (blocks × treatments).
    #[must_use]
    pub fn observations(&self) -> &Array2<f64> {
        &self.observations
    }

    /// Get the observed value for a specific cell.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[must_use]
    pub fn value(&self, block: usize, treatment: usize) -> f64 {
        self.observations[[block, treatment]]
    }
}

impl fmt::Debug for ExperimentalDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with data {:?}", self.shape, self.observations)
    }
}

impl fmt::Display for ExperimentalDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.shape)?;
        for row in self.observations.rows() {
            let row_str: Vec<String> = row.iter().map(|v| format!("{v:.3}")).collect();
            writeln!(f, "  {}", row_str.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_shape_new() {
        let shape = DesignShape::new(4, 3).unwrap();
        assert_eq!(shape.treatments(), 4);
        assert_eq!(shape.blocks(), 3);
        assert_eq!(shape.cells(), 12);
    }

    #[test]
    fn test_shape_degenerate() {
        assert!(matches!(
            DesignShape::new(1, 3),
            Err(Error::DegenerateDesign {
                treatments: 1,
                blocks: 3
            })
        ));
        assert!(matches!(
            DesignShape::new(4, 1),
            Err(Error::DegenerateDesign { .. })
        ));
        assert!(DesignShape::new(0, 0).is_err());
    }

    #[test]
    fn test_from_matrix() {
        let shape = DesignShape::new(3, 2).unwrap();
        let design =
            ExperimentalDesign::from_matrix(shape, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
                .unwrap();

        assert_eq!(design.treatments(), 3);
        assert_eq!(design.blocks(), 2);
        assert!((design.value(1, 2) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_matrix_wrong_shape() {
        let shape = DesignShape::new(3, 2).unwrap();
        let result = ExperimentalDesign::from_matrix(shape, array![[1.0, 2.0], [3.0, 4.0]]);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_from_cells() {
        let shape = DesignShape::new(2, 2).unwrap();
        let cells = [
            Observation {
                block: 0,
                treatment: 0,
                value: 1.0,
            },
            Observation {
                block: 1,
                treatment: 1,
                value: 4.0,
            },
            Observation {
                block: 0,
                treatment: 1,
                value: 2.0,
            },
            Observation {
                block: 1,
                treatment: 0,
                value: 3.0,
            },
        ];

        let design = ExperimentalDesign::from_cells(shape, &cells).unwrap();
        assert!((design.value(0, 1) - 2.0).abs() < 1e-12);
        assert!((design.value(1, 0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_cells_count_mismatch() {
        let shape = DesignShape::new(2, 2).unwrap();
        let cells = [Observation {
            block: 0,
            treatment: 0,
            value: 1.0,
        }];
        assert!(matches!(
            ExperimentalDesign::from_cells(shape, &cells),
            Err(Error::ObservationCountMismatch {
                expected: 4,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_from_cells_duplicate() {
        let shape = DesignShape::new(2, 2).unwrap();
        let mut cells = vec![
            Observation {
                block: 0,
                treatment: 0,
                value: 1.0,
            };
            4
        ];
        cells[1].treatment = 1;
        cells[2].block = 1;
        // cells[3] duplicates cells[0]
        assert!(matches!(
            ExperimentalDesign::from_cells(shape, &cells),
            Err(Error::DuplicateObservation {
                block: 0,
                treatment: 0
            })
        ));
    }

    #[test]
    fn test_from_cells_out_of_range() {
        let shape = DesignShape::new(2, 2).unwrap();
        let cells = [
            Observation {
                block: 0,
                treatment: 0,
                value: 1.0,
            },
            Observation {
                block: 0,
                treatment: 1,
                value: 2.0,
            },
            Observation {
                block: 1,
                treatment: 0,
                value: 3.0,
            },
            Observation {
                block: 2,
                treatment: 0,
                value: 4.0,
            },
        ];
        assert!(matches!(
            ExperimentalDesign::from_cells(shape, &cells),
            Err(Error::CellOutOfRange { block: 2, .. })
        ));
    }

    #[test]
    fn test_display() {
        let shape = DesignShape::new(4, 3).unwrap();
        assert_eq!(format!("{shape}"), "RCBD(4 treatments, 3 blocks)");
    }
}

use std::fmt::Display;
use std::ops::{AddAssign, SubAssign};

use nalgebra::{DMatrix, Dim, Matrix, RawStorage, Scalar};
use num_traits::Float;
use tracing::debug;

use crate::error::ValidationError;

/// Numeric type a cost matrix can hold.
pub trait Cost: Scalar + Float + AddAssign + SubAssign + Display {}

impl<T> Cost for T where T: Scalar + Float + AddAssign + SubAssign + Display {}

/// A validated `rows x cols` cost matrix.
///
/// Every entry is finite and nonnegative. The matrix may be rectangular; the
/// solver works on [`CostMatrix::balanced`], a square copy padded with
/// zero-cost dummy rows or columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix<T: Cost> {
    costs: DMatrix<T>,
}

impl<T: Cost> CostMatrix<T> {
    pub fn new<R, C, S>(costs: &Matrix<T, R, C, S>) -> Result<Self, ValidationError>
    where
        R: Dim,
        C: Dim,
        S: RawStorage<T, R, C>,
    {
        let (rows, cols) = costs.shape();
        if rows == 0 || cols == 0 {
            return Err(ValidationError::Empty { rows, cols });
        }

        // report the first offending entry in row-major order
        for row in 0..rows {
            for col in 0..cols {
                let value = costs[(row, col)];
                if !value.is_finite() {
                    return Err(ValidationError::NonFinite { row, col });
                }
                if value < T::zero() {
                    return Err(ValidationError::Negative {
                        row,
                        col,
                        value: value.to_f64().unwrap_or(f64::NAN),
                    });
                }
            }
        }

        Ok(Self {
            costs: DMatrix::from_fn(rows, cols, |row, col| costs[(row, col)]),
        })
    }

    /// Builds a cost matrix from a list of rows, rejecting ragged input.
    pub fn from_rows<V>(rows: &[V]) -> Result<Self, ValidationError>
    where
        V: AsRef<[T]>,
    {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.is_empty() || cols == 0 {
            return Err(ValidationError::Empty {
                rows: rows.len(),
                cols,
            });
        }

        if let Some((row, found)) = rows
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(ValidationError::Ragged {
                row,
                expected: cols,
                found,
            });
        }

        Self::new(&DMatrix::from_fn(rows.len(), cols, |row, col| {
            rows[row].as_ref()[col]
        }))
    }

    pub fn rows(&self) -> usize {
        self.costs.nrows()
    }

    pub fn cols(&self) -> usize {
        self.costs.ncols()
    }

    /// Side length of the balanced matrix, `max(rows, cols)`.
    pub fn size(&self) -> usize {
        self.rows().max(self.cols())
    }

    /// Whether solving requires dummy rows or columns.
    pub fn needs_padding(&self) -> bool {
        self.rows() != self.cols()
    }

    /// Original cost of a cell; dummy cells outside the input cost nothing.
    pub fn cost(&self, row: usize, col: usize) -> T {
        self.costs.get((row, col)).copied().unwrap_or_else(T::zero)
    }

    pub fn costs(&self) -> &DMatrix<T> {
        &self.costs
    }

    /// Square copy of the costs with zero-filled dummy rows or columns.
    pub fn balanced(&self) -> DMatrix<T> {
        let n = self.size();
        if self.needs_padding() {
            debug!(
                rows = self.rows(),
                cols = self.cols(),
                size = n,
                "padding cost matrix with dummy entries"
            );
        }
        DMatrix::from_fn(n, n, |row, col| self.cost(row, col))
    }
}

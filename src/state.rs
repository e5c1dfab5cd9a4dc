use nalgebra::DMatrix;
use tracing::debug;

use crate::matrix::Cost;

/// Star, prime and cover bookkeeping over the reduced square cost matrix.
///
/// At most one star sits in any row or column. Primes only live between an
/// uncovered-zero search and the augmentation that clears them.
#[derive(Debug, Clone)]
pub(crate) struct MatchState<T: Cost> {
    pub(crate) costs: DMatrix<T>,
    pub(crate) starred: DMatrix<bool>,
    pub(crate) primed: DMatrix<bool>,
    pub(crate) covered_rows: Vec<bool>,
    pub(crate) covered_cols: Vec<bool>,
}

impl<T: Cost> MatchState<T> {
    /// Seeds the state from a reduced square matrix with a greedy star pass.
    pub(crate) fn new(costs: DMatrix<T>) -> Self {
        let n = costs.nrows();
        debug_assert_eq!(n, costs.ncols(), "cost matrix must be square");

        let mut state = Self {
            costs,
            starred: DMatrix::from_element(n, n, false),
            primed: DMatrix::from_element(n, n, false),
            covered_rows: vec![false; n],
            covered_cols: vec![false; n],
        };
        state.star_independent_zeros();
        state
    }

    fn star_independent_zeros(&mut self) {
        let n = self.size();
        // covers only mark used lines during this scan
        for row in 0..n {
            for col in 0..n {
                if self.covered_rows[row] || self.covered_cols[col] {
                    continue;
                }

                if self.costs[(row, col)].is_zero() {
                    self.starred[(row, col)] = true;
                    self.covered_rows[row] = true;
                    self.covered_cols[col] = true;
                }
            }
        }

        self.covered_rows.fill(false);
        self.cover_starred_columns();
        debug!(stars = self.star_count(), size = n, "starred initial zeros");
    }

    pub(crate) fn size(&self) -> usize {
        self.costs.nrows()
    }

    pub(crate) fn star_count(&self) -> usize {
        self.starred.iter().filter(|s| **s).count()
    }

    pub(crate) fn covered_col_count(&self) -> usize {
        self.covered_cols.iter().filter(|c| **c).count()
    }

    pub(crate) fn star_in_row(&self, row: usize) -> Option<usize> {
        self.starred.row(row).iter().position(|s| *s)
    }

    pub(crate) fn star_in_col(&self, col: usize) -> Option<usize> {
        self.starred.column(col).iter().position(|s| *s)
    }

    pub(crate) fn prime_in_row(&self, row: usize) -> Option<usize> {
        self.primed.row(row).iter().position(|p| *p)
    }

    pub(crate) fn is_uncovered(&self, row: usize, col: usize) -> bool {
        !self.covered_rows[row] && !self.covered_cols[col]
    }

    /// Clears primes and row covers, then covers exactly the starred columns.
    pub(crate) fn reset_covers(&mut self) {
        self.primed.fill(false);
        self.covered_rows.fill(false);
        self.cover_starred_columns();
    }

    fn cover_starred_columns(&mut self) {
        for (col, covered) in self.covered_cols.iter_mut().enumerate() {
            *covered = self.starred.column(col).iter().any(|s| *s);
        }
    }
}

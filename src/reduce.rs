use nalgebra::DMatrix;
use num_traits::Float;
use tracing::debug;

use crate::matrix::Cost;

/// Minima subtracted from each row and then each column by [`reduce`].
///
/// Informational only: the solver never reads it back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReductionTrace<T> {
    pub rows: Vec<T>,
    pub cols: Vec<T>,
}

impl<T: Cost> ReductionTrace<T> {
    pub fn row_messages(&self) -> Vec<String> {
        lines("row", &self.rows)
    }

    pub fn col_messages(&self) -> Vec<String> {
        lines("column", &self.cols)
    }
}

fn lines<T: Cost>(kind: &str, minima: &[T]) -> Vec<String> {
    minima
        .iter()
        .enumerate()
        .map(|(i, min)| format!("{kind} {i}: subtract {min}"))
        .collect()
}

/// Subtracts the minimum of every row, then the minimum of every column of
/// the row-reduced matrix.
///
/// Afterwards each row and column holds at least one zero and no entry is
/// negative.
pub fn reduce<T: Cost>(costs: &mut DMatrix<T>) -> ReductionTrace<T> {
    // subtract minimum value from each respective row
    let rows = costs
        .row_iter_mut()
        .map(|mut r| {
            let min = r.iter().copied().fold(T::infinity(), Float::min);
            r.iter_mut().for_each(|c| *c -= min);
            min
        })
        .collect();

    // subtract minimum value from each respective col
    let cols = costs
        .column_iter_mut()
        .map(|mut c| {
            let min = c.iter().copied().fold(T::infinity(), Float::min);
            c.iter_mut().for_each(|v| *v -= min);
            min
        })
        .collect();

    let trace = ReductionTrace { rows, cols };
    debug!(rows = ?trace.rows, cols = ?trace.cols, "reduced cost matrix");
    trace
}

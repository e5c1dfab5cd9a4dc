use thiserror::Error;

/// Rejection of a cost matrix before any solving step runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("cost matrix must have at least one row and one column (got {rows}x{cols})")]
    Empty { rows: usize, cols: usize },
    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cost at ({row}, {col}) is negative: {value}")]
    Negative { row: usize, col: usize, value: f64 },
    #[error("cost at ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },
}

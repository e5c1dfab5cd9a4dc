use tracing::{trace, warn};

use crate::matrix::Cost;
use crate::state::MatchState;

impl<T: Cost> MatchState<T> {
    /// Smallest reduced cost among cells with both lines uncovered.
    pub(crate) fn min_uncovered(&self) -> Option<T> {
        let n = self.size();
        (0..n)
            .flat_map(|row| (0..n).map(move |col| (row, col)))
            .filter(|&(row, col)| self.is_uncovered(row, col))
            .map(|cell| self.costs[cell])
            .reduce(T::min)
    }

    /// Moves the minimum uncovered value `δ` off the uncovered cells and onto
    /// the doubly covered ones, exposing a new uncovered zero.
    ///
    /// Stars, primes and covers are untouched. Returns `δ`.
    pub(crate) fn adjust(&mut self) -> T {
        let delta = self.min_uncovered().unwrap_or_else(|| {
            // fewer than n lines are covered whenever this runs
            warn!("no uncovered cell left to adjust, leaving costs unchanged");
            T::zero()
        });

        let n = self.size();
        for row in 0..n {
            for col in 0..n {
                match (self.covered_rows[row], self.covered_cols[col]) {
                    (false, false) => self.costs[(row, col)] -= delta,
                    (true, true) => self.costs[(row, col)] += delta,
                    _ => {}
                }
            }
        }

        trace!(%delta, "adjusted uncovered costs");
        delta
    }
}

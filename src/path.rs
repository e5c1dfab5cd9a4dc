use tracing::trace;

use crate::matrix::Cost;
use crate::state::MatchState;

/// Outcome of priming the first uncovered zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prime {
    /// The primed row already holds a star at `star_col`; the row is now
    /// covered and that column uncovered.
    Covered {
        row: usize,
        col: usize,
        star_col: usize,
    },
    /// The primed row holds no star, so an augmenting path starts here.
    Seed { row: usize, col: usize },
    /// No uncovered zero is left.
    Exhausted,
}

impl<T: Cost> MatchState<T> {
    /// First uncovered zero in row-major order.
    pub(crate) fn find_uncovered_zero(&self) -> Option<(usize, usize)> {
        let n = self.size();
        (0..n)
            .filter(|&row| !self.covered_rows[row])
            .find_map(|row| {
                (0..n)
                    .filter(|&col| !self.covered_cols[col])
                    .find(|&col| self.costs[(row, col)].is_zero())
                    .map(|col| (row, col))
            })
    }

    /// Primes the next uncovered zero and shifts covers when its row is
    /// already starred.
    pub(crate) fn prime_uncovered_zero(&mut self) -> Prime {
        let Some((row, col)) = self.find_uncovered_zero() else {
            return Prime::Exhausted;
        };

        self.primed[(row, col)] = true;
        match self.star_in_row(row) {
            Some(star_col) => {
                self.covered_rows[row] = true;
                self.covered_cols[star_col] = false;
                trace!(row, col, star_col, "primed zero, moved cover to row");
                Prime::Covered { row, col, star_col }
            }
            None => {
                trace!(row, col, "primed zero in unstarred row");
                Prime::Seed { row, col }
            }
        }
    }

    /// Flips stars along the alternating path that starts at the primed
    /// `seed`, adding one star overall, and resets primes and covers.
    ///
    /// Returns the path in visiting order: prime, star, prime, ...
    pub(crate) fn augment(&mut self, seed: (usize, usize)) -> Vec<(usize, usize)> {
        let mut path = vec![seed];
        let mut col = seed.1;

        while let Some(star_row) = self.star_in_col(col) {
            path.push((star_row, col));
            col = self
                .prime_in_row(star_row)
                .expect("starred row on an alternating path holds a prime");
            path.push((star_row, col));
        }

        for &cell in &path {
            self.starred[cell] = !self.starred[cell];
        }
        self.reset_covers();

        trace!(len = path.len(), stars = self.star_count(), "augmented matching");
        path
    }
}

#[cfg(test)]
mod test {
    use nalgebra::DMatrix;

    use super::*;

    #[test]
    fn scans_uncovered_cells_row_major() {
        #[rustfmt::skip]
        let costs = DMatrix::from_row_slice(
            2, 2,
            &[
                1., 0.,
                0., 0.,
            ]
        );
        let mut state = MatchState::new(costs);
        state.starred.fill(false);
        state.reset_covers();

        assert_eq!(state.find_uncovered_zero(), Some((0, 1)));
        state.covered_rows[0] = true;
        assert_eq!(state.find_uncovered_zero(), Some((1, 0)));
        state.covered_cols[0] = true;
        assert_eq!(state.find_uncovered_zero(), Some((1, 1)));
        state.covered_cols[1] = true;
        assert_eq!(state.find_uncovered_zero(), None);
    }

    #[test]
    fn augments_through_a_starred_column() {
        #[rustfmt::skip]
        let costs = DMatrix::from_row_slice(
            2, 2,
            &[
                0., 0.,
                0., 1.,
            ]
        );
        // greedy pass stars (0, 0) and leaves row 1 unmatched
        let mut state = MatchState::new(costs);
        assert_eq!(state.covered_cols, [true, false]);

        assert_eq!(
            state.prime_uncovered_zero(),
            Prime::Covered {
                row: 0,
                col: 1,
                star_col: 0
            }
        );
        assert_eq!(state.prime_uncovered_zero(), Prime::Seed { row: 1, col: 0 });

        let path = state.augment((1, 0));
        assert_eq!(path, [(1, 0), (0, 0), (0, 1)]);
        assert_eq!(state.star_in_row(0), Some(1));
        assert_eq!(state.star_in_row(1), Some(0));
        assert_eq!(state.star_count(), 2);
        assert!(state.primed.iter().all(|p| !p));
        assert!(state.covered_rows.iter().all(|r| !r));
        assert_eq!(state.covered_col_count(), 2);
    }

    #[test]
    fn exhausted_when_every_zero_is_covered() {
        #[rustfmt::skip]
        let costs = DMatrix::from_row_slice(
            2, 2,
            &[
                0., 1.,
                0., 1.,
            ]
        );
        let mut state = MatchState::new(costs);
        assert_eq!(state.prime_uncovered_zero(), Prime::Exhausted);
        assert!(state.primed.iter().all(|p| !p));
    }
}

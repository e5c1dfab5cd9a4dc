use tracing::{debug, debug_span, trace};

use crate::assignment::{self, Allocations, Assignment, Solution};
use crate::error::ValidationError;
use crate::matrix::{Cost, CostMatrix};
use crate::path::Prime;
use crate::reduce::reduce;
use crate::state::MatchState;
use crate::trace::{Discard, Recorder, StepSink, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    CheckCoverage,
    FindZero,
    Augment { row: usize, col: usize },
    Adjust,
    Done,
}

/// Solves the assignment problem, streaming every step to `sink`.
pub fn solve_with<T, S>(costs: &CostMatrix<T>, sink: &mut S) -> Assignment<T>
where
    T: Cost,
    S: StepSink<T> + ?Sized,
{
    let mut recorder = Recorder::new(sink);
    let (state, reduction) = run(costs, &mut recorder);
    Assignment::extract(&state, costs, reduction, recorder.iteration())
}

/// Solves the assignment problem and keeps the full step trace.
pub fn solve<T: Cost>(costs: &CostMatrix<T>) -> Solution<T> {
    let mut steps = Vec::new();
    let assignment = solve_with(costs, &mut steps);
    Solution { assignment, steps }
}

/// Validates a list of rows and solves it.
pub fn solve_rows<T, V>(rows: &[V]) -> Result<Solution<T>, ValidationError>
where
    T: Cost,
    V: AsRef<[T]>,
{
    Ok(solve(&CostMatrix::from_rows(rows)?))
}

/// Fills `assignments` with a minimum-cost matching of `costs` and returns
/// its total.
///
/// No step trace is built and the buffer is reused, which makes this the
/// entry point for repeated solves.
pub fn hungarian<T, R, C, S>(
    costs: &nalgebra::Matrix<T, R, C, S>,
    assignments: &mut Allocations<T>,
) -> Result<T, ValidationError>
where
    T: Cost,
    R: nalgebra::Dim,
    C: nalgebra::Dim,
    S: nalgebra::RawStorage<T, R, C>,
{
    let costs = CostMatrix::new(costs)?;
    let (state, _) = run(&costs, &mut Recorder::new(&mut Discard));
    assignment::extract_into(&state, &costs, assignments);
    Ok(assignment::total(assignments))
}

fn run<T, S>(
    costs: &CostMatrix<T>,
    recorder: &mut Recorder<'_, S>,
) -> (MatchState<T>, crate::reduce::ReductionTrace<T>)
where
    T: Cost,
    S: StepSink<T> + ?Sized,
{
    let span = debug_span!("hungarian", rows = costs.rows(), cols = costs.cols());
    let _enter = span.enter();

    let mut balanced = costs.balanced();
    let reduction = reduce(&mut balanced);
    let mut state = MatchState::new(balanced);
    recorder.record(&state, Transition::Initial);

    let mut phase = Phase::CheckCoverage;
    while phase != Phase::Done {
        trace!(?phase, iteration = recorder.iteration(), "entering phase");
        phase = match phase {
            Phase::CheckCoverage => {
                if state.covered_col_count() == state.size() {
                    recorder.record(&state, Transition::Optimal);
                    Phase::Done
                } else {
                    recorder.advance();
                    Phase::FindZero
                }
            }
            Phase::FindZero => match state.prime_uncovered_zero() {
                Prime::Covered { row, col, star_col } => {
                    recorder.record(&state, Transition::Primed { row, col, star_col });
                    Phase::FindZero
                }
                Prime::Seed { row, col } => Phase::Augment { row, col },
                Prime::Exhausted => Phase::Adjust,
            },
            Phase::Augment { row, col } => {
                let path = state.augment((row, col));
                recorder.record(&state, Transition::Augmented { path });
                Phase::CheckCoverage
            }
            Phase::Adjust => {
                let delta = state.adjust();
                recorder.record(&state, Transition::Adjusted { delta });
                Phase::FindZero
            }
            Phase::Done => Phase::Done,
        };
    }

    debug!(
        iterations = recorder.iteration(),
        size = state.size(),
        "all columns covered"
    );
    (state, reduction)
}

#[cfg(test)]
mod test {
    use nalgebra::{DMatrix, Matrix2, Matrix4, Matrix5};

    use super::*;
    use crate::trace::{Step, StepKind};

    fn assert_costs(assignments: &Allocations<f64>, cost_expected: f64, epsilon: f64) -> bool {
        (assignments.iter().map(|a| a.cost()).sum::<f64>() - cost_expected).abs() < epsilon
    }

    #[test]
    fn basic_two() {
        #[rustfmt::skip]
        let costs = Matrix2::from_row_slice(
            &[
                1., 2.,
                2., 1.,
            ]
        );
        let mut assignments = Vec::with_capacity(costs.shape().1);
        let total = hungarian(&costs, &mut assignments).expect("valid costs");
        assert_eq!(total, 2.);
        assert!(assert_costs(&assignments, 2., f64::EPSILON));
    }

    #[test]
    fn basic_two_rev() {
        #[rustfmt::skip]
        let costs = Matrix2::from_row_slice(
            &[
                1., 2.,
                2., 100.
            ]
        );
        let mut assignments = Vec::with_capacity(costs.shape().1);
        hungarian(&costs, &mut assignments).expect("valid costs");
        assert!(assert_costs(&assignments, 4., f64::EPSILON));
    }

    #[test]
    fn basic_four() {
        #[rustfmt::skip]
        let costs = Matrix4::from_row_slice(
            &[
                82., 83., 69., 92.,
                77., 37., 49., 92.,
                11., 69.,  5., 86.,
                 8.,  9., 98., 23.,
            ]
        );
        let mut assignments = Vec::with_capacity(costs.shape().1);
        hungarian(&costs, &mut assignments).expect("valid costs");
        assert!(assert_costs(&assignments, 140., f64::EPSILON));
    }

    #[test]
    fn basic_five() {
        #[rustfmt::skip]
        let costs = Matrix5::from_row_slice(
            &[
                10., 5.,13.,15.,16.,
                 3., 9.,18.,13., 6.,
                10., 7., 2., 2., 2.,
                 7.,11., 9., 7.,12.,
                 7., 9.,10., 4.,12.,
            ]
        );
        let mut assignments = Vec::with_capacity(costs.shape().1);
        hungarian(&costs, &mut assignments).expect("valid costs");
        assert!(assert_costs(&assignments, 23., f64::EPSILON));
    }

    #[test]
    fn basic_five_2() {
        #[rustfmt::skip]
        let costs = Matrix5::from_row_slice(
            &[
                20., 15., 18., 20., 25.,
                18., 20., 12., 14., 15.,
                21., 23., 25., 27., 25.,
                17., 18., 21., 23., 20.,
                18., 18., 16., 19., 20.,
            ]
        );
        let mut assignments = Vec::with_capacity(costs.shape().1);
        hungarian(&costs, &mut assignments).expect("valid costs");
        assert!(assert_costs(&assignments, 86., f64::EPSILON));
    }

    #[test]
    fn reuses_allocation_buffer() {
        let mut assignments = Vec::new();
        hungarian(&Matrix2::new(1., 2., 2., 1.), &mut assignments).expect("valid costs");
        hungarian(&DMatrix::from_element(1, 3, 4.), &mut assignments).expect("valid costs");
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].assignment(), (0, 0));
    }

    #[test]
    fn square_three_picks_unique_optimum() {
        let solution =
            solve_rows(&[[4., 1., 3.], [2., 0., 5.], [3., 2., 2.]]).expect("valid costs");

        assert_eq!(solution.total_cost(), 5.);
        assert_eq!(
            solution.assignment.assignment().collect::<Vec<_>>(),
            [(0, 1), (1, 0), (2, 2)]
        );
        assert_eq!(
            solution.allocations().iter().map(|a| a.cost()).collect::<Vec<_>>(),
            [1., 2., 2.]
        );
    }

    #[test]
    fn wide_matrix_drops_dummy_row() {
        let solution = solve_rows(&[
            [250., 400., 350., 300.],
            [400., 600., 350., 200.],
            [200., 400., 250., 500.],
        ])
        .expect("valid costs");
        let assignment = &solution.assignment;

        assert!(assignment.needs_padding());
        assert_eq!(assignment.original_shape(), (3, 4));
        assert_eq!(assignment.size(), 4);
        assert_eq!(
            assignment.assignment().collect::<Vec<_>>(),
            [(0, 0), (1, 3), (2, 2)]
        );
        assert_eq!(assignment.total_cost(), 700.);
        assert!(solution.steps.iter().all(|s| s.matrix.shape() == (4, 4)));
    }

    #[test]
    fn single_cell_finishes_without_iterating() {
        let solution = solve_rows(&[[7.]]).expect("valid costs");

        assert_eq!(solution.total_cost(), 7.);
        assert_eq!(solution.assignment.assignment().collect::<Vec<_>>(), [(0, 0)]);
        assert_eq!(solution.assignment.iterations(), 0);
        assert_eq!(
            solution.steps.iter().map(|s| s.kind).collect::<Vec<_>>(),
            [StepKind::Initial, StepKind::Optimal]
        );
        assert_eq!(
            solution.steps[1].message.as_deref(),
            Some("all columns covered, optimal")
        );
    }

    #[test]
    fn ragged_rows_record_nothing() {
        let mut steps: Vec<Step<f64>> = Vec::new();
        let result = CostMatrix::from_rows(&[vec![1., 2.], vec![3.]])
            .map(|costs| solve_with(&costs, &mut steps));

        assert_eq!(
            result,
            Err(ValidationError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert!(steps.is_empty());
    }

    #[test]
    fn trace_follows_state_machine() {
        let solution = solve_rows(&[
            [82., 83., 69., 92.],
            [77., 37., 49., 92.],
            [11., 69., 5., 86.],
            [8., 9., 98., 23.],
        ])
        .expect("valid costs");
        let steps = &solution.steps;

        assert_eq!(solution.total_cost(), 140.);
        assert_eq!(steps.first().map(|s| s.kind), Some(StepKind::Initial));
        assert_eq!(steps.last().map(|s| s.kind), Some(StepKind::Optimal));
        assert_eq!(steps.last().map(|s| s.star_count()), Some(4));

        let mut stars = steps[0].star_count();
        for step in steps {
            match step.kind {
                StepKind::Augmented => {
                    stars += 1;
                    assert_eq!(step.star_count(), stars);
                    let path = step.path.as_ref().expect("augmented steps carry a path");
                    assert_eq!(path.len() % 2, 1);
                    assert_eq!(step.primed_cell, path.first().copied());
                    assert!(step.primed.iter().all(|p| !p));
                }
                StepKind::Adjusted => {
                    assert!(step.adjustment.is_some_and(|d| d > 0.));
                }
                StepKind::Primed => {
                    let (row, _) = step.primed_cell.expect("primed steps carry a cell");
                    assert!(step.covered_rows[row]);
                }
                StepKind::Initial | StepKind::Optimal => {}
            }
            assert!(step.matrix.iter().all(|c| *c >= 0.));
        }

        let final_step = steps.last().expect("at least one step");
        assert_eq!(final_step.iteration, solution.assignment.iterations());
    }

    #[test]
    fn observing_does_not_change_the_outcome() {
        let costs = CostMatrix::from_rows(&[
            [10., 5., 13., 15., 16.],
            [3., 9., 18., 13., 6.],
            [10., 7., 2., 2., 2.],
            [7., 11., 9., 7., 12.],
            [7., 9., 10., 4., 12.],
        ])
        .expect("valid costs");

        let traced = solve(&costs);
        let silent = solve_with(&costs, &mut Discard);
        assert_eq!(traced.assignment, silent);
        assert_eq!(silent.total_cost(), 23.);

        let allocations = silent.into_allocations();
        assert_eq!(
            allocations.iter().map(|a| a.assignment()).collect::<Vec<_>>(),
            [(0, 1), (1, 0), (2, 4), (3, 2), (4, 3)]
        );
    }
}

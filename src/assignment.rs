use tracing::debug;

use crate::matrix::{Cost, CostMatrix};
use crate::reduce::ReductionTrace;
use crate::state::MatchState;
use crate::trace::Step;

/// One agent-to-task pairing with its original cost.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Allocation<T> {
    row: usize,
    col: usize,
    cost: T,
}

impl<T: Copy> Allocation<T> {
    pub fn assignment(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn cost(&self) -> T {
        self.cost
    }
}

pub type Allocations<T> = Vec<Allocation<T>>;

/// Minimum-cost matching over the original `rows x cols` input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Assignment<T> {
    allocations: Allocations<T>,
    total_cost: T,
    reduction: ReductionTrace<T>,
    original_shape: (usize, usize),
    size: usize,
    iterations: usize,
}

impl<T: Cost> Assignment<T> {
    /// Reads the final stars back into original coordinates, dropping legs
    /// that touch a dummy row or column.
    pub(crate) fn extract(
        state: &MatchState<T>,
        costs: &CostMatrix<T>,
        reduction: ReductionTrace<T>,
        iterations: usize,
    ) -> Self {
        let mut allocations = Vec::with_capacity(costs.rows().min(costs.cols()));
        extract_into(state, costs, &mut allocations);
        let total_cost = total(&allocations);

        Self {
            allocations,
            total_cost,
            reduction,
            original_shape: (costs.rows(), costs.cols()),
            size: costs.size(),
            iterations,
        }
    }

    /// Pairs in ascending row order; `min(rows, cols)` of them.
    pub fn allocations(&self) -> &[Allocation<T>] {
        &self.allocations
    }

    pub fn assignment(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.allocations.iter().map(Allocation::assignment)
    }

    pub fn total_cost(&self) -> T {
        self.total_cost
    }

    pub fn reduction(&self) -> &ReductionTrace<T> {
        &self.reduction
    }

    /// `(rows, cols)` of the input before balancing.
    pub fn original_shape(&self) -> (usize, usize) {
        self.original_shape
    }

    /// Side length of the balanced square matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn needs_padding(&self) -> bool {
        self.original_shape.0 != self.original_shape.1
    }

    /// Coverage-check cycles that did not terminate the solve.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn into_allocations(self) -> Allocations<T> {
        self.allocations
    }
}

pub(crate) fn extract_into<T: Cost>(
    state: &MatchState<T>,
    costs: &CostMatrix<T>,
    allocations: &mut Allocations<T>,
) {
    allocations.clear();
    for row in 0..state.size() {
        let col = state
            .star_in_row(row)
            .expect("every row is starred once all columns are covered");
        if row < costs.rows() && col < costs.cols() {
            allocations.push(Allocation {
                row,
                col,
                cost: costs.cost(row, col),
            });
        }
    }
}

pub(crate) fn total<T: Cost>(allocations: &[Allocation<T>]) -> T {
    let total = allocations
        .iter()
        .fold(T::zero(), |sum, a| sum + a.cost);
    debug!(%total, pairs = allocations.len(), "extracted assignment");
    total
}

/// Everything a front-end renders: the assignment, its reduction trace and
/// the recorded steps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution<T: nalgebra::Scalar> {
    pub assignment: Assignment<T>,
    pub steps: Vec<Step<T>>,
}

impl<T: Cost> Solution<T> {
    pub fn total_cost(&self) -> T {
        self.assignment.total_cost()
    }

    pub fn allocations(&self) -> &[Allocation<T>] {
        self.assignment.allocations()
    }
}

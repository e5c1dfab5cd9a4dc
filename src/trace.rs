//! Step-by-step record of a solve.
//!
//! The solver hands a [`Step`] snapshot to a [`StepSink`] after the initial
//! star pass and after every state transition. Sinks only observe: the
//! assignment is the same whichever sink is attached.

use nalgebra::{DMatrix, Scalar};

use crate::matrix::Cost;
use crate::state::MatchState;

/// The transition a [`Step`] was recorded after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StepKind {
    /// Greedy starring of independent zeros.
    Initial,
    /// An uncovered zero was primed in a starred row.
    Primed,
    /// Stars were flipped along an augmenting path.
    Augmented,
    /// The minimum uncovered value was redistributed.
    Adjusted,
    /// Every column is covered; the stars form the assignment.
    Optimal,
}

/// Snapshot of the solver state after one transition.
///
/// Matrices are `n x n` with `n = max(rows, cols)` of the input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Step<T: Scalar> {
    pub iteration: usize,
    pub kind: StepKind,
    pub matrix: DMatrix<T>,
    pub starred: DMatrix<bool>,
    pub primed: DMatrix<bool>,
    pub covered_rows: Vec<bool>,
    pub covered_cols: Vec<bool>,
    pub message: Option<String>,
    pub primed_cell: Option<(usize, usize)>,
    pub path: Option<Vec<(usize, usize)>>,
    pub adjustment: Option<T>,
}

impl<T: Scalar> Step<T> {
    pub fn star_count(&self) -> usize {
        self.starred.iter().filter(|s| **s).count()
    }

    /// Starred cells in row-major order.
    pub fn stars(&self) -> Vec<(usize, usize)> {
        let (rows, cols) = self.starred.shape();
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .filter(|&cell| self.starred[cell])
            .collect()
    }
}

/// Receiver for [`Step`] records as the solver produces them.
pub trait StepSink<T: Scalar> {
    fn record(&mut self, step: Step<T>);

    /// Whether snapshots should be built at all.
    fn enabled(&self) -> bool {
        true
    }
}

impl<T: Scalar> StepSink<T> for Vec<Step<T>> {
    fn record(&mut self, step: Step<T>) {
        self.push(step);
    }
}

impl<T: Scalar, S: StepSink<T> + ?Sized> StepSink<T> for &mut S {
    fn record(&mut self, step: Step<T>) {
        (**self).record(step);
    }

    fn enabled(&self) -> bool {
        (**self).enabled()
    }
}

/// Drops every step without building it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<T: Scalar> StepSink<T> for Discard {
    fn record(&mut self, _step: Step<T>) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Forwards each step to a closure.
#[derive(Debug, Clone, Copy)]
pub struct FnSink<F>(pub F);

impl<T: Scalar, F: FnMut(Step<T>)> StepSink<T> for FnSink<F> {
    fn record(&mut self, step: Step<T>) {
        (self.0)(step);
    }
}

pub(crate) enum Transition<T> {
    Initial,
    Primed {
        row: usize,
        col: usize,
        star_col: usize,
    },
    Augmented {
        path: Vec<(usize, usize)>,
    },
    Adjusted {
        delta: T,
    },
    Optimal,
}

/// Turns solver transitions into [`Step`]s for a sink and keeps the
/// iteration count.
pub(crate) struct Recorder<'s, S: ?Sized> {
    sink: &'s mut S,
    iteration: usize,
}

impl<'s, S: ?Sized> Recorder<'s, S> {
    pub(crate) fn new(sink: &'s mut S) -> Self {
        Self { sink, iteration: 0 }
    }

    pub(crate) fn iteration(&self) -> usize {
        self.iteration
    }

    /// Starts the next coverage-check cycle.
    pub(crate) fn advance(&mut self) {
        self.iteration += 1;
    }

    pub(crate) fn record<T>(&mut self, state: &MatchState<T>, transition: Transition<T>)
    where
        T: Cost,
        S: StepSink<T>,
    {
        if !<S as StepSink<T>>::enabled(&*self.sink) {
            return;
        }

        let (kind, message, primed_cell, path, adjustment) = match transition {
            Transition::Initial => (
                StepKind::Initial,
                format!("starred {} independent zeros", state.star_count()),
                None,
                None,
                None,
            ),
            Transition::Primed { row, col, star_col } => (
                StepKind::Primed,
                format!("cover row {row}, uncover column {star_col}"),
                Some((row, col)),
                None,
                None,
            ),
            Transition::Augmented { path } => (
                StepKind::Augmented,
                "augmenting path found".to_owned(),
                path.first().copied(),
                Some(path),
                None,
            ),
            Transition::Adjusted { delta } => (
                StepKind::Adjusted,
                format!("minimum uncovered value {delta}"),
                None,
                None,
                Some(delta),
            ),
            Transition::Optimal => (
                StepKind::Optimal,
                "all columns covered, optimal".to_owned(),
                None,
                None,
                None,
            ),
        };

        <S as StepSink<T>>::record(&mut *self.sink, Step {
            iteration: self.iteration,
            kind,
            matrix: state.costs.clone(),
            starred: state.starred.clone(),
            primed: state.primed.clone(),
            covered_rows: state.covered_rows.clone(),
            covered_cols: state.covered_cols.clone(),
            message: Some(message),
            primed_cell,
            path,
            adjustment,
        });
    }
}

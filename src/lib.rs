//! Kuhn-Munkres (Hungarian) solver for the assignment problem with a
//! step-by-step trace of the star, prime and cover bookkeeping.
//!
//! ```
//! use hungarian_trace::solve_rows;
//!
//! let solution = solve_rows(&[[4., 1., 3.], [2., 0., 5.], [3., 2., 2.]]).unwrap();
//! assert_eq!(solution.total_cost(), 5.);
//! assert_eq!(
//!     solution.assignment.assignment().collect::<Vec<_>>(),
//!     [(0, 1), (1, 0), (2, 2)]
//! );
//! ```
//!
//! Rectangular inputs are padded to square with zero-cost dummy rows or
//! columns; pairs touching a dummy line never reach the [`Assignment`].

mod adjust;
mod assignment;
mod error;
mod matrix;
mod path;
mod reduce;
mod solver;
mod state;
pub mod trace;

pub use assignment::{Allocation, Allocations, Assignment, Solution};
pub use error::ValidationError;
pub use matrix::{Cost, CostMatrix};
pub use reduce::{reduce, ReductionTrace};
pub use solver::{hungarian, solve, solve_rows, solve_with};
pub use trace::{Discard, FnSink, Step, StepKind, StepSink};

//! Prints the step trace of a small delivery-cost matrix.
//!
//! Set `RUST_LOG`-style verbosity with the `HUNGARIAN_LOG` variable
//! (`debug`, `trace`, ...).

use hungarian_trace::{solve_rows, Step};
use tracing::Level;

fn main() {
    let level = std::env::var("HUNGARIAN_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).with_target(true).init();

    let solution = match solve_rows(&[
        [250., 400., 350., 300.],
        [400., 600., 350., 200.],
        [200., 400., 250., 500.],
    ]) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("invalid cost matrix: {e}");
            std::process::exit(1);
        }
    };

    let assignment = &solution.assignment;
    if assignment.needs_padding() {
        let (rows, cols) = assignment.original_shape();
        let n = assignment.size();
        println!("balanced {rows}x{cols} to {n}x{n}");
    }
    for line in assignment
        .reduction()
        .row_messages()
        .into_iter()
        .chain(assignment.reduction().col_messages())
    {
        println!("{line}");
    }

    for step in &solution.steps {
        print_step(step);
    }

    let total = assignment.total_cost();
    for a in solution.assignment.into_allocations() {
        println!("agent {} -> task {}: {}", a.row(), a.col(), a.cost());
    }
    println!("total: {total}");
}

fn print_step(step: &Step<f64>) {
    println!(
        "step {} ({:?}): {}",
        step.iteration,
        step.kind,
        step.message.as_deref().unwrap_or_default()
    );
    for (row, values) in step.matrix.row_iter().enumerate() {
        let cells: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(col, v)| {
                let mark = if step.starred[(row, col)] {
                    "*"
                } else if step.primed[(row, col)] {
                    "'"
                } else {
                    " "
                };
                format!("{v:>6}{mark}")
            })
            .collect();
        let cover = if step.covered_rows[row] { " <" } else { "" };
        println!("  {}{cover}", cells.join(" "));
    }
    if let Some(path) = &step.path {
        println!("  path: {path:?}");
    }
}

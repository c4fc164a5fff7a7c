//! Compiles fully-parenthesized prefix expressions in one free variable `x`
//! into derivation trees and samples them over an interval.
//!
//! ```rust
//! let tree = prefix_plot::compile("(* (* (- x 2) (+ x 2)) x)").unwrap();
//! let points = prefix_plot::sample(&tree, -3.0, 3.0, 300);
//! assert_eq!(points.len(), 300);
//! assert_eq!(points[0], (-3.0, -15.0));
//! ```

pub mod ast;
pub mod error;
pub mod plot;

use ast::{Compiler, DerivationTree, Evaluator};

pub use ast::{SampleConfig, DEFAULT_SAMPLE_COUNT};
pub use error::{MalformedExpression, Result};
pub use plot::{Graph, PlotConfig, PlotError, Plotter};

/// Runs the classifier, the grammar validator and the tree builder.
pub fn compile(expression: &str) -> Result<DerivationTree> {
    Compiler::compile_expression(expression)
}

/// Evaluates `tree` at `count` evenly spaced points starting at `x0`.
pub fn sample(tree: &DerivationTree, x0: f64, x1: f64, count: usize) -> Vec<(f64, f64)> {
    Evaluator::new(tree).sample(x0, x1, count)
}

/// Compiles `expression` and evaluates it once with the free variable bound to
/// `x`.
pub fn evaluate_expression(expression: &str, x: f64) -> Result<f64> {
    let tree = compile(expression)?;
    Ok(Evaluator::new(&tree).evaluate(x))
}

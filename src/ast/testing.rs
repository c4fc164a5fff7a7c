//! Helpers shared by the unit tests: a generator of random well-formed
//! expressions and a recursive reference evaluator.

use crate::ast::{DerivationTree, NodeId, Operation, Trigonometric};
use rand::Rng;

const OPERATORS: [&str; 5] = ["+", "-", "*", "/", "^"];

/// A random fully-parenthesized expression. The top level is always an
/// operator or a function; leaves and sub-expressions are sometimes wrapped
/// in an extra pair of parentheses.
pub fn random_expression(rng: &mut impl Rng, max_depth: usize) -> String {
    if rng.random_bool(0.5) {
        random_operator(rng, max_depth.max(1))
    } else {
        random_function(rng, max_depth.max(1))
    }
}

fn random_subexpression(rng: &mut impl Rng, depth: usize) -> String {
    if depth == 0 {
        return random_leaf(rng);
    }
    let expression = match rng.random_range(0..10) {
        0..=3 => random_leaf(rng),
        4..=7 => random_operator(rng, depth),
        _ => random_function(rng, depth),
    };
    // Redundant brackets around a whole sub-expression are still well formed.
    if rng.random_bool(0.1) {
        format!("({})", expression)
    } else {
        expression
    }
}

fn random_operator(rng: &mut impl Rng, depth: usize) -> String {
    let operator = OPERATORS[rng.random_range(0..OPERATORS.len())];
    let first = random_subexpression(rng, depth - 1);
    let second = random_subexpression(rng, depth - 1);
    format!("({} {} {})", operator, first, second)
}

fn random_function(rng: &mut impl Rng, depth: usize) -> String {
    let name = Trigonometric::NAMES[rng.random_range(0..Trigonometric::NAMES.len())];
    let operand = random_subexpression(rng, depth - 1);
    format!("({} {})", name, operand)
}

fn random_leaf(rng: &mut impl Rng) -> String {
    let leaf = match rng.random_range(0..6) {
        0 | 1 => "x".to_string(),
        2 => "-x".to_string(),
        3 => format!("{}", rng.random_range(-9..=9)),
        _ => format!("{:.2}", rng.random_range(-5.0..5.0)),
    };
    if rng.random_bool(0.2) {
        format!("({})", leaf)
    } else {
        leaf
    }
}

/// Direct recursive walk over the tree.
pub fn reference_evaluate(tree: &DerivationTree, x: f64) -> f64 {
    evaluate_node(tree, tree.root(), x)
}

fn evaluate_node(tree: &DerivationTree, id: NodeId, x: f64) -> f64 {
    let node = tree.node(id);
    match node.operation() {
        Operation::Algebraic(op) => {
            let left = evaluate_node(tree, node.first().unwrap(), x);
            let right = evaluate_node(tree, node.second().unwrap(), x);
            op.apply(left, right)
        }
        Operation::Trigonometric(function) => {
            function.apply(evaluate_node(tree, node.first().unwrap(), x))
        }
        leaf => leaf.resolve(x).unwrap(),
    }
}

/// Equality that treats any two NaNs as equal.
pub fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

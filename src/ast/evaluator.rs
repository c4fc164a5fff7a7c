use crate::ast::{DerivationTree, Operation, Sample};
use log::{debug, trace};
use rayon::prelude::*;

/// Number of points taken across an interval unless told otherwise.
pub const DEFAULT_SAMPLE_COUNT: usize = 300;

/// Interval and resolution used when sampling a tree.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SampleConfig {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            x0: -6.4,
            x1: 6.4,
            count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl SampleConfig {
    pub fn with_range(mut self, x0: f64, x1: f64) -> Self {
        self.x0 = x0;
        self.x1 = x1;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// The `k`-th input of the sweep.
    pub fn input(&self, k: usize) -> f64 {
        self.x0 + k as f64 * ((self.x1 - self.x0) / self.count as f64)
    }
}

/// Evaluates a derivation tree with an explicit value stack.
///
/// The tree is flattened once, children before parents, so every operator
/// finds its operands on top of the stack. The tree is only read; each call
/// keeps its own stack, which makes a single evaluator safe to share between
/// threads.
pub struct Evaluator<'t> {
    program: Vec<&'t Sample<Operation>>,
    max_stack: usize,
}

impl<'t> Evaluator<'t> {
    pub fn new(tree: &'t DerivationTree) -> Self {
        let program = tree.post_order();
        let max_stack = Self::stack_requirement(&program);
        debug!(
            "Flattened {} into {} steps, stack depth {}",
            tree,
            program.len(),
            max_stack
        );
        Self { program, max_stack }
    }

    /// The flattened program, in execution order.
    pub fn program(&self) -> &[&'t Sample<Operation>] {
        &self.program
    }

    fn stack_requirement(program: &[&Sample<Operation>]) -> usize {
        let mut depth = 0usize;
        let mut deepest = 0usize;
        for sample in program {
            let operation = sample.payload();
            if operation.is_marker() {
                continue;
            }
            depth = depth.saturating_sub(operation.arity()) + 1;
            deepest = deepest.max(depth);
        }
        deepest
    }

    /// Value of the tree with the free variable bound to `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let mut stack = Vec::with_capacity(self.max_stack);
        self.evaluate_with_stack(x, &mut stack)
    }

    /// Like [`Evaluator::evaluate`], reusing a caller-owned stack.
    pub fn evaluate_with_stack(&self, x: f64, stack: &mut Vec<f64>) -> f64 {
        stack.clear();
        for sample in &self.program {
            match sample.payload() {
                Operation::Algebraic(op) => {
                    let right = pop_operand(stack);
                    let left = pop_operand(stack);
                    stack.push(op.apply(left, right));
                }
                Operation::Trigonometric(function) => {
                    let operand = pop_operand(stack);
                    stack.push(function.apply(operand));
                }
                Operation::ParenOpenMarker | Operation::ParenCloseMarker => {}
                leaf => {
                    if let Some(value) = leaf.resolve(x) {
                        stack.push(value);
                    }
                }
            }
        }
        let result = pop_operand(stack);
        trace!("f({}) = {}", x, result);
        result
    }

    /// Evaluates `count` evenly spaced inputs `x0 + k * (x1 - x0) / count`
    /// for `k` in `0..count`, returning `(x, y)` pairs in order.
    pub fn sample(&self, x0: f64, x1: f64, count: usize) -> Vec<(f64, f64)> {
        self.sample_with(&SampleConfig { x0, x1, count })
    }

    pub fn sample_with(&self, config: &SampleConfig) -> Vec<(f64, f64)> {
        debug!(
            "Sampling [{}, {}] at {} points",
            config.x0, config.x1, config.count
        );
        let mut stack = Vec::with_capacity(self.max_stack);
        (0..config.count)
            .map(|k| {
                let x = config.input(k);
                (x, self.evaluate_with_stack(x, &mut stack))
            })
            .collect()
    }

    /// Same points as [`Evaluator::sample`], computed on the rayon pool.
    pub fn par_sample(&self, x0: f64, x1: f64, count: usize) -> Vec<(f64, f64)> {
        self.par_sample_with(&SampleConfig { x0, x1, count })
    }

    pub fn par_sample_with(&self, config: &SampleConfig) -> Vec<(f64, f64)> {
        debug!(
            "Sampling [{}, {}] at {} points on {} threads",
            config.x0,
            config.x1,
            config.count,
            rayon::current_num_threads()
        );
        (0..config.count)
            .into_par_iter()
            .map_init(
                || Vec::with_capacity(self.max_stack),
                |stack, k| {
                    let x = config.input(k);
                    (x, self.evaluate_with_stack(x, stack))
                },
            )
            .collect()
    }
}

// Arity is checked when the tree is built, so the stack never runs dry.
fn pop_operand(stack: &mut Vec<f64>) -> f64 {
    stack.pop().unwrap_or(f64::NAN)
}

use std::fmt;

mod classifier;
mod compiler;
mod evaluator;
mod operation;
mod tree;
mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::Classifier;
pub use compiler::Compiler;
pub use evaluator::{Evaluator, SampleConfig, DEFAULT_SAMPLE_COUNT};
pub use operation::{Algebraic, Operation, Trigonometric};
pub use tree::{DerivationTree, Node, NodeId};
pub use validator::Validator;

/// Weight given to every free-variable sample so it never takes part in
/// positional comparisons.
pub const VARIABLE_WEIGHT: i64 = -100;

/// Grammar category of a classified token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Number,
    Operator,
    Variable,
    Function,
    ParenOpen,
    ParenClose,
    Unknown,
}

impl Category {
    /// Numbers and the free variable are the terminal symbols of the grammar.
    pub fn is_terminal(self) -> bool {
        matches!(self, Category::Number | Category::Variable)
    }

    /// Categories that can anchor a subtree while the tree is being built.
    pub fn is_operable(self) -> bool {
        matches!(
            self,
            Category::Operator | Category::Function | Category::Variable
        )
    }

    /// Categories that may open a valid sub-expression.
    pub fn is_expression_start(self) -> bool {
        matches!(
            self,
            Category::Number
                | Category::Variable
                | Category::Function
                | Category::Operator
                | Category::ParenOpen
        )
    }
}

/// A classified token: payload, grammar category and ordering weight.
///
/// The payload starts out as the raw substring and becomes an [`Operation`]
/// after compilation. Two samples are equal when their category and payload
/// are equal; the weight is advisory.
#[derive(Debug, Clone)]
pub struct Sample<T> {
    payload: T,
    category: Category,
    weight: i64,
}

impl<T> Sample<T> {
    pub fn new(payload: T, category: Category) -> Self {
        Self::with_weight(payload, category, 0)
    }

    pub fn with_weight(payload: T, category: Category, weight: i64) -> Self {
        Self {
            payload,
            category,
            weight,
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: i64) {
        self.weight = weight;
    }

    /// Replaces the payload, keeping category and weight.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sample<U> {
        Sample {
            payload: f(self.payload),
            category: self.category,
            weight: self.weight,
        }
    }
}

impl<T: PartialEq> PartialEq for Sample<T> {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.payload == other.payload
    }
}

impl<T: fmt::Display> fmt::Display for Sample<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.payload.fmt(f)
    }
}

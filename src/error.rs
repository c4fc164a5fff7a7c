use thiserror::Error;

/// The only error the compilation pipeline raises.
///
/// Each variant is one reason an expression can be rejected. Evaluation never
/// produces an error: domain problems such as division by zero come back as
/// `f64::INFINITY` in the sample stream instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedExpression {
    /// A single character that is not part of the grammar.
    #[error("malformed expression: unrecognized symbol `{0}`")]
    UnrecognizedSymbol(char),

    /// The input contains no opening parenthesis at all.
    #[error("malformed expression: missing parentheses")]
    MissingParentheses,

    /// The token sequence is not derivable from the grammar, or it cannot be
    /// arranged into a tree that respects operator arity.
    #[error("malformed expression: invalid expression")]
    InvalidExpression,
}

impl MalformedExpression {
    /// The bare reason, without the offending symbol.
    pub fn reason(&self) -> &'static str {
        match self {
            MalformedExpression::UnrecognizedSymbol(_) => "unrecognized symbol",
            MalformedExpression::MissingParentheses => "missing parentheses",
            MalformedExpression::InvalidExpression => "invalid expression",
        }
    }
}

pub type Result<T> = std::result::Result<T, MalformedExpression>;
